//! Compte à rebours jusqu'au prochain anniversaire.
//!
//! Seuls le mois et le jour de la date de naissance comptent ; l'année sert
//! uniquement à valider la date. Un anniversaire du 29 février est fêté le
//! 28 février les années non bissextiles.

use chrono::format::ParseErrorKind;
use chrono::{Datelike, NaiveDate, Utc};
use thiserror::Error;

/// Jour de repli (février) pour les anniversaires du 29 février.
pub const LEAP_DAY_FALLBACK: u32 = 28;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InvalidDateError {
    #[error("invalid calendar date: {year:04}-{month:02}-{day:02}")]
    OutOfRange { year: i32, month: u32, day: u32 },
    #[error("cannot parse date {input:?}: expected YYYY-MM-DD")]
    Unparseable { input: String },
}

/// Date de naissance validée (immuable).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BirthDate(NaiveDate);

impl BirthDate {
    pub fn new(year: i32, month: u32, day: u32) -> Result<Self, InvalidDateError> {
        ymd(year, month, day).map(Self)
    }

    /// Parse `YYYY-MM-DD`.
    pub fn parse(raw: &str) -> Result<Self, InvalidDateError> {
        parse_date(raw).map(Self)
    }

    pub fn date(self) -> NaiveDate {
        self.0
    }
}

impl From<NaiveDate> for BirthDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}

/// Date du jour (UTC).
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Parse une date `YYYY-MM-DD` en distinguant format invalide et date hors calendrier.
pub fn parse_date(raw: &str) -> Result<NaiveDate, InvalidDateError> {
    let raw = raw.trim();
    let unparseable = || InvalidDateError::Unparseable {
        input: raw.to_string(),
    };
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|err| match err.kind() {
        ParseErrorKind::OutOfRange | ParseErrorKind::Impossible => components(raw)
            .map(|(year, month, day)| InvalidDateError::OutOfRange { year, month, day })
            .unwrap_or_else(unparseable),
        _ => unparseable(),
    })
}

/// Composantes numériques d'une date bien formée mais hors calendrier.
fn components(raw: &str) -> Option<(i32, u32, u32)> {
    let mut parts = raw.splitn(3, '-');
    let (y, m, d) = (parts.next()?, parts.next()?, parts.next()?);
    let digits = |s: &str| !s.is_empty() && s.bytes().all(|b| b.is_ascii_digit());
    if !(digits(y) && digits(m) && digits(d)) {
        return None;
    }
    Some((y.parse().ok()?, m.parse().ok()?, d.parse().ok()?))
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate, InvalidDateError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or(InvalidDateError::OutOfRange { year, month, day })
}

/// Date à laquelle l'anniversaire est fêté pendant `year`.
///
/// `None` seulement si `year` sort de la plage représentable.
pub fn anniversary_in(year: i32, birth: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(year, birth.month(), birth.day()).or_else(|| {
        if birth.month() == 2 && birth.day() == 29 {
            NaiveDate::from_ymd_opt(year, 2, LEAP_DAY_FALLBACK)
        } else {
            None
        }
    })
}

/// Prochaine occurrence (aujourd'hui incluse) de l'anniversaire vue depuis `current`.
pub fn next_anniversary(
    birth: NaiveDate,
    current: NaiveDate,
) -> Result<NaiveDate, InvalidDateError> {
    let out_of_range = |year: i32| InvalidDateError::OutOfRange {
        year,
        month: birth.month(),
        day: birth.day(),
    };

    let year = current.year();
    let candidate = anniversary_in(year, birth).ok_or_else(|| out_of_range(year))?;
    if candidate >= current {
        return Ok(candidate);
    }
    let next_year = year + 1;
    anniversary_in(next_year, birth).ok_or_else(|| out_of_range(next_year))
}

/// Nombre de jours restant avant le prochain anniversaire (0 le jour même).
pub fn countdown_days(birth: NaiveDate, current: NaiveDate) -> Result<u32, InvalidDateError> {
    let next = next_anniversary(birth, current)?;
    // toujours dans [0, 366] : la prochaine occurrence est au plus un an plus tard
    let days = (next - current).num_days();
    debug_assert!(days >= 0, "{next} precedes {current}");
    u32::try_from(days).map_err(|_| InvalidDateError::OutOfRange {
        year: next.year(),
        month: next.month(),
        day: next.day(),
    })
}

/// Variante sans date de référence : utilise [`today`].
pub fn countdown_days_from_today(birth: NaiveDate) -> Result<u32, InvalidDateError> {
    countdown_days(birth, today())
}

/// Point d'entrée validant des composantes brutes `(année, mois, jour)`.
pub fn countdown_from_ymd(
    birth: (i32, u32, u32),
    current: (i32, u32, u32),
) -> Result<u32, InvalidDateError> {
    let birth = BirthDate::new(birth.0, birth.1, birth.2)?;
    let current = ymd(current.0, current.1, current.2)?;
    countdown_days(birth.date(), current)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn day_before_is_one() {
        assert_eq!(countdown_days(d(1990, 3, 15), d(2024, 3, 14)).unwrap(), 1);
    }

    #[test]
    fn same_day_is_zero() {
        assert_eq!(countdown_days(d(1990, 3, 15), d(2024, 3, 15)).unwrap(), 0);
    }

    #[test]
    fn day_after_wraps_to_next_year() {
        assert_eq!(countdown_days(d(1990, 3, 15), d(2024, 3, 16)).unwrap(), 364);
        // 2023 -> 2024 traverse le 29 février
        assert_eq!(countdown_days(d(1990, 3, 15), d(2023, 3, 16)).unwrap(), 365);
    }

    #[test]
    fn birth_year_is_ignored() {
        assert_eq!(countdown_days(d(1985, 12, 31), d(1985, 1, 1)).unwrap(), 364);
        assert_eq!(countdown_days(d(1985, 12, 31), d(2024, 1, 1)).unwrap(), 365);
        // date de naissance postérieure à la date de référence
        assert_eq!(countdown_days(d(2030, 1, 2), d(2024, 1, 1)).unwrap(), 1);
    }

    #[test]
    fn leap_day_observed_on_feb_28_in_common_years() {
        let birth = d(2000, 2, 29);
        assert_eq!(anniversary_in(2023, birth), Some(d(2023, 2, 28)));
        assert_eq!(anniversary_in(2024, birth), Some(d(2024, 2, 29)));

        assert_eq!(countdown_days(birth, d(2023, 2, 28)).unwrap(), 0);
        assert_eq!(countdown_days(birth, d(2023, 2, 27)).unwrap(), 1);
        // le 28/02/2023 est passé, la suivante est le 29/02/2024
        assert_eq!(countdown_days(birth, d(2023, 3, 1)).unwrap(), 365);
        assert_eq!(countdown_days(birth, d(2024, 2, 29)).unwrap(), 0);
        assert_eq!(countdown_days(birth, d(2024, 3, 1)).unwrap(), 364);
    }

    #[test]
    fn countdown_on_own_birth_date_is_zero() {
        let mut day = d(1999, 1, 1);
        while day <= d(2001, 1, 1) {
            assert_eq!(countdown_days(day, day).unwrap(), 0, "{day}");
            day = day.succ_opt().unwrap();
        }
    }

    #[test]
    fn countdown_stays_within_a_year() {
        let births = [d(1990, 1, 1), d(2000, 2, 29), d(1990, 3, 1), d(1990, 12, 31)];
        let mut current = d(2022, 12, 1);
        while current <= d(2025, 3, 31) {
            for birth in births {
                let days = countdown_days(birth, current).unwrap();
                assert!(days <= 366, "{birth} from {current}: {days}");
                assert_eq!(days, countdown_days(birth, current).unwrap());
            }
            current = current.succ_opt().unwrap();
        }
    }

    #[test]
    fn raw_components_are_validated() {
        assert_eq!(countdown_from_ymd((1990, 3, 15), (2024, 3, 14)), Ok(1));
        assert_eq!(
            countdown_from_ymd((1990, 13, 1), (2024, 3, 14)),
            Err(InvalidDateError::OutOfRange { year: 1990, month: 13, day: 1 })
        );
        assert_eq!(
            countdown_from_ymd((1990, 3, 15), (2023, 2, 29)),
            Err(InvalidDateError::OutOfRange { year: 2023, month: 2, day: 29 })
        );
        assert!(BirthDate::new(2001, 2, 29).is_err());
        assert!(BirthDate::new(2000, 2, 29).is_ok());
    }

    #[test]
    fn parse_distinguishes_format_and_range() {
        assert_eq!(parse_date("2024-03-15").unwrap(), d(2024, 3, 15));
        assert_eq!(parse_date(" 2024-3-5 ").unwrap(), d(2024, 3, 5));
        assert!(matches!(
            parse_date("15/03/2024"),
            Err(InvalidDateError::Unparseable { .. })
        ));
        assert!(matches!(
            parse_date("2024-04-31"),
            Err(InvalidDateError::OutOfRange { month: 4, day: 31, .. })
        ));
        assert_eq!(
            parse_date("2023-13-01"),
            Err(InvalidDateError::OutOfRange { year: 2023, month: 13, day: 1 })
        );
    }

    #[test]
    fn signed_components_are_rejected() {
        for raw in ["2024-+3-05", "2024-03-+5", "2024-03-05x", "2024-03"] {
            assert!(
                matches!(parse_date(raw), Err(InvalidDateError::Unparseable { .. })),
                "{raw}"
            );
        }
    }

    #[test]
    fn countdown_from_today_uses_the_clock() {
        let birth = d(1990, 3, 15);
        let before = today();
        let days = countdown_days_from_today(birth).unwrap();
        if before == today() {
            assert_eq!(days, countdown_days(birth, before).unwrap());
        }
        assert!(days <= 366);
    }

    #[test]
    fn unrepresentable_anniversary_is_an_error() {
        let last = NaiveDate::MAX;
        let birth = d(2000, 1, 1);
        assert!(countdown_days(birth, last).is_err());
    }
}
