use crate::countdown::countdown_days;
use crate::form::BirthdayForm;
use crate::model::Database;
use crate::repo::BirthdayRepository;
use anyhow::{bail, Context};
use chrono::NaiveDate;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de fiches depuis CSV: header `first_name,last_name,birthday[,tags]`
///
/// Les lignes ne sont pas validées ici : elles passent ensuite par le formulaire.
pub fn import_birthdays_csv<P: AsRef<Path>>(path: P) -> anyhow::Result<Vec<BirthdayForm>> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_path(path)?;
    let mut out = Vec::new();
    for (line, rec) in rdr.records().enumerate() {
        let rec = rec?;
        let first_name = rec.get(0).context("missing first_name")?.trim();
        let last_name = rec.get(1).unwrap_or_default().trim();
        let birthday = rec.get(2).context("missing birthday")?.trim();
        if first_name.is_empty() || birthday.is_empty() {
            bail!("invalid birthday row {} (empty)", line + 2);
        }
        let tags = rec
            .get(3)
            .map(|raw| {
                raw.split(';')
                    .map(str::trim)
                    .filter(|t| !t.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default();
        out.push(BirthdayForm {
            first_name: first_name.to_string(),
            last_name: last_name.to_string(),
            birthday: birthday.to_string(),
            tags,
            ..Default::default()
        });
    }
    Ok(out)
}

/// Export JSON de la base (jolie mise en forme)
pub fn export_database_json<P: AsRef<Path>>(path: P, db: &Database) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(db)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV des fiches: header `id,first_name,last_name,birthday,author,countdown_days`
pub fn export_birthdays_csv<P: AsRef<Path>>(
    path: P,
    db: &Database,
    today: NaiveDate,
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    w.write_record(["id", "first_name", "last_name", "birthday", "author", "countdown_days"])?;
    for b in db.list() {
        let id = b.id.to_string();
        let birthday = b.birthday.to_string();
        let countdown = countdown_days(b.birthday, today)?.to_string();
        let author = b.author.as_ref().map(|a| a.as_str()).unwrap_or("");
        w.write_record([
            id.as_str(),
            b.first_name.as_str(),
            b.last_name.as_str(),
            birthday.as_str(),
            author,
            countdown.as_str(),
        ])?;
    }
    w.flush()?;
    Ok(())
}
