//! Formulaire de saisie d'un anniversaire.

use crate::countdown::{parse_date, InvalidDateError};
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;

pub const NAME_MAX_CHARS: usize = 20;
pub const MIN_AGE: i32 = 1;
pub const MAX_AGE: i32 = 120;
pub const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "webp"];

/// Noms complets refusés par la validation croisée.
pub const BEATLES: &[&str] = &["John Lennon", "Paul McCartney", "George Harrison", "Ringo Starr"];

/// Clé des erreurs qui ne portent sur aucun champ.
pub const NON_FIELD: &str = "__all__";

/// Saisie brute, telle que reçue.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BirthdayForm {
    pub first_name: String,
    pub last_name: String,
    pub birthday: String,
    /// Chemin d'un fichier image à téléverser.
    pub image: Option<String>,
    /// Retire l'image existante lors d'une modification.
    pub clear_image: bool,
    pub tags: Vec<String>,
}

/// Saisie validée (avant stockage de l'image).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanedForm {
    pub first_name: String,
    pub last_name: String,
    pub birthday: NaiveDate,
    pub image: Option<String>,
    pub clear_image: bool,
    pub tags: Vec<String>,
}

/// Erreurs de validation, par champ.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormErrors {
    fields: BTreeMap<String, Vec<String>>,
}

impl FormErrors {
    pub fn add<F: Into<String>, M: Into<String>>(&mut self, field: F, message: M) {
        self.fields.entry(field.into()).or_default().push(message.into());
    }

    pub fn non_field<M: Into<String>>(message: M) -> Self {
        let mut errors = Self::default();
        errors.add(NON_FIELD, message);
        errors
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn get(&self, field: &str) -> &[String] {
        self.fields.get(field).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }
}

impl fmt::Display for FormErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in self.iter() {
            for message in messages {
                if !first {
                    f.write_str("; ")?;
                }
                first = false;
                if field == NON_FIELD {
                    write!(f, "{message}")?;
                } else {
                    write!(f, "{field}: {message}")?;
                }
            }
        }
        Ok(())
    }
}

impl BirthdayForm {
    /// Valide la saisie ; l'âge est calculé par rapport à `today`.
    pub fn validate(&self, today: NaiveDate) -> Result<CleanedForm, FormErrors> {
        let mut errors = FormErrors::default();

        // seul le premier mot du prénom est conservé
        let first_name = self
            .first_name
            .split_whitespace()
            .next()
            .unwrap_or_default()
            .to_string();
        if first_name.is_empty() {
            errors.add("first_name", "This field is required.");
        } else if self.first_name.trim().chars().count() > NAME_MAX_CHARS {
            errors.add("first_name", too_long(self.first_name.trim()));
        }

        let last_name = self.last_name.trim().to_string();
        if last_name.chars().count() > NAME_MAX_CHARS {
            errors.add("last_name", too_long(&last_name));
        }

        let birthday = if self.birthday.trim().is_empty() {
            errors.add("birthday", "This field is required.");
            None
        } else {
            match parse_date(&self.birthday) {
                Ok(date) => {
                    if let Err(message) = real_age(date, today) {
                        errors.add("birthday", message);
                    }
                    Some(date)
                }
                Err(InvalidDateError::Unparseable { .. }) => {
                    errors.add("birthday", "Enter a valid date (YYYY-MM-DD).");
                    None
                }
                Err(err) => {
                    errors.add("birthday", err.to_string());
                    None
                }
            }
        };

        let image = self
            .image
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string);
        if let Some(path) = &image {
            if !has_image_extension(Path::new(path)) {
                errors.add(
                    "image",
                    format!(
                        "Unsupported image type (expected one of: {}).",
                        IMAGE_EXTENSIONS.join(", ")
                    ),
                );
            }
        }

        let mut tags: Vec<String> = Vec::new();
        for tag in self.tags.iter().map(|t| t.trim()).filter(|t| !t.is_empty()) {
            if !tags.iter().any(|t| t == tag) {
                tags.push(tag.to_string());
            }
        }

        if self.is_beatle() {
            errors.add(
                NON_FIELD,
                "We love the Beatles too, but please enter a real name!",
            );
        }

        match birthday {
            Some(birthday) if errors.is_empty() => Ok(CleanedForm {
                first_name,
                last_name,
                birthday,
                image,
                clear_image: self.clear_image,
                tags,
            }),
            _ => Err(errors),
        }
    }

    /// Nom complet d'un membre des Beatles ?
    pub fn is_beatle(&self) -> bool {
        let first = self.first_name.split_whitespace().next().unwrap_or_default();
        let full = format!("{} {}", first, self.last_name.trim());
        BEATLES.contains(&full.as_str())
    }
}

fn too_long(value: &str) -> String {
    format!(
        "Ensure this value has at most {NAME_MAX_CHARS} characters (it has {}).",
        value.chars().count()
    )
}

/// Âge en années révolues à la date `today`.
pub fn age_on(birthday: NaiveDate, today: NaiveDate) -> i32 {
    let mut age = today.year() - birthday.year();
    if (today.month(), today.day()) < (birthday.month(), birthday.day()) {
        age -= 1;
    }
    age
}

fn real_age(birthday: NaiveDate, today: NaiveDate) -> Result<(), String> {
    let age = age_on(birthday, today);
    if !(MIN_AGE..=MAX_AGE).contains(&age) {
        return Err(format!("Expected an age between {MIN_AGE} and {MAX_AGE} (got {age})."));
    }
    Ok(())
}

pub(crate) fn has_image_extension(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| IMAGE_EXTENSIONS.contains(&e.to_ascii_lowercase().as_str()))
        .unwrap_or(false)
}
