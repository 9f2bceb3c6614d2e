use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Clé primaire séquentielle d'un anniversaire
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BirthdayId(u64);

impl BirthdayId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for BirthdayId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Clé primaire séquentielle d'un tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TagId(u64);

impl TagId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }
    pub fn get(self) -> u64 {
        self.0
    }
}

/// Identifiant fort d'un utilisateur
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Username(String);

impl Username {
    pub fn new<S: AsRef<str>>(s: S) -> Self {
        Self(s.as_ref().to_owned())
    }
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Username {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Utilisateur enregistré
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: Username,
    pub joined: DateTime<Utc>,
}

/// Étiquette libre, administrée à part
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    pub id: TagId,
    pub tag: String,
}

/// Champs saisis d'un anniversaire, déjà validés par le formulaire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BirthdayDraft {
    pub first_name: String,
    pub last_name: String,
    pub birthday: NaiveDate,
    /// Chemin relatif dans le répertoire media.
    pub image: Option<String>,
    pub tags: Vec<String>,
}

/// Fiche d'anniversaire
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Birthday {
    pub id: BirthdayId,
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    pub birthday: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Username>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<TagId>,
}

impl Birthday {
    pub fn full_name(&self) -> String {
        if self.last_name.is_empty() {
            self.first_name.clone()
        } else {
            format!("{} {}", self.first_name, self.last_name)
        }
    }

    /// Clé d'unicité (prénom, nom, date).
    pub fn same_person(&self, first_name: &str, last_name: &str, birthday: NaiveDate) -> bool {
        self.first_name == first_name && self.last_name == last_name && self.birthday == birthday
    }
}

/// Base complète persistée en JSON
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Database {
    #[serde(default)]
    pub users: Vec<User>,
    #[serde(default)]
    pub tags: Vec<Tag>,
    #[serde(default)]
    pub birthdays: Vec<Birthday>,
    #[serde(default)]
    pub(crate) last_birthday_id: u64,
    #[serde(default)]
    pub(crate) last_tag_id: u64,
}

impl Database {
    pub fn find_user<'a>(&'a self, username: &str) -> Option<&'a User> {
        self.users.iter().find(|u| u.username.as_str() == username)
    }
    pub fn find_tag_by_name<'a>(&'a self, name: &str) -> Option<&'a Tag> {
        self.tags.iter().find(|t| t.tag == name)
    }
    pub fn find_birthday(&self, id: BirthdayId) -> Option<&Birthday> {
        self.birthdays.iter().find(|b| b.id == id)
    }
    pub fn find_birthday_mut(&mut self, id: BirthdayId) -> Option<&mut Birthday> {
        self.birthdays.iter_mut().find(|b| b.id == id)
    }

    /// Noms des tags d'une fiche, dans l'ordre des identifiants.
    pub fn tag_names(&self, birthday: &Birthday) -> Vec<String> {
        birthday
            .tags
            .iter()
            .filter_map(|id| self.tags.iter().find(|t| t.id == *id))
            .map(|t| t.tag.clone())
            .collect()
    }

    pub(crate) fn next_birthday_id(&mut self) -> BirthdayId {
        let seen = self.birthdays.iter().map(|b| b.id.get()).max().unwrap_or(0);
        self.last_birthday_id = self.last_birthday_id.max(seen) + 1;
        BirthdayId(self.last_birthday_id)
    }

    pub(crate) fn next_tag_id(&mut self) -> TagId {
        let seen = self.tags.iter().map(|t| t.id.get()).max().unwrap_or(0);
        self.last_tag_id = self.last_tag_id.max(seen) + 1;
        TagId(self.last_tag_id)
    }
}
