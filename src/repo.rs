//! Accès aux données : l'interface utilisée par les handlers.

use crate::model::{Birthday, BirthdayDraft, BirthdayId, Database, Tag, TagId, User, Username};
use chrono::Utc;
use thiserror::Error;
use tracing::info;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RepoError {
    #[error("birthday {0} not found")]
    NotFound(BirthdayId),
    #[error("a birthday with this first name, last name and date already exists")]
    Duplicate,
    #[error("unknown tag: {0}")]
    UnknownTag(String),
    #[error("tag name cannot be empty")]
    EmptyTag,
    #[error("tag already exists: {0}")]
    TagExists(String),
    #[error("user already exists: {0}")]
    UserExists(String),
    #[error("invalid username: {0:?}")]
    InvalidUsername(String),
}

/// Opérations CRUD sur les fiches d'anniversaire.
pub trait BirthdayRepository {
    /// Toutes les fiches, triées par identifiant.
    fn list(&self) -> Vec<Birthday>;
    fn get(&self, id: BirthdayId) -> Option<Birthday>;
    fn create(
        &mut self,
        draft: BirthdayDraft,
        author: Option<Username>,
    ) -> Result<Birthday, RepoError>;
    /// Remplace les champs saisis ; l'auteur est conservé.
    fn update(&mut self, id: BirthdayId, draft: BirthdayDraft) -> Result<Birthday, RepoError>;
    fn delete(&mut self, id: BirthdayId) -> Result<Birthday, RepoError>;
    /// Noms des tags rattachés à une fiche.
    fn tag_names(&self, birthday: &Birthday) -> Vec<String>;
}

impl BirthdayRepository for Database {
    fn list(&self) -> Vec<Birthday> {
        let mut out = self.birthdays.clone();
        out.sort_by_key(|b| b.id);
        out
    }

    fn get(&self, id: BirthdayId) -> Option<Birthday> {
        self.find_birthday(id).cloned()
    }

    fn create(
        &mut self,
        draft: BirthdayDraft,
        author: Option<Username>,
    ) -> Result<Birthday, RepoError> {
        self.check_unique(&draft, None)?;
        let tags = self.resolve_tags(&draft.tags)?;
        let birthday = Birthday {
            id: self.next_birthday_id(),
            first_name: draft.first_name,
            last_name: draft.last_name,
            birthday: draft.birthday,
            image: draft.image,
            author,
            tags,
        };
        info!(id = %birthday.id, "birthday created");
        self.birthdays.push(birthday.clone());
        Ok(birthday)
    }

    fn update(&mut self, id: BirthdayId, draft: BirthdayDraft) -> Result<Birthday, RepoError> {
        if self.find_birthday(id).is_none() {
            return Err(RepoError::NotFound(id));
        }
        self.check_unique(&draft, Some(id))?;
        let tags = self.resolve_tags(&draft.tags)?;
        let record = self.find_birthday_mut(id).ok_or(RepoError::NotFound(id))?;
        record.first_name = draft.first_name;
        record.last_name = draft.last_name;
        record.birthday = draft.birthday;
        record.image = draft.image;
        record.tags = tags;
        info!(id = %id, "birthday updated");
        Ok(record.clone())
    }

    fn delete(&mut self, id: BirthdayId) -> Result<Birthday, RepoError> {
        let pos = self
            .birthdays
            .iter()
            .position(|b| b.id == id)
            .ok_or(RepoError::NotFound(id))?;
        info!(id = %id, "birthday deleted");
        Ok(self.birthdays.remove(pos))
    }

    fn tag_names(&self, birthday: &Birthday) -> Vec<String> {
        Database::tag_names(self, birthday)
    }
}

impl Database {
    fn check_unique(
        &self,
        draft: &BirthdayDraft,
        except: Option<BirthdayId>,
    ) -> Result<(), RepoError> {
        let clash = self.birthdays.iter().any(|b| {
            Some(b.id) != except
                && b.same_person(&draft.first_name, &draft.last_name, draft.birthday)
        });
        if clash {
            return Err(RepoError::Duplicate);
        }
        Ok(())
    }

    fn resolve_tags(&self, names: &[String]) -> Result<Vec<TagId>, RepoError> {
        let mut ids = Vec::with_capacity(names.len());
        for name in names {
            let tag = self
                .find_tag_by_name(name)
                .ok_or_else(|| RepoError::UnknownTag(name.clone()))?;
            if !ids.contains(&tag.id) {
                ids.push(tag.id);
            }
        }
        ids.sort();
        Ok(ids)
    }

    /// Ajoute un tag (nom unique, non vide).
    pub fn add_tag(&mut self, name: &str) -> Result<Tag, RepoError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RepoError::EmptyTag);
        }
        if self.find_tag_by_name(name).is_some() {
            return Err(RepoError::TagExists(name.to_string()));
        }
        let tag = Tag { id: self.next_tag_id(), tag: name.to_string() };
        self.tags.push(tag.clone());
        Ok(tag)
    }

    pub fn list_tags(&self) -> Vec<Tag> {
        let mut out = self.tags.clone();
        out.sort_by_key(|t| t.id);
        out
    }

    /// Enregistre un utilisateur ; le nom suit les règles usuelles (lettres, chiffres, `@.+-_`).
    pub fn register_user(&mut self, username: &str) -> Result<User, RepoError> {
        let username = username.trim();
        let valid = !username.is_empty()
            && username.chars().count() <= 150
            && username
                .chars()
                .all(|c| c.is_alphanumeric() || "@.+-_".contains(c));
        if !valid {
            return Err(RepoError::InvalidUsername(username.to_string()));
        }
        if self.find_user(username).is_some() {
            return Err(RepoError::UserExists(username.to_string()));
        }
        let user = User { username: Username::new(username), joined: Utc::now() };
        info!(username = %user.username, "user registered");
        self.users.push(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn draft(first: &str, last: &str) -> BirthdayDraft {
        BirthdayDraft {
            first_name: first.into(),
            last_name: last.into(),
            birthday: NaiveDate::from_ymd_opt(1990, 3, 15).unwrap(),
            image: None,
            tags: Vec::new(),
        }
    }

    #[test]
    fn list_is_ordered_by_id() {
        let mut db = Database::default();
        db.create(draft("A", "A"), None).unwrap();
        db.create(draft("B", "B"), None).unwrap();
        db.birthdays.reverse();
        let ids: Vec<u64> = db.list().iter().map(|b| b.id.get()).collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[test]
    fn duplicate_person_is_rejected() {
        let mut db = Database::default();
        db.create(draft("Ada", "Lovelace"), None).unwrap();
        assert_eq!(db.create(draft("Ada", "Lovelace"), None), Err(RepoError::Duplicate));
    }

    #[test]
    fn update_may_keep_its_own_key() {
        let mut db = Database::default();
        let b = db.create(draft("Ada", "Lovelace"), Some(Username::new("ada"))).unwrap();
        let updated = db.update(b.id, draft("Ada", "Lovelace")).unwrap();
        assert_eq!(updated.author, Some(Username::new("ada")));
    }

    #[test]
    fn tags_must_exist() {
        let mut db = Database::default();
        db.add_tag("family").unwrap();
        let mut d = draft("Ada", "Lovelace");
        d.tags = vec!["friends".into()];
        assert_eq!(db.create(d.clone(), None), Err(RepoError::UnknownTag("friends".into())));
        d.tags = vec!["family".into(), "family".into()];
        let b = db.create(d, None).unwrap();
        assert_eq!(db.tag_names(&b), vec!["family".to_string()]);
    }

    #[test]
    fn delete_unknown_is_not_found() {
        let mut db = Database::default();
        assert_eq!(
            db.delete(BirthdayId::new(7)),
            Err(RepoError::NotFound(BirthdayId::new(7)))
        );
    }

    #[test]
    fn usernames_are_checked() {
        let mut db = Database::default();
        db.register_user("alice").unwrap();
        assert_eq!(db.register_user("alice"), Err(RepoError::UserExists("alice".into())));
        assert!(matches!(db.register_user("a b"), Err(RepoError::InvalidUsername(_))));
    }
}
