use crate::auth::{AuthError, DenyReason};
use crate::countdown::InvalidDateError;
use crate::form::{FormErrors, NON_FIELD};
use crate::model::{Birthday, BirthdayId};
use crate::pagination::Page;
use crate::repo::RepoError;
use thiserror::Error;

/// Contexte de la liste paginée.
#[derive(Debug, Clone)]
pub struct ListContext {
    pub page: Page<Birthday>,
}

/// Contexte de la fiche détaillée.
#[derive(Debug, Clone)]
pub struct DetailContext {
    pub birthday: Birthday,
    pub tags: Vec<String>,
    pub countdown: u32,
}

/// Fiche enregistrée après création ou modification.
#[derive(Debug, Clone)]
pub struct SavedContext {
    pub birthday: Birthday,
    pub countdown: u32,
}

#[derive(Debug, Clone)]
pub enum DeleteOutcome {
    /// Demande de confirmation, rien n'est supprimé.
    Confirm(Birthday),
    Deleted { birthday: Birthday, redirect: String },
}

#[derive(Error, Debug)]
pub enum ViewError {
    #[error("login required: {redirect}")]
    LoginRequired { redirect: String },
    #[error("not found: {0}")]
    NotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(DenyReason),
    #[error("invalid form: {0}")]
    Invalid(FormErrors),
    #[error("unknown user: {0}")]
    UnknownUser(String),
    #[error(transparent)]
    Date(#[from] InvalidDateError),
    #[error(transparent)]
    Repo(RepoError),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<RepoError> for ViewError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(id) => ViewError::NotFound(format!("birthday {id}")),
            RepoError::Duplicate => {
                ViewError::Invalid(FormErrors::non_field(RepoError::Duplicate.to_string()))
            }
            RepoError::UnknownTag(name) => {
                let mut errors = FormErrors::default();
                errors.add(
                    "tags",
                    format!("Select a valid choice. {name} is not one of the available choices."),
                );
                ViewError::Invalid(errors)
            }
            other => ViewError::Repo(other),
        }
    }
}

impl From<AuthError> for ViewError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::UnknownUser(name) => ViewError::UnknownUser(name),
        }
    }
}

impl ViewError {
    /// Erreurs de formulaire sans champ, s'il y en a.
    pub fn non_field_errors(&self) -> &[String] {
        match self {
            ViewError::Invalid(errors) => errors.get(NON_FIELD),
            _ => &[],
        }
    }
}

/// Chemins des écrans, pour les redirections.
pub mod urls {
    use super::BirthdayId;

    pub fn list() -> String {
        "/birthday/list/".to_string()
    }
    pub fn create() -> String {
        "/birthday/".to_string()
    }
    pub fn edit(id: BirthdayId) -> String {
        format!("/birthday/{id}/edit/")
    }
    pub fn delete(id: BirthdayId) -> String {
        format!("/birthday/{id}/delete/")
    }
    pub fn members() -> String {
        "/birthday/members/".to_string()
    }
}
