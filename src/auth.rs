//! Identité de l'appelant et contrôle d'accès avant mutation.

use crate::model::{Birthday, Database, Username};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Appelant d'un handler.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Principal {
    #[default]
    Anonymous,
    User(Username),
}

impl Principal {
    pub fn username(&self) -> Option<&Username> {
        match self {
            Principal::Anonymous => None,
            Principal::User(name) => Some(name),
        }
    }
    pub fn is_authenticated(&self) -> bool {
        matches!(self, Principal::User(_))
    }
}

/// Qui peut modifier ou supprimer une fiche.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OwnershipPolicy {
    /// Seul l'auteur (les fiches sans auteur restent modifiables par tous).
    #[default]
    AuthorOnly,
    /// Tout utilisateur connecté.
    AnyUser,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DenyReason {
    NotAuthenticated,
    NotAuthor { author: Username },
}

impl fmt::Display for DenyReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DenyReason::NotAuthenticated => f.write_str("authentication required"),
            DenyReason::NotAuthor { author } => {
                write!(f, "only {author} may change this birthday")
            }
        }
    }
}

/// Résultat du contrôle d'accès.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Access {
    Allowed,
    Denied(DenyReason),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("unknown user: {0}")]
    UnknownUser(String),
}

/// Résout un nom d'utilisateur ; `None` donne un appelant anonyme.
pub fn authenticate(db: &Database, username: Option<&str>) -> Result<Principal, AuthError> {
    match username.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Principal::Anonymous),
        Some(name) => db
            .find_user(name)
            .map(|u| Principal::User(u.username.clone()))
            .ok_or_else(|| AuthError::UnknownUser(name.to_string())),
    }
}

/// URL de redirection vers la connexion, avec retour sur `next`.
pub fn login_redirect(login_url: &str, next: &str) -> String {
    format!("{login_url}?next={next}")
}

/// Vérifie que l'appelant est connecté ; sinon renvoie l'URL de connexion.
pub fn require_login<'a>(
    principal: &'a Principal,
    login_url: &str,
    next: &str,
) -> Result<&'a Username, String> {
    principal
        .username()
        .ok_or_else(|| login_redirect(login_url, next))
}

/// Contrôle à faire avant toute modification ou suppression.
pub fn authorize_mutation(
    principal: &Principal,
    birthday: &Birthday,
    policy: OwnershipPolicy,
) -> Access {
    let Some(user) = principal.username() else {
        return Access::Denied(DenyReason::NotAuthenticated);
    };
    match (policy, &birthday.author) {
        (OwnershipPolicy::AnyUser, _) | (_, None) => Access::Allowed,
        (OwnershipPolicy::AuthorOnly, Some(author)) if author == user => Access::Allowed,
        (OwnershipPolicy::AuthorOnly, Some(author)) => Access::Denied(DenyReason::NotAuthor {
            author: author.clone(),
        }),
    }
}
