#![forbid(unsafe_code)]
//! Acme Birthday : suivi d'anniversaires et de pages simples (sans BD).
//!
//! - Compte à rebours jusqu'au prochain anniversaire (29/02 fêté le 28/02).
//! - Stockage fichier JSON, écriture atomique.
//! - Handlers CRUD avec contrôle d'accès par auteur, pagination, formulaires.
//! - Mails en fichiers, images téléversées nettoyées à la suppression.

pub mod auth;
pub mod config;
pub mod countdown;
pub mod form;
pub mod io;
pub mod mail;
pub mod media;
pub mod model;
pub mod pages;
pub mod pagination;
pub mod render;
pub mod repo;
pub mod storage;
pub mod views;

pub use auth::{authenticate, authorize_mutation, Access, DenyReason, OwnershipPolicy, Principal};
pub use config::Settings;
pub use countdown::{
    countdown_days, countdown_days_from_today, countdown_from_ymd, next_anniversary, BirthDate,
    InvalidDateError,
};
pub use form::{BirthdayForm, FormErrors};
pub use mail::{Email, FileMailer, Mailer};
pub use media::MediaStore;
pub use model::{Birthday, BirthdayId, Database, Tag, TagId, User, Username};
pub use pages::{PageStore, StaticPage};
pub use pagination::{Page, Paginator};
pub use render::{Renderer, TextRenderer};
pub use repo::{BirthdayRepository, RepoError};
pub use storage::{JsonStorage, Storage};
pub use views::{DeleteOutcome, DetailContext, ListContext, SavedContext, Site, ViewError};
