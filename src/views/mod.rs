//! Handlers : une fonction par écran, au-dessus de l'interface d'accès aux données.

mod birthday;
mod pages;
mod types;

pub use types::{urls, DeleteOutcome, DetailContext, ListContext, SavedContext, ViewError};

use crate::auth::Principal;
use crate::config::Settings;
use crate::form::BirthdayForm;
use crate::mail::{FileMailer, Mailer};
use crate::media::MediaStore;
use crate::model::BirthdayId;
use crate::pages::{PageStore, StaticPage};
use crate::repo::BirthdayRepository;
use chrono::NaiveDate;

/// Site : encapsule les données et les services utilisés par les handlers
pub struct Site<R: BirthdayRepository> {
    repo: R,
    settings: Settings,
    mailer: Box<dyn Mailer>,
    media: MediaStore,
    pages: PageStore,
}

impl<R: BirthdayRepository> Site<R> {
    /// Services construits depuis la configuration (mails en fichiers).
    pub fn new(repo: R, settings: Settings) -> Self {
        let mailer = Box::new(FileMailer::new(&settings.email.file_path));
        let media = MediaStore::new(&settings.media.root);
        let pages = PageStore::new(&settings.pages.dir);
        Self {
            repo,
            settings,
            mailer,
            media,
            pages,
        }
    }

    pub fn with_mailer(mut self, mailer: Box<dyn Mailer>) -> Self {
        self.mailer = mailer;
        self
    }

    pub fn repo(&self) -> &R {
        &self.repo
    }
    pub fn repo_mut(&mut self) -> &mut R {
        &mut self.repo
    }
    pub fn settings(&self) -> &Settings {
        &self.settings
    }
    pub fn media(&self) -> &MediaStore {
        &self.media
    }
    pub fn pages(&self) -> &PageStore {
        &self.pages
    }

    pub fn birthday_list(&self, page: Option<&str>) -> ListContext {
        birthday::list(self, page)
    }

    pub fn birthday_detail(
        &self,
        id: BirthdayId,
        today: NaiveDate,
    ) -> Result<DetailContext, ViewError> {
        birthday::detail(self, id, today)
    }

    pub fn birthday_create(
        &mut self,
        principal: &Principal,
        form: &BirthdayForm,
        today: NaiveDate,
    ) -> Result<SavedContext, ViewError> {
        birthday::create(self, principal, form, today)
    }

    pub fn birthday_update(
        &mut self,
        principal: &Principal,
        id: BirthdayId,
        form: &BirthdayForm,
        today: NaiveDate,
    ) -> Result<SavedContext, ViewError> {
        birthday::update(self, principal, id, form, today)
    }

    /// Sans `confirm`, renvoie la fiche à confirmer ; avec, la supprime.
    pub fn birthday_delete(
        &mut self,
        principal: &Principal,
        id: BirthdayId,
        confirm: bool,
    ) -> Result<DeleteOutcome, ViewError> {
        birthday::delete(self, principal, id, confirm)
    }

    pub fn members_only(&self, principal: &Principal) -> Result<&'static str, ViewError> {
        birthday::members_only(self, principal)
    }

    pub fn page_list(&self) -> Result<Vec<StaticPage>, ViewError> {
        pages::list(self)
    }

    pub fn page_detail(&self, slug: &str) -> Result<StaticPage, ViewError> {
        pages::detail(self, slug)
    }
}
