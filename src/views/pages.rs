use super::types::ViewError;
use super::Site;
use crate::pages::StaticPage;
use crate::repo::BirthdayRepository;

pub(super) fn list<R: BirthdayRepository>(site: &Site<R>) -> Result<Vec<StaticPage>, ViewError> {
    Ok(site.pages.list()?)
}

pub(super) fn detail<R: BirthdayRepository>(
    site: &Site<R>,
    slug: &str,
) -> Result<StaticPage, ViewError> {
    site.pages
        .load(slug)?
        .ok_or_else(|| ViewError::NotFound(format!("page {slug}")))
}
