use super::types::{urls, DeleteOutcome, DetailContext, ListContext, SavedContext, ViewError};
use super::Site;
use crate::auth::{authorize_mutation, require_login, Access, Principal};
use crate::countdown::countdown_days;
use crate::form::{BirthdayForm, CleanedForm};
use crate::mail::impostor_report;
use crate::model::{Birthday, BirthdayDraft, BirthdayId, Username};
use crate::pagination::Paginator;
use crate::repo::BirthdayRepository;
use chrono::NaiveDate;
use tracing::{debug, warn};

pub(super) fn list<R: BirthdayRepository>(site: &Site<R>, page: Option<&str>) -> ListContext {
    let paginator = Paginator::new(site.repo.list(), site.settings.birthday.paginate_by);
    let page = paginator.page(page);
    debug!(page = page.number, of = page.num_pages, "birthday list");
    ListContext { page }
}

pub(super) fn detail<R: BirthdayRepository>(
    site: &Site<R>,
    id: BirthdayId,
    today: NaiveDate,
) -> Result<DetailContext, ViewError> {
    let birthday = site
        .repo
        .get(id)
        .ok_or_else(|| ViewError::NotFound(format!("birthday {id}")))?;
    let countdown = countdown_days(birthday.birthday, today)?;
    let tags = site.repo.tag_names(&birthday);
    Ok(DetailContext { birthday, tags, countdown })
}

pub(super) fn create<R: BirthdayRepository>(
    site: &mut Site<R>,
    principal: &Principal,
    form: &BirthdayForm,
    today: NaiveDate,
) -> Result<SavedContext, ViewError> {
    let author = login(site, principal, &urls::create())?.clone();
    let cleaned = clean(site, form, today)?;

    let image = match &cleaned.image {
        Some(src) => Some(site.media.save_upload(src)?),
        None => None,
    };
    let draft = draft_from(cleaned, image.clone());
    let birthday = match site.repo.create(draft, Some(author)) {
        Ok(b) => b,
        Err(err) => {
            discard(site, image.as_deref());
            return Err(err.into());
        }
    };
    let countdown = countdown_days(birthday.birthday, today)?;
    Ok(SavedContext { birthday, countdown })
}

pub(super) fn update<R: BirthdayRepository>(
    site: &mut Site<R>,
    principal: &Principal,
    id: BirthdayId,
    form: &BirthdayForm,
    today: NaiveDate,
) -> Result<SavedContext, ViewError> {
    let existing = guard(site, principal, id, &urls::edit(id))?;
    let cleaned = clean(site, form, today)?;

    let uploaded = match &cleaned.image {
        Some(src) => Some(site.media.save_upload(src)?),
        None => None,
    };
    let image = match (&uploaded, cleaned.clear_image) {
        (Some(new), _) => Some(new.clone()),
        (None, true) => None,
        (None, false) => existing.image.clone(),
    };
    let draft = draft_from(cleaned, image);
    let birthday = match site.repo.update(id, draft) {
        Ok(b) => b,
        Err(err) => {
            discard(site, uploaded.as_deref());
            return Err(err.into());
        }
    };
    if existing.image.is_some() && existing.image != birthday.image {
        discard(site, existing.image.as_deref());
    }
    let countdown = countdown_days(birthday.birthday, today)?;
    Ok(SavedContext { birthday, countdown })
}

pub(super) fn delete<R: BirthdayRepository>(
    site: &mut Site<R>,
    principal: &Principal,
    id: BirthdayId,
    confirm: bool,
) -> Result<DeleteOutcome, ViewError> {
    let existing = guard(site, principal, id, &urls::delete(id))?;
    if !confirm {
        return Ok(DeleteOutcome::Confirm(existing));
    }
    let birthday = site.repo.delete(id)?;
    discard(site, birthday.image.as_deref());
    Ok(DeleteOutcome::Deleted {
        birthday,
        redirect: urls::list(),
    })
}

pub(super) fn members_only<R: BirthdayRepository>(
    site: &Site<R>,
    principal: &Principal,
) -> Result<&'static str, ViewError> {
    login(site, principal, &urls::members())?;
    Ok("Page for logged-in users!")
}

fn login<'a, R: BirthdayRepository>(
    site: &Site<R>,
    principal: &'a Principal,
    next: &str,
) -> Result<&'a Username, ViewError> {
    require_login(principal, &site.settings.auth.login_url, next)
        .map_err(|redirect| ViewError::LoginRequired { redirect })
}

/// Connexion puis contrôle d'accès, avant toute mutation.
fn guard<R: BirthdayRepository>(
    site: &Site<R>,
    principal: &Principal,
    id: BirthdayId,
    next: &str,
) -> Result<Birthday, ViewError> {
    login(site, principal, next)?;
    let existing = site
        .repo
        .get(id)
        .ok_or_else(|| ViewError::NotFound(format!("birthday {id}")))?;
    match authorize_mutation(principal, &existing, site.settings.birthday.ownership) {
        Access::Allowed => Ok(existing),
        Access::Denied(reason) => {
            warn!(id = %id, %reason, "mutation denied");
            Err(ViewError::Forbidden(reason))
        }
    }
}

fn clean<R: BirthdayRepository>(
    site: &Site<R>,
    form: &BirthdayForm,
    today: NaiveDate,
) -> Result<CleanedForm, ViewError> {
    if form.is_beatle() {
        let email = impostor_report(
            &site.settings.email.from,
            &site.settings.email.admin,
            form.first_name.trim(),
            form.last_name.trim(),
        );
        site.mailer.send(&email)?;
    }
    form.validate(today).map_err(ViewError::Invalid)
}

fn draft_from(cleaned: CleanedForm, image: Option<String>) -> BirthdayDraft {
    BirthdayDraft {
        first_name: cleaned.first_name,
        last_name: cleaned.last_name,
        birthday: cleaned.birthday,
        image,
        tags: cleaned.tags,
    }
}

/// Nettoyage d'une image orpheline ; un échec n'annule pas l'opération.
fn discard<R: BirthdayRepository>(site: &Site<R>, image: Option<&str>) {
    if let Some(rel) = image {
        if let Err(err) = site.media.remove(rel) {
            warn!(image = rel, "cleanup failed: {err:#}");
        }
    }
}
