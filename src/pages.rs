use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;

/// Page de contenu statique.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticPage {
    pub slug: String,
    pub title: String,
    #[serde(default)]
    pub body: String,
}

impl StaticPage {
    pub fn new<S, T, B>(slug: S, title: T, body: B) -> Self
    where
        S: Into<String>,
        T: Into<String>,
        B: Into<String>,
    {
        Self {
            slug: slug.into(),
            title: title.into(),
            body: body.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.slug.trim().is_empty() {
            bail!("page slug cannot be empty");
        }
        if !self
            .slug
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            bail!("page slug must contain only letters, digits, '-' or '_': {}", self.slug);
        }
        if self.title.trim().is_empty() {
            bail!("page title cannot be empty");
        }
        Ok(())
    }
}

/// Pages fournies par défaut, remplaçables par un fichier du même slug.
pub fn builtin_pages() -> Vec<StaticPage> {
    vec![
        StaticPage::new(
            "homepage",
            "Birthdays",
            "Keep track of the birthdays of the people you care about.",
        ),
        StaticPage::new(
            "about",
            "About",
            "A small birthday tracker: add people, see how many days are left.",
        ),
        StaticPage::new(
            "rules",
            "Rules",
            "Only real people, please. Be kind to each other.",
        ),
    ]
}

/// Pages persistées sur disque, un fichier JSON par slug.
#[derive(Debug, Clone)]
pub struct PageStore {
    base_dir: PathBuf,
}

impl PageStore {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            base_dir: dir.as_ref().to_path_buf(),
        }
    }

    fn ensure_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.base_dir)
            .with_context(|| format!("creating page directory {}", self.base_dir.display()))
    }

    pub fn save(&self, page: &StaticPage) -> Result<PathBuf> {
        page.validate()?;
        self.ensure_dir()?;
        let path = self.base_dir.join(format!("{}.json", page.slug));
        let json = serde_json::to_string_pretty(page)?;
        fs::write(&path, json).with_context(|| format!("writing page {}", path.display()))?;
        Ok(path)
    }

    /// Charge une page ; à défaut de fichier, la page intégrée du même slug.
    pub fn load(&self, slug: &str) -> Result<Option<StaticPage>> {
        if StaticPage::new(slug, "-", "").validate().is_err() {
            return Ok(None);
        }
        let path = self.base_dir.join(format!("{slug}.json"));
        if !path.exists() {
            return Ok(builtin_pages().into_iter().find(|p| p.slug == slug));
        }
        let data = fs::read(&path).with_context(|| format!("reading page {}", path.display()))?;
        let page: StaticPage = serde_json::from_slice(&data)
            .with_context(|| format!("parsing page {}", path.display()))?;
        page.validate()?;
        Ok(Some(page))
    }

    /// Pages intégrées et fichiers, triées par slug.
    pub fn list(&self) -> Result<Vec<StaticPage>> {
        let mut pages = builtin_pages();
        if !self.base_dir.exists() {
            pages.sort_by(|a, b| a.slug.cmp(&b.slug));
            return Ok(pages);
        }
        for entry in fs::read_dir(&self.base_dir)? {
            let path = entry?.path();
            if path.extension().and_then(|s| s.to_str()) != Some("json") {
                continue;
            }
            let data = fs::read(&path)?;
            let page: StaticPage = match serde_json::from_slice(&data) {
                Ok(p) => p,
                Err(err) => {
                    warn!(path = %path.display(), "could not parse page: {err}");
                    continue;
                }
            };
            if let Err(err) = page.validate() {
                warn!(path = %path.display(), "invalid page: {err}");
                continue;
            }
            pages.retain(|p| p.slug != page.slug);
            pages.push(page);
        }
        pages.sort_by(|a, b| a.slug.cmp(&b.slug));
        Ok(pages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slug_rules() {
        assert!(StaticPage::new("about-us", "About", "").validate().is_ok());
        assert!(StaticPage::new("", "About", "").validate().is_err());
        assert!(StaticPage::new("../etc", "About", "").validate().is_err());
        assert!(StaticPage::new("about", " ", "").validate().is_err());
    }
}
