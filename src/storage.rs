use crate::model::Database;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::{debug, info};

pub trait Storage {
    /// Charge la base depuis un support.
    fn load(&self) -> anyhow::Result<Database>;
    /// Sauvegarde de manière atomique.
    fn save(&self, db: &Database) -> anyhow::Result<()>;

    /// Comme `load`, mais une base absente donne une base vide.
    fn load_or_default(&self) -> anyhow::Result<Database> {
        if !self.exists() {
            info!("no database yet, starting empty");
            return Ok(Database::default());
        }
        self.load()
    }

    fn exists(&self) -> bool;
}

pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self { path: path.as_ref().to_path_buf() })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Storage for JsonStorage {
    fn load(&self) -> anyhow::Result<Database> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let db: Database = serde_json::from_slice(&data)
            .with_context(|| format!("parsing {}", self.path.display()))?;
        debug!(birthdays = db.birthdays.len(), users = db.users.len(), "database loaded");
        Ok(db)
    }

    fn save(&self, db: &Database) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(db)?;
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).with_context(|| format!("creating {}", dir.display()))?;
        let mut tmp = NamedTempFile::new_in(dir).with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        debug!(path = %self.path.display(), "database saved");
        Ok(())
    }

    fn exists(&self) -> bool {
        self.path.exists()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Tag, TagId};
    use tempfile::tempdir;

    #[test]
    fn missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::open(dir.path().join("db.json")).unwrap();
        let db = storage.load_or_default().unwrap();
        assert!(db.birthdays.is_empty());
        assert!(storage.load().is_err());
    }

    #[test]
    fn save_then_load_keeps_content() {
        let dir = tempdir().unwrap();
        let storage = JsonStorage::open(dir.path().join("nested").join("db.json")).unwrap();
        let mut db = Database::default();
        db.tags.push(Tag { id: TagId::new(1), tag: "family".into() });
        storage.save(&db).unwrap();

        let loaded = storage.load_or_default().unwrap();
        assert_eq!(loaded.tags, db.tags);
    }
}
