use crate::form::{has_image_extension, IMAGE_EXTENSIONS};
use anyhow::{bail, Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use uuid::Uuid;

/// Sous-répertoire des photos d'anniversaire.
pub const UPLOAD_TO: &str = "birthdays_images";

/// Fichiers téléversés, rangés sous une racine.
#[derive(Debug, Clone)]
pub struct MediaStore {
    root: PathBuf,
}

impl MediaStore {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self {
            root: root.as_ref().to_path_buf(),
        }
    }

    pub fn path_of(&self, relative: &str) -> PathBuf {
        self.root.join(relative)
    }

    /// Copie `src` sous un nom unique ; renvoie le chemin relatif à la racine.
    pub fn save_upload<P: AsRef<Path>>(&self, src: P) -> Result<String> {
        let src = src.as_ref();
        if !has_image_extension(src) {
            bail!(
                "unsupported image {} (expected one of: {})",
                src.display(),
                IMAGE_EXTENSIONS.join(", ")
            );
        }
        let ext = src
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .context("image without extension")?;
        let dir = self.root.join(UPLOAD_TO);
        fs::create_dir_all(&dir).with_context(|| format!("creating {}", dir.display()))?;

        let relative = format!("{UPLOAD_TO}/{}.{ext}", Uuid::new_v4().simple());
        let dest = self.root.join(&relative);
        fs::copy(src, &dest)
            .with_context(|| format!("copying {} to {}", src.display(), dest.display()))?;
        debug!(src = %src.display(), dest = %relative, "image stored");
        Ok(relative)
    }

    /// Supprime un fichier devenu orphelin ; un fichier déjà absent n'est pas une erreur.
    pub fn remove(&self, relative: &str) -> Result<()> {
        let path = self.root.join(relative);
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %relative, "image removed");
                Ok(())
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                warn!(path = %relative, "image already gone");
                Ok(())
            }
            Err(err) => Err(err).with_context(|| format!("removing {}", path.display())),
        }
    }
}
