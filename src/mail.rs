use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;
use uuid::Uuid;

/// Message à envoyer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub from: String,
    pub to: Vec<String>,
    pub subject: String,
    pub body: String,
}

impl Email {
    /// Rendu texte (en-têtes puis corps).
    pub fn to_message(&self, date: DateTime<Utc>) -> String {
        format!(
            "From: {from}\nTo: {to}\nDate: {date}\nSubject: {subject}\n\n{body}\n",
            from = self.from,
            to = self.to.join(", "),
            date = date.to_rfc2822(),
            subject = self.subject,
            body = self.body,
        )
    }
}

/// Backend d'envoi (fichiers, mémoire, SMTP...).
pub trait Mailer {
    fn send(&self, email: &Email) -> Result<()>;
}

/// Écrit chaque message dans un fichier `.log` du répertoire configuré.
#[derive(Debug, Clone)]
pub struct FileMailer {
    dir: PathBuf,
}

impl FileMailer {
    pub fn new<P: AsRef<Path>>(dir: P) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Envoie et renvoie le chemin du fichier écrit.
    pub fn deliver(&self, email: &Email) -> Result<PathBuf> {
        fs::create_dir_all(&self.dir)
            .with_context(|| format!("creating mail directory {}", self.dir.display()))?;
        let now = Utc::now();
        let name = format!("{}-{}.log", now.format("%Y%m%d-%H%M%S"), Uuid::new_v4().simple());
        let path = self.dir.join(name);
        fs::write(&path, email.to_message(now))
            .with_context(|| format!("writing mail {}", path.display()))?;
        info!(to = %email.to.join(","), subject = %email.subject, "mail written");
        Ok(path)
    }
}

impl Mailer for FileMailer {
    fn send(&self, email: &Email) -> Result<()> {
        self.deliver(email).map(|_| ())
    }
}

/// Signalement à l'administrateur d'une saisie refusée.
pub fn impostor_report(from: &str, admin: &str, first_name: &str, last_name: &str) -> Email {
    Email {
        from: from.to_string(),
        to: vec![admin.to_string()],
        subject: "Another Beatles member".to_string(),
        body: format!("{first_name} {last_name} tried to publish a birthday!"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn file_mailer_writes_one_file_per_message() {
        let dir = tempdir().unwrap();
        let mailer = FileMailer::new(dir.path().join("sent_emails"));
        let email = impostor_report("form@acme.not", "admin@acme.not", "John", "Lennon");
        let path = mailer.deliver(&email).unwrap();
        mailer.send(&email).unwrap();

        let content = fs::read_to_string(path).unwrap();
        assert!(content.contains("Subject: Another Beatles member"));
        assert!(content.contains("To: admin@acme.not"));
        assert!(content.ends_with("John Lennon tried to publish a birthday!\n"));
        assert_eq!(fs::read_dir(mailer.dir()).unwrap().count(), 2);
    }
}
