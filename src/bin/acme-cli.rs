#![forbid(unsafe_code)]
use acme_birthday::{
    auth::{authenticate, Principal},
    config::Settings,
    countdown::{self, BirthDate},
    form::BirthdayForm,
    io,
    model::BirthdayId,
    render::{countdown_line, Renderer, TextRenderer},
    storage::{JsonStorage, Storage},
    views::{DeleteOutcome, Site, ViewError},
};
use anyhow::{anyhow, Result};
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de suivi d'anniversaires (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier de configuration TOML (optionnel)
    #[arg(long, global = true, default_value = "acme.toml")]
    config: PathBuf,

    /// Fichier JSON de la base (remplace `database.path`)
    #[arg(long, global = true)]
    db: Option<PathBuf>,

    /// Utilisateur connecté
    #[arg(long, global = true)]
    user: Option<String>,

    #[command(subcommand)]
    cmd: Commands,
}

/// Champs du formulaire d'anniversaire
#[derive(Args, Debug)]
struct BirthdayArgs {
    #[arg(long)]
    first_name: String,
    #[arg(long, default_value = "")]
    last_name: String,
    /// YYYY-MM-DD
    #[arg(long)]
    birthday: String,
    /// Fichier image à téléverser
    #[arg(long)]
    image: Option<String>,
    /// Tag existant (répétable)
    #[arg(long = "tag")]
    tags: Vec<String>,
    /// Date de référence YYYY-MM-DD (défaut : aujourd'hui, UTC)
    #[arg(long)]
    today: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Enregistrer un utilisateur
    Register {
        #[arg(long)]
        username: String,
    },

    /// Lister les anniversaires (paginé)
    List {
        #[arg(long)]
        page: Option<String>,
    },

    /// Afficher une fiche et son compte à rebours
    Show {
        #[arg(long)]
        id: u64,
        #[arg(long)]
        today: Option<String>,
    },

    /// Créer une fiche (connexion requise)
    Create(BirthdayArgs),

    /// Modifier une fiche (auteur uniquement par défaut)
    Edit {
        #[arg(long)]
        id: u64,
        #[command(flatten)]
        fields: BirthdayArgs,
        /// Retirer l'image actuelle
        #[arg(long)]
        clear_image: bool,
    },

    /// Supprimer une fiche ; sans --yes, affiche seulement la confirmation
    Delete {
        #[arg(long)]
        id: u64,
        #[arg(long)]
        yes: bool,
    },

    /// Calculer un compte à rebours sans rien enregistrer
    Countdown {
        /// YYYY-MM-DD
        #[arg(long)]
        birthday: String,
        #[arg(long)]
        today: Option<String>,
    },

    /// Page réservée aux utilisateurs connectés
    Members,

    /// Administration des tags
    Tags {
        #[command(subcommand)]
        cmd: TagCommands,
    },

    /// Pages statiques
    Pages {
        #[command(subcommand)]
        cmd: PageCommands,
    },

    /// Importer des fiches depuis un CSV
    Import {
        #[arg(long)]
        csv: PathBuf,
        #[arg(long)]
        today: Option<String>,
    },

    /// Exporter la base (JSON) et/ou les fiches (CSV)
    Export {
        #[arg(long)]
        csv: Option<PathBuf>,
        #[arg(long)]
        json: Option<PathBuf>,
        #[arg(long)]
        today: Option<String>,
    },
}

#[derive(Subcommand, Debug)]
enum TagCommands {
    /// Ajouter un tag (connexion requise)
    Add {
        #[arg(long)]
        name: String,
    },
    /// Lister les tags
    List,
}

#[derive(Subcommand, Debug)]
enum PageCommands {
    List,
    Show {
        #[arg(long)]
        slug: String,
    },
}

impl BirthdayArgs {
    fn to_form(&self, clear_image: bool) -> BirthdayForm {
        BirthdayForm {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            birthday: self.birthday.clone(),
            image: self.image.clone(),
            clear_image,
            tags: self.tags.clone(),
        }
    }
}

fn reference_date(raw: Option<&str>) -> Result<NaiveDate> {
    match raw {
        Some(raw) => Ok(countdown::parse_date(raw)?),
        None => Ok(countdown::today()),
    }
}

/// Traduit une erreur de handler en message pour le terminal.
fn explain(err: ViewError) -> anyhow::Error {
    match err {
        ViewError::LoginRequired { redirect } => {
            anyhow!("login required (pass --user <name>); would redirect to {redirect}")
        }
        other => other.into(),
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let mut settings = Settings::load(&cli.config)?;
    if let Some(path) = cli.db {
        settings.database.path = path;
    }
    let storage = JsonStorage::open(&settings.database.path)?;
    let db = storage.load_or_default()?;
    let principal = if matches!(cli.cmd, Commands::Register { .. }) {
        Principal::Anonymous
    } else {
        authenticate(&db, cli.user.as_deref()).map_err(ViewError::from)?
    };
    let mut site = Site::new(db, settings);
    let renderer = TextRenderer;

    let code = match cli.cmd {
        Commands::Register { username } => {
            let user = site.repo_mut().register_user(&username)?;
            storage.save(site.repo())?;
            println!("Registered {}", user.username);
            0
        }
        Commands::List { page } => {
            let ctx = site.birthday_list(page.as_deref());
            print!("{}", renderer.list(&ctx));
            0
        }
        Commands::Show { id, today } => {
            let today = reference_date(today.as_deref())?;
            let ctx = site
                .birthday_detail(BirthdayId::new(id), today)
                .map_err(explain)?;
            print!("{}", renderer.detail(&ctx));
            0
        }
        Commands::Create(fields) => {
            let today = reference_date(fields.today.as_deref())?;
            let ctx = site
                .birthday_create(&principal, &fields.to_form(false), today)
                .map_err(explain)?;
            storage.save(site.repo())?;
            print!("{}", renderer.saved(&ctx));
            0
        }
        Commands::Edit {
            id,
            fields,
            clear_image,
        } => {
            let today = reference_date(fields.today.as_deref())?;
            let ctx = site
                .birthday_update(
                    &principal,
                    BirthdayId::new(id),
                    &fields.to_form(clear_image),
                    today,
                )
                .map_err(explain)?;
            storage.save(site.repo())?;
            print!("{}", renderer.saved(&ctx));
            0
        }
        Commands::Delete { id, yes } => {
            match site
                .birthday_delete(&principal, BirthdayId::new(id), yes)
                .map_err(explain)?
            {
                DeleteOutcome::Confirm(birthday) => {
                    print!("{}", renderer.confirm_delete(&birthday));
                    println!("Re-run with --yes to confirm.");
                    // Code 2 = confirmation en attente
                    2
                }
                DeleteOutcome::Deleted { birthday, redirect } => {
                    storage.save(site.repo())?;
                    println!("Deleted birthday #{} ({redirect})", birthday.id);
                    0
                }
            }
        }
        Commands::Countdown { birthday, today } => {
            let birth = BirthDate::parse(&birthday)?;
            let today = reference_date(today.as_deref())?;
            let days = countdown::countdown_days(birth.date(), today)?;
            println!("{days}");
            println!("{}", countdown_line(days));
            0
        }
        Commands::Members => {
            println!("{}", site.members_only(&principal).map_err(explain)?);
            0
        }
        Commands::Tags { cmd } => match cmd {
            TagCommands::Add { name } => {
                if !principal.is_authenticated() {
                    return Err(anyhow!("login required (pass --user <name>)"));
                }
                let tag = site.repo_mut().add_tag(&name)?;
                storage.save(site.repo())?;
                println!("Added tag #{} {}", tag.id.get(), tag.tag);
                0
            }
            TagCommands::List => {
                for tag in site.repo().list_tags() {
                    println!("{}. {}", tag.id.get(), tag.tag);
                }
                0
            }
        },
        Commands::Pages { cmd } => match cmd {
            PageCommands::List => {
                print!("{}", renderer.page_index(&site.page_list().map_err(explain)?));
                0
            }
            PageCommands::Show { slug } => {
                print!("{}", renderer.page(&site.page_detail(&slug).map_err(explain)?));
                0
            }
        },
        Commands::Import { csv, today } => {
            let today = reference_date(today.as_deref())?;
            let forms = io::import_birthdays_csv(csv)?;
            let mut failed = 0usize;
            for (idx, form) in forms.iter().enumerate() {
                match site.birthday_create(&principal, form, today) {
                    Ok(ctx) => println!("row {}: saved #{}", idx + 2, ctx.birthday.id),
                    Err(err @ ViewError::LoginRequired { .. }) => return Err(explain(err)),
                    Err(err) => {
                        failed += 1;
                        eprintln!("row {}: {err}", idx + 2);
                    }
                }
            }
            storage.save(site.repo())?;
            if failed == 0 {
                0
            } else {
                eprintln!("{failed} row(s) rejected");
                // Code 2 = WARNING/INCOMPLETE
                2
            }
        }
        Commands::Export { csv, json, today } => {
            let today = reference_date(today.as_deref())?;
            if let Some(path) = json {
                io::export_database_json(path, site.repo())?;
            }
            if let Some(path) = csv {
                io::export_birthdays_csv(path, site.repo(), today)?;
            }
            0
        }
    };

    std::process::exit(code);
}
