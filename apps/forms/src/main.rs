use std::{process::ExitCode, sync::Arc};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use form_api::{
    schemas::{DonationKey, SignupKey, VolunteerKey},
    DonationForm, FormController, FormError, FormEvent, FormSchema, RecordIdentity, SignupForm,
    VolunteerForm,
};
use shared::{
    domain::{DonationInput, EventSignupInput, RecordId, VolunteerLogInput},
    error::ErrorReport,
};
use storage::{SlotStore, Storage, TracingDiagnostics};
use tracing_subscriber::EnvFilter;

mod config;
mod render;

use config::{load_settings, normalize_database_url};

#[derive(Parser, Debug)]
#[command(name = "forms", about = "Community event, donation and volunteer forms")]
struct Cli {
    /// SQLite url or file path holding the persistence slots.
    #[arg(long, global = true)]
    database_url: Option<String>,
    #[arg(long, global = true)]
    log_level: Option<String>,
    /// Print views and errors as JSON.
    #[arg(long, global = true)]
    json: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Donation tracker.
    Donation {
        #[command(subcommand)]
        action: DonationAction,
    },
    /// Volunteer hours log.
    Volunteer {
        #[command(subcommand)]
        action: VolunteerAction,
    },
    /// Event signups.
    Signup {
        #[command(subcommand)]
        action: SignupAction,
    },
}

#[derive(Subcommand, Debug)]
enum DonationAction {
    /// Submit a new donation.
    Add(DonationArgs),
    /// Show the table and total.
    List,
    /// Remove one donation.
    Delete {
        #[command(flatten)]
        target: DeleteTarget,
        #[arg(long, requires = "date")]
        charity_name: Option<String>,
        #[arg(long, requires = "charity_name")]
        date: Option<String>,
    },
    /// Remove every donation.
    Clear,
}

#[derive(Subcommand, Debug)]
enum VolunteerAction {
    /// Log volunteer hours.
    Add(VolunteerArgs),
    List,
    Delete {
        #[command(flatten)]
        target: DeleteTarget,
        #[arg(long, requires = "date")]
        charity_name: Option<String>,
        #[arg(long, requires = "charity_name")]
        date: Option<String>,
    },
    Clear,
}

#[derive(Subcommand, Debug)]
enum SignupAction {
    /// Sign a representative up for an event.
    Add(SignupArgs),
    List,
    Delete {
        #[command(flatten)]
        target: DeleteTarget,
        #[arg(long, requires = "email")]
        event_name: Option<String>,
        #[arg(long, requires = "event_name")]
        email: Option<String>,
    },
    Clear,
}

/// Row selectors shared by every delete command. Key flags are the fallback.
#[derive(Args, Debug)]
struct DeleteTarget {
    /// Zero-based row position as shown by `list`.
    #[arg(long, conflicts_with = "id")]
    position: Option<usize>,
    #[arg(long)]
    id: Option<RecordId>,
}

impl DeleteTarget {
    fn identity<K>(self, key: Option<K>) -> Result<RecordIdentity<K>> {
        match (self.position, self.id, key) {
            (Some(position), _, _) => Ok(RecordIdentity::Position(position)),
            (None, Some(id), _) => Ok(RecordIdentity::Id(id)),
            (None, None, Some(key)) => Ok(RecordIdentity::Key(key)),
            (None, None, None) => anyhow::bail!("delete needs --position, --id, or the key fields"),
        }
    }
}

#[derive(Args, Debug)]
struct DonationArgs {
    #[arg(long, default_value = "")]
    charity_name: String,
    #[arg(long, default_value = "")]
    amount: String,
    #[arg(long, default_value = "")]
    date: String,
    #[arg(long, default_value = "")]
    message: String,
}

#[derive(Args, Debug)]
struct VolunteerArgs {
    #[arg(long, default_value = "")]
    charity_name: String,
    #[arg(long, default_value = "")]
    hours: String,
    #[arg(long, default_value = "")]
    date: String,
    /// Experience rating from 1 to 5.
    #[arg(long, default_value = "")]
    rating: String,
}

#[derive(Args, Debug)]
struct SignupArgs {
    #[arg(long, default_value = "")]
    event_name: String,
    #[arg(long, default_value = "")]
    name: String,
    #[arg(long, default_value = "")]
    email: String,
    /// sponsor, participant or organizer.
    #[arg(long, default_value = "")]
    role: String,
}

/// Stored records are trimmed, so key flags are compared trimmed too.
fn key_field(value: &str) -> String {
    value.trim().to_string()
}

fn donation_event(action: DonationAction) -> Result<FormEvent<DonationForm>> {
    Ok(match action {
        DonationAction::Add(args) => FormEvent::Submit(DonationInput {
            charity_name: args.charity_name,
            donation_amount: args.amount,
            donation_date: args.date,
            donor_message: args.message,
        }),
        DonationAction::List => FormEvent::Refresh,
        DonationAction::Delete {
            target,
            charity_name,
            date,
        } => {
            let key = charity_name
                .zip(date)
                .map(|(charity_name, donation_date)| DonationKey {
                    charity_name: key_field(&charity_name),
                    donation_date: key_field(&donation_date),
                });
            FormEvent::Delete(target.identity(key)?)
        }
        DonationAction::Clear => FormEvent::Clear,
    })
}

fn volunteer_event(action: VolunteerAction) -> Result<FormEvent<VolunteerForm>> {
    Ok(match action {
        VolunteerAction::Add(args) => FormEvent::Submit(VolunteerLogInput {
            charity_name: args.charity_name,
            hours_volunteered: args.hours,
            date: args.date,
            experience_rating: args.rating,
        }),
        VolunteerAction::List => FormEvent::Refresh,
        VolunteerAction::Delete {
            target,
            charity_name,
            date,
        } => {
            let key = charity_name
                .zip(date)
                .map(|(charity_name, date)| VolunteerKey {
                    charity_name: key_field(&charity_name),
                    date: key_field(&date),
                });
            FormEvent::Delete(target.identity(key)?)
        }
        VolunteerAction::Clear => FormEvent::Clear,
    })
}

fn signup_event(action: SignupAction) -> Result<FormEvent<SignupForm>> {
    Ok(match action {
        SignupAction::Add(args) => FormEvent::Submit(EventSignupInput {
            event_name: args.event_name,
            representative_name: args.name,
            representative_email: args.email,
            role: args.role,
        }),
        SignupAction::List => FormEvent::Refresh,
        SignupAction::Delete {
            target,
            event_name,
            email,
        } => {
            let key = event_name
                .zip(email)
                .map(|(event_name, representative_email)| SignupKey {
                    event_name: key_field(&event_name),
                    representative_email: key_field(&representative_email),
                });
            FormEvent::Delete(target.identity(key)?)
        }
        SignupAction::Clear => FormEvent::Clear,
    })
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let mut settings = load_settings();
    if let Some(url) = cli.database_url.clone() {
        settings.database_url = url;
    }
    if let Some(level) = cli.log_level.clone() {
        settings.log_level = level;
    }

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&settings.log_level))
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    match run(cli, settings).await {
        Ok(code) => code,
        Err(err) => {
            tracing::error!(error = %err, "forms command failed");
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli, settings: config::Settings) -> Result<ExitCode> {
    let database_url = normalize_database_url(&settings.database_url);
    let storage = Storage::new(&database_url)
        .await
        .with_context(|| format!("failed to open '{database_url}'"))?
        .with_quota(settings.quota_bytes);
    storage.health_check().await?;
    tracing::debug!(%database_url, quota_bytes = ?settings.quota_bytes, "opened slot storage");
    let slots: Arc<dyn SlotStore> = Arc::new(storage);

    match cli.command {
        Command::Donation { action } => {
            run_form(slots, donation_event(action)?, cli.json).await
        }
        Command::Volunteer { action } => {
            run_form(slots, volunteer_event(action)?, cli.json).await
        }
        Command::Signup { action } => {
            run_form(slots, signup_event(action)?, cli.json).await
        }
    }
}

async fn run_form<S: FormSchema>(
    slots: Arc<dyn SlotStore>,
    event: FormEvent<S>,
    json: bool,
) -> Result<ExitCode> {
    let mut controller = FormController::<S>::open(slots, Arc::new(TracingDiagnostics))
        .await
        .with_context(|| format!("failed to load '{}'", S::SLOT_KEY))?;

    match controller.handle(event).await {
        Ok(view) => {
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", render::view_text(&view));
            }
            Ok(ExitCode::SUCCESS)
        }
        Err(err) => {
            report_failure(&err, json)?;
            Ok(ExitCode::from(2))
        }
    }
}

fn report_failure(err: &FormError, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(&ErrorReport::from(err))?);
    } else {
        eprintln!("{err}");
    }
    Ok(())
}

#[cfg(test)]
#[path = "tests/cli_tests.rs"]
mod tests;
