//! Relay
//!
//! Command-line entry point: triggers one CI job, follows it to completion,
//! stores its lifecycle record and notifies the requester.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use relay_client::{Credentials, JenkinsClient};
use relay_core::domain::build::{BuildRecord, BuildStatus};
use relay_core::domain::job::JobSpec;
use std::sync::Arc;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use uuid::Uuid;

use relay_orchestrator::repository::{
    BuildRepository, HttpJenkinsRepository, InMemoryBuildRepository, LogNotifier, Notifier,
    PgBuildRepository, SlackNotifier,
};
use relay_orchestrator::{Config, Orchestrator, db};

#[derive(Parser)]
#[command(name = "relay")]
#[command(about = "Trigger CI jobs and follow them to completion", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Trigger a job and wait for its build to finish
    Run {
        /// Job name on the CI server
        job: String,

        /// Build parameter, repeatable
        #[arg(short, long = "param", value_name = "KEY=VALUE", value_parser = parse_param)]
        params: Vec<(String, String)>,

        /// Identifier of the request this run answers
        #[arg(long, env = "RELAY_REQUESTER_ID", default_value = "cli")]
        requester: String,

        /// Job identifier stored on the build record (defaults to the job name)
        #[arg(long)]
        job_id: Option<String>,
    },
    /// Show a stored build record
    Show {
        /// Build record ID
        id: Uuid,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "relay_orchestrator=info,relay_client=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let config = load_config()?;

    match cli.command {
        Commands::Run {
            job,
            params,
            requester,
            job_id,
        } => {
            let mut spec = JobSpec::new(job);
            if let Some(job_id) = job_id {
                spec = spec.with_id(job_id);
            }
            for (key, value) in params {
                spec = spec.with_parameter(key, value);
            }
            run(&config, spec, &requester).await
        }
        Commands::Show { id } => show(&config, id).await,
    }
}

/// Loads and validates configuration from the environment
fn load_config() -> Result<Config> {
    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate()?;
    info!(
        "Loaded configuration: jenkins_url={}, queue_poll_interval={:?}, status_poll_interval={:?}",
        config.jenkins_url, config.queue_poll_interval, config.status_poll_interval
    );
    Ok(config)
}

async fn run(config: &Config, spec: JobSpec, requester_id: &str) -> Result<()> {
    let client = JenkinsClient::with_timeout(
        config.jenkins_url.clone(),
        Credentials::new(config.username.clone(), config.password.clone()),
        config.build_token.clone(),
        config.http_timeout,
    )
    .context("Failed to build Jenkins client")?;

    let builds: Arc<dyn BuildRepository> = match &config.database_url {
        Some(url) => {
            let pool = db::create_pool(url)
                .await
                .context("Failed to create database pool")?;
            db::run_migrations(&pool)
                .await
                .context("Failed to run database migrations")?;
            Arc::new(PgBuildRepository::new(pool))
        }
        None => {
            info!("DATABASE_URL not set, build records are kept in memory");
            Arc::new(InMemoryBuildRepository::new())
        }
    };

    let notifier: Arc<dyn Notifier> = match &config.slack_webhook_url {
        Some(url) => Arc::new(SlackNotifier::new(url.clone(), config.http_timeout)?),
        None => Arc::new(LogNotifier),
    };

    let orchestrator = Orchestrator::new(
        config,
        Arc::new(HttpJenkinsRepository::new(client)),
        builds,
        notifier,
    );

    let record = orchestrator.run(&spec, requester_id).await?;
    print_record(&spec.display_name(), &record);

    Ok(())
}

async fn show(config: &Config, id: Uuid) -> Result<()> {
    let url = config
        .database_url
        .as_deref()
        .context("DATABASE_URL must be set to look up build records")?;
    let pool = db::create_pool(url)
        .await
        .context("Failed to create database pool")?;
    let repository = PgBuildRepository::new(pool);

    match repository.find_by_id(id).await? {
        Some(record) => print_record(&record.job_id, &record),
        None => println!("{}", format!("No build record {}", id).yellow()),
    }

    Ok(())
}

fn print_record(title: &str, record: &BuildRecord) {
    let status = match record.status {
        BuildStatus::Success => record.status.as_str().green(),
        BuildStatus::Failure => record.status.as_str().red(),
        BuildStatus::Pending => record.status.as_str().yellow(),
    };

    println!("{} #{} {}", title.bold(), record.build_number, status);
    println!("  {} {}", "Record:".dimmed(), record.id);
    println!("  {} {}", "Job:".dimmed(), record.job_id);
    println!("  {} {}", "Requester:".dimmed(), record.requester_id);
    println!("  {} {}", "Started:".dimmed(), record.started_at);
    if let Some(ended_at) = record.ended_at {
        println!("  {} {}", "Ended:".dimmed(), ended_at);
    }
}

/// Parses a `KEY=VALUE` build parameter
fn parse_param(raw: &str) -> std::result::Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("invalid KEY=VALUE: no `=` found in `{}`", raw))?;

    if key.is_empty() {
        return Err(format!("invalid KEY=VALUE: empty key in `{}`", raw));
    }

    Ok((key.to_string(), value.to_string()))
}
