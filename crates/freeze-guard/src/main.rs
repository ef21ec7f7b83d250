use anyhow::Context;
use clap::{Parser, Subcommand};
use freeze_client::{FreezeService, HttpFreezeStatusClient};
use freeze_guard::bypass::TitleResolver;
use freeze_guard::domain_models::ServiceFreezeStatus;
use freeze_guard::page::MemoryPage;
use freeze_guard::{Action, FreezeMonitor, FreezeOracle, MessageOracle};
use freeze_guard_config::{Credentials, Settings};
use std::process::ExitCode;

mod logger;

#[derive(Parser)]
#[command(name = "freeze-guard", version, about = "Service freeze merge guard")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Dry-run the guard against a pull request URL
    Check {
        /// Pull request URL, e.g. https://bitbucket.org/acme/payments/pull-requests/7
        url: String,
        /// Pull request title, used by the changelog bypass rule
        #[arg(long, default_value = "")]
        title: String,
    },
    /// Print the freeze status of a service
    Status {
        service: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    logger::init();
    let cli = Cli::parse();

    let settings = Settings::load();
    let credentials =
        Credentials::from_store(&settings).context("freeze-guard is not configured")?;
    let client = HttpFreezeStatusClient::new(&settings.api_url, settings.request_timeout())
        .context("failed to build HTTP client")?;
    let oracle = MessageOracle::new(FreezeService::new(client));

    match cli.command {
        Command::Status { service } => {
            let status = oracle.query(&service, &credentials.api_key).await?;
            print_status(&service, &status);
            Ok(ExitCode::SUCCESS)
        }
        Command::Check { url, title } => check(&url, &title, &settings, &oracle).await,
    }
}

fn print_status(service: &str, status: &ServiceFreezeStatus) {
    if !status.is_frozen {
        println!("{}: not frozen", service);
        return;
    }
    println!("{}: FROZEN", service);
    if let Some(metadata) = &status.metadata {
        if let Some(frozen_by) = &metadata.frozen_by {
            println!("  frozen by:     {}", frozen_by);
        }
        if let Some(email) = &metadata.frozen_by_email {
            println!("  contact:       {}", email);
        }
        if let Some(updated_at) = metadata.updated_at {
            println!("  updated at:    {}", updated_at.to_rfc3339());
        }
        if let Some(changelog_url) = &metadata.changelog_url {
            println!("  changelog PR:  {}", changelog_url);
        }
    }
}

/// Run one monitoring cycle against an in-memory copy of the pull request page
async fn check(
    url: &str,
    title: &str,
    settings: &Settings,
    oracle: &impl FreezeOracle,
) -> anyhow::Result<ExitCode> {
    let page = MemoryPage::new(url);
    // The title rule needs a rendered heading; an absent title is "untitled"
    let heading = if title.trim().is_empty() { "(untitled)" } else { title };
    page.append("h1", heading, &[]);
    let button = page.append("button", "Merge", &[]);

    let mut monitor = FreezeMonitor::new(
        page.clone(),
        settings,
        TitleResolver::new(settings.brand_tokens.clone()),
    );
    let Some(request) = monitor.handle(Action::Bootstrap) else {
        println!("{} is not a guarded pull request", url);
        return Ok(ExitCode::SUCCESS);
    };

    let result = oracle
        .query(&request.target.service_name, &request.api_key)
        .await;
    match &result {
        Ok(status) => print_status(&request.target.service_name, status),
        Err(e) => anyhow::bail!("freeze status of {} unknown: {}", request.target, e),
    }
    monitor.handle(Action::FreezeStatusLoaded {
        generation: request.generation,
        target: request.target.clone(),
        result,
    });

    let blocked = page.element(button).is_some_and(|e| e.disabled);
    if blocked {
        println!("{}: merge BLOCKED", request.target);
        Ok(ExitCode::from(2))
    } else {
        println!("{}: merge allowed", request.target);
        Ok(ExitCode::SUCCESS)
    }
}
