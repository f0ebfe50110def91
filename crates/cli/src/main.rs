//! Donor Finder CLI - Directory and request management tools.
//!
//! # Usage
//!
//! ```bash
//! # List all donors
//! donor-cli donors
//!
//! # Search O+ donors in Chennai, available first
//! donor-cli donors --blood-group O+ --city Chennai --sort
//!
//! # Request help from donor 5
//! donor-cli request 5 --requester user@email.com
//!
//! # Review, update and cancel requests
//! donor-cli requests
//! donor-cli status 1700000000000 accepted
//! donor-cli cancel 1700000000000
//! ```
//!
//! Configuration is read from the same environment variables as the web
//! server (`DONOR_FINDER_SOURCE_URL`, `DONOR_FINDER_STORAGE_PATH`, ...), so
//! both front ends share one request file.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use donor_finder_core::{BloodGroup, City, DonorId, Email, RequestId, RequestStatus};

mod commands;

#[derive(Parser)]
#[command(name = "donor-cli")]
#[command(author, version, about = "Donor Finder CLI tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List donors, optionally filtered and sorted
    Donors {
        /// Only show this blood group (e.g. O+)
        #[arg(short, long)]
        blood_group: Option<BloodGroup>,

        /// Only show this city
        #[arg(short, long)]
        city: Option<City>,

        /// Show available donors first
        #[arg(short, long)]
        sort: bool,
    },
    /// Request help from a donor
    Request {
        /// Donor ID
        donor_id: DonorId,

        /// Requester email (defaults to `DONOR_FINDER_REQUESTER_EMAIL`)
        #[arg(short, long)]
        requester: Option<Email>,
    },
    /// Cancel a request
    Cancel {
        /// Request ID
        request_id: RequestId,
    },
    /// List stored requests
    Requests {
        /// Only show requests from this email
        #[arg(short, long)]
        requester: Option<Email>,
    },
    /// Change the status of a request
    Status {
        /// Request ID
        request_id: RequestId,

        /// New status (`pending`, `accepted`, `rejected`)
        status: RequestStatus,
    },
}

#[tokio::main]
async fn main() {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let ctx = commands::Context::from_env()?;

    match cli.command {
        Commands::Donors {
            blood_group,
            city,
            sort,
        } => {
            commands::donors::list(&ctx.source(), blood_group, city, sort).await?;
        }
        Commands::Request {
            donor_id,
            requester,
        } => {
            let requester = requester.or_else(|| ctx.config.requester_email.clone());
            commands::requests::request(&ctx.source(), &ctx.service, donor_id, requester.as_ref())
                .await?;
        }
        Commands::Cancel { request_id } => {
            commands::requests::cancel(&ctx.service, request_id)?;
        }
        Commands::Requests { requester } => {
            commands::requests::list(&ctx.service, requester.as_ref());
        }
        Commands::Status { request_id, status } => {
            commands::requests::update_status(&ctx.service, request_id, status)?;
        }
    }
    Ok(())
}
