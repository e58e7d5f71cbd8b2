//! Propmon - proposal monitoring dashboard client
//!
//! Main entry point for the command-line front end.

use std::io::Write;
use std::path::PathBuf;

use anyhow::Context as _;
use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use propmon_domain::HistoryFilters;
use propmon_infra::config;
use propmon_lib::commands::{self, HistoryRequest, LoginMethod};
use propmon_lib::utils::logging::{init_tracing, LogFormat};
use propmon_lib::AppContext;
use serde::Serialize;
use tracing::{info, warn};

/// Proposal monitoring dashboard client.
#[derive(Parser)]
#[command(name = "propmon", version, about = "Proposal monitoring dashboard client")]
struct Cli {
    /// Config file (JSON or TOML); defaults to PROPMON_CONFIG or a probed file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines on stderr
    #[arg(long, global = true)]
    log_json: bool,

    /// Print compact instead of pretty JSON
    #[arg(long, global = true)]
    compact: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Authenticate and store the session token
    Login(LoginArgs),
    /// Clear the stored session
    Logout,
    /// Show the stored session state
    Status,
    /// KPI overview cards
    Overview,
    /// Proposals stuck in GER for more than two hours
    Alerts {
        /// Keep only alerts with this status ("all" keeps everything)
        #[arg(long)]
        status: Option<String>,
    },
    /// Share of proposals per status
    Distribution {
        /// First day (yyyy-MM-dd)
        #[arg(long)]
        from: Option<NaiveDate>,
        /// Last day (yyyy-MM-dd)
        #[arg(long)]
        to: Option<NaiveDate>,
    },
    /// Conversion funnel
    Funnel,
    /// Proposal history, one row per proposal
    History(HistoryArgs),
    /// Timeline and status stepper of one proposal
    Proposal {
        /// Proposal number (nuPropostaSeguridade)
        id: u64,
    },
    /// Credit contract lookup
    Contract {
        /// Contract number
        number: String,
    },
}

#[derive(Args)]
struct LoginArgs {
    #[arg(long, requires = "password", conflicts_with_all = ["token", "service"])]
    username: Option<String>,
    #[arg(long, requires = "username")]
    password: Option<String>,
    /// Store a pre-issued access token
    #[arg(long, conflicts_with = "service")]
    token: Option<String>,
    /// Use the configured service client (client-credentials grant)
    #[arg(long)]
    service: bool,
}

impl LoginArgs {
    fn into_method(self) -> anyhow::Result<LoginMethod> {
        match (self.username, self.password, self.token, self.service) {
            (Some(username), Some(password), None, false) => {
                Ok(LoginMethod::Password { username, password })
            }
            (None, None, Some(token), false) => Ok(LoginMethod::Token(token)),
            (None, None, None, true) => Ok(LoginMethod::Service),
            _ => anyhow::bail!("use --username/--password, --token or --service"),
        }
    }
}

#[derive(Args)]
struct HistoryArgs {
    /// Proposal number
    #[arg(long)]
    proposal: Option<String>,
    /// Status code (GER, ENV, PEN, ...)
    #[arg(long)]
    status: Option<String>,
    /// First day (yyyy-MM-dd)
    #[arg(long)]
    from: Option<NaiveDate>,
    /// Last day (yyyy-MM-dd)
    #[arg(long)]
    to: Option<NaiveDate>,
    /// Zero-based page index
    #[arg(long, default_value_t = 0)]
    page: u64,
    /// Rows per page (5, 10, 20, 50 or 100)
    #[arg(long)]
    page_size: Option<u32>,
    /// Show the latest status of each proposal instead of its history
    #[arg(long)]
    latest: bool,
}

impl HistoryArgs {
    fn request(&self) -> HistoryRequest {
        HistoryRequest {
            filters: HistoryFilters {
                proposal_id: self.proposal.clone(),
                status_code: self.status.clone(),
                date_from: self.from,
                date_to: self.to,
            },
            page: self.page,
            page_size: self.page_size,
        }
    }
}

fn print_json<T: Serialize>(value: &T, compact: bool) -> anyhow::Result<()> {
    let rendered = if compact {
        serde_json::to_string(value)?
    } else {
        serde_json::to_string_pretty(value)?
    };
    let mut stdout = std::io::stdout().lock();
    writeln!(stdout, "{rendered}")?;
    Ok(())
}

async fn dispatch(ctx: &AppContext, command: Command, compact: bool) -> anyhow::Result<()> {
    match command {
        Command::Login(args) => {
            print_json(&commands::login(ctx, args.into_method()?).await?, compact)
        }
        Command::Logout => print_json(&commands::logout(ctx).await?, compact),
        Command::Status => print_json(&commands::session_status(ctx)?, compact),
        Command::Overview => print_json(&commands::overview(ctx).await?, compact),
        Command::Alerts { status } => {
            print_json(&commands::alerts(ctx, status.as_deref()).await?, compact)
        }
        Command::Distribution { from, to } => {
            print_json(&commands::distribution(ctx, from, to).await?, compact)
        }
        Command::Funnel => print_json(&commands::funnel(ctx).await?, compact),
        Command::History(args) if args.latest => {
            print_json(&commands::latest_status(ctx, args.request()).await?, compact)
        }
        Command::History(args) => {
            print_json(&commands::history(ctx, args.request()).await?, compact)
        }
        Command::Proposal { id } => print_json(&commands::proposal_detail(ctx, id).await?, compact),
        Command::Contract { number } => {
            print_json(&commands::contract(ctx, &number).await?, compact)
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    init_tracing(if cli.log_json { LogFormat::Json } else { LogFormat::Text })?;

    // Load environment variables from .env file
    match dotenvy::dotenv() {
        Ok(path) => info!(path = %path.display(), "Loaded .env"),
        Err(e) if e.not_found() => {}
        Err(e) => warn!(error = %e, "Could not load .env file"),
    }

    let settings = match cli.config {
        Some(path) => config::load_with(Some(path), |key| std::env::var(key).ok()),
        None => config::load(),
    }
    .context("loading configuration")?;

    let ctx = AppContext::new_with_config(settings).context("initializing services")?;
    let result = dispatch(&ctx, cli.command, cli.compact).await;

    if ctx.login_redirect.take() {
        warn!(route = ctx.login_redirect.route(), "Session expired; run `propmon login` again");
    }
    result
}
