//! Predictdash CLI
//!
//! Command-line interface for the prediction dashboard:
//! - Sign in and print the issued token
//! - Show the model leaderboard and prediction history
//! - Watch both views as they are polled
//! - Format a single prediction the way the dashboard shows it

use anyhow::{bail, Context};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use predictdash::aggregate::group_by_dataset;
use predictdash::config::{generate_default_config, Config};
use predictdash::dashboard::Dashboard;
use predictdash::display::table::{
    history_csv, history_table, leaderboard_csv, leaderboard_table, summary_text,
};
use predictdash::display::{format_output, OutputFormat};
use predictdash::{AuthSession, BackendClient, BearerToken, Identity, SignInOutcome};

#[derive(Parser)]
#[command(name = "predictdash")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Model leaderboards and prediction history from an ML prediction backend")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (default: platform config dir, then ./predictdash.toml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Backend base URL, overrides the config file
    #[arg(long, global = true)]
    pub backend_url: Option<String>,

    /// Email to sign in with
    #[arg(short, long, global = true)]
    pub email: Option<String>,

    /// Use an existing access token instead of signing in
    #[arg(long, global = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = OutputFormat::Table, global = true)]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Exchange the email for an access token and print it
    Login,

    /// Model leaderboard, grouped by dataset
    Models,

    /// Prediction history, grouped by dataset
    Predictions {
        /// Only show this dataset
        #[arg(short, long)]
        dataset: Option<String>,
    },

    /// Headline numbers and the best model per dataset
    Summary,

    /// Poll continuously and print the summary on every update
    Watch {
        /// Seconds between polls, overrides the config file
        #[arg(short, long)]
        interval: Option<u64>,
    },

    /// Format a prediction value for a dataset
    Format {
        /// Dataset name, e.g. "Titanic Survival"
        dataset: String,
        /// Raw model output
        #[arg(allow_negative_numbers = true)]
        output: f64,
        /// Confidence in [0, 1]
        #[arg(short = 'C', long)]
        confidence: Option<f64>,
    },

    /// Generate default config file
    Config {
        /// Output path (default: stdout)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli)?;
    predictdash::logging::init(&config.logging);

    match &cli.command {
        Commands::Format {
            dataset,
            output,
            confidence,
        } => {
            let formatted = format_output(dataset, *output, *confidence);
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&formatted)?),
                _ => match &formatted.confidence {
                    Some(c) => println!("{} ({}) [{}]", formatted.value, c, formatted.badge),
                    None => println!("{} [{}]", formatted.value, formatted.badge),
                },
            }
        }

        Commands::Config { output } => {
            let template = generate_default_config();

            match output {
                Some(path) => {
                    if let Some(parent) = path.parent() {
                        std::fs::create_dir_all(parent)?;
                    }
                    std::fs::write(path, &template)?;
                    println!("Config written to {:?}", path);
                }
                None => {
                    print!("{}", template);
                }
            }
        }

        Commands::Login => {
            let client = BackendClient::new(config.client_config())?;
            let email = config
                .auth
                .email
                .as_deref()
                .context("no email given (use --email or set [auth] email)")?;

            let token = client.login(email).await?;
            println!("{}", token.expose());
        }

        Commands::Models => {
            let dashboard = connect(&config, cli.token.as_deref()).await?;
            dashboard.refresh_once().await;
            report_errors(&dashboard);

            let board = dashboard.leaderboard();
            match cli.format {
                OutputFormat::Table => print!("{}", leaderboard_table(&board)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&board)?),
                OutputFormat::Csv => print!("{}", leaderboard_csv(&board)?),
            }
        }

        Commands::Predictions { dataset } => {
            let dashboard = connect(&config, cli.token.as_deref()).await?;
            dashboard.refresh_once().await;
            report_errors(&dashboard);

            let history = match dataset {
                Some(name) => group_by_dataset(
                    dashboard
                        .predictions()
                        .snapshot()
                        .data
                        .into_iter()
                        .filter(|p| p.dataset == *name)
                        .collect::<Vec<_>>(),
                ),
                None => dashboard.history(),
            };

            match cli.format {
                OutputFormat::Table => print!("{}", history_table(&history)),
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&history)?),
                OutputFormat::Csv => print!("{}", history_csv(&history)?),
            }
        }

        Commands::Summary => {
            let dashboard = connect(&config, cli.token.as_deref()).await?;
            dashboard.refresh_once().await;

            let summary = dashboard.summary();
            match cli.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
                _ => print!("{}", summary_text(&summary)),
            }
        }

        Commands::Watch { interval } => {
            let period = match interval {
                Some(0) => None,
                Some(secs) => Some(Duration::from_secs(*secs)),
                None => config.polling.interval(),
            };
            let Some(period) = period else {
                bail!("watch needs a poll interval above zero");
            };

            let dashboard = connect(&config, cli.token.as_deref()).await?;
            watch(&dashboard, period, cli.format).await?;
        }
    }

    Ok(())
}

/// Config file (explicit or default locations) with CLI flags on top
fn load_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_with_env(path)?,
        None => Config::load_default(),
    };

    if let Some(url) = &cli.backend_url {
        config.backend.base_url = url.clone();
    }
    if let Some(email) = &cli.email {
        config.auth.email = Some(email.clone());
    }
    Ok(config)
}

/// Build an authorized dashboard from a token or by signing in
async fn connect(config: &Config, token: Option<&str>) -> anyhow::Result<Dashboard> {
    let client = Arc::new(BackendClient::new(config.client_config())?);

    let session = match token {
        Some(token) => AuthSession::with_token(BearerToken::new(token)),
        None => {
            let email = config
                .auth
                .email
                .as_deref()
                .context("no credentials (use --token or --email)")?;

            let session = AuthSession::new();
            if session.sign_in(Identity::new(email), &*client).await
                == SignInOutcome::Unauthorized
            {
                bail!("sign-in failed for {}", email);
            }
            session
        }
    };

    Ok(Dashboard::new(client, Arc::new(session), config.endpoints()))
}

fn report_errors(dashboard: &Dashboard) {
    for error in dashboard.summary().errors {
        eprintln!("warning: {}", error);
    }
}

/// Print the summary every time either view settles, until Ctrl+C
async fn watch(
    dashboard: &Dashboard,
    period: Duration,
    format: OutputFormat,
) -> anyhow::Result<()> {
    let mut models_rx = dashboard.models().subscribe();
    let mut predictions_rx = dashboard.predictions().subscribe();
    let handle = dashboard.start(Some(period));

    tracing::info!(interval_secs = period.as_secs(), "Watching backend");

    let mut last_applied = (0, 0);
    loop {
        tokio::select! {
            changed = models_rx.changed() => changed?,
            changed = predictions_rx.changed() => changed?,
            _ = tokio::signal::ctrl_c() => break,
        }

        let applied = (
            models_rx.borrow_and_update().applied,
            predictions_rx.borrow_and_update().applied,
        );
        if applied == last_applied {
            continue;
        }
        last_applied = applied;

        let summary = dashboard.summary();
        match format {
            OutputFormat::Json => println!("{}", serde_json::to_string(&summary)?),
            _ => {
                println!("--- {} ---", chrono::Local::now().format("%H:%M:%S"));
                print!("{}", summary_text(&summary));
            }
        }
    }

    handle.stop();
    Ok(())
}
