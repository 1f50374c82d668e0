//! CLI entry and dispatch.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use testskool_core::config;
use tracing_subscriber::EnvFilter;

mod app;
mod commands;

/// Env var holding the log filter (`tracing_subscriber` directive syntax).
const LOG_ENV: &str = "TESTSKOOL_LOG";

#[derive(Parser)]
#[command(name = "testskool")]
#[command(version)]
#[command(about = "Manage your testskool profile from the terminal")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Store session tokens issued by the backend
    Login {
        /// Access token sent as the bearer credential
        #[arg(long, value_name = "TOKEN")]
        access: String,
        /// Refresh token, stored alongside the access token
        #[arg(long, value_name = "TOKEN")]
        refresh: Option<String>,
    },

    /// Forget the stored session tokens
    Logout,

    /// Show your profile
    Show,

    /// List the subjects a teacher can pick
    Subjects,

    /// Edit your profile (only the given fields change)
    Edit {
        #[arg(long)]
        first_name: Option<String>,
        #[arg(long)]
        last_name: Option<String>,
        #[arg(long)]
        about: Option<String>,
        /// Subject name; repeat for several (teachers only)
        #[arg(long = "subject", value_name = "NAME")]
        subjects: Vec<String>,
        /// Profile picture (JPEG, PNG or GIF, at most 300 KB)
        #[arg(long, value_name = "PATH")]
        picture: Option<PathBuf>,
    },

    /// Change your password
    Password {
        /// Current password
        #[arg(long, env = "TESTSKOOL_OLD_PASSWORD", hide_env_values = true)]
        old: String,
        /// New password (min. 8 characters)
        #[arg(long, env = "TESTSKOOL_NEW_PASSWORD", hide_env_values = true)]
        new: String,
        /// New password again
        #[arg(long, env = "TESTSKOOL_CONFIRM_PASSWORD", hide_env_values = true)]
        confirm: String,
    },

    /// Permanently delete your account
    DeleteAccount {
        /// Current password
        #[arg(long, env = "TESTSKOOL_PASSWORD", hide_env_values = true)]
        password: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
}

pub fn run() -> Result<()> {
    let cli = Cli::parse();

    init_tracing();

    // single dispatcher: everything runs on one thread
    let rt = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("create tokio runtime")?;
    rt.block_on(async move { dispatch(cli).await })
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(true)
        .try_init();
}

async fn dispatch(cli: Cli) -> Result<()> {
    let load_config = || config::Config::load().context("load config");

    match cli.command {
        Commands::Login { access, refresh } => commands::auth::login(access, refresh),
        Commands::Logout => commands::auth::logout(),
        Commands::Show => commands::profile::show(&load_config()?).await,
        Commands::Subjects => commands::profile::subjects(&load_config()?).await,
        Commands::Edit {
            first_name,
            last_name,
            about,
            subjects,
            picture,
        } => {
            let args = commands::profile::EditArgs {
                first_name,
                last_name,
                about,
                subjects,
                picture,
            };
            commands::profile::edit(&load_config()?, args).await
        }
        Commands::Password { old, new, confirm } => {
            commands::account::change_password(&load_config()?, old, new, confirm).await
        }
        Commands::DeleteAccount { password } => {
            commands::account::delete(&load_config()?, password).await
        }
        Commands::Config { command } => match command {
            ConfigCommands::Path => {
                commands::config::path();
                Ok(())
            }
            ConfigCommands::Init => commands::config::init(),
        },
    }
}
