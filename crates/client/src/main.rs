// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing::error;

use console_client::config::ClientConfig;
use console_client::session::storage::{FileStorage, MemoryStorage, Storage};
use console_client::session::SessionStore;
use console_client::ApiClient;

#[derive(Parser)]
#[command(name = "console-client", about = "Command-line client for the console admin backend")]
struct Cli {
    #[command(flatten)]
    config: ClientConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Authenticate against the backend and persist the session.
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "CONSOLE_PASSWORD")]
        password: String,
    },
    /// Show the current session state.
    Status,
    /// Invalidate the refresh token and clear the session.
    Logout,
    /// Issue a GET request and print the JSON response.
    Get { path: String },
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // reqwest's rustls backend needs a process-wide crypto provider.
    let _ = rustls::crypto::ring::default_provider().install_default();

    if let Err(e) = run(cli).await {
        error!("fatal: {e:#}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let storage: Box<dyn Storage> = match cli.config.session_file {
        Some(ref path) => Box::new(FileStorage::open(path)),
        None => Box::new(MemoryStorage::default()),
    };
    let session = Arc::new(SessionStore::new(storage));
    let client = ApiClient::new(&cli.config, Arc::clone(&session));

    match cli.command {
        Command::Login { username, password } => {
            let resp = client.login(&username, &password).await?;
            println!("logged in as {} ({})", resp.username, resp.usertype);
            if resp.is_password_reset_required {
                println!("password reset required before normal use");
            }
        }
        Command::Status => {
            if session.is_authenticated() {
                match session.identity() {
                    Some(id) => println!("authenticated as {} ({})", id.username, id.usertype),
                    None => println!("authenticated"),
                }
            } else {
                println!("not authenticated");
            }
        }
        Command::Logout => {
            client.logout().await;
            println!("logged out");
        }
        Command::Get { path } => {
            let value: serde_json::Value = client.get_json(&path).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }
    }

    Ok(())
}
