//! hashctl Entry Point
//!
//! Small host around the `passhash` codec. Parameters come from the
//! `ARGON2ID_*` environment variables (a `.env` file is honoured), the
//! password always comes from stdin so it never shows up in process lists.
//! Uses `anyhow` for startup errors.

mod cli;

use std::env;
use std::io::{self, BufRead};
use std::process::ExitCode;

use anyhow::Context;
use passhash::pool::{BoundedHasher, DEFAULT_MEMORY_BUDGET_KIB, PasswordHashing, PoolError};
use passhash::{Argon2idHasher, ClearTextPassword, EncodedHash, Params};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::cli::{Command, strip_line_ending};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing (stderr, stdout carries the result)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "hashctl=info,passhash=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();

    let args: Vec<String> = env::args().skip(1).collect();
    let command = Command::parse(&args)?;

    let params = Params::from_env()?;
    let memory_budget_kib = match env::var("POOL_MEMORY_BUDGET_KIB") {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("Invalid POOL_MEMORY_BUDGET_KIB: {raw:?}"))?,
        Err(_) => DEFAULT_MEMORY_BUDGET_KIB,
    };
    let pool = BoundedHasher::new(Argon2idHasher::new(params), memory_budget_kib);

    match command {
        Command::Hash => {
            let password = read_password()?;
            let token = pool.hash(password).await?;
            println!("{token}");
            Ok(ExitCode::SUCCESS)
        }
        Command::Verify { token } => {
            let password = read_password()?;
            match pool.verify(password, &token).await {
                Ok(true) => {
                    tracing::info!("Password accepted");
                    println!("match");
                    Ok(ExitCode::SUCCESS)
                }
                Ok(false) => {
                    tracing::warn!(reason = "mismatch", "Authentication failed");
                    println!("no match");
                    Ok(ExitCode::FAILURE)
                }
                // Same outcome for the user, distinct reason for the log
                Err(PoolError::Hash(e)) => {
                    tracing::warn!(reason = e.class(), error = %e, "Authentication failed");
                    println!("no match");
                    Ok(ExitCode::FAILURE)
                }
                Err(e) => Err(e.into()),
            }
        }
        Command::Inspect { token } => {
            let parsed = EncodedHash::parse(&token)?;
            let needs_rehash = pool.hasher().needs_rehash(&token)?;
            println!("memory_kib  {}", parsed.memory_kib);
            println!("time_cost   {}", parsed.time_cost);
            println!("parallelism {}", parsed.parallelism);
            println!("salt_len    {}", parsed.salt.len());
            println!("output_len  {}", parsed.output_len());
            println!("rehash      {}", if needs_rehash { "yes" } else { "no" });
            Ok(ExitCode::SUCCESS)
        }
    }
}

/// Read one line from stdin as the password
fn read_password() -> anyhow::Result<ClearTextPassword> {
    let mut line = String::new();
    io::stdin()
        .lock()
        .read_line(&mut line)
        .context("Failed to read password from stdin")?;
    strip_line_ending(&mut line);
    Ok(ClearTextPassword::from(line))
}
