//! Update-check client - asks a server which translation packages are newer
//! than the installed ones and prints them
//!
//! Usage:
//!   cargo run --bin update-check -- --item /projects/my-plugin --locale pl_PL
//!   cargo run --bin update-check -- --server https://translate.example.com \
//!       --item my-plugin --locale pl_PL --locale de_DE --translations installed.json
//!
//! `installed.json` maps language codes to catalog headers:
//!   { "pl": { "PO-Revision-Date": "2025-01-01 12:00+0000" } }
//!
//! Optional environment variables:
//! - UPDATE_CHECK_SERVER (defaults to http://localhost:8080)

use anyhow::{bail, Context, Result};
use gp_translate_update_api::client::UpdateCheckClient;
use gp_translate_update_api::{CurrentTranslation, UpdateCheckPayload};
use std::collections::BTreeMap;
use std::fs;
use tracing::info;

#[derive(Debug, PartialEq, Eq)]
struct Args {
    server: String,
    item: String,
    locales: Vec<String>,
    translations_file: Option<String>,
}

fn parse_args(args: &[String], default_server: String) -> Result<Args> {
    let mut server = default_server;
    let mut item = None;
    let mut locales = Vec::new();
    let mut translations_file = None;

    let mut iter = args.iter();
    while let Some(flag) = iter.next() {
        let mut value = || {
            iter.next()
                .cloned()
                .with_context(|| format!("Missing value for {}", flag))
        };

        match flag.as_str() {
            "--server" => server = value()?,
            "--item" => item = Some(value()?),
            "--locale" => locales.push(value()?),
            "--translations" => translations_file = Some(value()?),
            other => bail!("Unknown argument: {}", other),
        }
    }

    let Some(item) = item else {
        bail!("--item is required");
    };
    if locales.is_empty() {
        bail!("At least one --locale is required");
    }

    Ok(Args {
        server,
        item,
        locales,
        translations_file,
    })
}

fn load_translations(path: &str) -> Result<BTreeMap<String, CurrentTranslation>> {
    let json = fs::read_to_string(path).with_context(|| format!("Failed to read {}", path))?;
    serde_json::from_str(&json).with_context(|| format!("Failed to parse {}", path))
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("update_check=info".parse()?),
        )
        .init();

    let argv: Vec<String> = std::env::args().skip(1).collect();
    let default_server = std::env::var("UPDATE_CHECK_SERVER")
        .unwrap_or_else(|_| "http://localhost:8080".to_string());
    let args = parse_args(&argv, default_server)?;

    let translations = match &args.translations_file {
        Some(path) => load_translations(path)?,
        None => BTreeMap::new(),
    };

    let payload = UpdateCheckPayload {
        item: args.item,
        locale: args.locales,
        translations,
    };

    let client = UpdateCheckClient::new(&args.server);
    info!("Checking {} for updates of '{}'", client.endpoint(), payload.item);

    let updates = client.check(&payload).await?;

    if updates.is_empty() {
        println!("All translations are up to date.");
        return Ok(());
    }

    for update in &updates {
        println!("{}\t{}\t{}", update.language, update.updated, update.package);
    }
    info!("✓ {} update(s) available", updates.len());

    Ok(())
}
