//! CLI command implementations

use anyhow::Result;
use std::fs;
use std::path::Path;

use crate::api;
use crate::auth::{hash_password, TokenCodec};
use crate::cli::{error, info, print_claims, success, warn, OutputFormat};
use crate::config::{self, loader::CONFIG_FILENAME, Config};

/// Initialize a new authgate.toml configuration file
pub async fn init(path: Option<&Path>, force: bool) -> Result<()> {
    let config_path = path.unwrap_or_else(|| Path::new(CONFIG_FILENAME));

    if config_path.exists() && !force {
        warn(&format!("{} already exists", config_path.display()));
        return Ok(());
    }

    let content = config::loader::default_config_content(&config::loader::generate_secret());
    fs::write(config_path, content)?;

    success(&format!("Created {}", config_path.display()));
    info("Edit the configuration file and run 'authgate serve' to start the server");

    Ok(())
}

/// Start the HTTP API server
pub async fn serve(path: Option<&Path>, host: Option<String>, port: Option<u16>) -> Result<()> {
    let config = load_config(path)?;
    let host = host.unwrap_or_else(|| config.server.host.clone());
    let port = port.unwrap_or(config.server.port);

    info(&format!("Starting server on {}:{}", host, port));

    if let Err(e) = api::run_server(config, &host, port).await {
        error(&format!("Server failed: {}", e));
        return Err(e.into());
    }
    Ok(())
}

/// Print a bcrypt hash for a password
pub async fn hash(password: &str, cost: u32) -> Result<()> {
    let hash = hash_password(password, cost).await?;
    println!("{}", hash);
    Ok(())
}

/// Validate a token and print its claims
pub async fn inspect_token(path: Option<&Path>, token: &str, format: OutputFormat) -> Result<()> {
    let config = load_config(path)?;
    let codec = TokenCodec::from_config(&config.auth)?;

    match codec.validate(token.trim()) {
        Ok(claims) => {
            match format {
                OutputFormat::Text => {
                    success("Token is valid");
                    print_claims(&claims);
                }
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&claims)?),
            }
            Ok(())
        }
        Err(e) => {
            error(&format!("Token rejected: {}", e));
            Err(e.into())
        }
    }
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let config = match path {
        Some(path) => config::load_config_from_path(path)?,
        None => config::load_config()?,
    };
    Ok(config)
}
