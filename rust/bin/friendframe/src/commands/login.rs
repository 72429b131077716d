//! `friendframe login` / `logout`: store or clear the session token.
//!
//! Sign-in itself happens in the browser through the identity provider;
//! the CLI only keeps the resulting token per context.

use std::path::Path;

use anyhow::Result;

use crate::config::{CliConfig, Context};

/// Context used when none has been configured yet.
const DEFAULT_CONTEXT: &str = "default";

pub fn login(config_path: &Path, token: &str) -> Result<()> {
    let token = token.trim();
    if token.is_empty() {
        anyhow::bail!("Token must not be empty");
    }

    let mut config = CliConfig::load(config_path)?;
    if config.current_context.is_empty() {
        config.current_context = DEFAULT_CONTEXT.to_string();
    }
    let name = config.current_context.clone();
    match config.current_mut() {
        Some(ctx) => ctx.token = token.to_string(),
        None => config.upsert_context(Context {
            name: name.clone(),
            token: token.to_string(),
            ..Default::default()
        }),
    }
    config.save(config_path)?;
    tracing::info!(context = %name, "session token stored");
    println!("Signed in (context \"{}\").", name);
    Ok(())
}

pub fn logout(config_path: &Path) -> Result<()> {
    let mut config = CliConfig::load(config_path)?;
    let Some(ctx) = config.current_mut() else {
        println!("No current context.");
        return Ok(());
    };
    ctx.token.clear();
    let name = ctx.name.clone();
    config.save(config_path)?;
    println!("Signed out (context \"{}\").", name);
    Ok(())
}
