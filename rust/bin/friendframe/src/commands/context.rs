//! `friendframe context`: manage deployments in the local config.

use std::path::Path;

use anyhow::Result;
use friendframe_client::{ClientConfig, publishable_key_for_host};

use crate::config::{CliConfig, Context};

pub fn add(config_path: &Path, name: &str, server: &str) -> Result<()> {
    let mut config = CliConfig::load(config_path)?;
    let token = config
        .contexts
        .iter()
        .find(|c| c.name == name)
        .map(|c| c.token.clone())
        .unwrap_or_default();
    config.upsert_context(Context {
        name: name.to_string(),
        server: server.trim_end_matches('/').to_string(),
        token,
    });
    if config.current_context.is_empty() {
        config.current_context = name.to_string();
    }
    config.save(config_path)?;
    println!("Context \"{}\" saved.", name);
    Ok(())
}

pub fn list(config_path: &Path) -> Result<()> {
    let config = CliConfig::load(config_path)?;
    if config.contexts.is_empty() {
        println!("No contexts. Add one with `friendframe context add <name> --server <url>`.");
        return Ok(());
    }
    let fallback = ClientConfig::from_env().base_url;
    for ctx in &config.contexts {
        let marker = if ctx.name == config.current_context { "*" } else { " " };
        let server = if ctx.server.is_empty() { "(default)" } else { ctx.server.as_str() };
        let auth = if ctx.is_signed_in() { "  [signed in]" } else { "" };
        println!("{} {}  {}{}", marker, ctx.name, server, auth);
        println!("    sign-in key: {}", sign_in_key(ctx, &fallback));
    }
    Ok(())
}

/// Identity-provider key the web app uses for this context's deployment.
fn sign_in_key(ctx: &Context, fallback_server: &str) -> &'static str {
    let resolved;
    let ctx = if ctx.server.is_empty() {
        resolved = Context {
            server: fallback_server.to_string(),
            ..ctx.clone()
        };
        &resolved
    } else {
        ctx
    };
    publishable_key_for_host(ctx.host().unwrap_or_default())
}

pub fn use_context(config_path: &Path, name: &str) -> Result<()> {
    let mut config = CliConfig::load(config_path)?;
    if !config.contexts.iter().any(|c| c.name == name) {
        anyhow::bail!("Context \"{}\" not found", name);
    }
    config.current_context = name.to_string();
    config.save(config_path)?;
    println!("Switched to context \"{}\".", name);
    Ok(())
}

pub fn delete(config_path: &Path, name: &str) -> Result<()> {
    let mut config = CliConfig::load(config_path)?;
    if !config.remove_context(name) {
        anyhow::bail!("Context \"{}\" not found", name);
    }
    config.save(config_path)?;
    println!("Context \"{}\" deleted.", name);
    Ok(())
}
