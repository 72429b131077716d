//! Subcommand implementations.

pub mod account;
pub mod context;
pub mod frames;
pub mod groups;
pub mod login;

use std::path::Path;
use std::sync::Arc;

use anyhow::Result;
use friendframe_client::{ApiClient, ClientConfig, StaticIdentity};
use friendframe_flux::{Resource, Session};

use crate::config::CliConfig;
use crate::output::Format;

/// Everything a command needs to talk to the service.
pub struct Ctx {
    pub client: ApiClient,
    pub identity: Arc<StaticIdentity>,
    pub format: Format,
}

/// Build a client for the current context.
///
/// The context's server wins over `FRIENDFRAME_API_URL`. A missing token is
/// not an error here; the first call will ask the user to sign in.
pub fn connect(config_path: &Path, format: Format) -> Result<Ctx> {
    let config = CliConfig::load(config_path)?;
    let ctx = config.current().cloned().unwrap_or_default();

    let mut client_config = ClientConfig::from_env();
    if !ctx.server.is_empty() {
        client_config.base_url = ctx.server.clone();
    }
    tracing::debug!("Using API at {}", client_config.normalized_base_url());

    let identity = Arc::new(StaticIdentity::new(ctx.token).with_redirect_hook(|| {
        eprintln!(
            "Not signed in. Sign in on the web app, then run `friendframe login --token <token>`."
        );
    }));
    let client = ApiClient::new(client_config, identity.clone())?;
    Ok(Ctx { client, identity, format })
}

/// Run a resource through its identity gate and return the loaded list.
pub async fn load<T>(resource: &Resource<T>, identity: &StaticIdentity) -> Result<Vec<T>>
where
    T: Clone + Send + Sync + 'static,
{
    resource.sync_with(identity).await;
    let state = resource.snapshot();
    if state.session == Session::SignedOut {
        anyhow::bail!("Not signed in. Run `friendframe login --token <token>`.");
    }
    if let Some(err) = state.error {
        anyhow::bail!("{}: {}", err, err.api_error());
    }
    Ok(state.data.unwrap_or_default())
}

/// Ask before destructive actions unless `--yes` was given.
pub fn confirm(yes: bool, prompt: &str) -> Result<bool> {
    if yes {
        return Ok(true);
    }
    eprint!("{} [y/N]: ", prompt);
    let mut s = String::new();
    std::io::stdin().read_line(&mut s)?;
    Ok(s.trim().eq_ignore_ascii_case("y"))
}
