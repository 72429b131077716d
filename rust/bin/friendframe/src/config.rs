//! The CLI's context file, `~/.friendframe/config.toml`.
//!
//! A context pairs one FriendFrame deployment with the session token the
//! user pasted for it. Exactly one context is current at a time; commands
//! that talk to the service use it.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::{Deserialize, Serialize};

const CONFIG_DIR: &str = ".friendframe";
const CONFIG_FILE: &str = "config.toml";

/// One deployment plus its session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Context {
    pub name: String,

    /// API origin. Empty defers to `FRIENDFRAME_API_URL`.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub server: String,

    /// Bearer token from the web app. Empty means signed out.
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub token: String,
}

impl Context {
    pub fn is_signed_in(&self) -> bool {
        !self.token.trim().is_empty()
    }

    /// Host part of `server`, without scheme, port or path.
    pub fn host(&self) -> Option<&str> {
        let rest = self
            .server
            .split_once("://")
            .map_or(self.server.as_str(), |(_, rest)| rest);
        let authority = rest.split(['/', '?', '#']).next().unwrap_or_default();
        let authority = authority.rsplit_once('@').map_or(authority, |(_, host)| host);
        let host = match authority.strip_prefix('[') {
            Some(v6) => v6.split(']').next().unwrap_or_default(),
            None => authority.split(':').next().unwrap_or_default(),
        };
        (!host.is_empty()).then_some(host)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CliConfig {
    #[serde(rename = "current-context", default)]
    pub current_context: String,

    #[serde(default)]
    pub contexts: Vec<Context>,
}

impl CliConfig {
    pub fn default_path() -> PathBuf {
        let home = std::env::var_os("HOME")
            .or_else(|| std::env::var_os("USERPROFILE"))
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));
        home.join(CONFIG_DIR).join(CONFIG_FILE)
    }

    /// A missing file is an empty config, not an error.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Self::default()),
            Err(e) => return Err(e).with_context(|| format!("reading {}", path.display())),
        };
        toml::from_str(&text).with_context(|| format!("parsing {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        let text = toml::to_string_pretty(self)?;
        std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
    }

    pub fn find(&self, name: &str) -> Option<&Context> {
        self.contexts.iter().find(|c| c.name == name)
    }

    pub fn find_mut(&mut self, name: &str) -> Option<&mut Context> {
        self.contexts.iter_mut().find(|c| c.name == name)
    }

    pub fn current(&self) -> Option<&Context> {
        self.find(&self.current_context)
    }

    pub fn current_mut(&mut self) -> Option<&mut Context> {
        let name = self.current_context.clone();
        self.find_mut(&name)
    }

    /// Insert, or replace the context with the same name in place.
    pub fn upsert_context(&mut self, ctx: Context) {
        match self.find_mut(&ctx.name) {
            Some(slot) => *slot = ctx,
            None => self.contexts.push(ctx),
        }
    }

    /// Drops the context and, if it was current, leaves no context current.
    /// Returns whether anything was removed.
    pub fn remove_context(&mut self, name: &str) -> bool {
        let Some(pos) = self.contexts.iter().position(|c| c.name == name) else {
            return false;
        };
        self.contexts.remove(pos);
        if self.current_context == name {
            self.current_context.clear();
        }
        true
    }
}
