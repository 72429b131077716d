//! `friendframe`: command-line client for the FriendFrame service.
//!
//! Lists and manages groups, frames and photo albums for the signed-in
//! user. Sign in happens in the browser; `friendframe login --token`
//! stores the resulting session token per context.

mod commands;
mod config;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

/// FriendFrame CLI tool.
#[derive(Parser, Debug)]
#[command(name = "friendframe", about = "FriendFrame CLI client")]
struct Cli {
    /// Path to client config file (default: ~/.friendframe/config.toml).
    #[arg(long = "config", global = true)]
    config: Option<String>,

    /// Output format: table or json.
    #[arg(long = "output", short = 'o', global = true, default_value = "table")]
    output: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Manage contexts (one per deployment).
    Context {
        #[command(subcommand)]
        action: ContextAction,
    },

    /// Store a session token for the current context.
    Login {
        #[arg(long)]
        token: String,
    },

    /// Clear the token from the current context.
    Logout,

    /// Show the signed-in user.
    Me,

    /// List linked photo albums.
    Albums,

    /// Group operations.
    Groups {
        #[command(subcommand)]
        action: GroupsAction,
    },

    /// Frame operations.
    Frames {
        #[command(subcommand)]
        action: FramesAction,
    },

    /// Show version.
    Version,
}

#[derive(Subcommand, Debug)]
enum ContextAction {
    /// Add or update a context.
    Add {
        name: String,
        /// API origin, e.g. https://friendframe.bre.land/api.
        #[arg(long)]
        server: String,
    },
    /// List all contexts.
    List,
    /// Switch the current context.
    Use { name: String },
    /// Delete a context.
    Delete { name: String },
}

#[derive(Subcommand, Debug)]
enum GroupsAction {
    /// List groups the user belongs to.
    List,
    /// Create a group.
    Create {
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Cover image URL.
        #[arg(long = "cover")]
        cover: Option<String>,
    },
    /// Delete a group.
    Delete {
        id: String,
        /// Skip confirmation.
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
    /// Remove a member from a group.
    RemoveMember { group: String, member: String },
    /// Change group settings.
    Update {
        group: String,
        #[arg(long = "cover")]
        cover: Option<String>,
    },
    /// Join a group with a share token.
    Join { token: String },
    /// Create a share token for a group.
    Invite { group: String },
}

#[derive(Subcommand, Debug)]
enum FramesAction {
    /// List frames.
    List {
        /// Only frames not assigned to a group.
        #[arg(long)]
        ungrouped: bool,
    },
    /// Register a frame by serial number.
    Register {
        serial: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        group: Option<String>,
    },
    /// Unregister a frame.
    Unregister {
        id: String,
        #[arg(long = "yes", short = 'y')]
        yes: bool,
    },
    /// Assign a frame to a group.
    AddToGroup { frame: String, group: String },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let format = output::Format::parse(&cli.output)?;

    let config_path = cli
        .config
        .map(std::path::PathBuf::from)
        .unwrap_or_else(config::CliConfig::default_path);

    match cli.command {
        Commands::Context { action } => match action {
            ContextAction::Add { name, server } => {
                commands::context::add(&config_path, &name, &server)?;
            }
            ContextAction::List => commands::context::list(&config_path)?,
            ContextAction::Use { name } => {
                commands::context::use_context(&config_path, &name)?;
            }
            ContextAction::Delete { name } => {
                commands::context::delete(&config_path, &name)?;
            }
        },

        Commands::Login { token } => commands::login::login(&config_path, &token)?,

        Commands::Logout => commands::login::logout(&config_path)?,

        Commands::Me => {
            let ctx = commands::connect(&config_path, format)?;
            commands::account::me(&ctx).await?;
        }

        Commands::Albums => {
            let ctx = commands::connect(&config_path, format)?;
            commands::account::albums(&ctx).await?;
        }

        Commands::Groups { action } => {
            let ctx = commands::connect(&config_path, format)?;
            match action {
                GroupsAction::List => commands::groups::list(&ctx).await?,
                GroupsAction::Create { name, description, cover } => {
                    commands::groups::create(&ctx, name, description, cover).await?;
                }
                GroupsAction::Delete { id, yes } => {
                    commands::groups::delete(&ctx, &id, yes).await?;
                }
                GroupsAction::RemoveMember { group, member } => {
                    commands::groups::remove_member(&ctx, &group, &member).await?;
                }
                GroupsAction::Update { group, cover } => {
                    commands::groups::update(&ctx, &group, cover).await?;
                }
                GroupsAction::Join { token } => commands::groups::join(&ctx, &token).await?,
                GroupsAction::Invite { group } => commands::groups::invite(&ctx, &group).await?,
            }
        }

        Commands::Frames { action } => {
            let ctx = commands::connect(&config_path, format)?;
            match action {
                FramesAction::List { ungrouped } => {
                    commands::frames::list(&ctx, ungrouped).await?;
                }
                FramesAction::Register { serial, name, group } => {
                    commands::frames::register(&ctx, serial, name, group).await?;
                }
                FramesAction::Unregister { id, yes } => {
                    commands::frames::unregister(&ctx, &id, yes).await?;
                }
                FramesAction::AddToGroup { frame, group } => {
                    commands::frames::add_to_group(&ctx, &frame, &group).await?;
                }
            }
        }

        Commands::Version => {
            println!("friendframe cli v{}", env!("CARGO_PKG_VERSION"));
        }
    }

    Ok(())
}
