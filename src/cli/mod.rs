//! Command-line interface for tasktalk
//!
//! This module defines the CLI structure using clap derive macros.
//! Running without a subcommand starts a chat session.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::Config;
use crate::error::Result;
use crate::registry::TodoRegistry;
use crate::state::StateStore;
use crate::task::AppState;

mod chat;
mod todo;

/// tasktalk - a conversational todo list
///
/// Manage a small todo list by chatting with an assistant, or directly
/// through subcommands.
#[derive(Parser, Debug)]
#[command(name = "tasktalk")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the state document (defaults to state.json)
    #[arg(long, global = true, env = "TASKTALK_STATE")]
    pub state: Option<PathBuf>,

    /// Path to a config file (defaults to .tasktalk.toml, then the user config)
    #[arg(long, global = true, env = "TASKTALK_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Add one or more tasks (re-adding a completed task reopens it)
    Add {
        /// Task titles, one per argument
        #[arg(required = true)]
        items: Vec<String>,
    },

    /// Mark a task complete by id or (partial) title
    #[command(alias = "complete")]
    Done {
        /// Task id or title
        target: String,
    },

    /// Remove a task from the open list (marks it complete)
    #[command(alias = "rm")]
    Remove {
        /// Task id or title
        target: String,
    },

    /// Print every task and its status as JSON
    List,

    /// Print the formatted task list
    Show,

    /// Describe the tools available to the assistant
    Tools,

    /// Start an interactive chat session (default)
    Chat,
}

/// Shared context for commands that touch the state document
pub struct Context {
    pub config: Config,
    pub state_path: PathBuf,
}

impl Context {
    fn resolve(state: Option<PathBuf>, config: Option<PathBuf>) -> Result<Self> {
        let cwd = std::env::current_dir()?;
        let config = Config::resolve(config.as_deref(), &cwd)?;
        let state_path = state.unwrap_or_else(|| config.state.path.clone());
        Ok(Self { config, state_path })
    }

    pub fn open_registry(&self) -> TodoRegistry {
        tracing::debug!(path = %self.state_path.display(), "opening state");
        TodoRegistry::new(StateStore::open(&self.state_path, AppState::default()))
    }
}

impl Cli {
    /// Execute the CLI command
    pub fn run(self) -> Result<()> {
        let ctx = Context::resolve(self.state, self.config)?;
        let output = crate::output::OutputOptions {
            json: self.json,
            quiet: self.quiet,
        };

        match self.command.unwrap_or(Commands::Chat) {
            Commands::Add { items } => todo::run_add(&ctx, todo::AddOptions { items, output }),
            Commands::Done { target } => todo::run_complete(
                &ctx,
                todo::CompleteOptions {
                    target,
                    command: "done",
                    output,
                },
            ),
            Commands::Remove { target } => todo::run_complete(
                &ctx,
                todo::CompleteOptions {
                    target,
                    command: "remove",
                    output,
                },
            ),
            Commands::List => todo::run_list(&ctx, output),
            Commands::Show => todo::run_show(&ctx, output),
            Commands::Tools => todo::run_tools(output),
            Commands::Chat => chat::run(&ctx, chat::ChatOptions { quiet: self.quiet }),
        }
    }
}
