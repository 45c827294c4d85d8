//! tasktalk - conversational todo list library
//!
//! This library provides the core of the tasktalk CLI: a todo list kept in a
//! single JSON document and managed by an agent through a small tool surface.
//!
//! # Core Concepts
//!
//! - **State document**: one JSON file holding the todos and the chat transcript
//! - **Task references**: a task id or a (partial, case-insensitive) title
//! - **Reactivation**: re-adding a completed task reopens it
//! - **Tools**: named operations an agent calls, one item per call
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `.tasktalk.toml`
//! - `error`: Error types and result aliases
//! - `task`: Task, transcript, and state document types
//! - `state`: File-backed JSON state store
//! - `resolve`: Exact-then-fuzzy task reference resolution
//! - `registry`: Todo operations (add, complete, list, format)
//! - `tools`: Tool specs and dispatch for agents
//! - `agent`: Agent trait and the built-in keyword agent
//! - `trace`: Agent activity events and sinks
//! - `ui`: Terminal chat bubbles
//! - `output`: Human and JSON command output

pub mod agent;
pub mod cli;
pub mod config;
pub mod error;
pub mod output;
pub mod registry;
pub mod resolve;
pub mod state;
pub mod task;
pub mod tools;
pub mod trace;
pub mod ui;

pub use error::{Error, Result};
