#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Plugin Core Rust
//!
//! Rust core for microservice plugin command registration, validation, and
//! dispatch.
//!
//! ## Overview
//!
//! Plugin Core provides the in-process command plumbing a plugin-based
//! microservice builds on: plugins register command handlers under role/cmd
//! patterns, inbound commands are routed to the matching handler, and handler
//! arguments are merge-validated (field allowlist + JSON Schema) before any
//! work happens. Completion is always a reply envelope with a boolean
//! `status` discriminator.
//!
//! ## Architecture
//!
//! A [`plugin::Plugin`] wires one or more [`command::CommandHandler`]s into a
//! [`command::CommandRouter`] through its `register` hook; the
//! [`plugin::PluginRegistry`] tracks plugin metadata and lifecycle state.
//! Handlers validate their args through [`validation::MergeValidate`], which
//! picks an allowlisted field set and checks it against a compiled schema,
//! collecting every violation unless asked to abort early.
//!
//! ## Module Organization
//!
//! - [`command`] - Command envelope types and the pattern-keyed router
//! - [`validation`] - Structural guards and merge-validate
//! - [`plugin`] - Plugin trait, lifecycle registry, and the create command
//! - [`config`] - Configuration management
//! - [`error`] - Structured error handling
//! - [`logging`] - Structured logging setup and helpers
//!
//! ## Quick Start
//!
//! ```rust
//! use plugin_core::command::{Command, CommandPattern, CommandRouter, CommandSource};
//! use plugin_core::plugin::{CreateCommandPlugin, PluginRegistry};
//! use serde_json::json;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let router = CommandRouter::new();
//! let registry = PluginRegistry::new();
//!
//! registry
//!     .register_plugin(Arc::new(CreateCommandPlugin::with_stub_service()), &router)
//!     .await?;
//!
//! let command = Command::new(
//!     CommandPattern::new("plugin", "create"),
//!     json!({ "field": "value" }),
//!     CommandSource::Client { id: "client_1".to_string() },
//! );
//!
//! let reply = router.route(command).await?;
//! println!("status={} message={:?}", reply.status, reply.message);
//! # Ok(())
//! # }
//! ```

pub mod command;
pub mod config;
pub mod error;
pub mod logging;
pub mod plugin;
pub mod validation;

pub use command::{
    Command, CommandHandler, CommandMetadata, CommandPattern, CommandReply, CommandRouter,
    CommandRouterConfig, CommandRouterError, CommandRouterStats, CommandSource,
};
pub use config::PluginCoreConfig;
pub use error::{PluginError, Result};
pub use plugin::{
    CreateCommandPlugin, CreationService, Plugin, PluginRegistry, PluginState, PluginStats,
    StubCreationService, PICK_FIELDS,
};
pub use validation::{
    MergeValidate, ValidateOptions, ValidateRequest, ValidationFailure, Violation,
};
