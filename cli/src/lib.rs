//! # Themeshop
//!
//! Command-line host for the theme settings panel. Loads configuration,
//! sets up logging, provides terminal versions of the dialogs and
//! notifications the panel needs, and dispatches subcommands.
//!
//! ## Modules
//!
//! - [`cli`] - Command-line arguments
//! - [`commands`] - Panel construction and subcommand dispatch
//! - [`config`] - Configuration loading and validation
//! - [`error`] - Application error type
//! - [`host`] - Terminal dialogs, notifier, stylesheet printer and file opener
//! - [`logger`] - Logging setup
//!
//! This library interface enables integration testing by providing access to internal modules.

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod host;
pub mod logger;
