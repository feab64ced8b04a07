//! # Themeshop Engine
//!
//! Core library for application theme settings. A theme is a directory
//! holding a generated `variables.scss` plus optional hand-written
//! stylesheets. This library reads and writes those variables, upgrades
//! themes written for the first theme engine, finds theme directories on
//! disk and implements the clone/remove/select workflow of the settings
//! panel.
//!
//! ## Modules
//!
//! - [`color`] - Hex color parsing and shading
//! - [`defaults`] - Default palette, legacy color map and editor defaults
//! - [`editor`] - Editable view of a theme's settings
//! - [`error`] - Error types for theme operations
//! - [`host`] - Traits for the host application (settings, dialogs, stylesheets)
//! - [`panel`] - The theme settings panel: select, clone, remove, save
//! - [`resolver`] - Theme directory discovery and name resolution
//! - [`settings`] - Settings store implementations
//! - [`stylesheet`] - Loading a theme's stylesheets into the host
//! - [`upgrade`] - Engine version detection and legacy upgrade
//! - [`validation`] - Theme name validation
//! - [`variables`] - The `variables.scss` format

pub mod color;
pub mod defaults;
pub mod editor;
pub mod error;
pub mod host;
pub mod panel;
pub mod resolver;
pub mod settings;
pub mod stylesheet;
pub mod upgrade;
pub mod validation;
pub mod variables;

pub use error::{ThemeError, ThemeResult};
pub use panel::{PanelServices, ThemePanel};
pub use resolver::{ThemeResolver, ThemeRoots};
pub use variables::ThemeVariableSet;
