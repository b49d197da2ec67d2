//! Tolk - extract hard-coded UI text into i18n calls
//!
//! Tolk scans JavaScript, TypeScript, Vue and JSX sources for literal
//! natural-language text, matches it against locale dictionaries, creates
//! keys for new text, asks a translator for the other languages and rewrites
//! the literals into translation calls.
//!
//! ## Module Structure
//!
//! - `cli`: Command-line interface layer
//! - `config`: Configuration file loading and parsing
//! - `core`: Scanning, key resolution, replacement synthesis and dictionary IO
//! - `error`: Error types returned by the core
//! - `utils`: Shared utility functions

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod utils;
