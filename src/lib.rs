#![doc = "md-portal: Markdown to HTML conversion for the internal documentation portal."]

//! The pipeline runs once per invocation over the Markdown files of one
//! directory (plus the primary `README.md` from its parent):
//! discover → normalize → extract diagrams → render → restore diagrams →
//! assemble → write.
//!
//! # Usage
//! Call [`cli::run`] for the full CLI behaviour, or [`convert::convert_all`]
//! with a [`config::PortalConfig`] and any [`contract::MarkdownRenderer`].

pub mod assemble;
pub mod cli;
pub mod config;
pub mod contract;
pub mod convert;
pub mod diagram;
pub mod discover;
pub mod error;
pub mod load_config;
pub mod normalize;
pub mod render;

pub use cli::{run, Cli};
