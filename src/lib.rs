// src/lib.rs
//! Collect documentation links and register them as sources in a notebook.
//!
//! Two pipelines share a plain text link file: [`extract`] crawls a versioned
//! documentation table of contents into it, and [`submit`] drives the notebook
//! UI through WebDriver to add the links.

pub mod config;
pub mod debug;
pub mod error;
pub mod events;
pub mod extract;
pub mod links;
pub mod locator;
pub mod login;
pub mod overlay;
pub mod page;
pub mod session;
pub mod strategy;
pub mod submit;
pub mod version;

pub use error::{Error, Result};
