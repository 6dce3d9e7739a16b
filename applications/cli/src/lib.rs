//! Encore CLI
//!
//! Terminal front end over the Encore libraries: session status and route
//! guards, favorites and categories, search history and catalog lookups.

pub mod app;
pub mod commands;
pub mod config;
pub mod error;
pub mod navigator;
