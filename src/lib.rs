//! objscope - browse a live object graph from the terminal
//!
//! The [`browser`] module is the engine: handler resolution per runtime type,
//! the breadcrumb path and the throttled children cache. Everything else is
//! the application around it: configuration, logging, a demo graph, a
//! headless tree dump and the ratatui front-end.

pub mod browser;
pub mod cli;
pub mod config;
pub mod demo;
pub mod dump;
pub mod logging;
pub mod tui;
