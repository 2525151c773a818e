//! Novafs: Virtual Link-Based Namespace
//!
//! A logical filesystem layer that organizes opaque binary content into
//! folders through link records, while the bytes live under a flat,
//! identifier-addressed blob directory.

pub mod bootstrap;
pub mod cli;
pub mod config;
pub mod entity;
pub mod error;
pub mod logging;
pub mod service;
pub mod store;
pub mod types;
