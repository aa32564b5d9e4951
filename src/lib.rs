//! Headlines - An Offline-First News Reader Core
//!
//! This crate fetches articles from a remote news API, caches them in a
//! local SQLite store keyed by article URL, and keeps user-set favorite
//! flags intact across content refreshes. When the network is down it
//! falls back to the cache.

pub mod category;
pub mod client;
pub mod config;
pub mod error;
pub mod list;
pub mod models;
pub mod orchestrator;
pub mod store;
pub mod sync;
