//! # Contribution Dashboard
//!
//! A small read-only HTTP server for a contribution history file: a JSON
//! log of pull requests with per-record repository, language, type,
//! status, and cycle number.
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────┐   ┌─────────────┐   ┌──────────────────────┐
//! │ history.json │──▶│  DataStore  │──▶│ QueryEngine / Stats  │
//! └──────────────┘   │ (per req.)  │   │ (contrib-dashboard-  │
//!                    └─────────────┘   │  core)               │
//!                                      └──────────┬───────────┘
//!                                                 ▼
//!                                       ┌───────────────────┐
//!                                       │ axum router + JSON │
//!                                       └───────────────────┘
//! ```
//!
//! The file is read fresh on every request; nothing is cached and nothing
//! is ever written back.
//!
//! ## Modules
//!
//! | Module | Purpose |
//! |--------|---------|
//! | [`config`] | Startup configuration and port validation |
//! | [`store`] | Loading the document with empty-document fallback |
//! | [`server`] | Routes, handlers, and the serve loop |
//! | [`response`] | JSON writer with fixed headers and error bodies |

pub mod config;
pub mod response;
pub mod server;
pub mod store;
