//! glasstask - Task List Library
//!
//! This library provides the core functionality for the glasstask
//! terminal client: a personal task list backed by a pluggable
//! authentication and realtime-document-sync service.
//!
//! # Core Concepts
//!
//! - **Principals**: federated identities scoped to a private task namespace
//! - **Snapshots**: full ordered result sets pushed on every change
//! - **Presenter**: cached snapshot + filter, rendered as a pure view model
//! - **Sessions**: one live store subscription per signed-in principal
//!
//! # Module Organization
//!
//! - `cli`: Command-line interface using clap
//! - `config`: Configuration loading from `glasstask.toml`
//! - `error`: Error types and result aliases
//! - `task`: Task documents, filters, and summaries
//! - `auth`: Identity provider seam and local dev identity
//! - `store`: Remote task store trait and subscription handles
//! - `memory`: In-process store backend honoring the remote contract
//! - `session`: Session controller and subscription lifecycle
//! - `presenter`: Task list presenter and view model
//! - `events`: Inbound event dispatch through a single reducer
//! - `ui`: Terminal rendering and event loop

pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod events;
pub mod memory;
pub mod presenter;
pub mod session;
pub mod store;
pub mod task;
pub mod ui;

pub use error::{Error, Result};
