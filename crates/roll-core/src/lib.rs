//! Core types and trait definitions for the Roll attendance registry.
//!
//! This crate is deliberately free of HTTP, database, and file-format
//! dependencies. Every other crate depends on it.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod attendance;
pub mod error;
pub mod notify;
pub mod participant;
pub mod provision;
pub mod store;
pub mod token;

pub use error::{Error, Result};
