//! # Horse Registry Backend
//!
//! Pedigree and integrity core of a horse registry.
//!
//! This crate stores horses with optional owner and parent references and
//! guarantees that the parent graph stays a consistent genealogy: mothers are
//! female, fathers are male, parents are born strictly before their children,
//! and a horse that already has children cannot change sex or move its birth
//! date past theirs. On top of the store it builds depth-bounded ancestry
//! trees.
//!
//! ## Architecture
//!
//! - [`config`]: TOML configuration with environment overrides
//! - [`models`]: Horse and owner records, write candidates and projections
//! - [`db`]: Repository traits, in-memory implementation, seeding
//! - [`services`]: Integrity validator, pedigree builder and horse operations
//! - [`http`]: Axum-based REST API (feature `http-server`)

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod config;
pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
