//! HTTP server module for the horse registry.
//!
//! This module provides an axum-based HTTP server that exposes the service
//! layer as a REST API.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers)                               │
//! │  - Request parsing                                        │
//! │  - JSON serialization/deserialization                     │
//! │  - Request ids, CORS, compression, error mapping          │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                                │
//! │  - Integrity validation                                   │
//! │  - Pedigree construction                                  │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (db/)                                   │
//! │  - LocalRepository                                        │
//! └──────────────────────────────────────────────────────────┘
//! ```
//!
//! # Endpoints
//!
//! | Method | Path | Result |
//! |---|---|---|
//! | GET | `/health` | store status |
//! | GET, POST | `/v1/horses` | list or filtered search / create |
//! | GET, PUT, DELETE | `/v1/horses/{id}` | detail / replace / delete |
//! | GET | `/v1/horses/{id}/familytree?generations=N` | pedigree |

pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::create_router;
pub use state::AppState;
