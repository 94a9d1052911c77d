//! Retrieve It Server - HTTP REST API for the lost & found portal
//!
//! Exposes report submission, listing and matching plus the two assist
//! helpers over JSON. There is no authentication layer; deploy behind one.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use server::ServerConfig;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = ServerConfig::load()?;
//!     server::start_server(config).await?;
//!     Ok(())
//! }
//! ```
//!
//! # API Endpoints
//!
//! - `GET /` - API information
//! - `GET /health` - Liveness probe
//! - `GET /ready` - Readiness probe (store reachable)
//! - `GET /metrics` - Prometheus metrics
//! - `POST /api/v1/reports` - Submit a report draft (`"enhance": true` to
//!   polish the description first)
//! - `GET /api/v1/reports` - List reports (`?type=LOST&status=ACTIVE`)
//! - `GET /api/v1/reports/{id}` - Get one report
//! - `GET /api/v1/reports/{id}/matches` - Matches for a stored report
//! - `POST /api/v1/assist/enhance` - Polish a description
//! - `GET /api/v1/assist/locations` - Suggest places (`?q=&lat=&lng=`)

pub mod config;
pub mod error;
pub mod middleware;
pub mod routes;
pub mod server;
pub mod state;
pub mod telemetry;

pub use config::ServerConfig;
pub use error::{ServerError, ServerResult};
pub use server::{build_router, start_server};
pub use state::ServerState;
