//! HTTP API server
//!
//! Axum-based REST surface: a plain-text health check at `/` and the quote
//! endpoint at `/api/quote`.

pub mod handlers;
pub mod routes;
pub mod server;
pub mod types;

pub use handlers::AppState;
pub use routes::create_router;
pub use server::HttpServer;
