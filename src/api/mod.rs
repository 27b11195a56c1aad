//! API Module
//!
//! HTTP handlers and routing for the key-value store.
//!
//! # Endpoints
//! - `PUT /set` - Store a key-value pair, optionally with a TTL
//! - `GET /get/:key` - Retrieve a value by key
//! - `DELETE /del/:key` - Delete a key
//! - `GET /stats` - Get store statistics
//! - `GET /health` - Health check endpoint

pub mod handlers;
pub mod routes;

pub use handlers::*;
pub use routes::create_router;
