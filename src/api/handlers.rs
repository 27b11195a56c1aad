//! API Handlers
//!
//! HTTP request handlers for each endpoint.

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::cache::KvStore;
use crate::config::Config;
use crate::error::{CacheError, Result};
use crate::models::{
    DeleteResponse, GetResponse, HealthResponse, SetRequest, SetResponse, StatsResponse,
};

/// Application state shared across all handlers.
///
/// The store is internally synchronized, so handlers share it through a
/// plain `Arc` without an outer lock.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<KvStore>,
}

impl AppState {
    pub fn new(store: KvStore) -> Self {
        Self {
            store: Arc::new(store),
        }
    }

    /// Builds the store from configuration. Must run inside a tokio runtime.
    pub fn from_config(config: &Config) -> Result<Self> {
        Ok(Self::new(KvStore::from_config(config)?))
    }
}

/// Handler for PUT /set
pub async fn set_handler(
    State(state): State<AppState>,
    Json(req): Json<SetRequest>,
) -> Result<Json<SetResponse>> {
    match req.ttl_ms {
        Some(ttl) => state.store.put_with_ttl(req.key.clone(), req.value, ttl)?,
        None => state.store.put(req.key.clone(), req.value)?,
    }

    Ok(Json(SetResponse::new(req.key)))
}

/// Handler for GET /get/:key
pub async fn get_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<GetResponse>> {
    let value = state
        .store
        .get(&key)
        .ok_or_else(|| CacheError::NotFound(key.clone()))?;

    Ok(Json(GetResponse::new(key, value)))
}

/// Handler for DELETE /del/:key
pub async fn delete_handler(
    State(state): State<AppState>,
    Path(key): Path<String>,
) -> Result<Json<DeleteResponse>> {
    if !state.store.delete(&key) {
        return Err(CacheError::NotFound(key));
    }

    Ok(Json(DeleteResponse::new(key)))
}

/// Handler for GET /stats
pub async fn stats_handler(State(state): State<AppState>) -> Json<StatsResponse> {
    let stats = state.store.stats();
    Json(StatsResponse::new(&stats, state.store.max_entries()))
}

/// Handler for GET /health
pub async fn health_handler(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(state.store.is_reaper_running()))
}
