//! Test utilities for tally-core
//!
//! This module provides testing infrastructure including a mock embedding
//! server that can be used for development and integration tests. The
//! server speaks the OpenAI embeddings API and returns deterministic
//! vectors; it can also be told to fail its first N embedding requests to
//! exercise the engine's degrade-and-rebuild behavior.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::extract::{Json, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::Router;
use serde::{Deserialize, Serialize};
use tokio::sync::oneshot;

use crate::embed::HashedBackend;

/// Mock embedding server for testing and development
pub struct MockEmbeddingServer {
    addr: SocketAddr,
    shutdown_tx: Option<oneshot::Sender<()>>,
    remaining_failures: Arc<AtomicUsize>,
}

#[derive(Clone)]
struct ServerState {
    backend: HashedBackend,
    remaining_failures: Arc<AtomicUsize>,
}

impl MockEmbeddingServer {
    /// Start the mock server on an available port
    pub async fn start() -> Self {
        Self::start_with_failures(0).await
    }

    /// Start a server whose first `failures` embedding requests return 500
    pub async fn start_with_failures(failures: usize) -> Self {
        let remaining_failures = Arc::new(AtomicUsize::new(failures));
        let state = ServerState {
            backend: HashedBackend::new(),
            remaining_failures: Arc::clone(&remaining_failures),
        };

        let app = Router::new()
            .route("/v1/models", get(handle_models))
            .route("/v1/embeddings", post(handle_embeddings))
            .with_state(state);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        tokio::spawn(async move {
            axum::serve(listener, app)
                .with_graceful_shutdown(async {
                    shutdown_rx.await.ok();
                })
                .await
                .unwrap();
        });

        Self {
            addr,
            shutdown_tx: Some(shutdown_tx),
            remaining_failures,
        }
    }

    /// Get the base URL for this mock server
    pub fn url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// Arm another round of failures on a running server
    pub fn fail_next(&self, failures: usize) {
        self.remaining_failures.store(failures, Ordering::SeqCst);
    }

    /// Stop the mock server
    pub fn stop(&mut self) {
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
    }
}

impl Drop for MockEmbeddingServer {
    fn drop(&mut self) {
        self.stop();
    }
}

/// Models endpoint (health check)
async fn handle_models() -> Json<ModelsResponse> {
    Json(ModelsResponse {
        data: vec![ModelInfo {
            id: "nomic-embed-text".to_string(),
            object: "model".to_string(),
        }],
    })
}

/// Embeddings endpoint: deterministic vectors, optional injected failures
async fn handle_embeddings(
    State(state): State<ServerState>,
    Json(request): Json<EmbeddingsRequest>,
) -> Result<Json<EmbeddingsResponse>, StatusCode> {
    let armed = state
        .remaining_failures
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok();
    if armed {
        return Err(StatusCode::INTERNAL_SERVER_ERROR);
    }

    let data = request
        .input
        .iter()
        .enumerate()
        .map(|(index, text)| EmbeddingItem {
            index,
            embedding: state.backend.embed_text(text),
            object: "embedding".to_string(),
        })
        .collect();

    Ok(Json(EmbeddingsResponse {
        data,
        model: request.model,
        object: "list".to_string(),
    }))
}

#[derive(Debug, Deserialize)]
struct EmbeddingsRequest {
    model: String,
    input: Vec<String>,
}

#[derive(Debug, Serialize)]
struct EmbeddingsResponse {
    data: Vec<EmbeddingItem>,
    model: String,
    object: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingItem {
    index: usize,
    embedding: Vec<f32>,
    object: String,
}

#[derive(Debug, Serialize)]
struct ModelsResponse {
    data: Vec<ModelInfo>,
}

#[derive(Debug, Serialize)]
struct ModelInfo {
    id: String,
    object: String,
}
