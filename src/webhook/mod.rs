//! Mutating Admission Webhook for Spark pods
//!
//! spark-submit creates driver and executor pods without knowledge of the
//! SparkApplication's pod customizations. This webhook intercepts those pods and
//! patches in volumes, config maps, scheduling constraints and owner references.

pub mod pod;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};
use axum_server::tls_rustls::RustlsConfig;
use kube::Client;
use tracing::info;

use crate::patch::PatchConfig;
use crate::{Error, Result};

/// Path the MutatingWebhookConfiguration points at
pub const MUTATE_PODS_PATH: &str = "/mutate/pods";

/// Shared state for webhook handlers
#[derive(Clone)]
pub struct WebhookState {
    /// Kubernetes client for looking up SparkApplication resources
    pub kube: Client,
    /// Container names and config mount defaults used for patching
    pub config: PatchConfig,
}

impl WebhookState {
    /// Create a new webhook state with the given Kubernetes client and patch config
    pub fn new(kube: Client, config: PatchConfig) -> Self {
        Self { kube, config }
    }
}

/// Create the webhook router
///
/// - POST /mutate/pods - Patch Spark driver and executor pods
/// - GET /healthz - Liveness probe
pub fn webhook_router(state: Arc<WebhookState>) -> Router {
    Router::new()
        .route(MUTATE_PODS_PATH, post(pod::mutate_handler))
        .route("/healthz", get(|| async { "ok" }))
        .with_state(state)
}

/// HTTPS listener settings for the webhook server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// Address to listen on
    pub addr: SocketAddr,
    /// PEM-encoded serving certificate chain
    pub cert_path: PathBuf,
    /// PEM-encoded private key for `cert_path`
    pub key_path: PathBuf,
}

/// Serve the webhook over TLS until the server stops
pub async fn serve(server: ServerConfig, state: Arc<WebhookState>) -> Result<()> {
    let tls_config = RustlsConfig::from_pem_file(&server.cert_path, &server.key_path)
        .await
        .map_err(|e| {
            Error::tls(format!(
                "failed to load {} / {}: {e}",
                server.cert_path.display(),
                server.key_path.display()
            ))
        })?;

    info!(addr = %server.addr, "Starting HTTPS webhook server");
    axum_server::bind_rustls(server.addr, tls_config)
        .serve(webhook_router(state).into_make_service())
        .await?;

    Ok(())
}
