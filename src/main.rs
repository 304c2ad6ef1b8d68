//! Spark Pod Webhook - patches Spark driver and executor pods at admission

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use kube::{Client, CustomResourceExt};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use spark_pod_webhook::crd::SparkApplication;
use spark_pod_webhook::patch::{
    PatchConfig, DEFAULT_DRIVER_CONTAINER_NAME, DEFAULT_EXECUTOR_CONTAINER_NAME,
};
use spark_pod_webhook::webhook::{serve, ServerConfig, WebhookState};

/// Mutating admission webhook for Spark driver and executor pods
#[derive(Parser, Debug)]
#[command(name = "spark-pod-webhook", version, about, long_about = None)]
struct Cli {
    /// Print the SparkApplication CRD manifest and exit
    #[arg(long)]
    crd: bool,

    /// Address the HTTPS server listens on
    #[arg(long, env = "WEBHOOK_ADDR", default_value = "0.0.0.0:8443")]
    addr: SocketAddr,

    /// PEM serving certificate
    #[arg(
        long,
        env = "WEBHOOK_TLS_CERT_FILE",
        default_value = "/etc/webhook-certs/tls.crt"
    )]
    tls_cert_file: PathBuf,

    /// PEM private key for the serving certificate
    #[arg(
        long,
        env = "WEBHOOK_TLS_KEY_FILE",
        default_value = "/etc/webhook-certs/tls.key"
    )]
    tls_key_file: PathBuf,

    /// Name of the Spark container in driver pods
    #[arg(long, env = "SPARK_DRIVER_CONTAINER_NAME", default_value = DEFAULT_DRIVER_CONTAINER_NAME)]
    driver_container_name: String,

    /// Name of the Spark container in executor pods
    #[arg(long, env = "SPARK_EXECUTOR_CONTAINER_NAME", default_value = DEFAULT_EXECUTOR_CONTAINER_NAME)]
    executor_container_name: String,
}

impl Cli {
    fn patch_config(&self) -> PatchConfig {
        PatchConfig {
            driver_container_name: self.driver_container_name.clone(),
            executor_container_name: self.executor_container_name.clone(),
            ..Default::default()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    if cli.crd {
        let crd = serde_yaml::to_string(&SparkApplication::crd())
            .map_err(|e| anyhow::anyhow!("Failed to serialize CRD: {}", e))?;
        println!("{crd}");
        return Ok(());
    }

    let client = Client::try_default()
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create Kubernetes client: {}", e))?;

    tracing::info!(
        driver_container = %cli.driver_container_name,
        executor_container = %cli.executor_container_name,
        "Starting Spark pod webhook"
    );

    let state = Arc::new(WebhookState::new(client, cli.patch_config()));
    let server = ServerConfig {
        addr: cli.addr,
        cert_path: cli.tls_cert_file,
        key_path: cli.tls_key_file,
    };

    serve(server, state).await?;
    Ok(())
}
