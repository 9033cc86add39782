//! Observability client example
//!
//! Demonstrates OpenTelemetry integration: every call becomes a span carrying
//! the method and request id, and the client metrics are exported over OTLP.
//!
//! Run with: cargo run --example observability_client

use cosmos_rpc::client::NoAuth;
use cosmos_rpc::core::ObservabilityConfig;
use cosmos_rpc::{Api, ConnectionBuilder, ConnectionConfig, Params, RequestOptions, ValueType};
use serde::Deserialize;
use std::sync::Arc;

#[derive(Debug, Deserialize)]
struct LimitsEvent {
    #[serde(rename = "type")]
    kind: String,
    time_nsec: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Configure observability
    let otel_config = ObservabilityConfig::new("cosmos-rpc-observability")
        .with_endpoint("http://localhost:4317")
        .with_log_level("debug");

    let connection = ConnectionBuilder::new(ConnectionConfig::from_env()?)
        .with_auth(Arc::new(NoAuth))
        .with_observability(otel_config)
        .service_name("observability-client")
        .build()?;
    let api = Api::new(connection.clone());

    println!("Sending requests with distributed tracing...\n");

    for i in 1..=5 {
        tracing::info!(iteration = i, "Starting iteration");

        let packet = api
            .get_tlm_packet("INST", "HEALTH_STATUS", ValueType::WithUnits)
            .await?;
        println!("Iteration {}: {}", i, packet);

        let events: Vec<LimitsEvent> = connection
            .request("get_limits_events", Params::new())
            .await?;
        for event in events {
            println!("  limits event {} at {:?}", event.kind, event.time_nsec);
        }

        tokio::time::sleep(tokio::time::Duration::from_millis(500)).await;
    }

    let response = connection
        .get("/openc3-api/targets", RequestOptions::new())
        .await?;
    println!("\nREST status: {}", response.status());

    println!("View traces at http://localhost:16686 (Jaeger UI)");

    connection.shutdown();

    // Give time for telemetry to flush
    tokio::time::sleep(tokio::time::Duration::from_secs(2)).await;
    cosmos_rpc::core::shutdown_observability();

    Ok(())
}
