//! Simple client example
//!
//! Reads the connection settings from `OPENC3_*` environment variables, lists
//! the targets and polls one telemetry point a few times.
//!
//! Run with: OPENC3_API_PASSWORD=password cargo run --example simple_client

use cosmos_rpc::{Connection, ConnectionConfig, Error, Params};
use serde_json::Value;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "cosmos_rpc_client=debug".into()),
        )
        .init();

    let config = ConnectionConfig::from_env()?;
    println!("Connecting to {}", config.base_url());

    let result = Connection::scoped(config, |connection| async move {
        let targets: Vec<String> = connection.request("get_target_list", Params::new()).await?;
        println!("Targets: {}", targets.join(", "));

        for i in 1..=3 {
            let value: Value = connection
                .invoke("tlm", Params::new().arg("INST HEALTH_STATUS TEMP1"))
                .await?;
            println!("Poll {}: TEMP1 = {}", i, value);
            tokio::time::sleep(tokio::time::Duration::from_secs(1)).await;
        }

        // Server errors come back typed, with the remote class when present
        match connection.invoke("no_such_method", Params::new()).await {
            Err(Error::RemoteProtocol(e)) => {
                println!("Server error {}: {} ({:?})", e.code, e.message, e.remote_class())
            }
            other => println!("Unexpected: {:?}", other),
        }

        Ok(())
    })
    .await;

    if let Err(e) = result {
        tracing::error!(error = %e, retryable = e.is_retryable(), "example failed");
        return Err(e.into());
    }

    println!("Done");
    Ok(())
}
