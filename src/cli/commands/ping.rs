use std::time::Duration;

use serde_json::json;

use crate::cli::utils::{output_error, output_success};
use crate::cli::OutputFormat;

pub async fn handle(server: &str, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = reqwest::Client::new();
    let url = format!("{}/health", server.trim_end_matches('/'));

    match client.get(&url).timeout(Duration::from_secs(5)).send().await {
        Ok(response) if response.status().is_success() => {
            output_success(&output_format, &format!("{} is up", server), Some(json!({ "status": "up" })))
        }
        Ok(response) => {
            output_error(&output_format, &format!("{} answered {}", server, response.status()), Some("DEGRADED"))?;
            anyhow::bail!("server is degraded")
        }
        Err(e) => {
            output_error(&output_format, &format!("{} is unreachable: {}", server, e), Some("DOWN"))?;
            anyhow::bail!("server is down")
        }
    }
}
