use mongodb::{Client, bson::doc};
use serde::Serialize;
use std::time::Instant;

use crate::common::{DatabaseError, DatabaseResult};

/// Health check status for MongoDB
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub healthy: bool,
    /// Error details when the ping failed
    pub message: Option<String>,
    pub response_time_ms: u64,
}

impl HealthStatus {
    /// Turn an unhealthy status into an error
    pub fn into_result(self) -> DatabaseResult<Self> {
        if self.healthy {
            Ok(self)
        } else {
            Err(DatabaseError::HealthCheckFailed(
                self.message.unwrap_or_else(|| "unknown error".to_string()),
            ))
        }
    }
}

/// Ping the server and report whether it answered
pub async fn check_health(client: &Client) -> bool {
    check_health_detailed(client).await.healthy
}

/// Ping the server and report timing and any error message
///
/// # Example
/// ```ignore
/// let status = check_health_detailed(&client).await;
/// println!("MongoDB healthy: {}, latency: {}ms", status.healthy, status.response_time_ms);
/// ```
pub async fn check_health_detailed(client: &Client) -> HealthStatus {
    let start = Instant::now();
    let result = client
        .database("admin")
        .run_command(doc! { "ping": 1 })
        .await;
    let response_time_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(_) => HealthStatus {
            healthy: true,
            message: None,
            response_time_ms,
        },
        Err(e) => HealthStatus {
            healthy: false,
            message: Some(e.to_string()),
            response_time_ms,
        },
    }
}
