use chrono::Utc;
use serde_json::json;
use std::collections::HashMap;
use tracing::{debug, error, info, warn};

const SERVICE_NAME: &str = "job-application-api";
const SLOW_QUERY_MS: u128 = 1000;

#[derive(Debug)]
pub struct StructuredLogger;

impl StructuredLogger {
    pub fn log_request(&self, method: &str, path: &str, status: u16, duration_ms: u128) {
        let log_entry = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "event_type": "http_request",
            "method": method,
            "path": path,
            "status_code": status,
            "duration_ms": duration_ms,
            "service": SERVICE_NAME
        });

        if status >= 500 {
            error!("{}", log_entry);
        } else {
            info!("{}", log_entry);
        }
    }

    pub fn log_database_query(&self, query: &str, duration_ms: u128, result_count: Option<usize>) {
        let log_entry = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "event_type": "database_query",
            "query_hash": format!("{:x}", md5::compute(query)),
            "query_preview": preview(query),
            "duration_ms": duration_ms,
            "result_count": result_count,
            "service": SERVICE_NAME
        });

        if duration_ms > SLOW_QUERY_MS {
            warn!("Slow query detected: {}", log_entry);
        } else {
            debug!("{}", log_entry);
        }
    }

    pub fn log_error(&self, error: &str, context: HashMap<String, serde_json::Value>) {
        let mut log_entry = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "event_type": "error",
            "error_message": error,
            "service": SERVICE_NAME
        });

        for (key, value) in context {
            log_entry[key] = value;
        }

        error!("{}", log_entry);
    }

    pub fn log_business_event(
        &self,
        event_name: &str,
        application_id: Option<i64>,
        metadata: HashMap<String, serde_json::Value>,
    ) {
        let mut log_entry = json!({
            "timestamp": Utc::now().to_rfc3339(),
            "event_type": "business_event",
            "event_name": event_name,
            "application_id": application_id,
            "service": SERVICE_NAME
        });

        for (key, value) in metadata {
            log_entry[key] = value;
        }

        info!("{}", log_entry);
    }
}

fn preview(query: &str) -> String {
    let compact = query.split_whitespace().collect::<Vec<_>>().join(" ");
    if compact.chars().count() > 100 {
        format!("{}...", compact.chars().take(100).collect::<String>())
    } else {
        compact
    }
}

pub static LOGGER: StructuredLogger = StructuredLogger;
