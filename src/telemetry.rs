//! Fire-and-forget telemetry
//!
//! Events are observational only: sinks never return anything the caller
//! could branch on.

use serde_json::{json, Value};

use crate::backend::types::SearchQuerySource;

/// Write-only consumer of telemetry events
pub trait TelemetrySink: Send + Sync {
    fn log_event(&self, name: &str, payload: Option<Value>);
}

/// Default sink, emits every event through `tracing` on the `telemetry` target
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingTelemetry;

impl TelemetrySink for TracingTelemetry {
    fn log_event(&self, name: &str, payload: Option<Value>) {
        match payload {
            Some(payload) => tracing::info!(target: "telemetry", event = name, %payload),
            None => tracing::info!(target: "telemetry", event = name),
        }
    }
}

pub fn log_button_click(sink: &dyn TelemetrySink, button: &str) {
    sink.log_event(&format!("{button}_clicked"), None);
}

pub fn log_text_search_query(sink: &dyn TelemetrySink, query: &str, source: SearchQuerySource) {
    sink.log_event(
        "search_query",
        Some(json!({ "query": query, "source": source.as_str() })),
    );
}
