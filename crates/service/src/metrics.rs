use once_cell::sync::Lazy;
use prometheus::{register_int_counter_vec, Encoder, IntCounterVec, TextEncoder};

use crate::errors::ServiceError;

// Prometheus metrics (default registry)
pub static CACHE_LOOKUPS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "site_cache_lookups_total",
        "Query cache lookups by table, kind (list|item) and outcome (hit|miss)",
        &["table", "kind", "outcome"]
    )
    .expect("register cache_lookups_total")
});

pub static MUTATIONS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "site_mutations_total",
        "Successful create/update/delete/reorder operations",
        &["table", "op"]
    )
    .expect("register mutations_total")
});

pub static CONTACT_EMAILS_TOTAL: Lazy<IntCounterVec> = Lazy::new(|| {
    register_int_counter_vec!(
        "site_contact_emails_total",
        "Contact notification emails by outcome (sent|failed|disabled)",
        &["outcome"]
    )
    .expect("register contact_emails_total")
});

pub fn record_lookup(table: &str, kind: &str, hit: bool) {
    CACHE_LOOKUPS_TOTAL
        .with_label_values(&[table, kind, if hit { "hit" } else { "miss" }])
        .inc();
}

pub fn record_mutation(table: &str, op: &str) {
    MUTATIONS_TOTAL.with_label_values(&[table, op]).inc();
}

/// Render the default registry in the Prometheus text format.
pub fn encode_metrics() -> Result<String, ServiceError> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| ServiceError::Db(format!("metrics encode error: {e}")))?;
    String::from_utf8(buffer).map_err(|e| ServiceError::Db(format!("metrics encode error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counters_show_up_in_text_output() {
        record_lookup("services", "list", false);
        record_mutation("services", "create");
        let text = encode_metrics().unwrap();
        assert!(text.contains("site_cache_lookups_total"));
        assert!(text.contains("site_mutations_total"));
    }
}
