use lazy_static::lazy_static;
use prometheus::{
    Counter, Encoder, IntCounterVec, TextEncoder, register_counter, register_int_counter_vec,
};

use crate::error::{Error, Result};

lazy_static! {
    pub static ref THROTTLE_FIRED: Counter =
        register_counter!("ua_throttle_fired_total", "Total throttled calls that fired").unwrap();
    pub static ref THROTTLE_SUPPRESSED: Counter = register_counter!(
        "ua_throttle_suppressed_total",
        "Total throttled calls dropped inside the wait window"
    )
    .unwrap();
    pub static ref BROWSER_DETECTIONS: IntCounterVec = register_int_counter_vec!(
        "ua_browser_detections_total",
        "User agents classified, by browser label",
        &["browser"]
    )
    .unwrap();
}

// Render every registered metric in the prometheus text format
pub fn gather() -> Result<String> {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();
    encoder
        .encode(&metric_families, &mut buffer)
        .map_err(|e| Error::Metrics(e.to_string()))?;
    String::from_utf8(buffer).map_err(|e| Error::Metrics(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gather_includes_crate_counters() {
        THROTTLE_FIRED.inc();
        THROTTLE_SUPPRESSED.inc();
        BROWSER_DETECTIONS.with_label_values(&["chrome"]).inc();

        let text = gather().unwrap();
        assert!(text.contains("ua_throttle_fired_total"));
        assert!(text.contains("ua_throttle_suppressed_total"));
        assert!(text.contains("ua_browser_detections_total{browser=\"chrome\"}"));
    }
}
