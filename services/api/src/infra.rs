use escola_finder::search::{EducationLevel, Network};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) fn parse_network(raw: &str) -> Result<Network, String> {
    match Network::parse(raw) {
        Network::Unknown => Err(format!(
            "unknown network '{raw}' (expected municipal, estadual or privada)"
        )),
        network => Ok(network),
    }
}

pub(crate) fn parse_level(raw: &str) -> Result<EducationLevel, String> {
    EducationLevel::parse(raw).ok_or_else(|| {
        format!("unknown education level '{raw}' (expected early, late or secondary)")
    })
}

pub(crate) fn parse_quality(raw: &str) -> Result<f64, String> {
    let value: f64 = raw
        .trim()
        .replace(',', ".")
        .parse()
        .map_err(|err| format!("failed to parse '{raw}' as a score ({err})"))?;
    if (0.0..=10.0).contains(&value) {
        Ok(value)
    } else {
        Err(format!("minimum quality must be between 0 and 10, got {value}"))
    }
}
