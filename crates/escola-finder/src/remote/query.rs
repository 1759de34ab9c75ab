use crate::search::FilterCriteria;
use reqwest::Url;

/// Query parameters sent to the school API for one search.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SearchQuery {
    pairs: Vec<(&'static str, String)>,
    minimum_quality: f64,
}

impl SearchQuery {
    /// Unset or zero criteria are left out of the request entirely.
    pub fn from_criteria(criteria: &FilterCriteria) -> Self {
        let mut pairs = Vec::new();

        if let Some(state_code) = &criteria.state_code {
            pairs.push(("UF", state_code.clone()));
        }
        if let Some(municipality) = &criteria.municipality {
            pairs.push(("Municipio", municipality.clone()));
        }
        if let Some(network) = criteria.network.and_then(|network| network.query_value()) {
            pairs.push(("Rede", network.to_string()));
        }
        if let Some(level) = criteria.education_level {
            pairs.push(("TipoEnsino", level.query_value().to_string()));
        }
        let minimum_quality = server_floor(criteria.minimum_quality);
        if minimum_quality > 0.0 {
            pairs.push(("IdebMinimo", format!("{:.1}", minimum_quality)));
        }

        Self {
            pairs,
            minimum_quality,
        }
    }

    pub fn pairs(&self) -> &[(&'static str, String)] {
        &self.pairs
    }

    /// Floor the server was asked to apply.
    pub fn minimum_quality(&self) -> f64 {
        self.minimum_quality
    }

    /// Endpoint URL with this query's parameters form-encoded onto it.
    pub fn apply_to(&self, endpoint: &Url) -> Url {
        let mut url = endpoint.clone();
        if !self.pairs.is_empty() {
            url.query_pairs_mut()
                .extend_pairs(self.pairs.iter().map(|(key, value)| (*key, value.as_str())));
        }
        url
    }
}

/// The upstream takes one decimal. Rounding down keeps the server from
/// dropping schools the local floor still admits.
fn server_floor(minimum_quality: f64) -> f64 {
    if minimum_quality <= 0.0 {
        return 0.0;
    }
    ((minimum_quality * 10.0) + 1e-9).floor() / 10.0
}
