use escola_finder::search::{
    resolve_quality, DisplayState, QualityBand, SchoolRecord, SearchResults, SearchView,
};
use serde::Serialize;

/// One school as shown on a result card.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SchoolCard {
    #[serde(flatten)]
    pub(crate) record: SchoolRecord,
    pub(crate) quality: f64,
    pub(crate) quality_band: QualityBand,
    pub(crate) levels: String,
}

impl SchoolCard {
    pub(crate) fn from_record(record: &SchoolRecord) -> Self {
        Self {
            quality: resolve_quality(record),
            quality_band: QualityBand::for_record(record),
            levels: record.offered_levels_label(),
            record: record.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub(crate) struct SearchResponse {
    pub(crate) count: usize,
    pub(crate) schools: Vec<SchoolCard>,
}

impl From<&SearchResults> for SearchResponse {
    fn from(results: &SearchResults) -> Self {
        Self {
            count: results.count,
            schools: results.records.iter().map(SchoolCard::from_record).collect(),
        }
    }
}

/// `search --json` output: the listing plus the display state and banner, so
/// a failed or signed-out run never reads as an empty result.
#[derive(Debug, Clone, Serialize)]
pub(crate) struct SearchOutput {
    pub(crate) state: DisplayState,
    pub(crate) error: Option<String>,
    #[serde(flatten)]
    pub(crate) response: SearchResponse,
}

impl From<&SearchView> for SearchOutput {
    fn from(view: &SearchView) -> Self {
        Self {
            state: view.state,
            error: view.error.clone(),
            response: SearchResponse::from(&view.results),
        }
    }
}
