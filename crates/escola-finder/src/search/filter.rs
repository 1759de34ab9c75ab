use super::domain::{FilterCriteria, SchoolRecord};
use super::quality::resolve_quality;

/// Whether server-side criteria are assumed satisfied by the fetched set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ServerScope {
    /// The records came from a request scoped by the same criteria.
    #[default]
    Trusted,
    /// Enforce state, municipality, network and level locally as well.
    Recheck,
}

/// Decides whether a record belongs in the visible result set.
#[derive(Debug, Clone, Copy, Default)]
pub struct PredicateFilter {
    scope: ServerScope,
}

impl PredicateFilter {
    pub fn new(scope: ServerScope) -> Self {
        Self { scope }
    }

    pub fn scope(&self) -> ServerScope {
        self.scope
    }

    pub fn matches(&self, record: &SchoolRecord, criteria: &FilterCriteria) -> bool {
        if !matches_text(record, &criteria.free_text_query) {
            return false;
        }

        if resolve_quality(record) < criteria.minimum_quality {
            return false;
        }

        match self.scope {
            ServerScope::Trusted => true,
            ServerScope::Recheck => matches_server_scope(record, criteria),
        }
    }
}

/// Case-insensitive substring match over name and municipality, with the
/// query taken as typed. Accents are compared as-is.
fn matches_text(record: &SchoolRecord, query: &str) -> bool {
    if query.is_empty() {
        return true;
    }

    let needle = query.to_lowercase();
    record.name.to_lowercase().contains(&needle)
        || record.municipality.to_lowercase().contains(&needle)
}

fn matches_server_scope(record: &SchoolRecord, criteria: &FilterCriteria) -> bool {
    if let Some(state_code) = &criteria.state_code {
        if !record.state_code.eq_ignore_ascii_case(state_code) {
            return false;
        }
    }

    if let Some(municipality) = &criteria.municipality {
        if record.municipality.to_lowercase() != municipality.trim().to_lowercase() {
            return false;
        }
    }

    if let Some(network) = criteria.network {
        if record.network != network {
            return false;
        }
    }

    match criteria.education_level {
        Some(level) => record.offers(level),
        None => true,
    }
}
