use super::domain::SchoolRecord;
use serde::Serialize;

/// Representative quality for ranking and filtering: the highest education
/// level with a metric wins. A school without any metric resolves to 0.
pub fn resolve_quality(record: &SchoolRecord) -> f64 {
    record
        .secondary
        .or(record.late_grades)
        .or(record.early_grades)
        .map(|metric| metric.score)
        .unwrap_or(0.0)
}

/// Display tier for a quality score, used to color badges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityBand {
    Excellent,
    Good,
    Fair,
    Low,
}

impl QualityBand {
    pub fn for_score(score: f64) -> Self {
        if score >= 8.0 {
            Self::Excellent
        } else if score >= 7.0 {
            Self::Good
        } else if score >= 6.0 {
            Self::Fair
        } else {
            Self::Low
        }
    }

    pub fn for_record(record: &SchoolRecord) -> Self {
        Self::for_score(resolve_quality(record))
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Excellent => "excellent",
            Self::Good => "good",
            Self::Fair => "fair",
            Self::Low => "low",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::search::domain::QualityMetric;

    fn metric(score: f64) -> Option<QualityMetric> {
        QualityMetric::new(score, 2023)
    }

    #[test]
    fn early_grades_only_resolves_exactly() {
        let mut record = SchoolRecord::named("Escola Municipal X");
        record.early_grades = metric(5.4);
        assert_eq!(resolve_quality(&record), 5.4);
    }

    #[test]
    fn secondary_outranks_lower_levels() {
        let mut record = SchoolRecord::named("Colégio Y");
        record.early_grades = metric(9.1);
        record.late_grades = metric(6.2);
        record.secondary = metric(4.8);
        assert_eq!(resolve_quality(&record), 4.8);

        record.secondary = None;
        assert_eq!(resolve_quality(&record), 6.2);
    }

    #[test]
    fn missing_metrics_resolve_to_zero() {
        let record = SchoolRecord::named("Escola sem dados");
        assert_eq!(resolve_quality(&record), 0.0);
    }

    #[test]
    fn explicit_zero_is_kept() {
        let mut record = SchoolRecord::named("Escola Z");
        record.late_grades = metric(0.0);
        record.early_grades = metric(7.0);
        assert_eq!(resolve_quality(&record), 0.0);
    }

    #[test]
    fn bands_follow_badge_thresholds() {
        assert_eq!(QualityBand::for_score(8.0), QualityBand::Excellent);
        assert_eq!(QualityBand::for_score(7.99), QualityBand::Good);
        assert_eq!(QualityBand::for_score(6.0), QualityBand::Fair);
        assert_eq!(QualityBand::for_score(5.9), QualityBand::Low);
    }
}
