use serde::{Deserialize, Serialize};
use std::fmt;

/// Administrative category of a school.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Network {
    Municipal,
    State,
    Private,
    #[default]
    Unknown,
}

impl Network {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Municipal => "Municipal",
            Self::State => "Estadual",
            Self::Private => "Privada",
            Self::Unknown => "Não Informado",
        }
    }

    /// Value understood by the upstream `Rede` query parameter.
    pub const fn query_value(self) -> Option<&'static str> {
        match self {
            Self::Municipal => Some("Municipal"),
            Self::State => Some("Estadual"),
            Self::Private => Some("Privada"),
            Self::Unknown => None,
        }
    }

    /// Accepts the upstream vocabulary as well as English names, ignoring case.
    pub fn parse(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "municipal" => Self::Municipal,
            "estadual" | "state" => Self::State,
            "privada" | "private" => Self::Private,
            _ => Self::Unknown,
        }
    }
}

impl fmt::Display for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EducationLevel {
    /// Roughly grades 1 to 5.
    EarlyGrades,
    /// Roughly grades 6 to 9.
    LateGrades,
    Secondary,
}

impl EducationLevel {
    pub const fn ordered() -> [Self; 3] {
        [Self::EarlyGrades, Self::LateGrades, Self::Secondary]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::EarlyGrades => "Fundamental I",
            Self::LateGrades => "Fundamental II",
            Self::Secondary => "Médio",
        }
    }

    pub const fn query_value(self) -> &'static str {
        match self {
            Self::EarlyGrades => "Anos Iniciais",
            Self::LateGrades => "Anos Finais",
            Self::Secondary => "Ensino Médio",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_lowercase().as_str() {
            "early" | "early_grades" | "anos iniciais" | "fundamental i" => Some(Self::EarlyGrades),
            "late" | "late_grades" | "anos finais" | "fundamental ii" => Some(Self::LateGrades),
            "secondary" | "ensino médio" | "ensino medio" | "médio" | "medio" => {
                Some(Self::Secondary)
            }
            _ => None,
        }
    }
}

/// A quality score together with the year it refers to. Both halves are
/// required, so a metric is either fully present or absent.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityMetric {
    pub score: f64,
    pub reference_year: u16,
}

impl QualityMetric {
    pub const MIN_SCORE: f64 = 0.0;
    pub const MAX_SCORE: f64 = 10.0;

    /// Returns `None` when the score falls outside the 0..=10 scale.
    pub fn new(score: f64, reference_year: u16) -> Option<Self> {
        if score.is_finite() && (Self::MIN_SCORE..=Self::MAX_SCORE).contains(&score) {
            Some(Self {
                score,
                reference_year,
            })
        } else {
            None
        }
    }
}

/// One school as known to the client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchoolRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    pub state_code: String,
    pub municipality: String,
    pub name: String,
    #[serde(default)]
    pub network: Network,
    #[serde(default)]
    pub offers_early_grades: bool,
    #[serde(default)]
    pub offers_late_grades: bool,
    #[serde(default)]
    pub offers_secondary: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub early_grades: Option<QualityMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub late_grades: Option<QualityMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secondary: Option<QualityMetric>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl SchoolRecord {
    pub const UNKNOWN_STATE: &'static str = "ND";
    pub const UNKNOWN_MUNICIPALITY: &'static str = "Não Informado";
    pub const UNNAMED: &'static str = "Escola sem nome";

    /// A record carrying only a name, with every other field at its default.
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            id: None,
            state_code: Self::UNKNOWN_STATE.to_string(),
            municipality: Self::UNKNOWN_MUNICIPALITY.to_string(),
            name: name.into(),
            network: Network::Unknown,
            offers_early_grades: false,
            offers_late_grades: false,
            offers_secondary: false,
            early_grades: None,
            late_grades: None,
            secondary: None,
            distance_km: None,
        }
    }

    pub fn offers(&self, level: EducationLevel) -> bool {
        match level {
            EducationLevel::EarlyGrades => self.offers_early_grades,
            EducationLevel::LateGrades => self.offers_late_grades,
            EducationLevel::Secondary => self.offers_secondary,
        }
    }

    pub fn metric(&self, level: EducationLevel) -> Option<QualityMetric> {
        match level {
            EducationLevel::EarlyGrades => self.early_grades,
            EducationLevel::LateGrades => self.late_grades,
            EducationLevel::Secondary => self.secondary,
        }
    }

    pub fn offered_levels(&self) -> Vec<EducationLevel> {
        EducationLevel::ordered()
            .into_iter()
            .filter(|level| self.offers(*level))
            .collect()
    }

    /// Human summary of the offered levels, e.g. `Fundamental I, Médio`.
    pub fn offered_levels_label(&self) -> String {
        let labels: Vec<&str> = self
            .offered_levels()
            .into_iter()
            .map(EducationLevel::label)
            .collect();
        if labels.is_empty() {
            "Não informado".to_string()
        } else {
            labels.join(", ")
        }
    }
}

/// User-controlled search parameters. Changes produce a new value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCriteria {
    pub state_code: Option<String>,
    pub municipality: Option<String>,
    pub network: Option<Network>,
    pub education_level: Option<EducationLevel>,
    pub free_text_query: String,
    pub minimum_quality: f64,
}

impl FilterCriteria {
    pub fn with_state_code(self, state_code: Option<&str>) -> Self {
        Self {
            state_code: non_blank(state_code).map(|code| code.to_ascii_uppercase()),
            ..self
        }
    }

    pub fn with_municipality(self, municipality: Option<&str>) -> Self {
        Self {
            municipality: non_blank(municipality).map(str::to_string),
            ..self
        }
    }

    pub fn with_network(self, network: Option<Network>) -> Self {
        Self {
            network: network.filter(|network| *network != Network::Unknown),
            ..self
        }
    }

    pub fn with_education_level(self, education_level: Option<EducationLevel>) -> Self {
        Self {
            education_level,
            ..self
        }
    }

    pub fn with_free_text_query(self, query: impl Into<String>) -> Self {
        Self {
            free_text_query: query.into(),
            ..self
        }
    }

    /// Non-finite input resets the floor; anything else is clamped to 0..=10.
    pub fn with_minimum_quality(self, minimum_quality: f64) -> Self {
        let minimum_quality = if minimum_quality.is_finite() {
            minimum_quality.clamp(QualityMetric::MIN_SCORE, QualityMetric::MAX_SCORE)
        } else {
            0.0
        };
        Self {
            minimum_quality,
            ..self
        }
    }

    /// Re-applies the builder rules to a value that arrived over the wire.
    pub fn normalized(self) -> Self {
        let state_code = self.state_code.clone();
        let municipality = self.municipality.clone();
        let network = self.network;
        let minimum_quality = self.minimum_quality;
        self.with_state_code(state_code.as_deref())
            .with_municipality(municipality.as_deref())
            .with_network(network)
            .with_minimum_quality(minimum_quality)
    }

    pub fn has_quality_floor(&self) -> bool {
        self.minimum_quality > 0.0
    }

    /// True when the two values would send a different server-side scope.
    pub fn server_scope_differs(&self, other: &Self) -> bool {
        self.state_code != other.state_code
            || self.municipality != other.municipality
            || self.network != other.network
            || self.education_level != other.education_level
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|value| !value.is_empty())
}
