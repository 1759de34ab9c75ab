use super::normalizer::normalize_key;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Canonical school attribute a payload field maps onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum SchoolField {
    Id,
    StateCode,
    Municipality,
    Name,
    Network,
    OffersEarlyGrades,
    OffersLateGrades,
    OffersSecondary,
    ScoreEarlyGrades,
    YearEarlyGrades,
    ScoreLateGrades,
    YearLateGrades,
    ScoreSecondary,
    YearSecondary,
    DistanceKm,
}

static FIELD_ALIASES: OnceLock<HashMap<String, SchoolField>> = OnceLock::new();

/// Names of wrapper fields that hold the school list, in order of preference.
pub(crate) const COLLECTION_KEYS: &[&str] = &["escolas", "schools", "data", "items", "results"];

pub(crate) fn field_for_normalized(normalized_key: &str) -> Option<SchoolField> {
    field_aliases().get(normalized_key).copied()
}

fn field_aliases() -> &'static HashMap<String, SchoolField> {
    FIELD_ALIASES.get_or_init(|| {
        const KEY_TO_FIELD: &[(&str, SchoolField)] = &[
            // Identity
            ("id", SchoolField::Id),
            ("idEscola", SchoolField::Id),
            ("codigoEscola", SchoolField::Id),
            ("CO_ENTIDADE", SchoolField::Id),
            ("schoolId", SchoolField::Id),
            // Location
            ("siglaUF", SchoolField::StateCode),
            ("SG_UF", SchoolField::StateCode),
            ("UF", SchoolField::StateCode),
            ("stateCode", SchoolField::StateCode),
            ("state", SchoolField::StateCode),
            ("nomeMunicipio", SchoolField::Municipality),
            ("NO_MUNICIPIO", SchoolField::Municipality),
            ("municipio", SchoolField::Municipality),
            ("município", SchoolField::Municipality),
            ("cidade", SchoolField::Municipality),
            ("municipality", SchoolField::Municipality),
            ("city", SchoolField::Municipality),
            // Naming and network
            ("nomeEscola", SchoolField::Name),
            ("NO_ESCOLA", SchoolField::Name),
            ("nome", SchoolField::Name),
            ("name", SchoolField::Name),
            ("schoolName", SchoolField::Name),
            ("rede", SchoolField::Network),
            ("REDE", SchoolField::Network),
            ("dependenciaAdministrativa", SchoolField::Network),
            ("network", SchoolField::Network),
            // Offered levels
            ("ofereceAnosIniciais", SchoolField::OffersEarlyGrades),
            ("offersEarlyGrades", SchoolField::OffersEarlyGrades),
            ("ofereceAnosFinais", SchoolField::OffersLateGrades),
            ("offersLateGrades", SchoolField::OffersLateGrades),
            ("ofereceEnsinoMedio", SchoolField::OffersSecondary),
            ("ofereceEnsinoMédio", SchoolField::OffersSecondary),
            ("offersSecondary", SchoolField::OffersSecondary),
            // Quality metrics
            ("idebAnosIniciais", SchoolField::ScoreEarlyGrades),
            ("scoreEarlyGrades", SchoolField::ScoreEarlyGrades),
            ("anoReferenciaAnosIniciais", SchoolField::YearEarlyGrades),
            ("yearEarlyGrades", SchoolField::YearEarlyGrades),
            ("idebAnosFinais", SchoolField::ScoreLateGrades),
            ("scoreLateGrades", SchoolField::ScoreLateGrades),
            ("anoReferenciaAnosFinais", SchoolField::YearLateGrades),
            ("yearLateGrades", SchoolField::YearLateGrades),
            ("idebEnsinoMedio", SchoolField::ScoreSecondary),
            ("idebEnsinoMédio", SchoolField::ScoreSecondary),
            ("scoreSecondary", SchoolField::ScoreSecondary),
            ("anoReferenciaEnsinoMedio", SchoolField::YearSecondary),
            ("anoReferenciaEnsinoMédio", SchoolField::YearSecondary),
            ("yearSecondary", SchoolField::YearSecondary),
            // Ranking
            ("distanciaKm", SchoolField::DistanceKm),
            ("distancia", SchoolField::DistanceKm),
            ("distanceKm", SchoolField::DistanceKm),
            ("distance", SchoolField::DistanceKm),
        ];

        KEY_TO_FIELD
            .iter()
            .map(|(key, field)| (normalize_key(key), *field))
            .collect()
    })
}

#[cfg(test)]
pub(crate) fn lookup_for_tests(key: &str) -> Option<SchoolField> {
    field_for_normalized(&normalize_key(key))
}
