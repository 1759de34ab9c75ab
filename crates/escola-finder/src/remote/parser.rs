use super::mapping::{field_for_normalized, SchoolField, COLLECTION_KEYS};
use super::normalizer::normalize_key;
use crate::search::{Network, QualityMetric, SchoolRecord};
use serde_json::{Map, Value};
use std::collections::HashMap;
use tracing::warn;

/// Decodes a response body into canonical records. Only a body that is not
/// JSON at all is an error; JSON without a school list yields no records.
pub(crate) fn parse_payload(body: &[u8]) -> Result<Vec<SchoolRecord>, serde_json::Error> {
    let payload: Value = serde_json::from_slice(body)?;
    let mut records = Vec::new();

    for (position, item) in extract_collection(payload).into_iter().enumerate() {
        match item {
            Value::Object(fields) => records.push(record_from_fields(&fields)),
            other => warn!(position, kind = json_kind(&other), "skipping non-object school entry"),
        }
    }

    Ok(records)
}

/// Pulls the school list out of a bare array or a wrapping object. Known
/// wrapper names win; otherwise the first array-valued field in key order.
fn extract_collection(payload: Value) -> Vec<Value> {
    let fields = match payload {
        Value::Array(items) => return items,
        Value::Object(fields) => fields,
        _ => return Vec::new(),
    };

    let mut fallback = None;
    let mut preferred: Option<(usize, Vec<Value>)> = None;

    for (key, value) in fields {
        let Value::Array(items) = value else {
            continue;
        };

        let normalized = normalize_key(&key);
        match COLLECTION_KEYS.iter().position(|known| *known == normalized) {
            Some(rank) if preferred.as_ref().map_or(true, |(best, _)| rank < *best) => {
                preferred = Some((rank, items));
            }
            Some(_) => {}
            None if fallback.is_none() => fallback = Some(items),
            None => {}
        }
    }

    preferred
        .map(|(_, items)| items)
        .or(fallback)
        .unwrap_or_default()
}

fn record_from_fields(fields: &Map<String, Value>) -> SchoolRecord {
    let mut known: HashMap<SchoolField, &Value> = HashMap::new();
    for (key, value) in fields {
        if value.is_null() {
            continue;
        }
        if let Some(field) = field_for_normalized(&normalize_key(key)) {
            known.entry(field).or_insert(value);
        }
    }

    let text = |field: SchoolField| known.get(&field).and_then(|value| as_text(value));
    let flag = |field: SchoolField| known.get(&field).and_then(|value| as_bool(value)).unwrap_or(false);
    let number = |field: SchoolField| known.get(&field).and_then(|value| as_number(value));

    let name = text(SchoolField::Name).unwrap_or_else(|| SchoolRecord::UNNAMED.to_string());
    let metric = |level: &str, score_field: SchoolField, year_field: SchoolField| {
        pair_metric(&name, level, number(score_field), number(year_field))
    };

    let early_grades = metric(
        "early_grades",
        SchoolField::ScoreEarlyGrades,
        SchoolField::YearEarlyGrades,
    );
    let late_grades = metric(
        "late_grades",
        SchoolField::ScoreLateGrades,
        SchoolField::YearLateGrades,
    );
    let secondary = metric(
        "secondary",
        SchoolField::ScoreSecondary,
        SchoolField::YearSecondary,
    );

    SchoolRecord {
        id: number(SchoolField::Id)
            .filter(|id| id.fract() == 0.0)
            .map(|id| id as i64),
        state_code: text(SchoolField::StateCode)
            .map(|code| code.to_ascii_uppercase())
            .unwrap_or_else(|| SchoolRecord::UNKNOWN_STATE.to_string()),
        municipality: text(SchoolField::Municipality)
            .unwrap_or_else(|| SchoolRecord::UNKNOWN_MUNICIPALITY.to_string()),
        network: text(SchoolField::Network)
            .map(|raw| Network::parse(&raw))
            .unwrap_or_default(),
        offers_early_grades: flag(SchoolField::OffersEarlyGrades),
        offers_late_grades: flag(SchoolField::OffersLateGrades),
        offers_secondary: flag(SchoolField::OffersSecondary),
        early_grades,
        late_grades,
        secondary,
        distance_km: number(SchoolField::DistanceKm).filter(|km| *km >= 0.0),
        name,
    }
}

/// A metric survives only with both halves present and the score on scale.
fn pair_metric(
    school: &str,
    level: &str,
    score: Option<f64>,
    year: Option<f64>,
) -> Option<QualityMetric> {
    match (score, year) {
        (None, None) => None,
        (Some(score), Some(year)) => {
            let metric = as_year(year).and_then(|year| QualityMetric::new(score, year));
            if metric.is_none() {
                warn!(school, level, score, year, "discarding out-of-range quality metric");
            }
            metric
        }
        (score, year) => {
            warn!(school, level, ?score, ?year, "discarding unpaired quality metric");
            None
        }
    }
}

fn as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(raw) => {
            let trimmed = raw.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

fn as_bool(value: &Value) -> Option<bool> {
    match value {
        Value::Bool(flag) => Some(*flag),
        Value::Number(number) => number.as_f64().map(|n| n != 0.0),
        Value::String(raw) => match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "sim" | "s" | "yes" => Some(true),
            "false" | "0" | "nao" | "não" | "n" | "no" | "" => Some(false),
            _ => None,
        },
        _ => None,
    }
}

/// Accepts JSON numbers and numeric strings, including a decimal comma.
fn as_number(value: &Value) -> Option<f64> {
    let number = match value {
        Value::Number(number) => number.as_f64(),
        Value::String(raw) => raw.trim().replace(',', ".").parse::<f64>().ok(),
        _ => None,
    };
    number.filter(|number| number.is_finite())
}

fn as_year(value: f64) -> Option<u16> {
    if value.fract() == 0.0 && (1900.0..=2100.0).contains(&value) {
        Some(value as u16)
    } else {
        None
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(value: Value) -> Vec<SchoolRecord> {
        parse_payload(value.to_string().as_bytes()).expect("valid json")
    }

    #[test]
    fn prefers_known_wrapper_over_other_arrays() {
        let records = parse(json!({
            "avisos": [{"nomeEscola": "Aviso"}],
            "escolas": [{"nomeEscola": "Escola A"}],
        }));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Escola A");
    }

    #[test]
    fn falls_back_to_any_array_field() {
        let records = parse(json!({ "total": 1, "lista": [{"nome": "Escola B"}] }));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Escola B");
    }

    #[test]
    fn scalar_payloads_yield_no_records() {
        assert!(parse(json!({})).is_empty());
        assert!(parse(json!("escolas")).is_empty());
        assert!(parse(json!({ "escolas": "none" })).is_empty());
    }

    #[test]
    fn invalid_json_is_an_error() {
        assert!(parse_payload(b"<html>oops</html>").is_err());
        assert!(parse_payload(b"").is_err());
    }

    #[test]
    fn missing_fields_take_documented_defaults() {
        let records = parse(json!([{}]));
        let record = &records[0];
        assert_eq!(record.name, SchoolRecord::UNNAMED);
        assert_eq!(record.state_code, "ND");
        assert_eq!(record.municipality, "Não Informado");
        assert_eq!(record.network, Network::Unknown);
        assert!(!record.offers_early_grades && !record.offers_late_grades && !record.offers_secondary);
        assert!(record.early_grades.is_none());
        assert!(record.late_grades.is_none());
        assert!(record.secondary.is_none());
        assert!(record.id.is_none());
    }

    #[test]
    fn field_names_match_across_casing_conventions() {
        let records = parse(json!([
            {
                "Id": 7,
                "SiglaUF": "sp",
                "NomeMunicipio": "Santos",
                "NomeEscola": "EE Vila Nova",
                "Rede": "Estadual",
                "OfereceEnsinoMedio": true,
                "IdebEnsinoMedio": 4.9,
                "AnoReferenciaEnsinoMedio": 2023
            },
            {
                "id": 8,
                "sigla_uf": "SP",
                "nome_municipio": "Santos",
                "nome_escola": "EM Jardim",
                "rede": "Municipal",
                "oferece_anos_iniciais": "sim",
                "ideb_anos_iniciais": "6,3",
                "ano_referencia_anos_iniciais": "2021"
            }
        ]));

        assert_eq!(records[0].id, Some(7));
        assert_eq!(records[0].state_code, "SP");
        assert_eq!(records[0].network, Network::State);
        assert!(records[0].offers_secondary);
        assert_eq!(
            records[0].secondary,
            Some(QualityMetric {
                score: 4.9,
                reference_year: 2023
            })
        );

        assert_eq!(records[1].network, Network::Municipal);
        assert!(records[1].offers_early_grades);
        assert_eq!(
            records[1].early_grades,
            Some(QualityMetric {
                score: 6.3,
                reference_year: 2021
            })
        );
    }

    #[test]
    fn zero_score_is_present_not_absent() {
        let records = parse(json!([{
            "idebAnosFinais": 0,
            "anoReferenciaAnosFinais": 2019
        }]));
        assert_eq!(
            records[0].late_grades,
            Some(QualityMetric {
                score: 0.0,
                reference_year: 2019
            })
        );
    }

    #[test]
    fn unpaired_or_out_of_range_metrics_are_dropped() {
        let records = parse(json!([{
            "idebAnosIniciais": 5.5,
            "idebAnosFinais": 11.2,
            "anoReferenciaAnosFinais": 2021,
            "anoReferenciaEnsinoMedio": 2021,
            "idebEnsinoMedio": null
        }]));
        assert!(records[0].early_grades.is_none());
        assert!(records[0].late_grades.is_none());
        assert!(records[0].secondary.is_none());
    }

    #[test]
    fn non_object_entries_are_skipped() {
        let records = parse(json!([1, "x", {"nomeEscola": "Escola C"}, null]));
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].name, "Escola C");
    }

    #[test]
    fn distance_is_read_when_present() {
        let records = parse(json!([{ "distanciaKm": 2.5 }, { "distanceKm": -1 }]));
        assert_eq!(records[0].distance_km, Some(2.5));
        assert_eq!(records[1].distance_km, None);
    }
}
