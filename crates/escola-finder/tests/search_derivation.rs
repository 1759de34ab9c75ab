use escola_finder::remote::decode_schools;
use escola_finder::search::{
    assemble, resolve_quality, FilterCriteria, PredicateFilter, QualityMetric, ResultAssembler,
    SchoolRecord, ServerScope,
};

fn metric(score: f64) -> Option<QualityMetric> {
    QualityMetric::new(score, 2023)
}

fn school(name: &str) -> SchoolRecord {
    SchoolRecord::named(name)
}

#[test]
fn resolver_prefers_highest_level_with_a_metric() {
    let early_only = SchoolRecord {
        early_grades: metric(6.7),
        ..school("Escola Municipal Primeiros Passos")
    };
    assert_eq!(resolve_quality(&early_only), 6.7);

    let early_and_secondary = SchoolRecord {
        early_grades: metric(9.5),
        secondary: metric(4.2),
        ..school("Colégio Integral")
    };
    assert_eq!(resolve_quality(&early_and_secondary), 4.2);
}

#[test]
fn resolver_defaults_missing_metrics_to_zero() {
    assert_eq!(resolve_quality(&school("Escola sem IDEB")), 0.0);
}

#[test]
fn quality_floor_boundary_is_inclusive() {
    let filter = PredicateFilter::default();
    let criteria = FilterCriteria::default().with_minimum_quality(6.0);

    let below = SchoolRecord {
        late_grades: metric(5.9),
        ..school("Abaixo")
    };
    let at = SchoolRecord {
        late_grades: metric(6.0),
        ..school("No limite")
    };

    assert!(!filter.matches(&below, &criteria));
    assert!(filter.matches(&at, &criteria));
}

#[test]
fn schools_without_metrics_drop_out_at_any_positive_floor() {
    let records = vec![school("Sem dados")];
    assert_eq!(assemble(&records, &FilterCriteria::default()).count, 1);

    let floor = FilterCriteria::default().with_minimum_quality(0.1);
    assert!(assemble(&records, &floor).is_empty());
}

#[test]
fn text_search_is_case_insensitive_without_accent_folding() {
    let records = vec![
        SchoolRecord {
            municipality: "São Paulo".to_string(),
            ..school("Escola Municipal X")
        },
        SchoolRecord {
            municipality: "Osasco".to_string(),
            ..school("Colégio Y")
        },
    ];

    let by_name = FilterCriteria::default().with_free_text_query("ESCOLA");
    assert_eq!(assemble(&records, &by_name).names(), vec!["Escola Municipal X"]);

    let unaccented = FilterCriteria::default().with_free_text_query("sao paulo");
    assert!(assemble(&records, &unaccented).is_empty());
}

#[test]
fn distance_ranking_is_stable() {
    let records = vec![
        SchoolRecord {
            distance_km: Some(2.0),
            ..school("A")
        },
        SchoolRecord {
            distance_km: Some(1.0),
            ..school("B")
        },
        SchoolRecord {
            distance_km: Some(1.0),
            ..school("C")
        },
    ];

    let results = assemble(&records, &FilterCriteria::default());
    assert_eq!(results.names(), vec!["B", "C", "A"]);
}

#[test]
fn wrapped_and_bare_payloads_are_equivalent() {
    let schools = r#"[
        {"id": 1, "siglaUF": "RS", "nomeMunicipio": "Pelotas", "nomeEscola": "EEEF Dom Pedro",
         "rede": "Estadual", "ofereceAnosIniciais": true,
         "idebAnosIniciais": 5.8, "anoReferenciaAnosIniciais": 2021},
        {"id": 2, "siglaUF": "RS", "nomeMunicipio": "Pelotas", "nomeEscola": "Colégio São José",
         "rede": "Privada", "ofereceEnsinoMedio": true}
    ]"#;

    let bare = decode_schools(schools.as_bytes()).expect("bare array decodes");
    let wrapped = decode_schools(format!(r#"{{"escolas": {schools}}}"#).as_bytes())
        .expect("wrapped payload decodes");
    assert_eq!(bare, wrapped);
    assert_eq!(bare.len(), 2);

    let empty = decode_schools(b"{}").expect("object without array is not an error");
    assert!(empty.is_empty());
}

#[test]
fn end_to_end_floor_keeps_only_qualifying_school() {
    let records = vec![
        SchoolRecord {
            offers_secondary: true,
            secondary: metric(7.5),
            ..school("Escola A")
        },
        SchoolRecord {
            offers_early_grades: true,
            early_grades: metric(9.0),
            ..school("Escola B")
        },
    ];

    let results = assemble(&records, &FilterCriteria::default().with_minimum_quality(8.0));
    assert_eq!(results.names(), vec!["Escola B"]);
    assert_eq!(results.count, 1);
}

#[test]
fn recheck_scope_applies_server_criteria_to_offline_sets() {
    let payload = r#"{"data": [
        {"nomeEscola": "EM Centro", "siglaUF": "SC", "rede": "Municipal", "ofereceAnosIniciais": true},
        {"nomeEscola": "EE Norte", "siglaUF": "SC", "rede": "Estadual", "ofereceAnosIniciais": true},
        {"nomeEscola": "EM Sul", "siglaUF": "PR", "rede": "Municipal", "ofereceAnosFinais": true}
    ]}"#;
    let records = decode_schools(payload.as_bytes()).expect("payload decodes");

    let criteria = FilterCriteria::default()
        .with_network(Some(escola_finder::search::Network::Municipal))
        .with_state_code(Some("sc"));

    let trusted = assemble(&records, &criteria);
    assert_eq!(trusted.count, 3);

    let rechecked =
        ResultAssembler::new(PredicateFilter::new(ServerScope::Recheck)).assemble(&records, &criteria);
    assert_eq!(rechecked.names(), vec!["EM Centro"]);
}

#[test]
fn score_without_reference_year_is_dropped_before_the_floor() {
    let payload = r#"{"escolas":[{"nomeEscola":"Escola A","ofereceAnosIniciais":true,"idebAnosIniciais":7.5}]}"#;
    let records = decode_schools(payload.as_bytes()).expect("payload decodes");

    assert_eq!(records.len(), 1);
    assert!(records[0].early_grades.is_none());
    assert_eq!(resolve_quality(&records[0]), 0.0);

    assert_eq!(assemble(&records, &FilterCriteria::default()).count, 1);
    let floor = FilterCriteria::default().with_minimum_quality(6.0);
    assert!(assemble(&records, &floor).is_empty());
}
