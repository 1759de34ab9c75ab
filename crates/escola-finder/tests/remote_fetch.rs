use axum::extract::{RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::Router;
use escola_finder::config::UpstreamConfig;
use escola_finder::remote::{FetchError, HttpSchoolSource, SchoolSource, SearchQuery};
use escola_finder::search::{EducationLevel, FilterCriteria, Network};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// Canned answer for the mock upstream.
#[derive(Clone)]
struct Canned {
    status: StatusCode,
    body: &'static str,
    delay: Duration,
    seen_queries: Arc<Mutex<Vec<String>>>,
}

async fn schools_handler(State(canned): State<Canned>, RawQuery(query): RawQuery) -> Response {
    canned
        .seen_queries
        .lock()
        .expect("query log poisoned")
        .push(query.unwrap_or_default());
    if !canned.delay.is_zero() {
        tokio::time::sleep(canned.delay).await;
    }
    (
        canned.status,
        [(axum::http::header::CONTENT_TYPE, "application/json")],
        canned.body,
    )
        .into_response()
}

async fn spawn_upstream(canned: Canned) -> SocketAddr {
    let app = Router::new()
        .route("/api/schools", get(schools_handler))
        .with_state(canned);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind mock upstream");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("mock upstream runs");
    });
    addr
}

fn canned(status: StatusCode, body: &'static str) -> Canned {
    Canned {
        status,
        body,
        delay: Duration::ZERO,
        seen_queries: Arc::new(Mutex::new(Vec::new())),
    }
}

fn source_for(addr: SocketAddr, timeout: Duration) -> HttpSchoolSource {
    let config = UpstreamConfig::new(format!("http://{addr}"), "/api/schools", timeout)
        .expect("valid upstream");
    HttpSchoolSource::new(&config).expect("client builds")
}

fn any_query() -> SearchQuery {
    SearchQuery::from_criteria(&FilterCriteria::default())
}

#[tokio::test]
async fn fetch_sends_scoped_query_and_decodes_wrapped_payload() {
    let upstream = canned(
        StatusCode::OK,
        r#"{"escolas":[{"id":10,"siglaUF":"CE","nomeMunicipio":"Sobral","nomeEscola":"EEF Sobral",
            "rede":"Municipal","ofereceAnosIniciais":true,
            "idebAnosIniciais":8.4,"anoReferenciaAnosIniciais":2023}]}"#,
    );
    let seen = upstream.seen_queries.clone();
    let addr = spawn_upstream(upstream).await;
    let source = source_for(addr, Duration::from_secs(5));

    let criteria = FilterCriteria::default()
        .with_state_code(Some("CE"))
        .with_network(Some(Network::Municipal))
        .with_education_level(Some(EducationLevel::EarlyGrades))
        .with_minimum_quality(6.0);
    let records = source
        .fetch(&SearchQuery::from_criteria(&criteria))
        .await
        .expect("fetch succeeds");

    assert_eq!(records.len(), 1);
    assert_eq!(records[0].name, "EEF Sobral");
    assert_eq!(records[0].id, Some(10));

    let queries = seen.lock().expect("query log poisoned").clone();
    assert_eq!(
        queries,
        vec!["UF=CE&Rede=Municipal&TipoEnsino=Anos+Iniciais&IdebMinimo=6.0".to_string()]
    );
}

#[tokio::test]
async fn fetch_accepts_bare_array_and_empty_object() {
    let addr = spawn_upstream(canned(StatusCode::OK, r#"[{"nomeEscola":"Escola A"}]"#)).await;
    let records = source_for(addr, Duration::from_secs(5))
        .fetch(&any_query())
        .await
        .expect("bare array");
    assert_eq!(records.len(), 1);

    let addr = spawn_upstream(canned(StatusCode::OK, "{}")).await;
    let records = source_for(addr, Duration::from_secs(5))
        .fetch(&any_query())
        .await
        .expect("empty object is a valid empty list");
    assert!(records.is_empty());
}

#[tokio::test]
async fn server_error_surfaces_body_message() {
    let addr = spawn_upstream(canned(
        StatusCode::BAD_REQUEST,
        r#"{"message":"Parâmetro UF inválido"}"#,
    ))
    .await;

    let error = source_for(addr, Duration::from_secs(5))
        .fetch(&any_query())
        .await
        .expect_err("400 is an error");

    match error {
        FetchError::Server { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Parâmetro UF inválido");
        }
        other => panic!("expected server error, got {other:?}"),
    }
}

#[tokio::test]
async fn server_error_without_message_uses_generic_text() {
    let addr = spawn_upstream(canned(StatusCode::INTERNAL_SERVER_ERROR, "")).await;

    let error = source_for(addr, Duration::from_secs(5))
        .fetch(&any_query())
        .await
        .expect_err("500 is an error");

    assert_eq!(error.user_message(), FetchError::GENERIC_SERVER_MESSAGE);
}

#[tokio::test]
async fn malformed_success_body_is_an_error_not_an_empty_list() {
    let addr = spawn_upstream(canned(StatusCode::OK, "{\"escolas\": [")).await;

    let error = source_for(addr, Duration::from_secs(5))
        .fetch(&any_query())
        .await
        .expect_err("truncated json");

    assert!(matches!(error, FetchError::MalformedBody(_)));
}

#[tokio::test]
async fn slow_upstream_times_out() {
    let mut slow = canned(StatusCode::OK, "[]");
    slow.delay = Duration::from_secs(3);
    let addr = spawn_upstream(slow).await;

    let error = source_for(addr, Duration::from_millis(200))
        .fetch(&any_query())
        .await
        .expect_err("timeout");

    assert!(matches!(error, FetchError::Timeout(_)));
}

#[tokio::test]
async fn unreachable_upstream_is_a_network_error() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let error = source_for(addr, Duration::from_secs(2))
        .fetch(&any_query())
        .await
        .expect_err("connection refused");

    assert!(matches!(error, FetchError::Network(_)));
}
