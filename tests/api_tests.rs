use axum::{
    Router,
    body::Body,
    http::{Request, Response, StatusCode, header},
};
use http_body_util::BodyExt;
use skyscan::api::AppState;
use skyscan::config::Config;
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

async fn spawn_app(upstream: &MockServer) -> (Arc<AppState>, Router) {
    let db_path =
        std::env::temp_dir().join(format!("skyscan-api-test-{}.db", uuid::Uuid::new_v4()));

    let mut config = Config::default();
    config.general.database_url = format!("sqlite:{}", db_path.display());
    config.weather.geocoding_url = format!("{}/v1/search", upstream.uri());
    config.weather.forecast_url = format!("{}/v1/forecast", upstream.uri());

    let state = skyscan::api::create_app_state_from_config(config, None)
        .await
        .expect("failed to create app state");
    let router = skyscan::api::router(state.clone()).await;
    (state, router)
}

async fn get(app: &Router, uri: &str, visitor: Option<&str>) -> Response<Body> {
    let mut request = Request::builder().uri(uri);
    if let Some(cookie_id) = visitor {
        request = request.header(header::COOKIE, format!("anon_uuid={cookie_id}"));
    }

    app.clone()
        .oneshot(request.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_json(response: Response<Body>) -> serde_json::Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}

fn visitor_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .find(|v| v.starts_with("anon_uuid="))
        .map(ToString::to_string)
}

async fn mount_testville(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Testville"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [{
                "name": "Testville",
                "latitude": 10.0,
                "longitude": 20.0,
                "country": "Testland",
                "country_code": "TL",
                "timezone": "UTC"
            }]
        })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/v1/forecast"))
        .and(query_param("latitude", "10"))
        .and(query_param("longitude", "20"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "latitude": 10.0,
            "longitude": 20.0,
            "generationtime_ms": 0.2,
            "utc_offset_seconds": 0,
            "timezone": "UTC",
            "timezone_abbreviation": "UTC",
            "hourly": {
                "time": ["2025-05-26T00:00", "2025-05-26T01:00"],
                "temperature_2m": [20.0, 19.5],
                "weathercode": [0, 3]
            }
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_health() {
    let upstream = MockServer::start().await;
    let (_, app) = spawn_app(&upstream).await;

    let response = get(&app, "/api/health", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["status"], "ok");
    assert_eq!(body["data"]["database"], true);
}

#[tokio::test]
async fn test_first_visit_sets_cookie() {
    let upstream = MockServer::start().await;
    let (_, app) = spawn_app(&upstream).await;

    let response = get(&app, "/api/history", None).await;

    assert_eq!(response.status(), StatusCode::OK);
    let cookie = visitor_cookie(&response).expect("anon_uuid cookie not set");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));
    assert!(cookie.contains("SameSite=Lax"));

    let value = cookie
        .trim_start_matches("anon_uuid=")
        .split(';')
        .next()
        .unwrap();
    assert!(uuid::Uuid::parse_str(value).is_ok());
}

#[tokio::test]
async fn test_known_cookie_is_not_reissued() {
    let upstream = MockServer::start().await;
    let (state, app) = spawn_app(&upstream).await;

    let response = get(&app, "/api/history", Some("returning-visitor")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(visitor_cookie(&response).is_none());

    // An unknown value is adopted rather than replaced
    let user = state
        .store()
        .get_user_by_cookie("returning-visitor")
        .await
        .unwrap();
    assert!(user.is_some());

    let response = get(&app, "/api/history", Some("returning-visitor")).await;
    assert!(visitor_cookie(&response).is_none());
}

#[tokio::test]
async fn test_oversized_cookie_is_replaced() {
    let upstream = MockServer::start().await;
    let (_, app) = spawn_app(&upstream).await;

    let response = get(&app, "/api/history", Some(&"x".repeat(80))).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(visitor_cookie(&response).is_some());
}

#[tokio::test]
async fn test_suggest_blends_history_and_upstream() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "ber"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "results": [
                {"name": "berlin", "latitude": 52.52, "longitude": 13.41, "country": "Germany"},
                {"name": "Bern", "latitude": 46.95, "longitude": 7.45, "country": "Switzerland"}
            ]
        })))
        .mount(&upstream)
        .await;
    let (state, app) = spawn_app(&upstream).await;

    let user = state.store().get_or_create_user("visitor-1").await.unwrap();
    for city in ["Berlin", "Berlin", "Cuxberg", "Paris"] {
        state.store().record_search(user.id, city).await.unwrap();
    }

    let response = get(&app, "/api/suggest?query=%20ber%20", Some("visitor-1")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    let cities = body["data"].as_array().unwrap();
    let names: Vec<&str> = cities.iter().map(|c| c["name"].as_str().unwrap()).collect();
    assert_eq!(names, vec!["Berlin", "Cuxberg", "Bern"]);
    assert_eq!(cities[0]["search_count"], 2);
    assert_eq!(cities[2]["country"], "Switzerland");
    assert!(cities[2].get("search_count").is_none());
}

#[tokio::test]
async fn test_suggest_respects_limit() {
    let upstream = MockServer::start().await;
    let results: Vec<_> = (0..25)
        .map(|i| serde_json::json!({"name": format!("Springfield {i}")}))
        .collect();
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(serde_json::json!({ "results": results })),
        )
        .mount(&upstream)
        .await;
    let (_, app) = spawn_app(&upstream).await;

    let response = get(&app, "/api/suggest?query=Spring", None).await;

    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 10);
}

#[tokio::test]
async fn test_suggest_upstream_failure_is_bad_gateway() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(500).set_body_string("Oops"))
        .mount(&upstream)
        .await;
    let (_, app) = spawn_app(&upstream).await;

    let response = get(&app, "/api/suggest?query=Xyz", None).await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body = body_json(response).await;
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().contains("Oops"));
}

#[tokio::test]
async fn test_suggest_empty_query_is_rejected() {
    let upstream = MockServer::start().await;
    let (_, app) = spawn_app(&upstream).await;

    let response = get(&app, "/api/suggest?query=%20%20", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = get(&app, "/api/suggest", None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_weather_records_history() {
    let upstream = MockServer::start().await;
    mount_testville(&upstream).await;
    let (state, app) = spawn_app(&upstream).await;

    let response = get(&app, "/api/weather?city=Testville", Some("visitor-2")).await;

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["data"]["city"]["name"], "Testville");
    assert_eq!(body["data"]["forecast"]["hourly"]["temperature_2m"][0], 20.0);

    let user = state
        .store()
        .get_user_by_cookie("visitor-2")
        .await
        .unwrap()
        .unwrap();
    let history = state.store().recent_searches(user.id, None).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].city_name, "Testville");
}

#[tokio::test]
async fn test_weather_no_match_is_not_found() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .and(query_param("name", "Nowhere"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(&upstream)
        .await;
    let (_, app) = spawn_app(&upstream).await;

    let response = get(&app, "/api/weather?city=Nowhere", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "No matching city for 'Nowhere'");
}

#[tokio::test]
async fn test_weather_upstream_error_is_not_found() {
    let upstream = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(
            ResponseTemplate::new(500).set_body_json(serde_json::json!({"reason": "boom"})),
        )
        .mount(&upstream)
        .await;
    let (_, app) = spawn_app(&upstream).await;

    let response = get(&app, "/api/weather?city=Paris", None).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"], "Geocoding API returned HTTP 500");
}

#[tokio::test]
async fn test_metrics_disabled() {
    let upstream = MockServer::start().await;
    let (_, app) = spawn_app(&upstream).await;

    let response = get(&app, "/api/metrics", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_every_response_sets_cookie_for_new_visitor() {
    let upstream = MockServer::start().await;
    let (_, app) = spawn_app(&upstream).await;

    let response = get(&app, "/api/health", None).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(visitor_cookie(&response).is_some());

    let response = get(&app, "/api/metrics", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert!(visitor_cookie(&response).is_some());

    let response = get(&app, "/no/such/page", None).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let cookie = visitor_cookie(&response).expect("anon_uuid cookie not set on 404");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("Path=/"));
}

#[tokio::test]
async fn test_health_does_not_reissue_cookie_or_create_user() {
    let upstream = MockServer::start().await;
    let (state, app) = spawn_app(&upstream).await;

    let response = get(&app, "/api/health", Some("monitor")).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert!(visitor_cookie(&response).is_none());
    assert!(
        state
            .store()
            .get_user_by_cookie("monitor")
            .await
            .unwrap()
            .is_none()
    );
}

async fn mount_empty_geocoder(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/v1/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({})))
        .mount(server)
        .await;
}

async fn suggested_names(app: &Router, uri: &str, visitor: &str) -> Vec<String> {
    let response = get(app, uri, Some(visitor)).await;
    assert_eq!(response.status(), StatusCode::OK);
    body_json(response).await["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|c| c["name"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_suggest_equal_counts_keep_first_seen_order() {
    let upstream = MockServer::start().await;
    mount_empty_geocoder(&upstream).await;
    let (state, app) = spawn_app(&upstream).await;

    let user = state.store().get_or_create_user("visitor-3").await.unwrap();
    for city in ["Bern", "Berlin", "Berlin", "Bern"] {
        state.store().record_search(user.id, city).await.unwrap();
    }

    let names = suggested_names(&app, "/api/suggest?query=ber", "visitor-3").await;
    assert_eq!(names, vec!["Bern", "Berlin"]);
}

#[tokio::test]
async fn test_suggest_matches_non_ascii_history() {
    let upstream = MockServer::start().await;
    mount_empty_geocoder(&upstream).await;
    let (state, app) = spawn_app(&upstream).await;

    let user = state.store().get_or_create_user("visitor-4").await.unwrap();
    for city in ["Москва", "Örebro"] {
        state.store().record_search(user.id, city).await.unwrap();
    }

    // моск
    let names = suggested_names(
        &app,
        "/api/suggest?query=%D0%BC%D0%BE%D1%81%D0%BA",
        "visitor-4",
    )
    .await;
    assert_eq!(names, vec!["Москва"]);

    // öre
    let names = suggested_names(&app, "/api/suggest?query=%C3%B6re", "visitor-4").await;
    assert_eq!(names, vec!["Örebro"]);
}
