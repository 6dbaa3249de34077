//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use chrono::NaiveDateTime;
use tracing::{debug, warn};

use crate::planner::{RouteError, Router as RouteFinder};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Accepted formats for the `at` parameter.
const TIME_FORMATS: &[&str] = &["%Y-%m-%dT%H:%M", "%Y-%m-%dT%H:%M:%S"];

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/stations", get(search_stations))
        .route("/routes", get(find_routes))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Search stations by name.
async fn search_stations(
    State(state): State<AppState>,
    Query(req): Query<StationSearchRequest>,
) -> Json<StationSearchResponse> {
    let limit = req.limit.unwrap_or(10).min(50);
    let network = &state.network;

    let stations = network
        .search_stations(&req.q, limit)
        .into_iter()
        .map(|station| {
            let codes = network
                .stops_at(station.id())
                .map(|stop| stop.code().to_string())
                .collect();
            StationSearchResult::new(station, codes)
        })
        .collect();

    Json(StationSearchResponse { stations })
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Parse a time of travel.
fn parse_time(s: &str) -> Option<NaiveDateTime> {
    let s = s.trim();
    TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(s, format).ok())
}

/// Find every minimal-time route between two stations.
async fn find_routes(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(req): Query<RoutesRequest>,
) -> Result<Response, AppError> {
    let at = if req.untimed {
        None
    } else {
        match req.at.as_deref().filter(|s| !s.trim().is_empty()) {
            Some(s) => Some(parse_time(s).ok_or_else(|| AppError::BadRequest {
                message: format!("Invalid time {s:?}, expected YYYY-MM-DDTHH:MM"),
            })?),
            None => Some(state.timings.local_now()),
        }
    };

    let finder = RouteFinder::new(&state.network, state.timings.as_ref(), &state.config);
    let result = finder.find_routes(&req.from, &req.to, at)?;
    debug!(
        from = %req.from,
        to = %req.to,
        routes = result.routes.len(),
        "Answered route request"
    );

    let at = at.map(|t| t.format("%Y-%m-%dT%H:%M").to_string());

    // Return HTML or JSON based on Accept header
    if accepts_html(&headers) {
        let template = RouteResultsTemplate {
            from: req.from,
            to: req.to,
            at,
            routes: result.routes.iter().map(RouteView::from_route).collect(),
        };
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {e}"),
        })?;

        Ok(Html(html).into_response())
    } else {
        let routes = result.routes.iter().map(RouteResult::from_route).collect();

        Ok(Json(RoutesResponse {
            from: req.from,
            to: req.to,
            at,
            routes,
            stops_visited: result.stops_visited,
        })
        .into_response())
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<RouteError> for AppError {
    fn from(e: RouteError) -> Self {
        match e {
            RouteError::UnknownStation(_) => AppError::NotFound {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };

        warn!(%status, "{message}");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Network, NetworkBuilder, StopSpec};
    use crate::planner::RouterConfig;
    use crate::timings::BandedTimings;
    use axum::body::to_bytes;
    use axum::http::HeaderValue;
    use chrono::NaiveDate;

    fn network() -> Network {
        let day = NaiveDate::from_ymd_opt(1990, 3, 10).unwrap();
        let mut builder = NetworkBuilder::new();
        builder
            .add_line(vec![
                StopSpec::new("EW23", "Clementi", day),
                StopSpec::new("EW24", "Jurong East", day),
            ])
            .unwrap();
        builder
            .add_line(vec![
                StopSpec::new("NS1", "Jurong East", day),
                StopSpec::new("NS2", "Bukit Batok", day),
            ])
            .unwrap();
        builder.build()
    }

    fn state() -> AppState {
        AppState::new(network(), BandedTimings::singapore(), RouterConfig::default())
    }

    fn request(from: &str, to: &str, at: Option<&str>) -> RoutesRequest {
        RoutesRequest {
            from: from.to_string(),
            to: to.to_string(),
            at: at.map(String::from),
            untimed: false,
        }
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn health_is_ok() {
        assert_eq!(health().await, "ok");
    }

    #[tokio::test]
    async fn routes_as_json() {
        let response = find_routes(
            State(state()),
            HeaderMap::new(),
            Query(request("Clementi", "Bukit Batok", Some("2024-03-15T07:00"))),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let json = body_json(response).await;
        assert_eq!(json["at"], "2024-03-15T07:00");
        assert_eq!(json["routes"].as_array().unwrap().len(), 1);
        assert_eq!(json["routes"][0]["time_taken_mins"], 37);
        assert_eq!(json["routes"][0]["changes"], 1);
    }

    #[tokio::test]
    async fn untimed_routes() {
        let mut req = request("Clementi", "Bukit Batok", Some("not a time"));
        req.untimed = true;

        let response = find_routes(State(state()), HeaderMap::new(), Query(req))
            .await
            .unwrap();

        let json = body_json(response).await;
        assert!(json["at"].is_null());
        assert_eq!(json["routes"][0]["time_taken_mins"], 3);
    }

    #[tokio::test]
    async fn routes_as_html() {
        let mut headers = HeaderMap::new();
        headers.insert(header::ACCEPT, HeaderValue::from_static("text/html"));

        let response = find_routes(
            State(state()),
            headers,
            Query(request("Clementi", "Bukit Batok", Some("2024-03-16T07:00"))),
        )
        .await
        .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let html = String::from_utf8(bytes.to_vec()).unwrap();
        assert!(html.contains("30 min"));
        assert!(html.contains("Change from EW line to NS line"));
    }

    #[tokio::test]
    async fn unknown_station_is_not_found() {
        let err = find_routes(
            State(state()),
            HeaderMap::new(),
            Query(request("Clementi", "Atlantis", None)),
        )
        .await
        .unwrap_err();

        assert!(matches!(err, AppError::NotFound { .. }));
        let response = err.into_response();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let json = body_json(response).await;
        assert_eq!(json["error"], "unknown station \"Atlantis\"");
    }

    #[tokio::test]
    async fn malformed_time_is_bad_request() {
        let err = find_routes(
            State(state()),
            HeaderMap::new(),
            Query(request("Clementi", "Bukit Batok", Some("15/03/2024 07:00"))),
        )
        .await
        .unwrap_err();

        assert_eq!(err.into_response().status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn station_search() {
        let Json(response) = search_stations(
            State(state()),
            Query(StationSearchRequest {
                q: "jurong".to_string(),
                limit: None,
            }),
        )
        .await;

        assert_eq!(response.stations.len(), 1);
        assert_eq!(response.stations[0].name, "Jurong East");
        assert_eq!(response.stations[0].codes, vec!["EW24", "NS1"]);
    }

    #[test]
    fn time_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 15)
            .unwrap()
            .and_hms_opt(7, 30, 0)
            .unwrap();
        assert_eq!(parse_time("2024-03-15T07:30"), Some(expected));
        assert_eq!(parse_time("2024-03-15T07:30:00"), Some(expected));
        assert_eq!(parse_time("07:30"), None);
    }

    #[test]
    fn html_detection() {
        let mut headers = HeaderMap::new();
        assert!(!accepts_html(&headers));
        headers.insert(
            header::ACCEPT,
            HeaderValue::from_static("text/html,application/xhtml+xml"),
        );
        assert!(accepts_html(&headers));
    }
}
