/// HTTP surface for the tornado dashboard
///
/// Serves the dashboard page plus the JSON views it polls whenever a
/// control changes. All handlers read the shared, immutable `Dashboard`.
///
/// Endpoints:
/// - GET /                                  - Dashboard page
/// - GET /health                            - Service health check
/// - GET /tornado-data                      - Full state/year table as JSON records
/// - GET /views/controls                    - Year list, default year, EF scales
/// - GET /views/map?year=&scales=           - Touchdown points
/// - GET /views/choropleth?year=&scales=    - Per-state counts
/// - GET /views/trend?state=&scales=        - Yearly counts (national if no state)
/// - GET /views/severity?state=             - Counts per EF rating
///
/// `scales` is a comma-separated list such as `EF3,EF4,F5`; omitting it
/// selects all six ratings. `year` defaults to the latest year.

use serde::Serialize;
use std::sync::Arc;
use threadpool::ThreadPool;
use tiny_http::{Header, Method, Request, Response, Server, StatusCode};
use tracing::{debug, info, warn};

use crate::analysis::views::{self, FilterState};
use crate::dashboard::Dashboard;
use crate::model::{ScaleSelection, Severity};

/// The single-page UI; charts are drawn client-side from the JSON views.
pub const DASHBOARD_PAGE: &str = include_str!("../assets/dashboard.html");

const AVAILABLE_ENDPOINTS: [&str; 8] = [
    "/",
    "/health",
    "/tornado-data",
    "/views/controls",
    "/views/map",
    "/views/choropleth",
    "/views/trend",
    "/views/severity",
];

// ---------------------------------------------------------------------------
// Routing
// ---------------------------------------------------------------------------

/// Response body before it is turned into a `tiny_http::Response`.
#[derive(Debug, Clone, PartialEq)]
pub enum Payload {
    Json(serde_json::Value),
    Html(&'static str),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RouteResponse {
    pub status: u16,
    pub payload: Payload,
}

impl RouteResponse {
    fn json(status: u16, value: serde_json::Value) -> Self {
        Self { status, payload: Payload::Json(value) }
    }

    fn ok<T: Serialize>(body: &T) -> Self {
        match serde_json::to_value(body) {
            Ok(value) => Self::json(200, value),
            Err(e) => Self::json(500, serde_json::json!({ "error": e.to_string() })),
        }
    }

    fn bad_request(message: String) -> Self {
        Self::json(400, serde_json::json!({ "error": message }))
    }
}

/// Maps a request URL (path plus optional query) to a response.
pub fn route(dashboard: &Dashboard, url: &str) -> RouteResponse {
    let (path, query) = url.split_once('?').unwrap_or((url, ""));
    let params = parse_query(query);

    match path {
        "/" | "/index.html" => RouteResponse { status: 200, payload: Payload::Html(DASHBOARD_PAGE) },
        "/health" => handle_health(dashboard),
        "/tornado-data" => RouteResponse::ok(&dashboard.export_rows()),
        "/views/controls" => RouteResponse::ok(&views::controls_view(dashboard)),
        "/views/map" | "/views/choropleth" | "/views/trend" | "/views/severity" => {
            let filter = match filter_from_query(dashboard, &params) {
                Ok(filter) => filter,
                Err(message) => return RouteResponse::bad_request(message),
            };
            match path {
                "/views/map" => RouteResponse::ok(&views::map_view(dashboard, &filter)),
                "/views/choropleth" => RouteResponse::ok(&views::choropleth_view(dashboard, &filter)),
                "/views/trend" => RouteResponse::ok(&views::trend_view(dashboard, &filter)),
                _ => RouteResponse::ok(&views::severity_view(dashboard, &filter)),
            }
        }
        _ => RouteResponse::json(
            404,
            serde_json::json!({
                "error": "Not found",
                "available_endpoints": AVAILABLE_ENDPOINTS,
            }),
        ),
    }
}

fn handle_health(dashboard: &Dashboard) -> RouteResponse {
    RouteResponse::json(
        200,
        serde_json::json!({
            "status": "ok",
            "service": env!("CARGO_PKG_NAME"),
            "version": env!("CARGO_PKG_VERSION"),
            "events": dashboard.events().len(),
            "years": dashboard.years().len(),
        }),
    )
}

/// Decodes `a=1&b=x%20y` into ordered key/value pairs. `+` is a space.
/// Pairs that fail to decode are skipped.
pub fn parse_query(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter_map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let key = urlencoding::decode(&key.replace('+', " ")).ok()?.into_owned();
            let value = urlencoding::decode(&value.replace('+', " ")).ok()?.into_owned();
            Some((key, value))
        })
        .collect()
}

fn last_param<'a>(params: &'a [(String, String)], name: &str) -> Option<&'a str> {
    params
        .iter()
        .rev()
        .find(|(k, _)| k == name)
        .map(|(_, v)| v.as_str())
}

/// Builds the filter state for a view request, starting from the initial
/// control values.
///
/// # Errors
/// A message naming the bad parameter when `year` is not an integer.
pub fn filter_from_query(
    dashboard: &Dashboard,
    params: &[(String, String)],
) -> Result<FilterState, String> {
    let mut filter = FilterState::initial(dashboard);

    if let Some(raw) = last_param(params, "year").filter(|v| !v.trim().is_empty()) {
        let year = raw
            .trim()
            .parse::<i32>()
            .map_err(|_| format!("Invalid year '{}'", raw))?;
        filter.year = Some(year);
    }

    let scale_values: Vec<&str> = params
        .iter()
        .filter(|(k, _)| k == "scales")
        .map(|(_, v)| v.as_str())
        .collect();
    if !scale_values.is_empty() {
        // unknown tokens are ignored; an empty list selects nothing
        let selected: Vec<Severity> = scale_values
            .iter()
            .flat_map(|v| v.split(','))
            .filter_map(Severity::from_scale_label)
            .collect();
        filter.scales = ScaleSelection::only(&selected);
    }

    Ok(filter.with_location(last_param(params, "state")))
}

// ---------------------------------------------------------------------------
// HTTP Server
// ---------------------------------------------------------------------------

/// Binds `0.0.0.0:{port}` and serves until the process exits.
pub fn start_endpoint_server(port: u16, dashboard: Arc<Dashboard>, workers: usize) -> Result<(), String> {
    let server = Server::http(format!("0.0.0.0:{}", port))
        .map_err(|e| format!("Failed to start HTTP server on port {}: {}", port, e))?;

    info!("Dashboard listening on http://0.0.0.0:{}", port);
    serve(server, dashboard, workers);
    Ok(())
}

/// Dispatches requests from an already-bound server onto a worker pool.
pub fn serve(server: Server, dashboard: Arc<Dashboard>, workers: usize) {
    let pool = ThreadPool::new(workers.max(1));

    for request in server.incoming_requests() {
        let dashboard = Arc::clone(&dashboard);
        pool.execute(move || handle_request(&dashboard, request));
    }
}

fn handle_request(dashboard: &Dashboard, request: Request) {
    let url = request.url().to_string();

    let routed = match request.method() {
        Method::Get | Method::Head => route(dashboard, &url),
        other => RouteResponse::json(
            405,
            serde_json::json!({ "error": format!("Method {} not allowed", other) }),
        ),
    };
    debug!(method = %request.method(), url = %url, status = routed.status, "Request handled");

    if let Err(e) = request.respond(into_response(routed)) {
        warn!("Failed to send response for {}: {}", url, e);
    }
}

/// Create HTTP response with a JSON or HTML body
fn into_response(routed: RouteResponse) -> Response<std::io::Cursor<Vec<u8>>> {
    let (body, content_type) = match routed.payload {
        Payload::Json(json) => (
            serde_json::to_string_pretty(&json).unwrap_or_else(|_| "{}".to_string()),
            "application/json",
        ),
        Payload::Html(page) => (page.to_string(), "text/html; charset=utf-8"),
    };

    let mut response = Response::from_data(body.into_bytes())
        .with_status_code(StatusCode::from(routed.status));
    if let Ok(header) = Header::from_bytes(&b"Content-Type"[..], content_type.as_bytes()) {
        response = response.with_header(header);
    }
    response
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
