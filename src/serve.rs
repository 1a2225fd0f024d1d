//! HTTP server for the dashboard
//!
//! `pedot-dash serve` → loads the dataset, starts server, opens browser
//!
//! Requests are answered one at a time on the accept loop. The dataset is
//! shared read-only, so routing is a plain function of the request.

use crate::config::ServerConfig;
use crate::dataset::Dataset;
use crate::download::download_dataset;
use crate::error::{DashError, Result};
use crate::figure::update_graph;
use crate::schema::AxisSelection;
use crate::view::{self, Layout};
use serde::{Deserialize, Serialize};
use std::io;
use std::sync::Arc;
use tiny_http::{Header, Method, Request, Response, Server};

// Embed the workflow schematic directly in the binary
const LOGO_SVG: &str = include_str!("../assets/polybot_logo.svg");

#[derive(Serialize)]
struct ApiResponse<T> {
    ok: bool,
    data: Option<T>,
    error: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    fn success(data: T) -> Self {
        Self { ok: true, data: Some(data), error: None }
    }

    fn failure(error: &DashError) -> Self {
        Self { ok: false, data: None, error: Some(error.to_string()) }
    }
}

/// Query of `/api/figure`; a missing axis falls back to its default
#[derive(Deserialize, Debug, Default)]
pub struct FigureParams {
    pub x: Option<String>,
    pub y: Option<String>,
}

impl FigureParams {
    pub fn selection(self) -> AxisSelection {
        let default = AxisSelection::default();
        AxisSelection {
            x: self.x.unwrap_or(default.x),
            y: self.y.unwrap_or(default.y),
        }
    }
}

/// Query of `/download`
#[derive(Deserialize, Debug, Default)]
pub struct DownloadParams {
    #[serde(default)]
    pub n_clicks: u32,
}

/// Response produced by [`Dashboard::route`], before it goes on the wire
#[derive(Debug, Clone, PartialEq)]
pub struct Reply {
    pub status: u16,
    pub content_type: &'static str,
    pub body: Vec<u8>,
    pub disposition: Option<String>,
}

impl Reply {
    fn new(status: u16, content_type: &'static str, body: impl Into<Vec<u8>>) -> Self {
        Self { status, content_type, body: body.into(), disposition: None }
    }

    fn json<T: Serialize>(status: u16, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => Self::new(status, "application/json", body),
            Err(e) => Self::error(&DashError::Json(e)),
        }
    }

    fn error(err: &DashError) -> Self {
        log::warn!("Request failed: {}", err);
        Self::new(err.status_code(), "text/plain; charset=utf-8", err.to_string())
    }

    fn not_found() -> Self {
        Self::new(404, "text/plain; charset=utf-8", "Not found")
    }
}

/// Request router over the loaded dataset
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Arc<Dataset>,
}

impl Dashboard {
    pub fn new(dataset: Arc<Dataset>) -> Self {
        Self { dataset }
    }

    pub fn route(&self, method: &Method, url: &str) -> Reply {
        let (path, query) = match url.split_once('?') {
            Some((path, query)) => (path, query),
            None => (url, ""),
        };

        match (method, path) {
            // Dashboard page
            (&Method::Get, "/") => match self.page() {
                Ok(html) => Reply::new(200, "text/html; charset=utf-8", html),
                Err(e) => Reply::error(&e),
            },

            // API: scatter figure for the selected axes
            (&Method::Get, "/api/figure") => {
                let result = parse_query::<FigureParams>(query)
                    .and_then(|params| update_graph(&self.dataset, &params.selection()));
                match result {
                    Ok(figure) => Reply::json(200, &ApiResponse::success(figure)),
                    Err(e) => {
                        log::warn!("Figure request rejected: {}", e);
                        Reply::json(e.status_code(), &ApiResponse::<()>::failure(&e))
                    }
                }
            }

            // Dataset download
            (&Method::Get, "/download") => {
                let result = parse_query::<DownloadParams>(query)
                    .and_then(|params| download_dataset(&self.dataset, params.n_clicks));
                match result {
                    Ok(Some(payload)) => Reply {
                        disposition: Some(payload.content_disposition()),
                        ..Reply::new(200, payload.mime, payload.content)
                    },
                    Ok(None) => Reply::new(204, "text/plain; charset=utf-8", Vec::new()),
                    Err(e) => Reply::error(&e),
                }
            }

            // Bundled schematic
            (&Method::Get, view::IMAGE_PATH) => Reply::new(200, "image/svg+xml", LOGO_SVG),

            // 404
            _ => Reply::not_found(),
        }
    }

    fn page(&self) -> Result<String> {
        let layout = Layout::new(&self.dataset);
        let figure = update_graph(&self.dataset, &layout.selection)?;
        Ok(view::render_page(&layout, &figure)?)
    }
}

fn parse_query<T: for<'de> Deserialize<'de>>(query: &str) -> Result<T> {
    serde_urlencoded::from_str(query).map_err(|e| DashError::BadQuery(e.to_string()))
}

/// Start server, open browser, serve the dashboard
pub fn start(config: &ServerConfig, dataset: Arc<Dataset>) -> Result<()> {
    let server = Server::http(config.addr()).map_err(|e| DashError::Server(e.to_string()))?;

    let url = config.url();
    eprintln!("\n\x1b[1;32mPEDOT:PSS dashboard\x1b[0m");
    eprintln!("   {}", url);
    eprintln!("   {} rows, {} columns\n", dataset.len(), dataset.columns().len());
    log::info!("Listening on {}", config.addr());

    if config.open_browser {
        if let Err(e) = open::that(&url) {
            log::warn!("Could not open browser: {}", e);
        }
    }

    let dashboard = Dashboard::new(dataset);

    // Handle requests
    for request in server.incoming_requests() {
        if let Err(e) = handle_request(&dashboard, request) {
            log::error!("Error: {}", e);
        }
    }

    Ok(())
}

fn handle_request(dashboard: &Dashboard, request: Request) -> io::Result<()> {
    let reply = dashboard.route(request.method(), request.url());
    log::debug!("{} {} -> {}", request.method(), request.url(), reply.status);

    let mut response = Response::from_data(reply.body)
        .with_status_code(reply.status)
        .with_header(header("Content-Type", reply.content_type)?);
    if let Some(disposition) = reply.disposition {
        response = response.with_header(header("Content-Disposition", &disposition)?);
    }
    request.respond(response)
}

fn header(name: &str, value: &str) -> io::Result<Header> {
    Header::from_bytes(name.as_bytes(), value.as_bytes())
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidInput, format!("invalid header {}", name)))
}
