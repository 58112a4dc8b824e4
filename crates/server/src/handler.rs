use hyper::header::{HeaderValue, CACHE_CONTROL, CONTENT_TYPE};
use hyper::{Body, Request, Response, StatusCode};
use netchart_core::{NetChartError, Result, SeriesReader};
use netchart_renderer::RenderChart;
use std::convert::Infallible;
use std::sync::Arc;
use tracing::{debug, error};

/// Paths answered with an empty icon. The second is a misspelling some
/// existing deployments still request.
pub const FAVICON_PATHS: [&str; 2] = ["/favicon.ico", "/favico.ico"];

/// What a request path maps to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    /// Render the throughput chart. Every path that isn't an icon lands here.
    Chart,
    /// Empty placeholder icon.
    Favicon,
}

impl Route {
    pub fn resolve(path: &str) -> Self {
        if FAVICON_PATHS.contains(&path) {
            Route::Favicon
        } else {
            Route::Chart
        }
    }
}

/// Per-request handler: snapshot the series, render, respond.
///
/// Cheap to clone; one clone is handed to every connection.
#[derive(Clone)]
pub struct ChartService {
    reader:   SeriesReader,
    renderer: Arc<dyn RenderChart>,
}

impl ChartService {
    pub fn new(reader: SeriesReader, renderer: impl RenderChart + 'static) -> Self {
        Self {
            reader,
            renderer: Arc::new(renderer),
        }
    }

    pub async fn handle(&self, req: Request<Body>) -> Result<Response<Body>, Infallible> {
        let route = Route::resolve(req.uri().path());
        debug!(method = %req.method(), path = %req.uri().path(), ?route, "request");

        Ok(match route {
            Route::Favicon => Response::new(Body::empty()),
            Route::Chart => self.chart().await,
        })
    }

    async fn chart(&self) -> Response<Body> {
        match self.render().await {
            Ok(png) => {
                let mut resp = Response::new(Body::from(png));
                let headers = resp.headers_mut();
                headers.insert(CONTENT_TYPE, HeaderValue::from_static("image/png"));
                headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store"));
                resp
            }
            Err(e) => {
                error!("Chart render failed: {e}");
                let mut resp = Response::new(Body::from("chart rendering failed\n"));
                *resp.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
                resp
            }
        }
    }

    /// Rendering is CPU-bound, so it runs on the blocking pool.
    async fn render(&self) -> Result<Vec<u8>> {
        let snapshot = self.reader.snapshot();
        let renderer = Arc::clone(&self.renderer);

        tokio::task::spawn_blocking(move || renderer.render_png(&snapshot))
            .await
            .map_err(|e| NetChartError::System(format!("render task failed: {e}")))?
    }
}
