//! HTTP front end for `netchart`.
//!
//! Wires the process together:
//! - Counter sampler (background task, sole writer of the series)
//! - Chart renderer (shared, stateless)
//! - Hyper server (one task per connection, readers of the series)

pub mod handler;

pub use handler::{ChartService, Route, FAVICON_PATHS};

use hyper::server::Server;
use hyper::service::{make_service_fn, service_fn};
use netchart_config::NetChartConfig;
use netchart_core::{NetChartError, Result, SeriesWriter};
use netchart_renderer::ChartRenderer;
use netchart_system::{spawn_sampler, SysinfoCounters};
use netchart_theme::ChartTheme;
use std::convert::Infallible;
use std::net::TcpListener;
use tracing::{error, info};

/// Start sampling and serve the chart.  Never returns under normal operation.
///
/// Returns an error if the counters can't be read at startup, the listen
/// address can't be bound, the server fails, or the sampler stops under the
/// `abort` tick-error policy.
pub async fn run(config: NetChartConfig) -> Result<()> {
    let addr = config.server.addr()?;

    let writer = SeriesWriter::new(config.sampler.history_limit);
    let reader = writer.reader();
    if let Some(limit) = config.sampler.history_limit {
        info!("Keeping the most recent {limit} samples");
    }

    let sampler = spawn_sampler(SysinfoCounters::new(), writer, &config.sampler)?;

    let renderer = ChartRenderer::new(ChartTheme::from_config(&config.chart));
    let listener = TcpListener::bind(addr)?;
    let service = ChartService::new(reader, renderer);

    tokio::select! {
        res = serve(listener, service) => res,
        res = sampler => match res {
            Ok(res) => res,
            Err(e) => {
                error!("Sampler task failed: {e}");
                Err(NetChartError::System(format!("sampler task failed: {e}")))
            }
        },
    }
}

/// Serve `service` on an already-bound listener until the server fails.
pub async fn serve(listener: TcpListener, service: ChartService) -> Result<()> {
    listener.set_nonblocking(true)?;
    let addr = listener.local_addr()?;

    let make_svc = make_service_fn(move |_conn| {
        let service = service.clone();
        async move {
            Ok::<_, Infallible>(service_fn(move |req| {
                let service = service.clone();
                async move { service.handle(req).await }
            }))
        }
    });

    let server = Server::from_tcp(listener)
        .map_err(|e| NetChartError::Http(format!("cannot serve on {addr}: {e}")))?
        .serve(make_svc);
    info!("Serving network chart at http://{addr}");

    server
        .await
        .map_err(|e| NetChartError::Http(format!("server error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use netchart_config::ChartConfig;
    use netchart_core::RatePoint;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpStream;

    async fn fetch(addr: std::net::SocketAddr, path: &str) -> Vec<u8> {
        let mut stream = TcpStream::connect(addr).await.unwrap();
        let request = format!("GET {path} HTTP/1.1\r\nHost: localhost\r\nConnection: close\r\n\r\n");
        stream.write_all(request.as_bytes()).await.unwrap();

        let mut raw = Vec::new();
        stream.read_to_end(&mut raw).await.unwrap();
        raw
    }

    fn head(raw: &[u8]) -> String {
        let end = raw
            .windows(4)
            .position(|w| w == b"\r\n\r\n")
            .unwrap_or(raw.len());
        String::from_utf8_lossy(&raw[..end]).to_ascii_lowercase()
    }

    #[tokio::test]
    async fn serves_chart_and_favicon_over_tcp() {
        let mut writer = SeriesWriter::new(None);
        for t in 1..=5 {
            writer
                .append(RatePoint {
                    elapsed_secs: t as f64,
                    sent_mbps:    1.0,
                    recv_mbps:    2.0,
                })
                .unwrap();
        }

        let theme = ChartTheme::from_config(&ChartConfig {
            width:  200,
            height: 120,
            ..ChartConfig::default()
        });
        let service = ChartService::new(writer.reader(), ChartRenderer::without_text(theme));

        let listener = TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        let server = tokio::spawn(serve(listener, service));

        let chart = fetch(addr, "/").await;
        let chart_head = head(&chart);
        assert!(chart_head.starts_with("http/1.1 200"), "{chart_head}");
        assert!(chart_head.contains("content-type: image/png"), "{chart_head}");
        assert!(chart.windows(4).any(|w| w == b"\x89PNG"));

        let icon = fetch(addr, "/favicon.ico").await;
        let icon_head = head(&icon);
        assert!(icon_head.starts_with("http/1.1 200"), "{icon_head}");
        assert!(icon_head.contains("content-length: 0"), "{icon_head}");

        server.abort();
    }
}
