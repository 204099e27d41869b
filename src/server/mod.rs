//! HTTP side: page lookups by id, a pass-through for everything else, and the
//! listener that feeds requests to them.

pub mod assets;
pub mod pages;

pub use assets::StaticAssets;
pub use pages::{PageRoutes, PageServer};

use crate::prelude::*;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Request, Response, StatusCode};
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use std::convert::Infallible;
use std::time::Duration;
use tokio::net::TcpListener;

/// Pause after a failed accept, so running out of descriptors does not spin.
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);

/// Something that answers a request. Only the request head is passed on;
/// bodies are ignored.
pub trait Handler: Send + Sync + 'static {
    fn handle(&self, req: &Request<()>) -> Response<Bytes>;
}

impl<F> Handler for F
where
    F: Fn(&Request<()>) -> Response<Bytes> + Send + Sync + 'static,
{
    fn handle(&self, req: &Request<()>) -> Response<Bytes> {
        self(req)
    }
}

/// Fallback used when no asset directory is configured.
pub fn not_found(req: &Request<()>) -> Response<Bytes> {
    text_response(
        StatusCode::NOT_FOUND,
        format!("Nothing to serve at {}", req.uri().path()),
    )
}

pub(crate) fn text_response(status: StatusCode, body: impl Into<Bytes>) -> Response<Bytes> {
    let mut res = Response::new(body.into());
    *res.status_mut() = status;
    res.headers_mut().insert(
        CONTENT_TYPE,
        HeaderValue::from_static("text/plain; charset=utf-8"),
    );
    res
}

/// Accept connections forever, answering every request with `handler`.
/// Failed accepts are logged and retried after a short pause.
pub async fn serve(listener: TcpListener, handler: Arc<dyn Handler>) {
    loop {
        let (stream, peer) = match listener.accept().await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!("Failed to accept connection: {}", e);
                tokio::time::sleep(ACCEPT_BACKOFF).await;
                continue;
            }
        };
        let handler = Arc::clone(&handler);

        tokio::spawn(async move {
            let service = service_fn(move |req: Request<Incoming>| {
                let handler = Arc::clone(&handler);
                async move {
                    let (parts, _body) = req.into_parts();
                    let req = Request::from_parts(parts, ());
                    debug!("{} {}", req.method(), req.uri());
                    Ok::<_, Infallible>(handler.handle(&req).map(Full::new))
                }
            });

            if let Err(e) = http1::Builder::new()
                .serve_connection(TokioIo::new(stream), service)
                .await
            {
                debug!("Connection from {} ended with error: {}", peer, e);
            }
        });
    }
}
