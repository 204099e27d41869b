//! Static files for the presentation layer, confined to one directory.

use crate::prelude::*;
use http::header::CONTENT_TYPE;
use http::{HeaderValue, Request, Response, StatusCode};
use std::path::Component;

use super::{Handler, text_response};

pub struct StaticAssets {
    root: PathBuf,
}

impl StaticAssets {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a request path onto a file below the root. Anything that could
    /// step outside it (`..`, absolute or drive components) is refused.
    pub fn resolve(&self, request_path: &str) -> Option<PathBuf> {
        let rel = request_path.trim_start_matches('/');
        let rel = if rel.is_empty() { "index.html" } else { rel };

        let mut resolved = self.root.clone();
        for component in Path::new(rel).components() {
            match component {
                Component::Normal(part) => resolved.push(part),
                Component::CurDir => {}
                Component::ParentDir | Component::RootDir | Component::Prefix(_) => return None,
            }
        }
        Some(resolved)
    }
}

impl Handler for StaticAssets {
    fn handle(&self, req: &Request<()>) -> Response<Bytes> {
        let requested = req.uri().path();
        let data = self
            .resolve(requested)
            .and_then(|path| std::fs::read(&path).ok().map(|data| (path, data)));

        let Some((path, data)) = data else {
            warn!("Could not load asset {}", requested);
            return text_response(
                StatusCode::BAD_REQUEST,
                format!("Could not load file {}", requested.trim_start_matches('/')),
            );
        };

        let mime = mime_guess::from_path(&path).first_or_octet_stream();
        let mut res = Response::new(Bytes::from(data));
        if let Ok(value) = HeaderValue::from_str(mime.as_ref()) {
            res.headers_mut().insert(CONTENT_TYPE, value);
        }
        res
    }
}
