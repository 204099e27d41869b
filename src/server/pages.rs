//! Page lookups by id and the middleware that routes them.

use crate::prelude::*;
use http::header::{CACHE_CONTROL, CONTENT_TYPE, EXPIRES, PRAGMA};
use http::{HeaderValue, Request, Response, StatusCode};

use super::{Handler, text_response};

/// Read-only view of the page store for request handling.
#[derive(Clone)]
pub struct PageServer {
    store: SharedPageStore,
}

impl PageServer {
    pub fn new(store: SharedPageStore) -> Self {
        Self { store }
    }

    pub fn get(&self, id: usize) -> Option<Bytes> {
        self.store.get(id)
    }

    /// Resolve the id part of a request path.
    pub fn lookup(&self, raw_id: &str) -> Result<Bytes, LookupError> {
        if raw_id.is_empty() {
            return Err(LookupError::MissingId);
        }
        let id: usize = raw_id
            .parse()
            .map_err(|_| LookupError::InvalidId(raw_id.to_string()))?;
        self.get(id).ok_or(LookupError::NotFound(id))
    }

    /// Wrap `next` so that requests under `prefix` are answered from the store.
    pub fn middleware<H: Handler>(&self, prefix: impl Into<String>, next: H) -> PageRoutes<H> {
        PageRoutes {
            pages: self.clone(),
            prefix: prefix.into(),
            next,
        }
    }
}

/// Answers `<prefix>/<id>` from the page store and hands every other request
/// to `next` untouched.
pub struct PageRoutes<H> {
    pages: PageServer,
    prefix: String,
    next: H,
}

impl<H: Handler> PageRoutes<H> {
    fn page_response(&self, rest: &str, found: Result<Bytes, LookupError>) -> Response<Bytes> {
        match found {
            Ok(data) => {
                let content_type = sniff_bytes(&data);
                let mut res = Response::new(data);
                *res.status_mut() = StatusCode::OK;
                let headers = res.headers_mut();
                headers.insert(
                    CACHE_CONTROL,
                    HeaderValue::from_static("no-cache, no-store, must-revalidate"),
                );
                headers.insert(PRAGMA, HeaderValue::from_static("no-cache"));
                headers.insert(EXPIRES, HeaderValue::from_static("0"));
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
                res
            }
            Err(e) => {
                warn!("Rejected page request `{}{}`: {}", self.prefix, rest, e);
                text_response(StatusCode::BAD_REQUEST, e.to_string())
            }
        }
    }
}

impl<H: Handler> Handler for PageRoutes<H> {
    fn handle(&self, req: &Request<()>) -> Response<Bytes> {
        let Some(rest) = req.uri().path().strip_prefix(self.prefix.as_str()) else {
            return self.next.handle(req);
        };
        // The id must follow a separator: `/image5` is not page 5.
        let found = match rest.strip_prefix('/') {
            Some(raw_id) => self.pages.lookup(raw_id),
            None if rest.is_empty() => Err(LookupError::MissingId),
            None => Err(LookupError::InvalidId(rest.to_string())),
        };
        self.page_response(rest, found)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG: &[u8] = b"\x89PNG\r\n\x1a\npage zero";

    fn routes() -> PageRoutes<impl Handler> {
        let store = PageStore::shared();
        store.put(0, Bytes::from_static(PNG));
        PageServer::new(store).middleware("/image", |_req: &Request<()>| {
            Response::new(Bytes::from_static(b"ok"))
        })
    }

    fn get(handler: &impl Handler, uri: &str) -> Response<Bytes> {
        handler.handle(&Request::get(uri).body(()).unwrap())
    }

    #[test]
    fn test_lookup_errors() {
        let pages = PageServer::new(PageStore::shared());
        assert_eq!(pages.lookup(""), Err(LookupError::MissingId));
        assert_eq!(
            pages.lookup("abc"),
            Err(LookupError::InvalidId("abc".to_string()))
        );
        assert_eq!(pages.lookup("-1"), Err(LookupError::InvalidId("-1".to_string())));
        assert_eq!(pages.lookup("7"), Err(LookupError::NotFound(7)));
    }

    #[test]
    fn test_serves_page_without_caching() {
        let res = get(&routes(), "/image/0");
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(res.body().as_ref(), PNG);
        let headers = res.headers();
        assert_eq!(headers[CACHE_CONTROL], "no-cache, no-store, must-revalidate");
        assert_eq!(headers[PRAGMA], "no-cache");
        assert_eq!(headers[EXPIRES], "0");
        assert_eq!(headers[CONTENT_TYPE], "image/png");
    }

    #[test]
    fn test_bad_ids_are_client_errors() {
        let routes = routes();
        let uris = [
            "/image/",
            "/image",
            "/image/abc",
            "/image/1",
            "/image/0/extra",
            "/imagefoo",
            "/image0",
        ];
        for uri in uris {
            let res = get(&routes, uri);
            assert_eq!(res.status(), StatusCode::BAD_REQUEST, "{}", uri);
            assert!(!res.body().is_empty());
            assert!(res.headers().get(CACHE_CONTROL).is_none());
        }
    }

    #[test]
    fn test_id_needs_separator() {
        let store = PageStore::shared();
        store.put(5, Bytes::from_static(PNG));
        let routes = PageServer::new(store).middleware("/image", |_req: &Request<()>| {
            Response::new(Bytes::from_static(b"ok"))
        });

        assert_eq!(get(&routes, "/image/5").status(), StatusCode::OK);
        let res = get(&routes, "/image5");
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        assert_eq!(res.body(), &Bytes::from("Could not load page: `5` is not a page id"));
    }

    #[test]
    fn test_other_paths_pass_through() {
        let routes = routes();
        for uri in ["/", "/index.html", "/assets/image/0"] {
            let res = get(&routes, uri);
            assert_eq!(res.status(), StatusCode::OK);
            assert_eq!(res.body().as_ref(), b"ok");
        }
    }
}
