//! Request middleware chain.
//!
//! A middleware is a capability that takes a handler and returns a handler;
//! `compose` applies a list of them in registration order, so the first
//! entry sees the request first. The route table itself is just the
//! innermost handler.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::header::{HeaderMap, HeaderValue};
use hyper::{Method, Request, Response};

use crate::config::{AppState, HttpConfig};

/// Boxed response future produced by handlers.
pub type HandlerFuture = Pin<Box<dyn Future<Output = Response<Full<Bytes>>> + Send>>;

/// A request handler: the unit middlewares wrap and the router dispatches to.
pub type Handler = Arc<dyn Fn(Request<Incoming>) -> HandlerFuture + Send + Sync>;

/// A middleware wraps a downstream handler and yields a new handler.
pub trait Middleware: Send + Sync {
    fn wrap(&self, next: Handler) -> Handler;
}

/// Compose middlewares over `inner` in registration order.
pub fn compose(middlewares: &[Arc<dyn Middleware>], inner: Handler) -> Handler {
    middlewares
        .iter()
        .rev()
        .fold(inner, |next, mw| mw.wrap(next))
}

/// CORS envelope: injects permissive cross-origin headers into every
/// response and answers `OPTIONS` preflights directly with an empty 200,
/// bypassing everything downstream.
#[derive(Clone)]
pub struct CorsEnvelope {
    allow_methods: HeaderValue,
    allow_headers: HeaderValue,
}

impl CorsEnvelope {
    pub fn new(http: &HttpConfig) -> Self {
        Self {
            allow_methods: HeaderValue::from_str(&http.cors_allow_methods)
                .unwrap_or_else(|_| HeaderValue::from_static("*")),
            allow_headers: HeaderValue::from_str(&http.cors_allow_headers)
                .unwrap_or_else(|_| HeaderValue::from_static("*")),
        }
    }

    /// Set the three CORS headers, overwriting any earlier values.
    fn apply(&self, headers: &mut HeaderMap) {
        headers.insert("Access-Control-Allow-Origin", HeaderValue::from_static("*"));
        headers.insert("Access-Control-Allow-Methods", self.allow_methods.clone());
        headers.insert("Access-Control-Allow-Headers", self.allow_headers.clone());
    }

    /// Preflight short-circuit: 200, empty body, CORS headers only.
    fn preflight_response(&self) -> Response<Full<Bytes>> {
        let mut resp = Response::new(Full::new(Bytes::new()));
        self.apply(resp.headers_mut());
        resp
    }
}

impl Middleware for CorsEnvelope {
    fn wrap(&self, next: Handler) -> Handler {
        let envelope = self.clone();
        Arc::new(move |req| {
            if req.method() == Method::OPTIONS {
                return Box::pin(std::future::ready(envelope.preflight_response()));
            }
            let envelope = envelope.clone();
            let fut = next(req);
            Box::pin(async move {
                let mut resp = fut.await;
                envelope.apply(resp.headers_mut());
                resp
            })
        })
    }
}

/// Metrics middleware: counts every request that reaches the wrapped
/// handler. Only the site asset route is wrapped with it.
pub struct HitCounter {
    state: Arc<AppState>,
}

impl HitCounter {
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }
}

impl Middleware for HitCounter {
    fn wrap(&self, next: Handler) -> Handler {
        let state = Arc::clone(&self.state);
        Arc::new(move |req| {
            state.record_hit();
            next(req)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hyper::StatusCode;

    #[test]
    fn preflight_is_empty_200_with_cors_headers() {
        let envelope = CorsEnvelope::new(&HttpConfig::default());
        let resp = envelope.preflight_response();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Access-Control-Allow-Origin"], "*");
        assert_eq!(
            resp.headers()["Access-Control-Allow-Methods"],
            "POST, GET, OPTIONS, PUT, DELETE"
        );
        assert_eq!(resp.headers()["Access-Control-Allow-Headers"], "*");
    }

    #[test]
    fn apply_overwrites_existing_headers() {
        let envelope = CorsEnvelope::new(&HttpConfig::default());
        let mut headers = HeaderMap::new();
        headers.insert(
            "Access-Control-Allow-Origin",
            HeaderValue::from_static("https://example.com"),
        );
        envelope.apply(&mut headers);
        assert_eq!(headers["Access-Control-Allow-Origin"], "*");
    }

    #[test]
    fn unparsable_allow_list_falls_back_to_wildcard() {
        let mut http = HttpConfig::default();
        http.cors_allow_methods = "bad\nvalue".to_string();
        let envelope = CorsEnvelope::new(&http);
        let resp = envelope.preflight_response();
        assert_eq!(resp.headers()["Access-Control-Allow-Methods"], "*");
    }
}
