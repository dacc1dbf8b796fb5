//! Route table and dispatch.
//!
//! Exact (method, path) routes are checked first, then prefix routes for
//! the static trees, then an explicit catch-all 404. A known path with the
//! wrong method gets a 405.

use std::future::ready;
use std::sync::Arc;

use hyper::body::Incoming;
use hyper::{Method, Request};

use crate::config::AppState;
use crate::handler::{admin, chirps, static_files};
use crate::http;
use crate::logger;
use crate::middleware::{Handler, HandlerFuture, HitCounter, Middleware};

struct Route {
    method: Method,
    path: String,
    handler: Handler,
}

struct PrefixRoute {
    prefix: String,
    handler: Handler,
}

/// Where a request landed in the table.
#[derive(Debug, PartialEq, Eq)]
enum Target {
    Route(usize),
    Prefix(usize),
    MethodNotAllowed(&'static str),
    NotFound,
}

pub struct Router {
    routes: Vec<Route>,
    prefixes: Vec<PrefixRoute>,
    fallback: Handler,
}

impl Router {
    /// Build the route table for the given state.
    pub fn build(state: &Arc<AppState>) -> Self {
        let fallback: Handler = Arc::new(|_req| Box::pin(ready(http::build_404_response())));
        let mut router = Self {
            routes: Vec::new(),
            prefixes: Vec::new(),
            fallback,
        };

        let readiness: Handler = Arc::new(|_req| Box::pin(ready(admin::readiness())));
        router.route(Method::GET, "/api/healthz", readiness);

        let metrics_state = Arc::clone(state);
        let metrics: Handler = Arc::new(move |_req| {
            let state = Arc::clone(&metrics_state);
            Box::pin(async move { admin::metrics_page(&state) })
        });
        router.route(Method::GET, "/admin/metrics", metrics);

        let reset_state = Arc::clone(state);
        let reset: Handler = Arc::new(move |_req| {
            let state = Arc::clone(&reset_state);
            Box::pin(async move { admin::reset(&state) })
        });
        router.route(Method::GET, "/api/reset", reset);

        let validate: Handler = Arc::new(|req| Box::pin(chirps::validate(req)));
        router.route(Method::POST, "/api/validate_chirp", validate);

        // Static trees; only the site tree counts hits.
        let routes_cfg = &state.config.routes;
        let site = static_files::dir_handler(state, &routes_cfg.app_prefix, &routes_cfg.app_dir);
        let site = HitCounter::new(Arc::clone(state)).wrap(site);
        router.prefix(&routes_cfg.app_prefix, site);

        let assets =
            static_files::dir_handler(state, &routes_cfg.assets_prefix, &routes_cfg.assets_dir);
        router.prefix(&routes_cfg.assets_prefix, assets);

        router
    }

    fn route(&mut self, method: Method, path: &str, handler: Handler) {
        self.routes.push(Route {
            method,
            path: path.to_string(),
            handler,
        });
    }

    fn prefix(&mut self, prefix: &str, handler: Handler) {
        self.prefixes.push(PrefixRoute {
            prefix: prefix.to_string(),
            handler,
        });
    }

    /// Turn the table into a plain handler for middleware composition.
    pub fn into_handler(self: Arc<Self>) -> Handler {
        Arc::new(move |req| self.dispatch(req))
    }

    fn resolve(&self, method: &Method, path: &str) -> Target {
        if let Some(i) = self
            .routes
            .iter()
            .position(|r| r.method == *method && r.path == path)
        {
            return Target::Route(i);
        }
        if self.routes.iter().any(|r| r.path == path) {
            return Target::MethodNotAllowed("GET, POST, OPTIONS");
        }
        if let Some(i) = self
            .prefixes
            .iter()
            .position(|r| path.starts_with(r.prefix.as_str()))
        {
            if *method == Method::GET || *method == Method::HEAD {
                return Target::Prefix(i);
            }
            return Target::MethodNotAllowed("GET, HEAD, OPTIONS");
        }
        Target::NotFound
    }

    fn dispatch(&self, req: Request<Incoming>) -> HandlerFuture {
        let target = self.resolve(req.method(), req.uri().path());
        match target {
            Target::Route(i) => (self.routes[i].handler)(req),
            Target::Prefix(i) => (self.prefixes[i].handler)(req),
            Target::MethodNotAllowed(allow) => {
                logger::log_warning(&format!(
                    "Method not allowed: {} {}",
                    req.method(),
                    req.uri().path()
                ));
                Box::pin(ready(http::build_405_response(allow)))
            }
            Target::NotFound => (self.fallback)(req),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn test_router() -> Router {
        let state = Arc::new(AppState::new(Config::default()));
        Router::build(&state)
    }

    #[test]
    fn exact_routes_match_method_and_path() {
        let router = test_router();
        assert!(matches!(
            router.resolve(&Method::GET, "/api/healthz"),
            Target::Route(_)
        ));
        assert!(matches!(
            router.resolve(&Method::GET, "/admin/metrics"),
            Target::Route(_)
        ));
        assert!(matches!(
            router.resolve(&Method::POST, "/api/validate_chirp"),
            Target::Route(_)
        ));
    }

    #[test]
    fn known_path_wrong_method_is_405() {
        let router = test_router();
        assert!(matches!(
            router.resolve(&Method::POST, "/api/healthz"),
            Target::MethodNotAllowed(_)
        ));
        assert!(matches!(
            router.resolve(&Method::GET, "/api/validate_chirp"),
            Target::MethodNotAllowed(_)
        ));
    }

    #[test]
    fn static_trees_match_by_prefix() {
        let router = test_router();
        assert!(matches!(
            router.resolve(&Method::GET, "/app/index.html"),
            Target::Prefix(0)
        ));
        assert!(matches!(
            router.resolve(&Method::HEAD, "/app/logo.png"),
            Target::Prefix(0)
        ));
        assert!(matches!(
            router.resolve(&Method::GET, "/assets/style.css"),
            Target::Prefix(1)
        ));
        assert!(matches!(
            router.resolve(&Method::DELETE, "/app/index.html"),
            Target::MethodNotAllowed(_)
        ));
    }

    #[test]
    fn everything_else_falls_through_to_404() {
        let router = test_router();
        assert_eq!(router.resolve(&Method::GET, "/nope"), Target::NotFound);
        assert_eq!(router.resolve(&Method::GET, "/"), Target::NotFound);
        assert_eq!(router.resolve(&Method::GET, "/api/unknown"), Target::NotFound);
    }
}
