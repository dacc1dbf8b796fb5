//! Admin surface: readiness probe, the metrics page, and counter reset.
//!
//! Both counter accessors are unauthenticated; any caller may reset.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::{Response, StatusCode};

use crate::config::AppState;
use crate::http;
use crate::logger;

/// Readiness probe: fixed 200 regardless of prior state.
pub fn readiness() -> Response<Full<Bytes>> {
    http::build_text_response(StatusCode::OK, "OK")
}

/// Render the visit counter as an HTML page.
pub fn metrics_page(state: &AppState) -> Response<Full<Bytes>> {
    let hits = state.hits();
    logger::log_api_request("GET", "/admin/metrics", 200);
    http::build_html_response(render_metrics_page(hits))
}

fn render_metrics_page(hits: u64) -> String {
    format!(
        "<html>\n<body>\n\t<h1>Welcome, Chirpy Admin</h1>\n\t<p>Chirpy has been visited {hits} times!</p>\n</body>\n</html>\n"
    )
}

/// Zero the visit counter.
pub fn reset(state: &AppState) -> Response<Full<Bytes>> {
    state.reset_hits();
    logger::log_api_request("GET", "/api/reset", 200);
    http::build_text_response(StatusCode::OK, "Hits reset")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    #[test]
    fn readiness_is_always_ok() {
        let resp = readiness();
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(
            resp.headers()["Content-Type"],
            "text/plain; charset=utf-8"
        );
    }

    #[test]
    fn metrics_page_embeds_count() {
        let page = render_metrics_page(42);
        assert!(page.contains("Welcome, Chirpy Admin"));
        assert!(page.contains("visited 42 times"));
    }

    #[test]
    fn reset_zeroes_the_counter() {
        let state = AppState::new(Config::default());
        state.record_hit();
        state.record_hit();
        let resp = reset(&state);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(state.hits(), 0);
    }

    #[test]
    fn metrics_page_is_html() {
        let state = AppState::new(Config::default());
        let resp = metrics_page(&state);
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(resp.headers()["Content-Type"], "text/html; charset=utf-8");
    }
}
