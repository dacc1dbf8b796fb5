//! Static file serving.
//!
//! Maps a URL path under a route prefix to a file inside a configured
//! directory, with index file fallback, a canonicalize-based traversal
//! guard, and `ETag`/304 handling.

use std::path::Path;
use std::sync::Arc;

use http_body_util::Full;
use hyper::body::{Bytes, Incoming};
use hyper::{Method, Request, Response};
use tokio::fs;

use crate::config::AppState;
use crate::http::{self, cache, mime};
use crate::logger;
use crate::middleware::Handler;

/// Build a handler serving files from `dir` for paths under `prefix`.
pub fn dir_handler(state: &Arc<AppState>, prefix: &str, dir: &str) -> Handler {
    let state = Arc::clone(state);
    let prefix = prefix.to_string();
    let dir = dir.to_string();
    Arc::new(move |req| {
        let state = Arc::clone(&state);
        let prefix = prefix.clone();
        let dir = dir.clone();
        Box::pin(async move { serve(&req, &state, &prefix, &dir).await })
    })
}

async fn serve(
    req: &Request<Incoming>,
    state: &AppState,
    prefix: &str,
    dir: &str,
) -> Response<Full<Bytes>> {
    let is_head = *req.method() == Method::HEAD;
    let if_none_match = req
        .headers()
        .get("if-none-match")
        .and_then(|v| v.to_str().ok());

    let index_files = &state.config.routes.index_files;
    match load_from_directory(dir, req.uri().path(), prefix, index_files).await {
        Some((content, content_type)) => {
            if state.config.logging.access_log {
                logger::log_response(200, content.len());
            }
            build_file_response(&content, content_type, if_none_match, is_head)
        }
        None => http::build_404_response(),
    }
}

/// Resolve the request path to a path relative to the serve directory.
/// Strips the route prefix and drops parent-directory components.
fn sanitize_path(path: &str, prefix: &str) -> String {
    let clean = path.trim_start_matches('/').replace("..", "");
    let prefix_clean = prefix.trim_matches('/');
    if prefix_clean.is_empty() {
        return clean;
    }
    clean
        .strip_prefix(&format!("{prefix_clean}/"))
        .or_else(|| clean.strip_prefix(prefix_clean))
        .unwrap_or(&clean)
        .to_string()
}

/// Load a file from the directory, falling back to index files for
/// directory requests. The canonicalized result must stay inside the
/// serve directory.
async fn load_from_directory(
    dir: &str,
    path: &str,
    prefix: &str,
    index_files: &[String],
) -> Option<(Vec<u8>, &'static str)> {
    let relative = sanitize_path(path, prefix);
    let mut file_path = Path::new(dir).join(&relative);

    let dir_canonical = match Path::new(dir).canonicalize() {
        Ok(p) => p,
        Err(e) => {
            logger::log_warning(&format!(
                "Serve directory not found or inaccessible '{dir}': {e}"
            ));
            return None;
        }
    };

    // Directory request: try index files.
    if file_path.is_dir() || relative.is_empty() || relative.ends_with('/') {
        for index in index_files {
            let candidate = file_path.join(index);
            if candidate.is_file() {
                file_path = candidate;
                break;
            }
        }
    }

    // Missing files are an ordinary 404, not worth a log line.
    let file_canonical = file_path.canonicalize().ok()?;
    if !file_canonical.starts_with(&dir_canonical) {
        logger::log_warning(&format!("Path traversal attempt blocked: {path}"));
        return None;
    }

    let content = match fs::read(&file_canonical).await {
        Ok(c) => c,
        Err(e) => {
            logger::log_error(&format!(
                "Failed to read '{}': {e}",
                file_canonical.display()
            ));
            return None;
        }
    };

    let content_type = mime::get_content_type(file_canonical.extension().and_then(|e| e.to_str()));
    Some((content, content_type))
}

/// Full response with `ETag`; 304 when the client's cached copy matches.
fn build_file_response(
    data: &[u8],
    content_type: &'static str,
    if_none_match: Option<&str>,
    is_head: bool,
) -> Response<Full<Bytes>> {
    let etag = cache::generate_etag(data);
    if cache::check_etag_match(if_none_match, &etag) {
        return http::build_304_response(&etag);
    }

    let body = if is_head {
        Bytes::new()
    } else {
        Bytes::from(data.to_owned())
    };

    Response::builder()
        .status(200)
        .header("Content-Type", content_type)
        .header("Content-Length", data.len())
        .header("ETag", etag)
        .header("Cache-Control", "public, max-age=3600")
        .body(Full::new(body))
        .unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build file response: {e}"));
            Response::new(Full::new(Bytes::new()))
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn sanitize_strips_prefix_and_parent_refs() {
        assert_eq!(sanitize_path("/app/index.html", "/app/"), "index.html");
        assert_eq!(sanitize_path("/app/css/site.css", "/app/"), "css/site.css");
        assert_eq!(sanitize_path("/assets/logo.png", "/assets/"), "logo.png");
        assert_eq!(sanitize_path("/app/", "/app/"), "");
        assert_eq!(sanitize_path("/app/../../etc/passwd", "/app/"), "//etc/passwd");
        assert_eq!(sanitize_path("/file.txt", ""), "file.txt");
    }

    fn scratch_dir(name: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("chirpd-static-{}-{name}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    #[tokio::test]
    async fn loads_existing_file_with_content_type() {
        let dir = scratch_dir("load");
        std::fs::write(dir.join("page.html"), "<html></html>").unwrap();

        let index = vec!["index.html".to_string()];
        let loaded =
            load_from_directory(dir.to_str().unwrap(), "/app/page.html", "/app/", &index).await;
        let (content, content_type) = loaded.unwrap();
        assert_eq!(content, b"<html></html>");
        assert_eq!(content_type, "text/html; charset=utf-8");
    }

    #[tokio::test]
    async fn directory_request_falls_back_to_index() {
        let dir = scratch_dir("index");
        std::fs::write(dir.join("index.html"), "home").unwrap();

        let index = vec!["index.html".to_string()];
        let loaded = load_from_directory(dir.to_str().unwrap(), "/app/", "/app/", &index).await;
        assert_eq!(loaded.unwrap().0, b"home");
    }

    #[tokio::test]
    async fn missing_file_is_none() {
        let dir = scratch_dir("missing");
        let index = vec!["index.html".to_string()];
        let loaded =
            load_from_directory(dir.to_str().unwrap(), "/app/nope.css", "/app/", &index).await;
        assert!(loaded.is_none());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn traversal_outside_root_is_rejected() {
        let dir = scratch_dir("guard");
        let sub = dir.join("sub");
        std::fs::create_dir_all(&sub).unwrap();
        std::fs::write(dir.join("secret.txt"), "secret").unwrap();
        // A symlink escaping the serve root must be caught by the
        // canonical-path check even though the request path looks clean.
        std::os::unix::fs::symlink(dir.join("secret.txt"), sub.join("link.txt")).unwrap();

        let index: Vec<String> = vec![];
        let loaded =
            load_from_directory(sub.to_str().unwrap(), "/app/link.txt", "/app/", &index).await;
        assert!(loaded.is_none());
    }

    #[test]
    fn head_response_has_empty_body_but_full_length() {
        let resp = build_file_response(b"abcdef", "text/plain; charset=utf-8", None, true);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Length"], "6");
    }

    #[test]
    fn matching_etag_yields_304() {
        let etag = cache::generate_etag(b"abcdef");
        let resp = build_file_response(b"abcdef", "text/plain; charset=utf-8", Some(&etag), false);
        assert_eq!(resp.status(), 304);
    }
}
