//! Helpers for redirect URLs during authentication flows.

use axum::{
    extract::Request,
    http::{Method, Uri},
};
use tracing::error;

use crate::endpoints;

fn is_safe_redirect_url(redirect_url: &str) -> bool {
    if !redirect_url.starts_with('/') || redirect_url.starts_with("//") {
        return false;
    }

    let path = redirect_url
        .split_once('?')
        .map(|(path, _)| path)
        .unwrap_or(redirect_url);

    path != endpoints::LOG_IN_VIEW && path != endpoints::LOG_OUT
}

/// Reduce `raw_url` to a local path and query, or `None` if it points off-site
/// or back to the log-in page.
pub fn normalize_redirect_url(raw_url: &str) -> Option<String> {
    let uri = raw_url.parse::<Uri>().ok()?;
    if uri.scheme().is_some() || uri.authority().is_some() {
        return None;
    }
    let path_and_query = uri.path_and_query()?.as_str();

    is_safe_redirect_url(path_and_query).then(|| path_and_query.to_owned())
}

/// Build the log-in URL that sends the user back to the page they requested.
///
/// Only GET requests are sent back since form submissions cannot be replayed
/// by a redirect.
pub fn build_log_in_redirect_url(request: &Request) -> Option<String> {
    if request.method() != Method::GET {
        return None;
    }

    let path_and_query = request.uri().path_and_query()?.as_str();
    let redirect_target = normalize_redirect_url(path_and_query)?;

    build_log_in_redirect_url_from_target(&redirect_target)
}

pub(super) fn build_log_in_redirect_url_from_target(redirect_target: &str) -> Option<String> {
    match serde_urlencoded::to_string([("redirect_url", redirect_target)]) {
        Ok(param) => Some(format!("{}?{}", endpoints::LOG_IN_VIEW, param)),
        Err(error) => {
            error!("Could not encode redirect URL {redirect_target}: {error}");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{body::Body, http::Request};

    use super::{build_log_in_redirect_url, normalize_redirect_url};

    #[test]
    fn keeps_local_path_and_query() {
        assert_eq!(
            normalize_redirect_url("/transactions?month=2025-01"),
            Some("/transactions?month=2025-01".to_owned())
        );
    }

    #[test]
    fn rejects_external_urls() {
        assert_eq!(normalize_redirect_url("https://evil.example.com/"), None);
        assert_eq!(normalize_redirect_url("//evil.example.com/"), None);
    }

    #[test]
    fn rejects_log_in_page() {
        assert_eq!(normalize_redirect_url("/log_in?redirect_url=%2F"), None);
    }

    #[test]
    fn post_requests_have_no_redirect_target() {
        let request = Request::post("/api/transactions").body(Body::empty()).unwrap();

        assert_eq!(build_log_in_redirect_url(&request), None);
    }

    #[test]
    fn get_requests_are_encoded_into_query() {
        let request = Request::get("/reports?from=2025-01-01").body(Body::empty()).unwrap();

        assert_eq!(
            build_log_in_redirect_url(&request),
            Some("/log_in?redirect_url=%2Freports%3Ffrom%3D2025-01-01".to_owned())
        );
    }
}
