//! Flash alerts for displaying success and error messages to users.
//!
//! A handler that redirects stores the alert in a private cookie and the page
//! that is rendered next takes it out of the cookie jar and shows it once.

use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, SameSite},
};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

pub(crate) const COOKIE_FLASH: &str = "flash";

/// Alert message types for styling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AlertKind {
    Success,
    Error,
}

/// A message to show the user at the top of the next page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alert {
    pub kind: AlertKind,
    pub message: String,
}

impl Alert {
    /// Create a new success alert
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Success,
            message: message.into(),
        }
    }

    /// Create a new error alert
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: AlertKind::Error,
            message: message.into(),
        }
    }

    pub fn into_html(self) -> Markup {
        let (style, kind) = match self.kind {
            AlertKind::Success => (
                "p-4 mb-4 text-sm text-green-800 rounded-lg bg-green-50 \
                dark:bg-gray-800 dark:text-green-400",
                "success",
            ),
            AlertKind::Error => (
                "p-4 mb-4 text-sm text-red-800 rounded-lg bg-red-50 \
                dark:bg-gray-800 dark:text-red-400",
                "error",
            ),
        };

        html! {
            div class=(style) role="alert" data-kind=(kind)
            {
                (self.message)
            }
        }
    }
}

/// Store `alert` in `jar` so that it is shown on the next page render.
///
/// If the alert cannot be serialized the jar is returned unchanged.
pub fn set_flash(jar: PrivateCookieJar, alert: &Alert) -> PrivateCookieJar {
    match serde_json::to_string(alert) {
        Ok(value) => jar.add(
            Cookie::build((COOKIE_FLASH, value))
                .path("/")
                .http_only(true)
                .same_site(SameSite::Lax),
        ),
        Err(error) => {
            tracing::error!("Could not serialize flash alert {alert:?}: {error}");
            jar
        }
    }
}

/// Remove the flash alert from `jar`, returning the updated jar and the alert if there was one.
///
/// A cookie that does not hold a valid alert is discarded.
pub fn take_flash(jar: PrivateCookieJar) -> (PrivateCookieJar, Option<Alert>) {
    let Some(cookie) = jar.get(COOKIE_FLASH) else {
        return (jar, None);
    };

    let alert = match serde_json::from_str(cookie.value_trimmed()) {
        Ok(alert) => Some(alert),
        Err(error) => {
            tracing::warn!("Discarding invalid flash cookie: {error}");
            None
        }
    };

    let jar = jar.remove(Cookie::build(COOKIE_FLASH).path("/"));

    (jar, alert)
}

/// Redirect the client to `url` and show `alert` on the page they land on.
pub fn redirect_with_flash(jar: PrivateCookieJar, url: &str, alert: Alert) -> Response {
    let jar = set_flash(jar, &alert);

    (jar, Redirect::to(url)).into_response()
}

#[cfg(test)]
mod tests {
    use axum::http::StatusCode;
    use axum_extra::extract::{PrivateCookieJar, cookie::Key};
    use sha2::{Digest, Sha512};

    use super::{Alert, AlertKind, COOKIE_FLASH, redirect_with_flash, set_flash, take_flash};

    fn get_jar() -> PrivateCookieJar {
        PrivateCookieJar::new(Key::from(&Sha512::digest("flash")))
    }

    #[test]
    fn take_flash_returns_stored_alert() {
        let jar = set_flash(get_jar(), &Alert::success("Transaction added successfully!"));

        let (jar, alert) = take_flash(jar);

        assert_eq!(
            alert,
            Some(Alert {
                kind: AlertKind::Success,
                message: "Transaction added successfully!".to_owned()
            })
        );
        assert!(jar.get(COOKIE_FLASH).is_none(), "flash should only be shown once");
    }

    #[test]
    fn take_flash_without_cookie_returns_none() {
        let (_, alert) = take_flash(get_jar());

        assert_eq!(alert, None);
    }

    #[test]
    fn redirect_with_flash_sets_cookie_and_location() {
        let response = redirect_with_flash(get_jar(), "/dashboard", Alert::error("Nope"));

        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers().get("location").unwrap(), "/dashboard");
        let set_cookie = response.headers().get("set-cookie").unwrap().to_str().unwrap();
        assert!(set_cookie.starts_with("flash="));
    }

    #[test]
    fn alert_html_contains_message() {
        let html = Alert::error("Transaction not found.").into_html().into_string();

        assert!(html.contains("Transaction not found."));
        assert!(html.contains(r#"data-kind="error""#));
    }
}
