use axum::{
    body::Body,
    http::{HeaderMap, StatusCode},
    response::Response,
};
use axum_extra::extract::{
    PrivateCookieJar,
    cookie::{Cookie, Key},
};

use crate::alert::{Alert, take_flash};

#[track_caller]
pub(crate) fn assert_status_ok(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::OK);
}

#[track_caller]
pub(crate) fn get_header(response: &Response<Body>, header_name: &str) -> String {
    let header_error_message = format!("Headers missing {header_name}");

    response
        .headers()
        .get(header_name)
        .expect(&header_error_message)
        .to_str()
        .expect("Could not convert to str")
        .to_string()
}

#[track_caller]
pub(crate) fn assert_redirect(response: &Response<Body>, endpoint: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(get_header(response, "location"), endpoint);
}

/// Decrypt the flash alert that `response` sets, as the next request would see it.
#[track_caller]
pub(crate) fn get_flash(response: &Response<Body>, key: Key) -> Option<Alert> {
    let mut request_headers = HeaderMap::new();

    for value in response.headers().get_all("set-cookie") {
        let cookie = Cookie::parse(value.to_str().expect("Could not convert to str"))
            .expect("Could not parse cookie");
        request_headers.append(
            "cookie",
            format!("{}={}", cookie.name(), cookie.value())
                .parse()
                .expect("Could not create cookie header"),
        );
    }

    let jar = PrivateCookieJar::from_headers(&request_headers, key);
    let (_, alert) = take_flash(jar);

    alert
}
