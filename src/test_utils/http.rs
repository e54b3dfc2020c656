use axum::{
    body::Body,
    http::{StatusCode, header},
    response::Response,
};

/// The content type maud sets on rendered markup.
const HTML_CONTENT_TYPE: &str = "text/html; charset=utf-8";

#[track_caller]
pub(crate) fn assert_status_ok(response: &Response<Body>) {
    assert_eq!(response.status(), StatusCode::OK);
}

#[track_caller]
pub(crate) fn assert_html(response: &Response<Body>) {
    let content_type = response
        .headers()
        .get(header::CONTENT_TYPE)
        .expect("content-type header missing");
    assert_eq!(content_type, HTML_CONTENT_TYPE);
}

/// Assert that `response` is a "303 See Other" redirect to `location`.
#[track_caller]
pub(crate) fn assert_redirect(response: &Response<Body>, location: &str) {
    assert_eq!(response.status(), StatusCode::SEE_OTHER);

    let got = response
        .headers()
        .get(header::LOCATION)
        .expect("location header missing")
        .to_str()
        .expect("Could not convert to str");
    assert_eq!(got, location);
}
