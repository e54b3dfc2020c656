#![allow(missing_docs)]

pub(crate) mod backend;
pub(crate) mod html;
pub(crate) mod http;

pub(crate) use backend::{StubBackend, full_data, sample_data, sample_payload};
pub(crate) use html::{
    assert_valid_html, count_matches, parse_html_document, parse_html_fragment, select_text,
};
pub(crate) use http::{assert_html, assert_redirect, assert_status_ok};
