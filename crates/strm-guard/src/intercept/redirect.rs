//! Redirect emission towards an error video.

use bytes::Bytes;
use http_body_util::combinators::BoxBody;
use hyper::header::{CONTENT_TYPE, LOCATION};
use hyper::http::header::InvalidHeaderValue;
use hyper::http::HeaderValue;
use hyper::{Method, Response, StatusCode};

use crate::response::ResponseBuilder;

/// Join the video base path and filename into a `Location` target.
///
/// A trailing `/` on the base is not doubled. Bytes that cannot appear in a
/// header value (controls, non-ASCII) are percent-escaped; everything else is
/// left as configured.
pub fn video_location(video_path: &str, video: &str) -> String {
    let base = video_path.trim_end_matches('/');
    escape_location(&format!("{base}/{video}"))
}

fn escape_location(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for byte in raw.bytes() {
        if byte < 0x20 || byte >= 0x7f {
            escaped.push_str(&format!("%{byte:02X}"));
        } else {
            escaped.push(byte as char);
        }
    }
    escaped
}

fn html_escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&#34;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}

/// Build a 307 to `location`. Every redirect is labelled `text/html`, but only
/// `GET` gets the one-line HTML body.
pub fn redirect_response<E>(
    method: &Method,
    location: &str,
) -> Result<Response<BoxBody<Bytes, E>>, InvalidHeaderValue> {
    let mut builder = ResponseBuilder::new(StatusCode::TEMPORARY_REDIRECT)
        .header(LOCATION, HeaderValue::from_str(location)?)
        .header(
            CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        );

    if *method == Method::GET {
        builder = builder.body(format!(
            "<a href=\"{}\">Temporary Redirect</a>.\n",
            html_escape(location)
        ));
    }

    Ok(builder.build_boxed())
}
