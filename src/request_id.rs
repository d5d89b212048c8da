use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tracing::{Instrument, info_span};
use uuid::Uuid;

pub const REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-request-id");

/// Tags each request with an id and runs it inside an `http_request` span.
///
/// A client-supplied `x-request-id` is kept; otherwise a UUID v4 is generated.
/// The id is echoed back on the response.
pub async fn inject_request_id(mut req: Request, next: Next) -> Response {
    let supplied = req
        .headers()
        .get(&REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let id = match supplied {
        Some(id) => id,
        None => {
            let id = Uuid::new_v4().to_string();
            if let Ok(val) = HeaderValue::from_str(&id) {
                req.headers_mut().insert(REQUEST_ID_HEADER, val);
            }
            id
        }
    };

    let span = info_span!(
        "http_request",
        trace_id = %id,
        method = %req.method(),
        path = %req.uri().path()
    );

    let mut resp = next.run(req).instrument(span).await;
    if let Ok(val) = HeaderValue::from_str(&id) {
        resp.headers_mut().insert(REQUEST_ID_HEADER, val);
    }
    resp
}
