//! The request-serving pipeline: path → key → metadata → conditional
//! evaluation → headers → streamed body.
//!
//! Bodies are streamed in bounded chunks straight from the store to the
//! client, so proxy memory stays flat regardless of object size. Failures
//! before the first body byte become JSON error responses; failures after
//! the response is committed close the connection (see
//! `services::delivery`).

use std::time::Instant;

use axum::{
    body::Body,
    extract::State,
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode, Uri, header},
    response::Response,
};

use crate::{
    conditional::{self, Decision, RequestValidators},
    errors::ProxyError,
    models::{attrs::ObjectAttrs, delivery::DeliveryOutcome},
    policy,
    resolve,
    services::{delivery::MonitoredStream, proxy_service::ProxyService},
};

const HEADER_PROXY_CACHE: HeaderName = HeaderName::from_static("x-proxy-cache");
const HEADER_GCS_OBJECT: HeaderName = HeaderName::from_static("x-gcs-object");
const HEADER_RESPONSE_TIME: HeaderName = HeaderName::from_static("x-response-time");

/// `GET /{path}` — proxy a stored object.
pub async fn proxy_object(
    State(service): State<ProxyService>,
    uri: Uri,
    headers: HeaderMap,
) -> Result<Response, ProxyError> {
    let started = Instant::now();
    let key = resolve::resolve(uri.path());
    tracing::debug!(key = %key, "proxying request");

    let attrs = service.stat(&key).await?;

    let validators = RequestValidators::from_headers(&headers);
    if conditional::evaluate(&validators, &attrs) == Decision::NotModified {
        tracing::info!(
            key = %key,
            etag = %attrs.etag,
            outcome = ?DeliveryOutcome::NotModified,
            "not modified"
        );
        return Ok(not_modified(&attrs));
    }

    // Open the stream before committing the response: an open failure at
    // this point can still be reported as a clean 500.
    let stream = service.open(&key).await?;
    let monitored = MonitoredStream::new(stream, key.clone(), attrs.size, started);

    let mut response = Response::new(Body::from_stream(monitored));
    write_object_headers(response.headers_mut(), &key, &attrs, started);
    Ok(response)
}

/// 304 carries the validator and nothing else: no body, no content headers.
fn not_modified(attrs: &ObjectAttrs) -> Response {
    let mut response = Response::new(Body::empty());
    *response.status_mut() = StatusCode::NOT_MODIFIED;
    if let Ok(value) = HeaderValue::from_str(&attrs.etag) {
        response.headers_mut().insert(header::ETAG, value);
    }
    response
}

fn write_object_headers(
    headers: &mut HeaderMap,
    key: &str,
    attrs: &ObjectAttrs,
    started: Instant,
) {
    let policy = policy::policy_for(key);
    headers.insert(
        header::CONTENT_TYPE,
        HeaderValue::from_static(policy.content_type),
    );
    headers.insert(
        header::CACHE_CONTROL,
        HeaderValue::from_static(policy.cache_control),
    );
    if let Ok(value) = HeaderValue::from_str(&attrs.etag) {
        headers.insert(header::ETAG, value);
    }
    if let Ok(value) = HeaderValue::from_str(&conditional::fmt_http_date(attrs.last_modified)) {
        headers.insert(header::LAST_MODIFIED, value);
    }
    headers.insert(
        header::CONTENT_LENGTH,
        HeaderValue::from_str(&attrs.size.to_string())
            .unwrap_or_else(|_| HeaderValue::from_static("0")),
    );
    headers.insert(HEADER_PROXY_CACHE, HeaderValue::from_static("MISS"));
    if let Ok(value) = HeaderValue::from_str(key) {
        headers.insert(HEADER_GCS_OBJECT, value);
    }
    if let Ok(value) = HeaderValue::from_str(&format!("{:?}", started.elapsed())) {
        headers.insert(HEADER_RESPONSE_TIME, value);
    }
}
