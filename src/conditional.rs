//! Conditional-request evaluation: decides 304 Not Modified vs full delivery.
//!
//! ETag comparison runs first; a matching `If-None-Match` wins regardless of
//! any date validator. A mismatched or absent ETag falls through to the
//! `If-Modified-Since` check, and an unparsable date is treated as no
//! condition at all rather than an error (matching common origin behavior;
//! HTTP semantics for malformed validators are ambiguous).

use axum::http::{HeaderMap, header};
use chrono::{DateTime, Utc};

use crate::models::attrs::ObjectAttrs;

/// Validators extracted from the request headers; both optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestValidators {
    pub if_none_match: Option<String>,
    pub if_modified_since: Option<DateTime<Utc>>,
}

impl RequestValidators {
    /// Pull `If-None-Match` / `If-Modified-Since` out of the header map.
    /// Values that are not valid UTF-8 or not valid HTTP dates are dropped.
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let if_none_match = headers
            .get(header::IF_NONE_MATCH)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        let if_modified_since = headers
            .get(header::IF_MODIFIED_SINCE)
            .and_then(|v| v.to_str().ok())
            .and_then(parse_http_date);

        Self {
            if_none_match,
            if_modified_since,
        }
    }
}

/// Outcome of conditional evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    /// Respond 304 with no body.
    NotModified,
    /// Deliver the full object.
    Proceed,
}

/// Evaluate request validators against object metadata.
///
/// Precedence: exact `If-None-Match` equality first (no weak/strong
/// comparator handling); otherwise `If-Modified-Since` applies when the
/// object has not been modified strictly after the given time.
pub fn evaluate(validators: &RequestValidators, attrs: &ObjectAttrs) -> Decision {
    if let Some(if_none_match) = &validators.if_none_match {
        if *if_none_match == attrs.etag {
            return Decision::NotModified;
        }
    }

    if let Some(if_modified_since) = validators.if_modified_since {
        if attrs.last_modified <= if_modified_since {
            return Decision::NotModified;
        }
    }

    Decision::Proceed
}

/// Parse an RFC 1123 HTTP date (`Tue, 15 Nov 1994 08:12:31 GMT`).
/// Returns `None` on any parse failure.
pub fn parse_http_date(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc2822(value)
        .ok()
        .map(|dt| dt.with_timezone(&Utc))
}

/// Format a timestamp as an RFC 1123 HTTP date for `Last-Modified`.
pub fn fmt_http_date(value: DateTime<Utc>) -> String {
    value.format("%a, %d %b %Y %H:%M:%S GMT").to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use chrono::TimeZone;

    fn attrs(etag: &str, modified: DateTime<Utc>) -> ObjectAttrs {
        ObjectAttrs {
            etag: etag.to_string(),
            last_modified: modified,
            size: 42,
        }
    }

    fn ts(secs: i64) -> DateTime<Utc> {
        Utc.timestamp_opt(secs, 0).unwrap()
    }

    #[test]
    fn matching_etag_is_not_modified() {
        let validators = RequestValidators {
            if_none_match: Some("\"abc\"".into()),
            if_modified_since: None,
        };
        assert_eq!(
            evaluate(&validators, &attrs("\"abc\"", ts(1_700_000_000))),
            Decision::NotModified
        );
    }

    #[test]
    fn etag_match_wins_over_newer_modification_date() {
        // Object modified after If-Modified-Since, but the ETag still
        // matches: strong validator takes precedence.
        let validators = RequestValidators {
            if_none_match: Some("\"abc\"".into()),
            if_modified_since: Some(ts(1_600_000_000)),
        };
        assert_eq!(
            evaluate(&validators, &attrs("\"abc\"", ts(1_700_000_000))),
            Decision::NotModified
        );
    }

    #[test]
    fn etag_mismatch_falls_through_to_date_check() {
        let validators = RequestValidators {
            if_none_match: Some("\"old\"".into()),
            if_modified_since: Some(ts(1_800_000_000)),
        };
        assert_eq!(
            evaluate(&validators, &attrs("\"abc\"", ts(1_700_000_000))),
            Decision::NotModified
        );

        let validators = RequestValidators {
            if_none_match: Some("\"old\"".into()),
            if_modified_since: None,
        };
        assert_eq!(
            evaluate(&validators, &attrs("\"abc\"", ts(1_700_000_000))),
            Decision::Proceed
        );
    }

    #[test]
    fn etag_comparison_is_exact_string_equality() {
        let validators = RequestValidators {
            if_none_match: Some("abc".into()),
            if_modified_since: None,
        };
        // unquoted vs quoted: no match
        assert_eq!(
            evaluate(&validators, &attrs("\"abc\"", ts(1_700_000_000))),
            Decision::Proceed
        );
    }

    #[test]
    fn unmodified_since_given_date_is_not_modified() {
        let modified = ts(1_700_000_000);
        for since in [modified, ts(1_700_000_500)] {
            let validators = RequestValidators {
                if_none_match: None,
                if_modified_since: Some(since),
            };
            assert_eq!(
                evaluate(&validators, &attrs("\"abc\"", modified)),
                Decision::NotModified
            );
        }
    }

    #[test]
    fn modified_after_given_date_proceeds() {
        let validators = RequestValidators {
            if_none_match: None,
            if_modified_since: Some(ts(1_600_000_000)),
        };
        assert_eq!(
            evaluate(&validators, &attrs("\"abc\"", ts(1_700_000_000))),
            Decision::Proceed
        );
    }

    #[test]
    fn no_validators_proceeds() {
        assert_eq!(
            evaluate(&RequestValidators::default(), &attrs("\"abc\"", ts(0))),
            Decision::Proceed
        );
    }

    #[test]
    fn unparsable_if_modified_since_is_dropped() {
        let mut headers = HeaderMap::new();
        headers.insert(
            header::IF_MODIFIED_SINCE,
            HeaderValue::from_static("not a date"),
        );
        let validators = RequestValidators::from_headers(&headers);
        assert_eq!(validators.if_modified_since, None);
        assert_eq!(
            evaluate(&validators, &attrs("\"abc\"", ts(1_700_000_000))),
            Decision::Proceed
        );
    }

    #[test]
    fn extracts_both_validators_from_headers() {
        let mut headers = HeaderMap::new();
        headers.insert(header::IF_NONE_MATCH, HeaderValue::from_static("\"v1\""));
        headers.insert(
            header::IF_MODIFIED_SINCE,
            HeaderValue::from_static("Tue, 15 Nov 1994 08:12:31 GMT"),
        );
        let validators = RequestValidators::from_headers(&headers);
        assert_eq!(validators.if_none_match.as_deref(), Some("\"v1\""));
        assert_eq!(
            validators.if_modified_since,
            Some(Utc.with_ymd_and_hms(1994, 11, 15, 8, 12, 31).unwrap())
        );
    }

    #[test]
    fn http_date_round_trip() {
        let date = Utc.with_ymd_and_hms(2025, 3, 9, 17, 30, 5).unwrap();
        let formatted = fmt_http_date(date);
        assert_eq!(formatted, "Sun, 09 Mar 2025 17:30:05 GMT");
        assert_eq!(parse_http_date(&formatted), Some(date));
    }
}
