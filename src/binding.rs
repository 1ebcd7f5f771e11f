use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::header::CONTENT_TYPE,
};
use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Decode a request body into `T` based on its Content-Type. Accepts JSON and
/// form-encoded payloads; a missing Content-Type is read as JSON.
pub fn bind_body<T: DeserializeOwned>(
    content_type: Option<&str>,
    body: &[u8],
) -> Result<T, ApiError> {
    let mime = content_type.unwrap_or("application/json").to_ascii_lowercase();
    if mime.starts_with("application/json") {
        serde_json::from_slice(body).map_err(|e| ApiError::Malformed(e.to_string()))
    } else if mime.starts_with("application/x-www-form-urlencoded") {
        serde_urlencoded::from_bytes(body).map_err(|e| ApiError::Malformed(e.to_string()))
    } else {
        Err(ApiError::Malformed(format!(
            "unsupported content type: {mime}"
        )))
    }
}

/// Body extractor wrapping [`bind_body`].
pub struct Payload<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for Payload<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let content_type = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(|s| s.to_string());
        let bytes = Bytes::from_request(req, state)
            .await
            .map_err(|e| ApiError::Malformed(e.to_string()))?;
        bind_body(content_type.as_deref(), &bytes).map(Payload)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Default, Deserialize, PartialEq)]
    #[serde(default)]
    struct Body {
        nama_lengkap: String,
        email: String,
    }

    #[test]
    fn binds_json() {
        let body: Body = bind_body(
            Some("application/json"),
            br#"{"nama_lengkap":"Alice Example","email":"alice@example.com"}"#,
        )
        .unwrap();
        assert_eq!(body.nama_lengkap, "Alice Example");
        assert_eq!(body.email, "alice@example.com");
    }

    #[test]
    fn binds_json_with_charset_parameter() {
        let body: Body =
            bind_body(Some("application/json; charset=utf-8"), br#"{"email":"a@b.co"}"#).unwrap();
        assert_eq!(body.email, "a@b.co");
    }

    #[test]
    fn binds_form_encoded() {
        let body: Body = bind_body(
            Some("application/x-www-form-urlencoded"),
            b"nama_lengkap=Alice+Example&email=alice%40example.com",
        )
        .unwrap();
        assert_eq!(body.nama_lengkap, "Alice Example");
        assert_eq!(body.email, "alice@example.com");
    }

    #[test]
    fn missing_content_type_is_read_as_json() {
        let body: Body = bind_body(None, br#"{"email":"a@b.co"}"#).unwrap();
        assert_eq!(body.email, "a@b.co");
    }

    #[test]
    fn absent_fields_default_to_empty() {
        let body: Body = bind_body(Some("application/json"), b"{}").unwrap();
        assert_eq!(body, Body::default());
    }

    #[test]
    fn invalid_json_is_malformed() {
        let err = bind_body::<Body>(Some("application/json"), b"{not json").unwrap_err();
        assert!(matches!(err, ApiError::Malformed(_)));
    }

    #[test]
    fn unsupported_content_type_is_malformed() {
        let err = bind_body::<Body>(Some("text/xml"), b"<user/>").unwrap_err();
        match err {
            ApiError::Malformed(msg) => assert!(msg.contains("text/xml")),
            other => panic!("expected Malformed, got {other:?}"),
        }
    }
}
