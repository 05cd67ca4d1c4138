//! Query string extractor that rejects with the error envelope.

use axum::{
    async_trait,
    extract::{FromRequestParts, Query},
    http::request::Parts,
};
use serde::de::DeserializeOwned;

use crate::error::ApiError;

/// Deserializes the query string like [`Query`].
///
/// A query string that does not fit `T` (a repeated key, for instance) is
/// rejected with [`ApiError::Validation`] instead of axum's plain-text body.
#[derive(Debug, Clone, Copy, Default)]
pub struct QueryParams<T>(pub T);

#[async_trait]
impl<T, S> FromRequestParts<S> for QueryParams<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match Query::<T>::try_from_uri(&parts.uri) {
            Ok(Query(params)) => Ok(QueryParams(params)),
            Err(rejection) => {
                let message = rejection.body_text();
                tracing::info!(
                    method = %parts.method,
                    path = %parts.uri.path(),
                    error = %message,
                    "Rejected query string"
                );
                Err(ApiError::Validation(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Params {
        id: Option<String>,
    }

    async fn extract(uri: &str) -> Result<QueryParams<Params>, ApiError> {
        let (mut parts, _) = Request::builder().uri(uri).body(()).unwrap().into_parts();
        QueryParams::<Params>::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn test_extracts_params() {
        let QueryParams(params) = extract("/x?id=abc&other=1").await.unwrap();
        assert_eq!(params.id.as_deref(), Some("abc"));

        let QueryParams(params) = extract("/x").await.unwrap();
        assert!(params.id.is_none());
    }

    #[tokio::test]
    async fn test_repeated_key_is_validation_error() {
        let err = extract("/x?id=a&id=b").await.unwrap_err();
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("duplicate field `id`"), "{err}");
    }
}
