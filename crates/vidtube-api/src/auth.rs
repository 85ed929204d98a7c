//! Caller identity extraction.
//!
//! Identity is resolved upstream (gateway or session layer) and forwarded
//! as the `x-user-id` header. Handlers that mutate owned resources extract
//! [`AuthUser`] and fail with 401 when the header is missing or malformed.

use axum::async_trait;
use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use mongodb::bson::oid::ObjectId;

use crate::error::ApiError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// The authenticated caller.
#[derive(Debug, Clone, Copy)]
pub struct AuthUser {
    pub id: ObjectId,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let raw = parts
            .headers
            .get(USER_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| ApiError::unauthorized("Missing user identity"))?;

        let id = raw
            .parse::<ObjectId>()
            .map_err(|_| ApiError::unauthorized("Invalid user identity"))?;

        Ok(AuthUser { id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(req: Request<()>) -> Result<AuthUser, ApiError> {
        let (mut parts, _) = req.into_parts();
        AuthUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn valid_header_is_accepted() {
        let id = ObjectId::new();
        let req = Request::builder()
            .header(USER_ID_HEADER, id.to_hex())
            .body(())
            .unwrap();
        let user = extract(req).await.unwrap();
        assert_eq!(user.id, id);
    }

    #[tokio::test]
    async fn missing_header_is_unauthorized() {
        let req = Request::builder().body(()).unwrap();
        let err = extract(req).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }

    #[tokio::test]
    async fn malformed_header_is_unauthorized() {
        let req = Request::builder()
            .header(USER_ID_HEADER, "not-an-id")
            .body(())
            .unwrap();
        let err = extract(req).await.unwrap_err();
        assert!(matches!(err, ApiError::Unauthorized(_)));
    }
}
