//! Tweet lifecycle handlers.

use axum::extract::{Path, State};
use axum::response::IntoResponse;
use axum::Json;
use serde::Deserialize;
use validator::Validate;

use vidtube_models::Tweet;

use crate::auth::AuthUser;
use crate::error::{ApiError, ApiResult};
use crate::metrics::record_request;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize, Validate)]
pub struct TweetBody {
    #[validate(length(min = 1, message = "content must not be empty"))]
    pub content: String,
}

/// Validate a tweet body and return the content that gets persisted.
///
/// Length validation runs on the trimmed text so whitespace-only content
/// is rejected the same way empty content is.
fn validated_content(body: &TweetBody) -> ApiResult<&str> {
    body.validate()
        .map_err(|e| ApiError::Validation(e.to_string()))?;

    let content = body.content.trim();
    if content.is_empty() {
        return Err(ApiError::Validation("content must not be empty".to_string()));
    }
    Ok(content)
}

/// `POST /tweets`
pub async fn create_tweet(
    State(state): State<AppState>,
    user: AuthUser,
    Json(body): Json<TweetBody>,
) -> ApiResult<impl IntoResponse> {
    let content = validated_content(&body)?;

    let tweet = Tweet::new(content, user.id);
    let created = state.db.tweets().insert(&tweet).await?;

    record_request("tweets", 201);
    Ok(ApiResponse::created(created, "Tweet created successfully"))
}

/// `GET /tweets/user/{userId}`
pub async fn get_user_tweets(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let owner = vidtube_db::parse_object_id(&user_id)?;
    let tweets = state.db.tweets().find_by_owner(&owner).await?;

    record_request("tweets", 200);
    // An owner with no tweets is an empty page, not an error
    Ok(ApiResponse::ok(tweets, "Tweets fetched successfully"))
}

/// `PATCH /tweets/{tweetId}`
///
/// The owner-scoped probe deliberately conflates "does not exist" with
/// "not yours": both come back 403 so callers cannot test for existence
/// of other users' tweets.
pub async fn update_tweet(
    State(state): State<AppState>,
    user: AuthUser,
    Path(tweet_id): Path<String>,
    Json(body): Json<TweetBody>,
) -> ApiResult<impl IntoResponse> {
    let content = validated_content(&body)?;

    let id = vidtube_db::parse_object_id(&tweet_id)?;
    let repo = state.db.tweets();

    repo.find_owned(&id, &user.id)
        .await?
        .ok_or_else(|| ApiError::forbidden("Only the owner can update this tweet"))?;

    let updated = repo
        .update_content(&id, content)
        .await?
        .ok_or_else(|| ApiError::internal("tweet update persisted nothing"))?;

    record_request("tweets", 200);
    Ok(ApiResponse::ok(updated, "Tweet updated successfully"))
}

/// `DELETE /tweets/{tweetId}`
pub async fn delete_tweet(
    State(state): State<AppState>,
    user: AuthUser,
    Path(tweet_id): Path<String>,
) -> ApiResult<impl IntoResponse> {
    let id = vidtube_db::parse_object_id(&tweet_id)?;
    let repo = state.db.tweets();

    repo.find_owned(&id, &user.id)
        .await?
        .ok_or_else(|| ApiError::forbidden("Only the owner can delete this tweet"))?;

    let deleted = repo
        .delete_by_id(&id)
        .await?
        .ok_or_else(|| ApiError::internal("tweet delete removed nothing"))?;

    record_request("tweets", 200);
    Ok(ApiResponse::ok(deleted, "Tweet deleted successfully"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn body(content: &str) -> TweetBody {
        TweetBody {
            content: content.to_string(),
        }
    }

    #[test]
    fn content_is_trimmed_before_persisting() {
        assert_eq!(validated_content(&body("  hello world  ")).unwrap(), "hello world");
        assert_eq!(validated_content(&body("hi")).unwrap(), "hi");
    }

    #[test]
    fn empty_content_is_rejected() {
        let err = validated_content(&body("")).unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[test]
    fn whitespace_only_content_is_rejected() {
        for raw in ["   ", "\t", "\n\n", " \t \n "] {
            let err = validated_content(&body(raw)).unwrap_err();
            assert!(matches!(err, ApiError::Validation(_)), "accepted {raw:?}");
        }
    }
}
