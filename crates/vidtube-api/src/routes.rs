//! Router assembly.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, patch, post};
use axum::Router;
use metrics_exporter_prometheus::PrometheusHandle;

use crate::handlers::{health, tweets, videos};
use crate::middleware::{cors_layer, request_id, request_logging};
use crate::state::AppState;

/// Build the application router.
///
/// The metrics route is mounted only when a Prometheus handle was
/// installed at startup.
pub fn create_router(state: AppState, metrics_handle: Option<PrometheusHandle>) -> Router {
    let tweet_routes = Router::new()
        .route("/", post(tweets::create_tweet))
        .route("/user/:userId", get(tweets::get_user_tweets))
        .route(
            "/:tweetId",
            patch(tweets::update_tweet).delete(tweets::delete_tweet),
        );

    let video_routes = Router::new()
        .route("/", post(videos::publish_video).get(videos::list_videos))
        .route(
            "/:videoId",
            get(videos::get_video)
                .patch(videos::update_video)
                .delete(videos::delete_video),
        )
        .route("/:videoId/toggle-publish", patch(videos::toggle_publish));

    let api = Router::new()
        .nest("/tweets", tweet_routes)
        .nest("/videos", video_routes);

    let mut router = Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .nest("/api/v1", api);

    if let Some(handle) = metrics_handle {
        router = router.route("/metrics", get(move || async move { handle.render() }));
    }

    router
        .layer(axum::middleware::from_fn(request_logging))
        .layer(axum::middleware::from_fn(request_id))
        .layer(cors_layer(&state.config.cors_origins))
        .layer(DefaultBodyLimit::max(state.config.max_body_size))
        .with_state(state)
}
