pub mod v1;


use std::sync::Arc;

use axum::{
    extract::State,
    http::{header, HeaderValue},
    middleware,
    routing::get,
    Router,
};
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};

use crate::delivery::http::v1::bookmarks::{
    create_bookmark, delete_bookmark, get_bookmark, list_bookmarks, update_bookmark,
};
use crate::delivery::http::v1::middleware::{bearer_auth, expose_internal_error_detail};
use crate::usecase::contracts::BookmarkRepository;
use crate::AppState;

pub fn router<R: BookmarkRepository + 'static>(state: Arc<AppState<R>>) -> Router {
    // Everything under /bookmarks requires the API token
    let bookmarks_api = Router::new()
        .route(
            "/bookmarks",
            get(list_bookmarks::<R>).post(create_bookmark::<R>),
        )
        .route(
            "/bookmarks/{id}",
            get(get_bookmark::<R>)
                .patch(update_bookmark::<R>)
                .delete(delete_bookmark::<R>),
        )
        .layer(middleware::from_fn_with_state(
            state.api_token.clone(),
            bearer_auth,
        ));

    let mut router = Router::new()
        .route("/healthz", get(healthz))
        .route("/metrics", get(render_metrics::<R>))
        .merge(bookmarks_api);

    if !state.app_env.is_production() {
        router = router.layer(middleware::map_response(expose_internal_error_detail));
    }

    router
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(SetResponseHeaderLayer::overriding(
            header::X_CONTENT_TYPE_OPTIONS,
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_FRAME_OPTIONS,
            HeaderValue::from_static("SAMEORIGIN"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_DNS_PREFETCH_CONTROL,
            HeaderValue::from_static("off"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::REFERRER_POLICY,
            HeaderValue::from_static("no-referrer"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            header::X_XSS_PROTECTION,
            HeaderValue::from_static("0"),
        ))
        .with_state(state)
}

async fn render_metrics<R: BookmarkRepository + 'static>(
    State(state): State<Arc<AppState<R>>>,
) -> String {
    metrics_process::Collector::default().collect();
    state.metrics_handle.render()
}

#[tracing::instrument]
async fn healthz() -> &'static str {
    "OK"
}
