use axum::Router;
use tower_http::cors::{Any, CorsLayer};

/// The contact form is posted from the static site, which may be served from
/// a different origin than this API.
pub fn add<S: Clone + Send + Sync + 'static>(router: Router<S>) -> Router<S> {
    router.layer(
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any),
    )
}
