use std::panic::AssertUnwindSafe;

use axum::{
    extract::Request,
    middleware::{from_fn, Next},
    response::Response,
    Router,
};
use futures::FutureExt;
use tracing::error;

/// Catch panics of the wrapped handlers and answer with `fallback` instead of
/// dropping the connection.
pub fn add<S: Clone + Send + Sync + 'static>(
    router: Router<S>,
    fallback: fn() -> Response,
) -> Router<S> {
    router.layer(from_fn(move |request: Request, next: Next| {
        middleware(request, next, fallback)
    }))
}

async fn middleware(request: Request, next: Next, fallback: fn() -> Response) -> Response {
    match AssertUnwindSafe(next.run(request)).catch_unwind().await {
        Ok(response) => response,
        Err(_) => {
            error!("request handler panicked");
            fallback()
        }
    }
}
