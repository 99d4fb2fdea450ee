//! Global request rate limiting for `/api`

use axum::{
    body::Body,
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Response},
};
use governor::{Quota, RateLimiter, clock::DefaultClock, state::InMemoryState, state::NotKeyed};
use std::num::NonZeroU32;
use std::sync::Arc;

use crate::error::AppError;

/// Limiter shared by every request through an `Extension`
pub type SharedRateLimiter = Arc<RateLimiter<NotKeyed, InMemoryState, DefaultClock>>;

/// Limiter allowing `requests_per_second` (at least one) with an equal burst.
pub fn create_rate_limiter(requests_per_second: u32) -> SharedRateLimiter {
    let rate = NonZeroU32::new(requests_per_second).unwrap_or(NonZeroU32::MIN);
    Arc::new(RateLimiter::direct(Quota::per_second(rate)))
}

/// Answer 429 once the shared quota is spent.
pub async fn rate_limit_middleware(request: Request<Body>, next: Next) -> Response {
    let Some(limiter) = request.extensions().get::<SharedRateLimiter>().cloned() else {
        return next.run(request).await;
    };

    if limiter.check().is_err() {
        metrics::counter!("rate_limited_requests_total").increment(1);
        tracing::warn!(path = %request.uri().path(), "Rate limit exceeded");
        return AppError::TooManyRequests("Rate limit exceeded. Please try again later.".to_string())
            .into_response();
    }

    next.run(request).await
}
