use std::{
    collections::{HashMap, VecDeque},
    sync::{Arc, Mutex, PoisonError},
    time::{Duration, Instant},
};

use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use pearl_core::domain::authentication::value_objects::Identity;
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

/// Sliding-window request counter keyed by user id.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    requests: Arc<Mutex<HashMap<Uuid, VecDeque<Instant>>>>,
    max_requests: usize,
    window: Duration,
}

impl RateLimiter {
    pub fn new(max_requests: usize, window: Duration) -> Self {
        Self {
            requests: Arc::new(Mutex::new(HashMap::new())),
            max_requests,
            window,
        }
    }

    /// Records a request at `now`, or returns the seconds to wait before retrying.
    ///
    /// Users with no request inside the window are dropped from the table.
    pub fn check(&self, user_id: Uuid, now: Instant) -> Result<(), u64> {
        let mut requests = self.requests.lock().unwrap_or_else(PoisonError::into_inner);

        requests.retain(|_, timestamps| {
            while timestamps
                .front()
                .is_some_and(|t| now.duration_since(*t) >= self.window)
            {
                timestamps.pop_front();
            }
            !timestamps.is_empty()
        });

        let timestamps = requests.entry(user_id).or_default();
        if timestamps.len() >= self.max_requests {
            let retry_after = timestamps
                .front()
                .map(|oldest| (self.window - now.duration_since(*oldest)).as_secs_f64().ceil() as u64)
                .unwrap_or(self.window.as_secs());
            if timestamps.is_empty() {
                requests.remove(&user_id);
            }
            return Err(retry_after.max(1));
        }

        timestamps.push_back(now);
        Ok(())
    }

    #[cfg(test)]
    fn tracked_users(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new(100, Duration::from_secs(15 * 60))
    }
}

/// Runs after `auth`; requests without an identity are not counted.
pub async fn rate_limit(State(limiter): State<RateLimiter>, req: Request, next: Next) -> Response {
    let user_id = req.extensions().get::<Identity>().map(Identity::id);

    if let Some(user_id) = user_id
        && let Err(retry_after) = limiter.check(user_id, Instant::now())
    {
        warn!(user_id = %user_id, retry_after, "rate limit exceeded");
        return (
            StatusCode::TOO_MANY_REQUESTS,
            Json(json!({
                "success": false,
                "message": "Too many requests, please try again later",
                "retryAfter": retry_after,
            })),
        )
            .into_response();
    }

    next.run(req).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        Router,
        http::{HeaderName, HeaderValue},
        middleware,
        routing::get,
    };
    use axum_test::TestServer;
    use pearl_core::domain::user::entities::User;
    use serde_json::Value;

    #[test]
    fn test_window_prunes_old_requests() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let user = Uuid::new_v4();
        let start = Instant::now();

        assert!(limiter.check(user, start).is_ok());
        assert!(limiter.check(user, start + Duration::from_secs(10)).is_ok());
        assert_eq!(limiter.check(user, start + Duration::from_secs(20)), Err(40));
        assert!(limiter.check(Uuid::new_v4(), start).is_ok());
        assert!(limiter.check(user, start + Duration::from_secs(61)).is_ok());
    }

    #[test]
    fn test_idle_users_are_forgotten() {
        let limiter = RateLimiter::new(2, Duration::from_secs(60));
        let start = Instant::now();

        for n in 0..10 {
            assert!(limiter.check(Uuid::from_u128(n), start).is_ok());
        }
        assert_eq!(limiter.tracked_users(), 10);

        let later = start + Duration::from_secs(60);
        assert!(limiter.check(Uuid::from_u128(99), later).is_ok());
        assert_eq!(limiter.tracked_users(), 1);
    }

    #[test]
    fn test_zero_limit_does_not_grow_table() {
        let limiter = RateLimiter::new(0, Duration::from_secs(60));

        assert_eq!(limiter.check(Uuid::new_v4(), Instant::now()), Err(60));
        assert_eq!(limiter.tracked_users(), 0);
    }

    fn test_header() -> HeaderName {
        HeaderName::from_static("x-test-user")
    }

    async fn with_identity(mut req: Request, next: Next) -> Response {
        if req.headers().contains_key("x-test-user") {
            let mut user = User::new(
                "google-1".to_string(),
                "a@example.com".to_string(),
                "A".to_string(),
                None,
            );
            user.id = Uuid::from_u128(1);
            req.extensions_mut().insert(Identity::new(user));
        }
        next.run(req).await
    }

    #[tokio::test]
    async fn test_middleware_rejects_over_limit() {
        let limiter = RateLimiter::new(1, Duration::from_secs(900));
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(limiter, rate_limit))
            .layer(middleware::from_fn(with_identity));
        let server = TestServer::new(app).unwrap();

        server.get("/").add_header(test_header(), HeaderValue::from_static("1")).await.assert_status_ok();

        let rejected = server.get("/").add_header(test_header(), HeaderValue::from_static("1")).await;
        rejected.assert_status(StatusCode::TOO_MANY_REQUESTS);
        let body: Value = rejected.json();
        assert_eq!(body["message"], "Too many requests, please try again later");
        assert!(body["retryAfter"].as_u64().is_some_and(|s| s > 0 && s <= 900));
    }

    #[tokio::test]
    async fn test_anonymous_requests_pass() {
        let limiter = RateLimiter::new(1, Duration::from_secs(900));
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn_with_state(limiter, rate_limit));
        let server = TestServer::new(app).unwrap();

        server.get("/").await.assert_status_ok();
        server.get("/").await.assert_status_ok();
    }
}
