use std::sync::Arc;

use pearl_core::application::PearlService;

use crate::{application::rate_limit::RateLimiter, args::Args};

#[derive(Clone)]
pub struct AppState {
    pub args: Arc<Args>,
    pub service: PearlService,
    pub rate_limiter: RateLimiter,
}

impl AppState {
    pub fn new(args: Arc<Args>, service: PearlService, rate_limiter: RateLimiter) -> Self {
        Self {
            args,
            service,
            rate_limiter,
        }
    }
}
