use std::future::Future;

use crate::domain::{
    common::entities::app_errors::CoreError,
    health::entities::{DatabaseStats, HealthStatus},
};

#[cfg_attr(test, mockall::automock)]
pub trait HealthCheckRepository: Send + Sync {
    /// Round-trips a trivial query and returns its latency in milliseconds.
    fn ping(&self) -> impl Future<Output = Result<u64, CoreError>> + Send;

    fn stats(&self) -> impl Future<Output = Result<DatabaseStats, CoreError>> + Send;
}

pub trait HealthCheckService: Send + Sync {
    /// Always answers; an unreachable database is reported, not raised.
    fn health(&self) -> impl Future<Output = HealthStatus> + Send;

    fn database_stats(&self) -> impl Future<Output = Result<DatabaseStats, CoreError>> + Send;
}
