//! Port for checking that driven dependencies can serve requests.

use async_trait::async_trait;

use super::define_port_error;

define_port_error! {
    /// Errors raised by readiness probes.
    pub enum ReadinessProbeError {
        /// The dependency could not be reached or did not answer.
        Unavailable { message: String } =>
            "dependency unavailable: {message}",
    }
}

/// Readiness check run on every `/health/ready` request.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReadinessProbe: Send + Sync {
    /// Return `Ok` when the dependency answers a trivial round trip.
    async fn check(&self) -> Result<(), ReadinessProbeError>;
}

/// Fixture probe that always reports ready.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureReadinessProbe;

#[async_trait]
impl ReadinessProbe for FixtureReadinessProbe {
    async fn check(&self) -> Result<(), ReadinessProbeError> {
        Ok(())
    }
}
