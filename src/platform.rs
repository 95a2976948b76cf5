//! Platform Ports
//!
//! Seams for device collaborators this crate consumes but does not
//! implement. The embedding shell provides the real implementations;
//! tests provide fixed ones.

use async_trait::async_trait;

use crate::filter::Coordinates;

/// Device location service. Yields None when no fix is available,
/// which downstream distance filtering treats as "exclude" (fail
/// closed), never "include".
#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_location(&self) -> Option<Coordinates>;
}

/// A fixed location, useful for tests and simulators
pub struct FixedLocation(pub Coordinates);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_location(&self) -> Option<Coordinates> {
        Some(self.0)
    }
}
