use std::future::Future;

use crate::error::GeolocationError;
use crate::types::workout::Coords;

pub trait Geolocator {
    fn current_position(&self) -> impl Future<Output = Result<Coords, GeolocationError>> + Send;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(pub Option<Coords>);

impl FixedLocation {
    pub fn at(coords: Coords) -> Self {
        Self(Some(coords))
    }

    pub fn unavailable() -> Self {
        Self(None)
    }
}

impl Geolocator for FixedLocation {
    fn current_position(&self) -> impl Future<Output = Result<Coords, GeolocationError>> + Send {
        let position = self.0;
        async move {
            position.ok_or_else(|| GeolocationError::Unavailable("no fixed location configured".to_string()))
        }
    }
}
