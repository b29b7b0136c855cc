use serde::{Deserialize, Serialize};

/// Represents a geographical coordinate with latitude and longitude
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }

    /// Validates that the coordinates are within valid WGS-84 ranges
    pub fn is_valid(&self) -> bool {
        self.lat >= -90.0 && self.lat <= 90.0 && self.lng >= -180.0 && self.lng <= 180.0
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

impl std::fmt::Display for LatLng {
    /// Renders the pair to four decimal places, the precision used in
    /// popups and notices
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.4}, {:.4}", self.lat, self.lng)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_validity() {
        assert!(LatLng::new(24.4359, 77.1589).is_valid());
        assert!(LatLng::new(-90.0, 180.0).is_valid());
        assert!(!LatLng::new(90.5, 0.0).is_valid());
        assert!(!LatLng::new(0.0, -180.5).is_valid());
    }

    #[test]
    fn test_lat_lng_display() {
        let pos = LatLng::new(40.715, -74.007);
        assert_eq!(pos.to_string(), "40.7150, -74.0070");
    }
}
