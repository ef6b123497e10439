use serde::{Deserialize, Serialize};

/// Well-known id of WGS84 geographic coordinates.
pub const WGS84_WKID: u32 = 4326;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpatialReference {
    pub wkid: u32,
}

impl SpatialReference {
    pub const WGS84: SpatialReference = SpatialReference { wkid: WGS84_WKID };
}

impl Default for SpatialReference {
    fn default() -> Self {
        Self::WGS84
    }
}

/// Geographic coordinate in degrees.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct LonLat {
    pub lon: f64,
    pub lat: f64,
}

impl LonLat {
    pub const fn new(lon: f64, lat: f64) -> Self {
        Self { lon, lat }
    }

    /// Builds a coordinate from optional attribute columns.
    ///
    /// Returns `None` if either axis is missing or the pair is outside the
    /// geographic domain.
    pub fn from_parts(lon: Option<f64>, lat: Option<f64>) -> Option<Self> {
        let p = Self::new(lon?, lat?);
        p.is_valid().then_some(p)
    }

    pub fn is_valid(&self) -> bool {
        self.lon.is_finite()
            && self.lat.is_finite()
            && (-180.0..=180.0).contains(&self.lon)
            && (-90.0..=90.0).contains(&self.lat)
    }

    /// `[lon, lat]`, the GeoJSON / map-engine path vertex order.
    pub fn to_array(self) -> [f64; 2] {
        [self.lon, self.lat]
    }
}
