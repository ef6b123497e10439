use serde::{Deserialize, Serialize};

/// RGBA color with 8-bit channels and a unit-interval alpha.
///
/// Serializes as `[r, g, b, a]`, the array form map engines expect in symbol
/// descriptors.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "(u8, u8, u8, f32)", into = "(u8, u8, u8, f32)")]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::new(255, 255, 255, 1.0);

    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn with_alpha(self, a: f32) -> Self {
        Self { a, ..self }
    }

    /// Linear interpolation towards `to`.
    ///
    /// `t` is clamped to `[0, 1]`; a non-finite `t` yields `self`, so the
    /// result never carries NaN channels.
    pub fn lerp(self, to: Rgba, t: f64) -> Rgba {
        let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.0 };
        let channel = |a: u8, b: u8| -> u8 {
            let v = a as f64 + (b as f64 - a as f64) * t;
            v.round().clamp(0.0, 255.0) as u8
        };
        Rgba {
            r: channel(self.r, to.r),
            g: channel(self.g, to.g),
            b: channel(self.b, to.b),
            a: (self.a as f64 + (to.a as f64 - self.a as f64) * t) as f32,
        }
    }

    pub fn to_css(self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::WHITE
    }
}

impl From<(u8, u8, u8, f32)> for Rgba {
    fn from((r, g, b, a): (u8, u8, u8, f32)) -> Self {
        Self { r, g, b, a }
    }
}

impl From<Rgba> for (u8, u8, u8, f32) {
    fn from(c: Rgba) -> Self {
        (c.r, c.g, c.b, c.a)
    }
}

#[cfg(test)]
mod tests {
    use super::Rgba;

    const LOW: Rgba = Rgba::new(0, 100, 200, 0.5);
    const HIGH: Rgba = Rgba::new(200, 0, 100, 0.5);

    #[test]
    fn lerp_hits_endpoints_and_midpoint() {
        assert_eq!(LOW.lerp(HIGH, 0.0), LOW);
        assert_eq!(LOW.lerp(HIGH, 1.0), HIGH);
        assert_eq!(LOW.lerp(HIGH, 0.5), Rgba::new(100, 50, 150, 0.5));
    }

    #[test]
    fn lerp_clamps_and_rejects_non_finite() {
        assert_eq!(LOW.lerp(HIGH, 7.0), HIGH);
        assert_eq!(LOW.lerp(HIGH, -3.0), LOW);
        assert_eq!(LOW.lerp(HIGH, f64::NAN), LOW);
        assert_eq!(LOW.lerp(HIGH, f64::INFINITY), LOW);
    }

    #[test]
    fn serializes_as_array() {
        let json = serde_json::to_string(&Rgba::new(1, 2, 3, 0.5)).unwrap();
        assert_eq!(json, "[1,2,3,0.5]");
        let back: Rgba = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Rgba::new(1, 2, 3, 0.5));
    }
}
