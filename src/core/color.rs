use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Scale applied per unit of brighten/saturate, in Lab units
const LAB_STEP: f32 = 18.0;

// D65 reference white
const XN: f32 = 0.950_470;
const YN: f32 = 1.0;
const ZN: f32 = 1.088_830;

const T0: f32 = 4.0 / 29.0;
const T1: f32 = 6.0 / 29.0;
const T2: f32 = 3.0 * T1 * T1;
const T3: f32 = T1 * T1 * T1;

/// sRGB color with components in [0, 1]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color(pub Vec3);

impl Color {
    pub const BLACK: Color = Color(Vec3::ZERO);
    pub const WHITE: Color = Color(Vec3::ONE);

    pub fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self(Vec3::new(r, g, b))
    }

    /// Parse `#RRGGBB` or `RRGGBB`
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 || !digits.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
        Some(Self::from_rgb8(channel(0)?, channel(2)?, channel(4)?))
    }

    pub fn from_rgb8(r: u8, g: u8, b: u8) -> Self {
        Self::rgb(r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0)
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        let c = self.0.clamp(Vec3::ZERO, Vec3::ONE) * 255.0;
        [c.x.round() as u8, c.y.round() as u8, c.z.round() as u8]
    }

    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{:02x}{:02x}{:02x}", r, g, b)
    }

    pub fn to_vec3(self) -> Vec3 {
        self.0
    }

    /// Lighten in CIE Lab space (negative amounts darken)
    pub fn brighten(self, amount: f32) -> Self {
        let mut lab = self.to_lab();
        lab.x += LAB_STEP * amount;
        Self::from_lab(lab)
    }

    /// Raise LCh chroma (negative amounts desaturate, floored at grey)
    pub fn saturate(self, amount: f32) -> Self {
        let lab = self.to_lab();
        let chroma = (lab.y * lab.y + lab.z * lab.z).sqrt();
        let hue = lab.z.atan2(lab.y);
        let chroma = (chroma + LAB_STEP * amount).max(0.0);
        Self::from_lab(Vec3::new(lab.x, hue.cos() * chroma, hue.sin() * chroma))
    }

    /// Linear interpolation in sRGB, exact at both ends
    pub fn mix(self, other: Color, t: f32) -> Self {
        Self(self.0 * (1.0 - t) + other.0 * t)
    }

    /// `count` evenly spaced colors from `from` to `to`, both ends included
    pub fn scale(from: Color, to: Color, count: usize) -> Vec<Color> {
        match count {
            0 => Vec::new(),
            1 => vec![from],
            _ => (0..count)
                .map(|i| from.mix(to, i as f32 / (count - 1) as f32))
                .collect(),
        }
    }

    /// Convert to CIE Lab (L, a, b)
    pub fn to_lab(self) -> Vec3 {
        let r = srgb_to_linear(self.0.x);
        let g = srgb_to_linear(self.0.y);
        let b = srgb_to_linear(self.0.z);

        let x = xyz_to_lab((0.412_456_4 * r + 0.357_576_1 * g + 0.180_437_5 * b) / XN);
        let y = xyz_to_lab((0.212_672_9 * r + 0.715_152_2 * g + 0.072_175_0 * b) / YN);
        let z = xyz_to_lab((0.019_333_9 * r + 0.119_192_0 * g + 0.950_304_1 * b) / ZN);

        Vec3::new(116.0 * y - 16.0, 500.0 * (x - y), 200.0 * (y - z))
    }

    /// Convert from CIE Lab, clamping out-of-gamut results
    pub fn from_lab(lab: Vec3) -> Self {
        let y = (lab.x + 16.0) / 116.0;
        let x = y + lab.y / 500.0;
        let z = y - lab.z / 200.0;

        let x = XN * lab_to_xyz(x);
        let y = YN * lab_to_xyz(y);
        let z = ZN * lab_to_xyz(z);

        let r = linear_to_srgb(3.240_454_2 * x - 1.537_138_5 * y - 0.498_531_4 * z);
        let g = linear_to_srgb(-0.969_266_0 * x + 1.876_010_8 * y + 0.041_556_0 * z);
        let b = linear_to_srgb(0.055_643_4 * x - 0.204_025_9 * y + 1.057_225_2 * z);

        Self(Vec3::new(r, g, b).clamp(Vec3::ZERO, Vec3::ONE))
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    if c <= 0.003_04 {
        12.92 * c
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

fn xyz_to_lab(t: f32) -> f32 {
    if t > T3 {
        t.cbrt()
    } else {
        t / T2 + T0
    }
}

fn lab_to_xyz(t: f32) -> f32 {
    if t > T1 {
        t * t * t
    } else {
        T2 * (t - T0)
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::BLACK
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::from_hex(&value).ok_or_else(|| format!("invalid hex color: {value}"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_hex()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_hex_roundtrip() {
        let color = Color::from_hex("#BB0013").unwrap();
        assert_eq!(color.to_rgb8(), [0xbb, 0x00, 0x13]);
        assert_eq!(color.to_hex(), "#bb0013");
        assert!(Color::from_hex("#12345").is_none());
        assert!(Color::from_hex("zzzzzz").is_none());
    }

    #[test]
    fn test_lab_of_white_and_black() {
        let white = Color::WHITE.to_lab();
        assert_abs_diff_eq!(white.x, 100.0, epsilon = 0.05);
        assert_abs_diff_eq!(white.y, 0.0, epsilon = 0.05);
        assert_abs_diff_eq!(white.z, 0.0, epsilon = 0.05);

        let black = Color::BLACK.to_lab();
        assert_abs_diff_eq!(black.x, 0.0, epsilon = 0.05);
    }

    #[test]
    fn test_lab_roundtrip_preserves_color() {
        let color = Color::from_hex("#555555").unwrap();
        let back = Color::from_lab(color.to_lab());
        assert_eq!(back.to_rgb8(), color.to_rgb8());
    }

    #[test]
    fn test_brighten_raises_lightness() {
        let base = Color::from_hex("#BB0013").unwrap();
        let bright = base.brighten(2.0);
        assert!(bright.to_lab().x > base.to_lab().x);
        let dark = base.brighten(-1.0);
        assert!(dark.to_lab().x < base.to_lab().x);
    }

    #[test]
    fn test_saturate_grey_gains_no_hue_shift_below_zero() {
        let grey = Color::from_hex("#555555").unwrap();
        let desat = grey.saturate(-3.0);
        // Chroma is floored at zero, so a grey stays grey
        assert_eq!(desat.to_rgb8(), grey.to_rgb8());
    }

    #[test]
    fn test_scale_endpoints() {
        let from = Color::WHITE;
        let to = Color::BLACK;
        let ramp = Color::scale(from, to, 5);
        assert_eq!(ramp.len(), 5);
        assert_eq!(ramp[0], from);
        assert_eq!(ramp[4], to);
        assert_abs_diff_eq!(ramp[2].0.x, 0.5, epsilon = 1e-6);

        assert!(Color::scale(from, to, 0).is_empty());
        assert_eq!(Color::scale(from, to, 1), vec![from]);
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Color::from_hex("#bb0013").unwrap()).unwrap();
        assert_eq!(json, "\"#bb0013\"");
        let back: Color = serde_json::from_str(&json).unwrap();
        assert_eq!(back.to_hex(), "#bb0013");
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }
}
