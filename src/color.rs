use serde::Deserialize;

use crate::error::GaugeError;

/// Color representation for gauge elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);
    pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
    pub const GRAY: Color = Color::new(0xaa, 0xaa, 0xaa);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }

    /// Linear mix between `self` (t = 0) and `other` (t = 1).
    pub fn mix(self, other: Color, t: f32) -> Color {
        let t = t.clamp(0.0, 1.0);
        let channel = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
        Color::new(
            channel(self.r, other.r),
            channel(self.g, other.g),
            channel(self.b, other.b),
        )
    }

    /// Parses `#RRGGBB`, `#AARRGGBB` (alpha is dropped) or one of the names
    /// `black`, `white`, `gray`, `red`, `green`, `blue`.
    pub fn parse(s: &str) -> Result<Color, GaugeError> {
        let s = s.trim();
        if let Some(hex) = s.strip_prefix('#') {
            if !hex.is_ascii() {
                return Err(GaugeError::InvalidColor(s.to_string()));
            }
            let rgb = match hex.len() {
                6 => hex,
                8 => &hex[2..],
                _ => return Err(GaugeError::InvalidColor(s.to_string())),
            };
            let value =
                u32::from_str_radix(rgb, 16).map_err(|_| GaugeError::InvalidColor(s.to_string()))?;
            return Ok(Color::new(
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            ));
        }
        match s.to_ascii_lowercase().as_str() {
            "black" => Ok(Color::BLACK),
            "white" => Ok(Color::WHITE),
            "gray" | "grey" => Ok(Color::GRAY),
            "red" => Ok(Color::new(0xff, 0x00, 0x00)),
            "green" => Ok(Color::new(0x00, 0xff, 0x00)),
            "blue" => Ok(Color::new(0x00, 0x00, 0xff)),
            _ => Err(GaugeError::InvalidColor(s.to_string())),
        }
    }
}

impl TryFrom<String> for Color {
    type Error = GaugeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Color::parse(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!(Color::parse("#ff8000").unwrap(), Color::new(0xff, 0x80, 0x00));
        assert_eq!(Color::parse("#80FF8000").unwrap(), Color::new(0xff, 0x80, 0x00));
    }

    #[test]
    fn test_parse_names() {
        assert_eq!(Color::parse("white").unwrap(), Color::WHITE);
        assert_eq!(Color::parse("Grey").unwrap(), Color::GRAY);
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(matches!(
            Color::parse("#12345"),
            Err(GaugeError::InvalidColor(_))
        ));
        assert!(matches!(
            Color::parse("#zzzzzz"),
            Err(GaugeError::InvalidColor(_))
        ));
        assert!(Color::parse("mauve").is_err());
    }

    #[test]
    fn test_mix_endpoints_and_middle() {
        let a = Color::BLACK;
        let b = Color::new(200, 100, 0);
        assert_eq!(a.mix(b, 0.0), a);
        assert_eq!(a.mix(b, 1.0), b);
        assert_eq!(a.mix(b, 0.5), Color::new(100, 50, 0));
        assert_eq!(a.mix(b, 7.0), b);
    }

    #[test]
    fn test_deserialize_from_string() {
        let color: Color = serde_json::from_str("\"#102030\"").unwrap();
        assert_eq!(color, Color::new(0x10, 0x20, 0x30));
        assert!(serde_json::from_str::<Color>("\"nope\"").is_err());
    }
}
