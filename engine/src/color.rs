use std::fmt;

/// An opaque 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };
pub const WHITE: Rgb = Rgb {
    r: 255,
    g: 255,
    b: 255,
};

impl Rgb {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#rrggbb` or `#rgb`; the leading `#` is optional
    pub fn from_hex(hex: &str) -> Result<Self, &'static str> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return Err("Invalid hex color format");
        }

        match hex.len() {
            6 => {
                let r = u8::from_str_radix(&hex[0..2], 16).map_err(|_| "Invalid red component")?;
                let g =
                    u8::from_str_radix(&hex[2..4], 16).map_err(|_| "Invalid green component")?;
                let b = u8::from_str_radix(&hex[4..6], 16).map_err(|_| "Invalid blue component")?;
                Ok(Self { r, g, b })
            }
            3 => {
                let digit = |i: usize, what| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| what)
                };
                Ok(Self {
                    r: digit(0, "Invalid red component")?,
                    g: digit(1, "Invalid green component")?,
                    b: digit(2, "Invalid blue component")?,
                })
            }
            _ => Err("Invalid hex color format"),
        }
    }

    /// Lowercase `#rrggbb`
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Blend toward black (`factor < 0`) or white (`factor > 0`).
    ///
    /// Each channel moves `|factor|` of the remaining distance to the
    /// target. The factor is clamped to `[-1, 1]`.
    pub fn shade(self, factor: f64) -> Self {
        let factor = if factor.is_nan() {
            0.0
        } else {
            factor.clamp(-1.0, 1.0)
        };
        if factor == 0.0 {
            return self;
        }

        let amount = factor.abs();
        let target = if factor < 0.0 { 0.0 } else { 255.0 };
        let mix = |channel: u8| -> u8 {
            let value = (1.0 - amount) * f64::from(channel) + amount * target;
            value.round().clamp(0.0, 255.0) as u8
        };

        Self {
            r: mix(self.r),
            g: mix(self.g),
            b: mix(self.b),
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

/// Shade a hex color string; `None` when the input is not a color
pub fn shade(hex: &str, factor: f64) -> Option<String> {
    Rgb::from_hex(hex).ok().map(|rgb| rgb.shade(factor).to_hex())
}

/// True for strings [`Rgb::from_hex`] accepts
pub fn is_hex_color(value: &str) -> bool {
    Rgb::from_hex(value).is_ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_format() {
        assert_eq!(Rgb::from_hex("#336699"), Ok(Rgb::new(0x33, 0x66, 0x99)));
        assert_eq!(Rgb::from_hex("D98F40"), Ok(Rgb::new(0xd9, 0x8f, 0x40)));
        assert_eq!(Rgb::from_hex("#fff"), Ok(WHITE));
        assert_eq!(Rgb::new(0xd9, 0x8f, 0x40).to_hex(), "#d98f40");

        assert!(Rgb::from_hex("").is_err());
        assert!(Rgb::from_hex("#12345").is_err());
        assert!(Rgb::from_hex("#zz0000").is_err());
        assert!(Rgb::from_hex("#ééé").is_err());
        assert!(!is_hex_color("red"));
    }

    #[test]
    fn test_shade_extremes() {
        let color = Rgb::new(0x33, 0x66, 0x99);
        assert_eq!(color.shade(0.0), color);
        assert_eq!(color.shade(1.0), WHITE);
        assert_eq!(color.shade(-1.0), BLACK);
        assert_eq!(color.shade(7.0), WHITE);
        assert_eq!(color.shade(f64::NAN), color);
    }

    #[test]
    fn test_shade_midpoint_toward_white() {
        // (51 + 255) / 2 = 153, (102 + 255) / 2 = 178.5, (153 + 255) / 2 = 204
        assert_eq!(
            Rgb::new(0x33, 0x66, 0x99).shade(0.5),
            Rgb::new(153, 179, 204)
        );
    }

    #[test]
    fn test_shade_darker_by_22_percent() {
        // 51 * 0.78 = 39.78, 102 * 0.78 = 79.56, 153 * 0.78 = 119.34
        assert_eq!(shade("#336699", -0.22), Some("#285077".to_string()));
        assert_eq!(shade("not a color", -0.22), None);
    }
}
