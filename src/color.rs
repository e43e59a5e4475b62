// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Color conversions between RGB, hue/saturation and device chromaticity.
//!
//! Trådfri RGB bulbs encode color as a CIE xy chromaticity pair scaled to
//! protocol units plus a luminance value. This module converts between that
//! representation, 6-digit hex RGB strings and hue (0-360) / saturation
//! (0-100) values, and tests requested chromaticities against a device
//! gamut.
//!
//! Conversions are pure and idempotent per direction; round trips are not
//! bit-exact but stay within the quantization error of the target ranges.

use std::fmt;
use std::str::FromStr;

use crate::error::ColorError;

/// Maximum protocol value for a scaled chromaticity coordinate.
pub const MAX_XY: f64 = 65279.0;

/// RGB color with 8-bit channels (0-255).
///
/// # Examples
///
/// ```
/// use tradsync::color::RgbColor;
///
/// let red = RgbColor::from_hex("FF0000").unwrap();
/// let (hue, saturation) = red.to_hue_saturation();
/// assert_eq!(hue, 0);
/// assert_eq!(saturation, 100);
/// assert_eq!(red.to_hex(), "FF0000");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct RgbColor {
    red: u8,
    green: u8,
    blue: u8,
}

impl RgbColor {
    /// Creates a new RGB color.
    #[must_use]
    pub const fn new(red: u8, green: u8, blue: u8) -> Self {
        Self { red, green, blue }
    }

    /// Parses an RGB color from a 6-digit hex string, with or without a
    /// leading `#`.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidHexColor`] if the string is not six hex
    /// digits.
    pub fn from_hex(hex: &str) -> Result<Self, ColorError> {
        let digits = hex.strip_prefix('#').unwrap_or(hex);
        if digits.len() != 6 {
            return Err(ColorError::InvalidHexColor(hex.to_string()));
        }
        let pair = |range| {
            u8::from_str_radix(&digits[range], 16)
                .map_err(|_| ColorError::InvalidHexColor(hex.to_string()))
        };
        Ok(Self::new(pair(0..2)?, pair(2..4)?, pair(4..6)?))
    }

    /// Returns the red component.
    #[must_use]
    pub const fn red(&self) -> u8 {
        self.red
    }

    /// Returns the green component.
    #[must_use]
    pub const fn green(&self) -> u8 {
        self.green
    }

    /// Returns the blue component.
    #[must_use]
    pub const fn blue(&self) -> u8 {
        self.blue
    }

    /// Returns the color as a 6-digit hex string without a hash prefix.
    #[must_use]
    pub fn to_hex(&self) -> String {
        format!("{:02X}{:02X}{:02X}", self.red, self.green, self.blue)
    }

    /// Converts this color to hue (0-360) and saturation (0-100).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_hue_saturation(&self) -> (u16, u8) {
        let r = f64::from(self.red) / 255.0;
        let g = f64::from(self.green) / 255.0;
        let b = f64::from(self.blue) / 255.0;

        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let delta = max - min;

        let saturation = if max <= 0.0 {
            0
        } else {
            ((delta / max) * 100.0).round() as u8
        };

        let hue = if delta < f64::EPSILON {
            0.0
        } else if (max - r).abs() < f64::EPSILON {
            60.0 * (((g - b) / delta).rem_euclid(6.0))
        } else if (max - g).abs() < f64::EPSILON {
            60.0 * (((b - r) / delta) + 2.0)
        } else {
            60.0 * (((r - g) / delta) + 4.0)
        };

        ((hue.round() as u16) % 360, saturation)
    }

    /// Creates an RGB color from hue (0-360), saturation (0-100) and
    /// value (0-100).
    ///
    /// # Errors
    ///
    /// Returns an error if hue or saturation is out of range.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_hue_saturation(hue: u16, saturation: u8, value: u8) -> Result<Self, ColorError> {
        if hue > 360 {
            return Err(ColorError::InvalidHue(hue));
        }
        if saturation > 100 {
            return Err(ColorError::InvalidSaturation(saturation));
        }
        let h = f64::from(hue % 360);
        let s = f64::from(saturation) / 100.0;
        let v = f64::from(value.min(100)) / 100.0;

        let c = v * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = v - c;

        let (r, g, b) = if h < 60.0 {
            (c, x, 0.0)
        } else if h < 120.0 {
            (x, c, 0.0)
        } else if h < 180.0 {
            (0.0, c, x)
        } else if h < 240.0 {
            (0.0, x, c)
        } else if h < 300.0 {
            (x, 0.0, c)
        } else {
            (c, 0.0, x)
        };

        Ok(Self::new(
            ((r + m) * 255.0).round() as u8,
            ((g + m) * 255.0).round() as u8,
            ((b + m) * 255.0).round() as u8,
        ))
    }

    /// Converts this color to CIE xyY.
    #[must_use]
    pub fn to_xyy(&self) -> XyY {
        let r = linearize(f64::from(self.red) / 255.0);
        let g = linearize(f64::from(self.green) / 255.0);
        let b = linearize(f64::from(self.blue) / 255.0);

        // sRGB D65 reference primaries
        let x = 0.412_456_4 * r + 0.357_576_1 * g + 0.180_437_5 * b;
        let y = 0.212_672_9 * r + 0.715_152_2 * g + 0.072_175_0 * b;
        let z = 0.019_333_9 * r + 0.119_192_0 * g + 0.950_304_1 * b;

        let sum = x + y + z;
        if sum < f64::EPSILON {
            // black carries no chromaticity; report the D65 white point
            return XyY {
                chromaticity: Chromaticity::D65_WHITE,
                luminance: 0.0,
            };
        }
        XyY {
            chromaticity: Chromaticity::new(x / sum, y / sum),
            luminance: y,
        }
    }

    /// Creates an RGB color from CIE xyY.
    ///
    /// Out-of-range channels are clamped; a luminance overshoot is
    /// normalized against the brightest channel.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_xyy(xyy: XyY) -> Self {
        let XyY {
            chromaticity: point,
            luminance,
        } = xyy;
        if point.y < f64::EPSILON || luminance <= 0.0 {
            return Self::new(0, 0, 0);
        }
        let big_y = luminance;
        let big_x = point.x * big_y / point.y;
        let big_z = (1.0 - point.x - point.y) * big_y / point.y;

        let r = 3.240_454_2 * big_x - 1.537_138_5 * big_y - 0.498_531_4 * big_z;
        let g = -0.969_266_0 * big_x + 1.876_010_8 * big_y + 0.041_556_0 * big_z;
        let b = 0.055_643_4 * big_x - 0.204_025_9 * big_y + 1.057_225_2 * big_z;

        let max = r.max(g).max(b);
        let scale = if max > 1.0 { 1.0 / max } else { 1.0 };
        let channel = |c: f64| (delinearize((c * scale).clamp(0.0, 1.0)) * 255.0).round() as u8;

        Self::new(channel(r), channel(g), channel(b))
    }
}

impl fmt::Display for RgbColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.to_hex())
    }
}

impl FromStr for RgbColor {
    type Err = ColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_hex(s)
    }
}

fn linearize(c: f64) -> f64 {
    if c <= 0.040_45 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn delinearize(c: f64) -> f64 {
    if c <= 0.003_130_8 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// A CIE xy chromaticity point.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Chromaticity {
    /// CIE x coordinate (0-1).
    pub x: f64,
    /// CIE y coordinate (0-1).
    pub y: f64,
}

impl Chromaticity {
    /// The D65 white point.
    pub const D65_WHITE: Self = Self {
        x: 0.312_7,
        y: 0.329_0,
    };

    /// Creates a new chromaticity point.
    #[must_use]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Converts to protocol-scaled coordinates (0-65279).
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn to_scaled(self) -> (u16, u16) {
        (
            (self.x.clamp(0.0, 1.0) * MAX_XY).round() as u16,
            (self.y.clamp(0.0, 1.0) * MAX_XY).round() as u16,
        )
    }

    /// Creates a chromaticity point from protocol-scaled coordinates.
    #[must_use]
    pub fn from_scaled(x: u16, y: u16) -> Self {
        Self::new(f64::from(x) / MAX_XY, f64::from(y) / MAX_XY)
    }
}

/// A chromaticity point together with its luminance.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct XyY {
    /// The chromaticity point.
    pub chromaticity: Chromaticity,
    /// Relative luminance (0-1).
    pub luminance: f64,
}

/// The color gamut of a device, given by its three primary chromaticities.
///
/// A requested chromaticity outside the triangle is projected onto the
/// nearest triangle edge before conversion back to device units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gamut {
    /// Red primary.
    pub red: Chromaticity,
    /// Green primary.
    pub green: Chromaticity,
    /// Blue primary.
    pub blue: Chromaticity,
}

impl Gamut {
    /// The sRGB gamut, used as the default bulb gamut.
    pub const SRGB: Self = Self {
        red: Chromaticity::new(0.64, 0.33),
        green: Chromaticity::new(0.30, 0.60),
        blue: Chromaticity::new(0.15, 0.06),
    };

    /// Tests whether the point lies inside (or on the boundary of) the
    /// gamut triangle.
    #[must_use]
    pub fn contains(&self, point: Chromaticity) -> bool {
        let sign = |a: Chromaticity, b: Chromaticity, p: Chromaticity| {
            (p.x - b.x) * (a.y - b.y) - (a.x - b.x) * (p.y - b.y)
        };
        let d1 = sign(self.red, self.green, point);
        let d2 = sign(self.green, self.blue, point);
        let d3 = sign(self.blue, self.red, point);

        let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        !(has_neg && has_pos)
    }

    /// Returns the point unchanged when it lies inside the gamut, otherwise
    /// the closest point on the triangle boundary.
    #[must_use]
    pub fn clamp(&self, point: Chromaticity) -> Chromaticity {
        if self.contains(point) {
            return point;
        }
        let candidates = [
            closest_on_segment(self.red, self.green, point),
            closest_on_segment(self.green, self.blue, point),
            closest_on_segment(self.blue, self.red, point),
        ];
        let distance = |p: Chromaticity| (p.x - point.x).powi(2) + (p.y - point.y).powi(2);
        candidates
            .into_iter()
            .min_by(|a, b| distance(*a).total_cmp(&distance(*b)))
            .unwrap_or(point)
    }
}

impl Default for Gamut {
    fn default() -> Self {
        Self::SRGB
    }
}

fn closest_on_segment(a: Chromaticity, b: Chromaticity, p: Chromaticity) -> Chromaticity {
    let abx = b.x - a.x;
    let aby = b.y - a.y;
    let len_sq = abx * abx + aby * aby;
    if len_sq < f64::EPSILON {
        return a;
    }
    let t = (((p.x - a.x) * abx + (p.y - a.y) * aby) / len_sq).clamp(0.0, 1.0);
    Chromaticity::new(a.x + t * abx, a.y + t * aby)
}
