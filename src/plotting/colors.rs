//! Color tokens and palette distribution.
//!
//! Colors are written and parsed in the CSS forms the dashboard uses:
//! `rgba(r, g, b, a)`, `rgb(r, g, b)`, `#rrggbb` and `#rrggbbaa`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::PlotError;

/// An sRGB color with straight alpha.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Color {
    pub const BLACK: Color = Color::rgba(0, 0, 0, 1.0);
    pub const GRAY: Color = Color::rgba(128, 128, 128, 1.0);

    pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
        Self { r, g, b, a }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Self {
            a: a.clamp(0.0, 1.0),
            ..self
        }
    }

    /// Move each channel `amount` of the way towards white.
    pub fn lighten(self, amount: f64) -> Self {
        let amount = amount.clamp(0.0, 1.0);
        let mix = |c: u8| (c as f64 + (255.0 - c as f64) * amount).round().min(255.0) as u8;
        Self {
            r: mix(self.r),
            g: mix(self.g),
            b: mix(self.b),
            a: self.a,
        }
    }

    /// Linear interpolation between `self` (t = 0) and `other` (t = 1).
    pub fn lerp(self, other: Color, t: f64) -> Self {
        let t = t.clamp(0.0, 1.0);
        let mix = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t) as u8;
        Self {
            r: mix(self.r, other.r),
            g: mix(self.g, other.g),
            b: mix(self.b, other.b),
            a: self.a + (other.a - self.a) * t,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

impl FromStr for Color {
    type Err = PlotError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PlotError::InvalidColor(s.to_string());
        let token = s.trim();

        if let Some(hex) = token.strip_prefix('#') {
            if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            let channel = |i: usize| {
                hex.get(i..i + 2)
                    .and_then(|c| u8::from_str_radix(c, 16).ok())
                    .ok_or_else(invalid)
            };
            return match hex.len() {
                6 => Ok(Color::rgba(channel(0)?, channel(2)?, channel(4)?, 1.0)),
                8 => Ok(Color::rgba(
                    channel(0)?,
                    channel(2)?,
                    channel(4)?,
                    f64::from(channel(6)?) / 255.0,
                )),
                _ => Err(invalid()),
            };
        }

        let (body, with_alpha) = if let Some(rest) = token.strip_prefix("rgba(") {
            (rest, true)
        } else if let Some(rest) = token.strip_prefix("rgb(") {
            (rest, false)
        } else {
            return Err(invalid());
        };
        let body = body.strip_suffix(')').ok_or_else(invalid)?;
        let parts: Vec<&str> = body.split(',').map(str::trim).collect();
        if parts.len() != if with_alpha { 4 } else { 3 } {
            return Err(invalid());
        }

        let channel = |p: &str| {
            if p.is_empty() || !p.chars().all(|c| c.is_ascii_digit()) {
                return Err(invalid());
            }
            p.parse::<u8>().map_err(|_| invalid())
        };
        let alpha = if with_alpha {
            let a: f64 = parts[3].parse().map_err(|_| invalid())?;
            if !(0.0..=1.0).contains(&a) {
                return Err(invalid());
            }
            a
        } else {
            1.0
        };
        Ok(Color::rgba(
            channel(parts[0])?,
            channel(parts[1])?,
            channel(parts[2])?,
            alpha,
        ))
    }
}

impl TryFrom<String> for Color {
    type Error = PlotError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Pick `count` colors spread over `palette`.
///
/// With no more categories than palette entries, evenly spaced entries are
/// picked (a single category gets the middle entry). With more categories the
/// palette is interpolated so neighbouring categories stay distinguishable.
pub fn distribute(palette: &[Color], count: usize) -> Vec<Color> {
    if palette.is_empty() || count == 0 {
        return Vec::new();
    }
    if count == 1 {
        return vec![palette[palette.len() / 2]];
    }

    let last = (palette.len() - 1) as f64;
    (0..count)
        .map(|i| {
            let position = i as f64 / (count - 1) as f64 * last;
            if count <= palette.len() {
                palette[position.round() as usize]
            } else {
                let lower = position.floor() as usize;
                let upper = (lower + 1).min(palette.len() - 1);
                palette[lower]
                    .lerp(palette[upper], position - lower as f64)
                    .with_alpha(0.8)
            }
        })
        .collect()
}

/// Reverse/forward color pairs for `count` categories: the reverse scan keeps
/// the base color and the forward scan gets a translucent variant.
pub fn direction_pairs(palette: &[Color], count: usize) -> Vec<(Color, Color)> {
    distribute(palette, count)
        .into_iter()
        .map(|base| (base, base.with_alpha(0.5)))
        .collect()
}
