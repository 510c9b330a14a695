use std::fmt;
use std::str::FromStr;

use serde::Deserialize;
use thiserror::Error;

use super::config::RenderConfig;
use super::simulation::Particle;

/// Opaque sRGB colour, written and parsed as `#rrggbb`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Color {
    /// Warm starlight used for every particle.
    pub const STAR: Self = Self::rgb(0xf9, 0xee, 0xa6);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::STAR
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid colour {0:?}, expected #rrggbb")]
pub struct ColorParseError(String);

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError(s.to_owned());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if hex.len() != 6 || !hex.bytes().all(|b| b.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?))
    }
}

impl TryFrom<String> for Color {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// The subset of a canvas 2D context the field draws with.
///
/// Methods mirror `CanvasRenderingContext2D`; implementations are expected to
/// keep the same save/restore semantics for fill, alpha and shadow state.
pub trait DrawingContext {
    fn set_transform(&mut self, a: f64, b: f64, c: f64, d: f64, e: f64, f: f64);
    fn clear_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn save(&mut self);
    fn restore(&mut self);
    fn begin_path(&mut self);
    fn set_fill_color(&mut self, color: Color);
    fn set_global_alpha(&mut self, alpha: f64);
    fn set_shadow_color(&mut self, color: Color);
    fn set_shadow_blur(&mut self, blur: f64);
    fn rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn fill(&mut self);
    fn stroke(&mut self);
}

/// Clears `(0, 0, width, height)` and draws every particle as a glowing square
/// that fades and shrinks with age.
pub fn draw_particles<'a, C, I>(ctx: &mut C, width: f64, height: f64, particles: I, config: &RenderConfig)
where
    C: DrawingContext + ?Sized,
    I: IntoIterator<Item = &'a Particle>,
{
    ctx.clear_rect(0.0, 0.0, width, height);

    for p in particles {
        let (alpha, size) = p.fade(config.shrink);

        ctx.save();
        ctx.begin_path();
        ctx.set_fill_color(p.color);
        ctx.set_global_alpha(f64::from(alpha));
        ctx.set_shadow_color(p.color);
        ctx.set_shadow_blur(config.glow_blur);

        // Outline uses whatever stroke style the context already carries.
        ctx.rect(f64::from(p.x), f64::from(p.y), f64::from(size), f64::from(size));
        ctx.stroke();
        ctx.fill();
        ctx.restore();
    }
}
