use crate::utils::error::ThumbError;
use std::{fmt, str::FromStr};

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub const fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn scale(&self, ratio: f64) -> Self {
        let width = (self.width as f64 * ratio).round().max(1.0) as u32;
        let height = (self.height as f64 * ratio).round().max(1.0) as u32;
        Self { width, height }
    }

    pub fn contains(&self, other: Size) -> bool {
        other.width <= self.width && other.height <= self.height
    }
}

impl fmt::Display for Size {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

impl FromStr for Size {
    type Err = ThumbError;

    /// Parses `WIDTHxHEIGHT`, e.g. `800x600`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ThumbError::Configuration(format!("Invalid size \"{s}\", expected WxH"));
        let (w, h) = s.trim().split_once(|c| c == 'x' || c == 'X').ok_or_else(invalid)?;
        let width = w.trim().parse().map_err(|_| invalid())?;
        let height = h.trim().parse().map_err(|_| invalid())?;
        let size = Size::new(width, height);
        if size.is_empty() {
            return Err(invalid());
        }
        Ok(size)
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Offset {
    pub x: u32,
    pub y: u32,
}

impl Offset {
    pub const ORIGIN: Offset = Offset { x: 0, y: 0 };

    pub const fn new(x: u32, y: u32) -> Self {
        Self { x, y }
    }
}

/// How the source is scaled against the requested box.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Mode {
    Inset,
    Outbound,
}

impl Mode {
    // smallest ratio for inset, largest for outbound
    pub fn select_ratio(self, ratios: &[f64]) -> Option<f64> {
        let mut iter = ratios.iter().copied();
        let first = iter.next()?;
        Some(match self {
            Mode::Inset => iter.fold(first, f64::min),
            Mode::Outbound => iter.fold(first, f64::max),
        })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Inset => "inset",
            Mode::Outbound => "outbound",
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Mode {
    type Err = ThumbError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inset" => Ok(Mode::Inset),
            "outbound" => Ok(Mode::Outbound),
            _ => Err(ThumbError::Configuration(format!(
                "Invalid mode specified: \"{s}\""
            ))),
        }
    }
}

/// Scales `source` so that it meets the requested width and/or height.
pub fn scaled_size(source: Size, width: Option<u32>, height: Option<u32>, mode: Mode) -> Size {
    let mut ratios = Vec::with_capacity(2);
    if let Some(w) = width {
        ratios.push(w as f64 / source.width as f64);
    }
    if let Some(h) = height {
        ratios.push(h as f64 / source.height as f64);
    }

    match mode.select_ratio(&ratios) {
        Some(ratio) => source.scale(ratio),
        None => source,
    }
}

// Odd differences round up, one pixel toward the bottom-right.
pub fn crop_offset(scaled: Size, target: Size) -> Offset {
    centre_offset(scaled, target)
}

pub fn paste_offset(canvas: Size, scaled: Size) -> Offset {
    centre_offset(canvas, scaled)
}

fn centre_offset(a: Size, b: Size) -> Offset {
    Offset {
        x: a.width.abs_diff(b.width).div_ceil(2),
        y: a.height.abs_diff(b.height).div_ceil(2),
    }
}
