use crate::{
    core::{geometry::Mode, media::Media},
    utils::error::{ThumbError, ThumbResult},
};
use serde::{Deserialize, Deserializer};

pub const DEFAULT_QUALITY: u8 = 80;

/// Zero widths/heights and empty fill strings count as not set.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub quality: u8,
    pub crop: bool,
    #[serde(deserialize_with = "deserialize_fill")]
    pub fill: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            width: None,
            height: None,
            quality: DEFAULT_QUALITY,
            crop: false,
            fill: None,
        }
    }
}

impl Settings {
    pub fn width_only(width: u32) -> Self {
        Self {
            width: Some(width),
            ..Self::default()
        }
    }

    pub fn height_only(height: u32) -> Self {
        Self {
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn bounded(width: u32, height: u32) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            ..Self::default()
        }
    }

    pub fn cropped(mut self) -> Self {
        self.crop = true;
        self
    }

    pub fn filled(mut self, color: impl Into<String>) -> Self {
        self.fill = Some(color.into());
        self
    }

    pub fn with_quality(mut self, quality: u8) -> Self {
        self.quality = quality;
        self
    }

    pub fn requested_width(&self) -> Option<u32> {
        self.width.filter(|w| *w > 0)
    }

    pub fn requested_height(&self) -> Option<u32> {
        self.height.filter(|h| *h > 0)
    }

    pub fn fill_color(&self) -> Option<&str> {
        self.fill.as_deref().filter(|c| !c.is_empty())
    }

    pub fn has_fill(&self) -> bool {
        self.fill_color().is_some()
    }

    pub fn is_fixed_box(&self) -> bool {
        self.crop || self.has_fill()
    }

    /// First broken rule wins.
    pub fn validate(&self, media: &Media) -> ThumbResult<()> {
        let width = self.requested_width();
        let height = self.requested_height();

        if width.is_none() && height.is_none() {
            return Err(ThumbError::Configuration(format!(
                "Width or height parameter must be determined {}",
                media.describe()
            )));
        }

        if self.crop && (width.is_none() || height.is_none() || self.has_fill()) {
            return Err(ThumbError::Configuration(format!(
                "For crop mode width and height parameter must be determined, fill must be null(or false) {}",
                media.describe()
            )));
        }

        if self.has_fill() && (self.crop || width.is_none() || height.is_none()) {
            return Err(ThumbError::Configuration(format!(
                "For fill mode width and height parameter must be determined, crop must be false {}",
                media.describe()
            )));
        }

        if self.quality > 100 {
            return Err(ThumbError::Configuration(format!(
                "Quality must be between 0 and 100, got {} {}",
                self.quality,
                media.describe()
            )));
        }

        if media.size.is_empty() {
            return Err(ThumbError::Configuration(format!(
                "Source image has no dimensions ({}) {}",
                media.size,
                media.describe()
            )));
        }

        Ok(())
    }

    pub fn resolve_mode(&self, default: Mode) -> Mode {
        if self.crop {
            Mode::Outbound
        } else if self.has_fill() {
            Mode::Inset
        } else {
            default
        }
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum FillValue {
    Flag(bool),
    Color(String),
}

fn deserialize_fill<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<FillValue>::deserialize(deserializer)? {
        None | Some(FillValue::Flag(false)) => Ok(None),
        Some(FillValue::Flag(true)) => Err(serde::de::Error::custom(
            "fill must be a color or false",
        )),
        Some(FillValue::Color(color)) if color.is_empty() => Ok(None),
        Some(FillValue::Color(color)) => Ok(Some(color)),
    }
}
