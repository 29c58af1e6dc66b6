use crate::{
    core::{
        geometry::{crop_offset, paste_offset, scaled_size, Mode, Size},
        media::Media,
        settings::Settings,
        storage::BlobFile,
    },
    image::{adapter::ImageAdapter, color::CanvasColor, format::OutputFormat},
    utils::error::ThumbResult,
};
use log::{debug, warn};

/// Turns a source image into a thumbnail that meets a [`Settings`] box.
///
/// Holds no state besides the default mode, so one resizer can serve any
/// number of threads.
pub struct BoxResizer<A> {
    adapter: A,
    mode: Mode,
}

impl<A: ImageAdapter> BoxResizer<A> {
    pub fn new(adapter: A, mode: Mode) -> Self {
        Self { adapter, mode }
    }

    /// Like [`BoxResizer::new`] with the mode given by name (`inset` or
    /// `outbound`).
    pub fn with_mode_name(adapter: A, mode: &str) -> ThumbResult<Self> {
        Ok(Self::new(adapter, mode.parse()?))
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    /// Size the thumbnail will have, without touching any pixels.
    ///
    /// Crop and fill produce exactly the requested box; otherwise the
    /// natural scaled size, which may be short of the box on one axis.
    pub fn get_box(&self, media: &Media, settings: &Settings) -> ThumbResult<Size> {
        settings.validate(media)?;

        match (settings.requested_width(), settings.requested_height()) {
            (Some(width), Some(height)) if settings.is_fixed_box() => {
                Ok(Size::new(width, height))
            }
            _ => Ok(self.compute_box(media, settings)),
        }
    }

    /// Intermediate size the source is scaled to before any crop or paste.
    pub fn compute_box(&self, media: &Media, settings: &Settings) -> Size {
        let mode = settings.resolve_mode(self.mode);
        scaled_size(
            media.size,
            settings.requested_width(),
            settings.requested_height(),
            mode,
        )
    }

    /// Reads `input`, builds the thumbnail and writes it to `output`.
    ///
    /// Invalid settings fail before `input` is read.
    pub fn resize(
        &self,
        media: &Media,
        input: &BlobFile<'_>,
        output: &BlobFile<'_>,
        format: OutputFormat,
        settings: &Settings,
    ) -> ThumbResult<()> {
        settings.validate(media)?;
        let content = self.resize_bytes(media, &input.content()?, format, settings)?;
        output.set_content(&content)
    }

    /// [`BoxResizer::resize`] on in-memory bytes.
    pub fn resize_bytes(
        &self,
        media: &Media,
        source: &[u8],
        format: OutputFormat,
        settings: &Settings,
    ) -> ThumbResult<Vec<u8>> {
        let target = self.get_box(media, settings)?;
        let scaled = self.compute_box(media, settings);

        let image = self.adapter.load(source)?;
        let image = self.scale_if_needed(image, scaled)?;

        let image = if settings.crop {
            if scaled != target {
                let at = crop_offset(scaled, target);
                debug!("Cropping {} to {} at ({}, {})", scaled, target, at.x, at.y);
                self.adapter.crop(image, at, target)?
            } else {
                image
            }
        } else if let Some(fill) = settings.fill_color() {
            if scaled != target {
                let color = fill.parse::<CanvasColor>().unwrap_or_else(|e| {
                    warn!("{} {}, using transparent background", e, media.describe());
                    CanvasColor::Transparent
                });
                let canvas = self.adapter.create(target, color)?;
                let at = paste_offset(target, scaled);
                debug!("Pasting {} onto {} at ({}, {})", scaled, target, at.x, at.y);
                self.adapter.paste(canvas, &image, at)?
            } else {
                image
            }
        } else {
            image
        };

        self.adapter.encode(&image, format, settings.quality)
    }

    fn scale_if_needed(&self, image: A::Image, size: Size) -> ThumbResult<A::Image> {
        if self.adapter.size(&image) == size {
            return Ok(image);
        }
        self.adapter.scale(image, size)
    }
}
