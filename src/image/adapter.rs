use crate::{
    core::geometry::{Offset, Size},
    image::{color::CanvasColor, format::OutputFormat},
    utils::error::{ThumbError, ThumbResult},
};
use image::{
    codecs::{jpeg::JpegEncoder, webp::WebPEncoder},
    imageops::FilterType,
    DynamicImage, GenericImageView, ImageFormat, Rgba, RgbaImage,
};
use log::debug;
use std::io::Cursor;

/// Pixel operations the resizer drives.
///
/// The resizer only ever asks for aspect-preserving scales and in-bounds
/// crops; implementations must still fail on an out-of-bounds crop instead
/// of clamping it.
pub trait ImageAdapter: Send + Sync {
    type Image;

    fn load(&self, bytes: &[u8]) -> ThumbResult<Self::Image>;

    fn size(&self, image: &Self::Image) -> Size;

    fn create(&self, size: Size, color: CanvasColor) -> ThumbResult<Self::Image>;

    fn scale(&self, image: Self::Image, size: Size) -> ThumbResult<Self::Image>;

    fn crop(&self, image: Self::Image, at: Offset, size: Size) -> ThumbResult<Self::Image>;

    fn paste(
        &self,
        background: Self::Image,
        image: &Self::Image,
        at: Offset,
    ) -> ThumbResult<Self::Image>;

    fn encode(&self, image: &Self::Image, format: OutputFormat, quality: u8)
        -> ThumbResult<Vec<u8>>;
}

/// [`ImageAdapter`] backed by the `image` crate.
#[derive(Debug, Clone, Copy)]
pub struct ImageCrateAdapter {
    filter: FilterType,
}

impl Default for ImageCrateAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl ImageCrateAdapter {
    pub fn new() -> Self {
        Self {
            filter: FilterType::Lanczos3,
        }
    }
}

impl ImageAdapter for ImageCrateAdapter {
    type Image = DynamicImage;

    fn load(&self, bytes: &[u8]) -> ThumbResult<DynamicImage> {
        Ok(image::load_from_memory(bytes)?)
    }

    fn size(&self, image: &DynamicImage) -> Size {
        let (width, height) = image.dimensions();
        Size::new(width, height)
    }

    fn create(&self, size: Size, color: CanvasColor) -> ThumbResult<DynamicImage> {
        let canvas = RgbaImage::from_pixel(size.width, size.height, Rgba(color.to_rgba()));
        Ok(DynamicImage::ImageRgba8(canvas))
    }

    fn scale(&self, image: DynamicImage, size: Size) -> ThumbResult<DynamicImage> {
        debug!("Scaling {} to {}", self.size(&image), size);
        Ok(image.resize_exact(size.width, size.height, self.filter))
    }

    fn crop(&self, image: DynamicImage, at: Offset, size: Size) -> ThumbResult<DynamicImage> {
        let (image_width, image_height) = image.dimensions();
        let fits_x = at.x.checked_add(size.width).is_some_and(|r| r <= image_width);
        let fits_y = at.y.checked_add(size.height).is_some_and(|b| b <= image_height);
        if !fits_x || !fits_y {
            return Err(ThumbError::CropOutOfBounds {
                x: at.x,
                y: at.y,
                width: size.width,
                height: size.height,
                image_width,
                image_height,
            });
        }

        Ok(image.crop_imm(at.x, at.y, size.width, size.height))
    }

    fn paste(
        &self,
        mut background: DynamicImage,
        image: &DynamicImage,
        at: Offset,
    ) -> ThumbResult<DynamicImage> {
        image::imageops::replace(&mut background, image, at.x as i64, at.y as i64);
        Ok(background)
    }

    fn encode(
        &self,
        image: &DynamicImage,
        format: OutputFormat,
        quality: u8,
    ) -> ThumbResult<Vec<u8>> {
        let mut buf = Cursor::new(Vec::new());

        match format {
            OutputFormat::Jpeg => {
                let encoder = JpegEncoder::new_with_quality(&mut buf, quality.clamp(1, 100));
                image.to_rgb8().write_with_encoder(encoder)?;
            }
            OutputFormat::Png => {
                image.write_to(&mut buf, ImageFormat::Png)?;
            }
            OutputFormat::WebP => {
                // lossless only, quality does not apply
                let encoder = WebPEncoder::new_lossless(&mut buf);
                image.to_rgba8().write_with_encoder(encoder)?;
            }
        }

        Ok(buf.into_inner())
    }
}
