use crate::{
    core::{
        geometry::Size, media::Media, resizer::BoxResizer, settings::Settings,
        storage::Filesystem,
    },
    image::{adapter::ImageAdapter, format::OutputFormat},
    utils::error::{ThumbError, ThumbResult},
};
use log::{debug, info};
use rayon::prelude::*;
use serde::Deserialize;
use std::collections::BTreeMap;

/// Named thumbnail formats, grouped by media context.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct FormatPool {
    contexts: BTreeMap<String, BTreeMap<String, Settings>>,
}

impl FormatPool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_format(
        &mut self,
        context: impl Into<String>,
        name: impl Into<String>,
        settings: Settings,
    ) -> &mut Self {
        self.contexts
            .entry(context.into())
            .or_default()
            .insert(name.into(), settings);
        self
    }

    pub fn formats(&self, context: &str) -> Option<&BTreeMap<String, Settings>> {
        self.contexts.get(context)
    }

    pub fn contexts(&self) -> impl Iterator<Item = &str> {
        self.contexts.keys().map(String::as_str)
    }
}

/// Builds every thumbnail format of a media's context and stores the results.
pub struct ThumbnailGenerator<A, F> {
    resizer: BoxResizer<A>,
    pool: FormatPool,
    filesystem: F,
}

impl<A: ImageAdapter, F: Filesystem> ThumbnailGenerator<A, F> {
    pub fn new(resizer: BoxResizer<A>, pool: FormatPool, filesystem: F) -> Self {
        Self {
            resizer,
            pool,
            filesystem,
        }
    }

    pub fn filesystem(&self) -> &F {
        &self.filesystem
    }

    /// Storage key of one thumbnail: `{context}/thumb_{id}_{format}.{ext}`.
    pub fn reference(&self, media: &Media, format: &str, output: OutputFormat) -> String {
        format!(
            "{}/thumb_{}_{}.{}",
            media.context,
            media.id,
            format,
            output.extension()
        )
    }

    fn formats(&self, media: &Media) -> ThumbResult<&BTreeMap<String, Settings>> {
        self.pool.formats(&media.context).ok_or_else(|| {
            ThumbError::Configuration(format!(
                "No thumbnail formats defined {}",
                media.describe()
            ))
        })
    }

    /// Final size of every format, no image I/O.
    pub fn boxes(&self, media: &Media) -> ThumbResult<BTreeMap<String, Size>> {
        self.formats(media)?
            .iter()
            .map(|(name, settings)| -> ThumbResult<(String, Size)> {
                Ok((name.clone(), self.resizer.get_box(media, settings)?))
            })
            .collect()
    }

    /// Generates all formats in parallel and returns the written keys.
    ///
    /// All formats are validated before the source is read.
    pub fn generate(&self, media: &Media, output: OutputFormat) -> ThumbResult<Vec<String>> {
        let formats = self.formats(media)?;
        for settings in formats.values() {
            settings.validate(media)?;
        }

        info!(
            "Generating {} thumbnails for media {} in context \"{}\"",
            formats.len(),
            media.id,
            media.context
        );
        let source = self.filesystem.read(&media.reference)?;

        formats
            .par_iter()
            .map(|(name, settings)| -> ThumbResult<String> {
                debug!("Generating format \"{}\" for media {}", name, media.id);
                let content = self.resizer.resize_bytes(media, &source, output, settings)?;
                let key = self.reference(media, name, output);
                self.filesystem.write(&key, &content)?;
                Ok(key)
            })
            .collect()
    }

    /// Removes every stored thumbnail of `media`, returning how many existed.
    pub fn delete(&self, media: &Media, output: OutputFormat) -> ThumbResult<usize> {
        let mut removed = 0;
        for name in self.formats(media)?.keys() {
            let key = self.reference(media, name, output);
            if self.filesystem.exists(&key) {
                self.filesystem.delete(&key)?;
                removed += 1;
            }
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{geometry::Mode, storage::MemoryFilesystem},
        image::adapter::ImageCrateAdapter,
    };
    use image::DynamicImage;

    fn pool() -> FormatPool {
        let mut pool = FormatPool::new();
        pool.add_format("news", "small", Settings::width_only(100))
            .add_format("news", "square", Settings::bounded(50, 50).cropped())
            .add_format("news", "boxed", Settings::bounded(60, 60).filled("black"));
        pool
    }

    fn generator() -> ThumbnailGenerator<ImageCrateAdapter, MemoryFilesystem> {
        let fs = MemoryFilesystem::new();
        let png = ImageCrateAdapter::new()
            .encode(&DynamicImage::new_rgb8(200, 100), OutputFormat::Png, 0)
            .unwrap();
        fs.write("news/source.png", &png).unwrap();

        ThumbnailGenerator::new(
            BoxResizer::new(ImageCrateAdapter::new(), Mode::Inset),
            pool(),
            fs,
        )
    }

    fn media() -> Media {
        Media::new("7", "news", Size::new(200, 100)).reference("news/source.png")
    }

    #[test]
    fn reference_layout() {
        let g = generator();
        assert_eq!(
            g.reference(&media(), "small", OutputFormat::Jpeg),
            "news/thumb_7_small.jpg"
        );
    }

    #[test]
    fn boxes_for_every_format() {
        let boxes = generator().boxes(&media()).unwrap();
        assert_eq!(boxes["small"], Size::new(100, 50));
        assert_eq!(boxes["square"], Size::new(50, 50));
        assert_eq!(boxes["boxed"], Size::new(60, 60));
    }

    #[test]
    fn generate_writes_all_formats() {
        let g = generator();
        let keys = g.generate(&media(), OutputFormat::Png).unwrap();
        assert_eq!(
            keys,
            vec![
                "news/thumb_7_boxed.png",
                "news/thumb_7_small.png",
                "news/thumb_7_square.png",
            ]
        );

        let adapter = ImageCrateAdapter::new();
        let boxes = g.boxes(&media()).unwrap();
        for (name, expected) in boxes {
            let key = g.reference(&media(), &name, OutputFormat::Png);
            let img = adapter.load(&g.filesystem().read(&key).unwrap()).unwrap();
            assert_eq!(adapter.size(&img), expected, "format {name}");
        }

        assert_eq!(g.delete(&media(), OutputFormat::Png).unwrap(), 3);
        assert_eq!(g.delete(&media(), OutputFormat::Png).unwrap(), 0);
        assert_eq!(g.filesystem().keys(), vec!["news/source.png".to_string()]);
    }

    #[test]
    fn unknown_context_is_configuration_error() {
        let media = Media::new("7", "sport", Size::new(200, 100));
        assert!(generator().boxes(&media).unwrap_err().is_configuration());
    }

    #[test]
    fn invalid_format_writes_nothing() {
        let mut pool = pool();
        pool.add_format("news", "broken", Settings::width_only(10).cropped());
        let g = generator();
        let g = ThumbnailGenerator::new(g.resizer, pool, g.filesystem);

        let err = g.generate(&media(), OutputFormat::Png).unwrap_err();
        assert!(err.is_configuration());
        assert_eq!(g.filesystem().len(), 1);
    }

    #[test]
    fn pool_deserializes() {
        let pool: FormatPool = serde_json::from_str(
            r#"{"news": {"small": {"width": 100}, "square": {"width": 50, "height": 50, "crop": true}}}"#,
        )
        .unwrap();
        assert_eq!(pool.contexts().collect::<Vec<_>>(), vec!["news"]);
        assert_eq!(
            pool.formats("news").unwrap()["square"],
            Settings::bounded(50, 50).cropped()
        );
    }
}
