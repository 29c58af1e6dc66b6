pub mod core {
    pub mod generator;
    pub mod geometry;
    pub mod media;
    pub mod resizer;
    pub mod settings;
    pub mod storage;
}

pub mod utils {
    pub mod cli;
    pub mod config;
    pub mod error;
}

pub mod image {
    pub mod adapter;
    pub mod color;
    pub mod format;
}

pub use crate::core::{
    generator::{FormatPool, ThumbnailGenerator},
    geometry::{Mode, Offset, Size},
    media::Media,
    resizer::BoxResizer,
    settings::Settings,
    storage::{BlobFile, Filesystem, LocalFilesystem, MemoryFilesystem},
};
pub use crate::image::{
    adapter::{ImageAdapter, ImageCrateAdapter},
    color::CanvasColor,
    format::OutputFormat,
};
pub use utils::error::{ThumbError, ThumbResult};
