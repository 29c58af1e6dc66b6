use crate::core::settings::Settings;
use clap::{Args, Parser};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Parser)]
pub enum Command {
    /// Print the final thumbnail size without touching any image
    #[command(name = "box")]
    Box {
        /// Source image size, e.g. 800x600
        #[arg(short, long)]
        source: String,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Build one thumbnail from an image file
    #[command(name = "resize")]
    Resize {
        /// Source image
        #[arg(short, long)]
        input: PathBuf,

        /// Where to write the thumbnail
        #[arg(short, long)]
        output: PathBuf,

        /// Output format (jpeg, png, webp); guessed from the output path by default
        #[arg(short, long)]
        format: Option<String>,

        #[command(flatten)]
        settings: SettingsArgs,
    },

    /// Build every format of a context from a JSON configuration
    #[command(name = "generate")]
    Generate {
        /// Configuration file
        #[arg(short, long)]
        config: PathBuf,

        /// Source image, relative to the storage root
        #[arg(short, long)]
        input: String,

        /// Storage root directory
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// Media context
        #[arg(long, default_value = "default")]
        context: String,

        /// Media id used in thumbnail names
        #[arg(long, default_value = "0")]
        id: String,

        /// Output format (jpeg, png, webp)
        #[arg(short, long, default_value = "jpeg")]
        format: String,

        /// Worker threads (default: number of CPUs)
        #[arg(short, long)]
        jobs: Option<usize>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct SettingsArgs {
    /// Target width
    #[arg(short = 'W', long)]
    pub width: Option<u32>,

    /// Target height
    #[arg(short = 'H', long)]
    pub height: Option<u32>,

    /// Crop to exactly width x height
    #[arg(long)]
    pub crop: bool,

    /// Pad to exactly width x height with this color
    #[arg(long)]
    pub fill: Option<String>,

    /// Encoder quality (0-100)
    #[arg(short, long, default_value_t = 80)]
    pub quality: u8,

    /// Default mode when neither crop nor fill is set (inset, outbound)
    #[arg(short, long, default_value = "inset")]
    pub mode: String,
}

impl SettingsArgs {
    pub fn to_settings(&self) -> Settings {
        Settings {
            width: self.width,
            height: self.height,
            quality: self.quality,
            crop: self.crop,
            fill: self.fill.clone(),
        }
    }
}
