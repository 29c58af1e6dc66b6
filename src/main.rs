use clap::Parser;
use log::info;
use std::{fs, path::Path};
use thumbox::{
    utils::{
        cli::{Cli, Command},
        config::Config,
    },
    BoxResizer, ImageCrateAdapter, LocalFilesystem, Media, OutputFormat, Size, ThumbError,
    ThumbResult, ThumbnailGenerator,
};

fn main() -> ThumbResult<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Box { source, settings } => {
            let media = Media::new("cli", "default", source.parse()?).provider("cli");
            let resizer = BoxResizer::with_mode_name(ImageCrateAdapter::new(), &settings.mode)?;
            let size = resizer.get_box(&media, &settings.to_settings())?;
            println!("{size}");
        }
        Command::Resize {
            input,
            output,
            format,
            settings,
        } => {
            let format = match format {
                Some(name) => name.parse()?,
                None => OutputFormat::from_path(&output).ok_or_else(|| {
                    ThumbError::Configuration(format!(
                        "Cannot guess output format of {}",
                        output.display()
                    ))
                })?,
            };

            let media = Media::new("cli", "default", source_size(&input)?).provider("cli");
            let resizer = BoxResizer::with_mode_name(ImageCrateAdapter::new(), &settings.mode)?;
            let settings = settings.to_settings();
            let size = resizer.get_box(&media, &settings)?;

            let content = resizer.resize_bytes(&media, &fs::read(&input)?, format, &settings)?;
            fs::write(&output, content)?;
            info!("Wrote {} ({})", output.display(), size);
        }
        Command::Generate {
            config,
            input,
            root,
            context,
            id,
            format,
            jobs,
        } => {
            let config = Config::load(&config)?;
            let format: OutputFormat = format.parse()?;
            let media = Media::new(id, context, source_size(&root.join(&input))?).reference(input);

            let threads = jobs.unwrap_or_else(num_cpus::get);
            rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build_global()
                .map_err(|e| ThumbError::Configuration(e.to_string()))?;

            let generator = ThumbnailGenerator::new(
                BoxResizer::new(ImageCrateAdapter::new(), config.mode()?),
                config.contexts,
                LocalFilesystem::new(root),
            );
            for key in generator.generate(&media, format)? {
                println!("{key}");
            }
        }
    }

    Ok(())
}

fn source_size(path: &Path) -> ThumbResult<Size> {
    let (width, height) = image::image_dimensions(path)?;
    Ok(Size::new(width, height))
}
