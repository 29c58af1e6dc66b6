use crate::{
    core::{generator::FormatPool, geometry::Mode},
    utils::error::ThumbResult,
};
use log::debug;
use serde::Deserialize;
use std::{fs, path::Path};

/// On-disk configuration of the thumbnail generator.
///
/// ```json
/// {
///   "mode": "inset",
///   "contexts": {
///     "news": {
///       "small": { "width": 100, "quality": 70 },
///       "square": { "width": 120, "height": 120, "crop": true }
///     }
///   }
/// }
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default = "default_mode")]
    mode: String,
    #[serde(default)]
    pub contexts: FormatPool,
}

fn default_mode() -> String {
    Mode::Inset.to_string()
}

impl Config {
    pub fn load(path: impl AsRef<Path>) -> ThumbResult<Self> {
        let path = path.as_ref();
        debug!("Loading configuration from {}", path.display());
        let data = fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn from_json(data: &str) -> ThumbResult<Self> {
        let config: Config = serde_json::from_str(data)?;
        config.mode()?;
        Ok(config)
    }

    /// Default resize mode for formats that neither crop nor fill.
    pub fn mode(&self) -> ThumbResult<Mode> {
        self.mode.parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::settings::Settings, utils::error::ThumbError};
    use std::io::Write;

    #[test]
    fn parses_full_config() {
        let config = Config::from_json(
            r##"{
                "mode": "outbound",
                "contexts": {
                    "news": {
                        "small": {"width": 100, "quality": 70},
                        "boxed": {"width": 120, "height": 90, "fill": "#000"}
                    }
                }
            }"##,
        )
        .unwrap();

        assert_eq!(config.mode().unwrap(), Mode::Outbound);
        let formats = config.contexts.formats("news").unwrap();
        assert_eq!(formats["small"], Settings::width_only(100).with_quality(70));
        assert_eq!(formats["boxed"], Settings::bounded(120, 90).filled("#000"));
    }

    #[test]
    fn mode_defaults_to_inset() {
        let config = Config::from_json("{}").unwrap();
        assert_eq!(config.mode().unwrap(), Mode::Inset);
        assert_eq!(config.contexts.contexts().count(), 0);
    }

    #[test]
    fn rejects_unknown_mode() {
        let err = Config::from_json(r#"{"mode": "stretch"}"#).unwrap_err();
        assert!(err.is_configuration());
    }

    #[test]
    fn rejects_bad_json() {
        let err = Config::from_json("{").unwrap_err();
        assert!(matches!(err, ThumbError::Serialization(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"contexts": {{"a": {{"x": {{"height": 10}}}}}}}}"#).unwrap();
        let config = Config::load(file.path()).unwrap();
        assert_eq!(
            config.contexts.formats("a").unwrap()["x"],
            Settings::height_only(10)
        );
    }
}
