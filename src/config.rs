// Copyright The Brickwork Authors
// SPDX-License-Identifier: MIT OR Apache-2.0

#[macro_use]
mod partial;
use std::fs::File;
use std::io::Read;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::time::Duration;

use macro_rules_attribute::derive;
use partial::{PartialConfig, ValidationError};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::actor::throttle::TrailingArgs;
use crate::model::{Height, HeightError};

pub fn config_path_default() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".brickwork.toml"))
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    pub settings: Settings,
}

#[derive(Serialize, Deserialize, Default)]
#[serde(deny_unknown_fields)]
#[serde(default)]
struct ConfigPartial {
    settings: SettingsPartial,
}

#[derive(PartialConfig!)]
#[derive_args(SettingsPartial)]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
pub struct Settings {
    #[derive_args(ResizePartial)]
    pub resize: Resize,
    #[derive_args(HeightsPartial)]
    pub heights: Heights,
}

#[derive(PartialConfig!)]
#[derive_args(ResizePartial)]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
/// How resize events are rate limited.
pub struct Resize {
    pub delay_ms: u64,
    pub trailing_args: TrailingArgs,
}

#[derive(PartialConfig!)]
#[derive_args(HeightsPartial)]
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(deny_unknown_fields)]
/// How item height attributes are validated.
pub struct Heights {
    pub invalid: InvalidHeight,
    pub allow_negative: bool,
}

#[derive(Serialize, Deserialize, Debug, PartialEq, Clone, Copy)]
#[serde(rename_all = "snake_case")]
pub enum InvalidHeight {
    /// Fail construction.
    Reject,
    /// Place the item with a height of zero.
    Zero,
}

impl Resize {
    pub fn delay(&self) -> Duration {
        Duration::from_millis(self.delay_ms)
    }
}

impl Heights {
    /// Turns a raw height attribute into a height, applying this policy.
    pub fn resolve(&self, attr: Option<&str>) -> Result<Height, HeightError> {
        let parsed = Height::parse(attr).and_then(|height| {
            if height.is_negative() && !self.allow_negative {
                Err(HeightError::Negative(height.get()))
            } else {
                Ok(height)
            }
        });
        match (parsed, self.invalid) {
            (Ok(height), _) => Ok(height),
            (Err(e), InvalidHeight::Reject) => Err(e),
            (Err(e), InvalidHeight::Zero) => {
                warn!(attr = ?attr, error = %e, "Using height 0 for invalid height attribute");
                Ok(Height::ZERO)
            }
        }
    }
}

impl ConfigPartial {
    fn default() -> Self {
        toml::from_str(include_str!("../brickwork.default.toml"))
            .expect("built-in default config is valid")
    }

    fn validate(self) -> Result<Config, SpannedError> {
        Ok(Config { settings: self.settings.validate()? })
    }

    fn merge(low: Self, high: Self) -> Self {
        Self {
            settings: SettingsPartial::merge(low.settings, high.settings),
        }
    }
}

impl Config {
    /// Loads the config at `custom_path`, or the default config file if it
    /// exists. Values missing from the file fall back to the defaults.
    pub fn load(custom_path: Option<&Path>) -> anyhow::Result<Config> {
        let mut buf = String::new();
        let default = config_path_default();
        let (mut file, path) = match (custom_path, default.as_deref()) {
            (Some(path), _) => (File::open(path)?, path),
            (None, None) => return Ok(Config::default()),
            (None, Some(default)) => match File::open(default) {
                Ok(file) => (file, default),
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Config::default()),
                Err(e) => return Err(e.into()),
            },
        };
        file.read_to_string(&mut buf)?;
        Self::parse(&buf).map_err(|e| anyhow::anyhow!("{}", format_toml_error(e, &buf, path)))
    }

    pub fn default() -> Config {
        ConfigPartial::default().validate().expect("built-in default config is complete")
    }

    fn parse(buf: &str) -> Result<Self, SpannedError> {
        let c: ConfigPartial = toml::from_str(buf)?;
        let defaults = ConfigPartial::default();
        ConfigPartial::merge(defaults, c).validate()
    }
}

fn format_toml_error(error: SpannedError, input: &str, path: &Path) -> String {
    use annotate_snippets::{AnnotationKind, Level, Renderer, Snippet};

    let message = error.message;
    let Some(span) = error.span else {
        return format!("could not parse config: {}", message);
    };

    let snippet = Snippet::source(input)
        .path(path.to_string_lossy())
        .annotation(AnnotationKind::Primary.span(span.start..span.end).label(message));

    let report = Level::ERROR.primary_title("could not parse config").element(snippet);

    let renderer = Renderer::styled();
    format!("{}", renderer.render(&[report]))
}

#[derive(Debug)]
struct SpannedError {
    message: String,
    span: Option<Range<usize>>,
}

impl From<toml::de::Error> for SpannedError {
    fn from(e: toml::de::Error) -> Self {
        Self {
            message: e.message().to_owned(),
            span: e.span(),
        }
    }
}

impl From<ValidationError> for SpannedError {
    fn from(e: ValidationError) -> Self {
        Self { message: format!("{e}"), span: None }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn default_config_is_valid() {
        Config::default();
    }

    #[test]
    fn default_settings_match_unspecified_setting_values() {
        assert_eq!(Config::default().settings, Config::parse("").unwrap().settings);
    }

    #[test]
    fn defaults() {
        let settings = Config::default().settings;
        assert_eq!(settings.resize.delay(), Duration::from_millis(250));
        assert_eq!(settings.resize.trailing_args, TrailingArgs::Latest);
        assert_eq!(settings.heights.invalid, InvalidHeight::Reject);
        assert!(settings.heights.allow_negative);
    }

    #[test]
    fn user_values_override_defaults_field_by_field() {
        let config = Config::parse(
            r#"
            [settings.resize]
            trailing_args = "first"
            "#,
        )
        .unwrap();
        assert_eq!(config.settings.resize.trailing_args, TrailingArgs::First);
        assert_eq!(config.settings.resize.delay_ms, 250);
        assert_eq!(config.settings.heights, Config::default().settings.heights);
    }

    #[test]
    fn unknown_keys_are_rejected_with_a_span() {
        let err = Config::parse("[settings.resize]\ndelay = 3\n").unwrap_err();
        assert!(err.span.is_some());
    }

    #[test]
    fn missing_fields_report_their_section() {
        let partial: ConfigPartial = toml::from_str("[settings.resize]\ndelay_ms = 1\n").unwrap();
        let err = partial.settings.validate().unwrap_err();
        assert_eq!(err.path, vec!["resize".to_owned()]);
        assert_eq!(err.fields, vec!["trailing_args"]);
        assert_eq!(err.to_string(), r#"Missing fields ["trailing_args"] in [resize]"#);
    }

    #[test]
    fn loads_from_custom_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[settings.heights]\ninvalid = \"zero\"").unwrap();
        let config = Config::load(Some(file.path())).unwrap();
        assert_eq!(config.settings.heights.invalid, InvalidHeight::Zero);
    }

    #[test]
    fn load_errors_mention_the_path() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[settings.heights]\ninvalid = \"guess\"").unwrap();
        let err = Config::load(Some(file.path())).unwrap_err().to_string();
        assert!(err.contains("could not parse config"), "{err}");
    }

    #[test]
    fn height_policy() {
        let mut heights = Config::default().settings.heights;
        assert_eq!(heights.resolve(Some("4")), Height::new(4.0));
        assert_eq!(heights.resolve(Some("x")), Err(HeightError::NotNumeric("x".into())));
        assert_eq!(heights.resolve(Some("-1")), Height::new(-1.0));

        heights.allow_negative = false;
        assert_eq!(heights.resolve(Some("-1")), Err(HeightError::Negative(-1.0)));

        heights.invalid = InvalidHeight::Zero;
        assert_eq!(heights.resolve(None), Ok(Height::ZERO));
        assert_eq!(heights.resolve(Some("-1")), Ok(Height::ZERO));
    }
}
