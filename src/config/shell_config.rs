use compio::fs;
use hashlink::LinkedHashMap;
use saphyr::{LoadableYamlNode, Scalar, Yaml};
use snafu::prelude::*;
use std::path::Path;
use tracing::debug;

const DEFAULT_PROMPT: &str = "prompt> ";
const DEFAULT_TERMINATOR: char = '~';
const DEFAULT_DIRECTORY_MARKER: &str = " (*)";

const PROMPT_KEY: &str = "prompt";
const TERMINATOR_KEY: &str = "terminator";
const DIRECTORY_MARKER_KEY: &str = "directory_marker";
const COLOR_KEY: &str = "color";

/// Presentation settings of the interactive shell.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShellConfig {
    pub prompt: String,
    /// Character that ends the content typed for `create`.
    pub terminator: char,
    /// Appended to directory names in `ls` output.
    pub directory_marker: String,
    /// `None` leaves the decision to terminal detection.
    pub color: Option<bool>,
}

impl Default for ShellConfig {
    fn default() -> Self {
        Self {
            prompt: DEFAULT_PROMPT.to_string(),
            terminator: DEFAULT_TERMINATOR,
            directory_marker: DEFAULT_DIRECTORY_MARKER.to_string(),
            color: None,
        }
    }
}

impl ShellConfig {
    pub async fn from_path(path: &Path) -> Result<Self, ShellConfigError> {
        debug!("Reading shell config file: {}", path.display());
        let bytes = fs::read(path).await.context(ReadSnafu {
            file_path: path.display().to_string(),
        })?;
        debug!("Successfully read shell config file: {} bytes", bytes.len());

        let contents = String::from_utf8(bytes).context(EncodingSnafu {
            file_path: path.display().to_string(),
        })?;
        contents.as_str().try_into()
    }

    /// Reads `path` when given, the defaults otherwise.
    pub async fn read(path: Option<&Path>) -> Result<Self, ShellConfigError> {
        match path {
            Some(path) => Self::from_path(path).await,
            None => Ok(Self::default()),
        }
    }

    fn apply_entry(&mut self, key: &str, value: &Yaml) -> Result<(), ShellConfigError> {
        match key {
            PROMPT_KEY => self.prompt = string_value(key, value)?,
            DIRECTORY_MARKER_KEY => self.directory_marker = string_value(key, value)?,
            TERMINATOR_KEY => {
                let raw = string_value(key, value)?;
                let mut chars = raw.chars();
                self.terminator = match (chars.next(), chars.next()) {
                    (Some(c), None) if c != '\n' => c,
                    _ => return InvalidTerminatorSnafu { value: raw }.fail(),
                };
            }
            COLOR_KEY => match value {
                Yaml::Value(Scalar::Boolean(flag)) => self.color = Some(*flag),
                _ => return InvalidValueSnafu { key, expected: "a boolean" }.fail(),
            },
            _ => debug!("Ignoring unknown shell config key '{}'", key),
        }
        Ok(())
    }

    fn from_mapping(top_level: &LinkedHashMap<Yaml, Yaml>) -> Result<Self, ShellConfigError> {
        top_level
            .iter()
            .try_fold(Self::default(), |mut config, (key, value)| {
                match key {
                    Yaml::Value(Scalar::String(key)) => config.apply_entry(key, value)?,
                    _ => debug!("Skipping non-string shell config key: {:?}", key),
                }
                Ok(config)
            })
    }
}

fn string_value(key: &str, value: &Yaml) -> Result<String, ShellConfigError> {
    match value {
        Yaml::Value(Scalar::String(text)) => Ok(text.to_string()),
        _ => InvalidValueSnafu {
            key,
            expected: "a string",
        }
        .fail(),
    }
}

impl TryFrom<&str> for ShellConfig {
    type Error = ShellConfigError;

    fn try_from(contents: &str) -> Result<Self, Self::Error> {
        let documents = Yaml::load_from_str(contents).context(ParseSnafu)?;
        let document = documents.first().context(MalformedConfigSnafu)?;

        match document {
            Yaml::Mapping(top_level) => Self::from_mapping(top_level),
            _ => TopLevelNotMapSnafu.fail(),
        }
    }
}

#[derive(Debug, Snafu)]
pub enum ShellConfigError {
    #[snafu(display("Failed to read the config file: {}", file_path))]
    ReadError {
        file_path: String,
        source: std::io::Error,
    },
    #[snafu(display("The config file {} is not valid UTF-8", file_path))]
    EncodingError {
        file_path: String,
        source: std::string::FromUtf8Error,
    },
    #[snafu(display("Failed to parse the config file"))]
    ParseError { source: saphyr::ScanError },
    #[snafu(display("Improperly formatted config file"))]
    MalformedConfig,
    #[snafu(display("Top level of config should be a map"))]
    TopLevelNotMap,
    #[snafu(display("Config key '{}' should be {}", key, expected))]
    InvalidValue { key: String, expected: String },
    #[snafu(display("Terminator should be a single character, got '{}'", value))]
    InvalidTerminator { value: String },
}
