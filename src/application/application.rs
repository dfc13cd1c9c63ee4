use std::io;

use snafu::Snafu;
use snafu::prelude::*;
use supports_color::Stream;
use tracing::debug;

use crate::application::RuntimeConfig;
use crate::config::{ShellConfig, ShellConfigError};
use crate::session::Session;
use crate::shell::{Shell, ShellError};

pub struct Application;

impl Application {
    pub async fn run(app_config: impl Into<RuntimeConfig>) -> Result<(), ApplicationError> {
        let app_config: RuntimeConfig = app_config.into();
        let shell_config = ShellConfig::read(app_config.config_path.as_deref())
            .await
            .context(ShellConfigSnafu)?;
        debug!("Loaded shell config: {:?}", shell_config);

        let color = Self::use_color(&app_config, &shell_config);
        colored::control::set_override(color);
        debug!("Colored output enabled: {}", color);

        let stdin = io::stdin();
        let stdout = io::stdout();
        let stderr = io::stderr();
        Shell::new(
            Session::new(),
            shell_config,
            color,
            stdin.lock(),
            stdout.lock(),
            stderr.lock(),
        )
        .run()
        .context(ShellSnafu)?;

        Ok(())
    }

    /// `--no-color` wins over the config file, which wins over terminal detection.
    fn use_color(app_config: &RuntimeConfig, shell_config: &ShellConfig) -> bool {
        if app_config.no_color {
            return false;
        }
        shell_config
            .color
            .unwrap_or_else(|| supports_color::on(Stream::Stdout).is_some())
    }
}

#[derive(Debug, Snafu)]
pub enum ApplicationError {
    #[snafu(display("Critical failure encountered while loading the shell configuration"))]
    ShellConfigError { source: ShellConfigError },
    #[snafu(display("Critical failure encountered while running the shell"))]
    ShellError { source: ShellError },
}
