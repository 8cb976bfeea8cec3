//! `velokiosk config` -- inspect and bootstrap the config file.

use velokiosk_config::{FileConfig, config_path, load_config, save_config};

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;

pub fn handle(args: &ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let path = global.config.clone().unwrap_or_else(config_path);

    match args.command {
        ConfigCommand::Init => {
            save_config(&FileConfig::default(), &path).map_err(|e| CliError::ConfigWrite {
                path: path.display().to_string(),
                source: e,
            })?;
            println!("Wrote {}", path.display());
            Ok(())
        }
        ConfigCommand::Show => {
            let config = load_config(Some(&path)).map_err(|e| CliError::Config {
                path: path.display().to_string(),
                source: e,
            })?;
            let rendered = toml::to_string_pretty(&config).map_err(|e| CliError::Io {
                message: e.to_string(),
            })?;
            print!("{rendered}");
            Ok(())
        }
        ConfigCommand::Path => {
            println!("{}", path.display());
            Ok(())
        }
    }
}
