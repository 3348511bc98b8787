//! Command line arguments for the `kistpark-admin` binary

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// REST backend for the KIST Park content admin console
#[derive(Parser, Debug)]
#[command(name = "kistpark-admin")]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Configuration file to load instead of the default search path
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Write a default configuration file and exit.
    ///
    /// Without a path the file goes to the user config directory.
    #[arg(long, value_name = "PATH")]
    pub generate_config: Option<Option<PathBuf>>,
}

impl Args {
    /// Destination for `--generate-config`, `None` when the flag is absent
    pub fn generate_config_path(&self) -> Option<Result<PathBuf>> {
        self.generate_config
            .as_ref()
            .map(|path| path.clone().map_or_else(Config::get_default_config_path, Ok))
    }

    /// Load the explicit config file, or search the default locations
    pub fn load_config(&self) -> Result<Config> {
        match &self.config {
            Some(path) => Config::load_from_file(path),
            None => Config::load(),
        }
    }
}
