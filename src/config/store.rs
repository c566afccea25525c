//! Config file location, first-run template and loading

use anyhow::{Context, Result};
use ini::Ini;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::layout::Layout;
use super::user::UserConfig;
use crate::constants::{config, defaults, ini as names};

/// Whether the config file had to be created from the template
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bootstrap {
    Existing,
    Created,
}

#[derive(Debug, Clone)]
pub struct ConfigStore {
    path: PathBuf,
}

impl ConfigStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `~/.config/nvx/nvx.conf` on Linux
    pub fn default_path() -> PathBuf {
        let mut path = dirs::config_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(config::APP_DIR);
        path.push(config::FILENAME);
        path
    }

    pub fn at_default_path() -> Self {
        Self::new(Self::default_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write the one-screen template if no config file exists yet
    pub fn bootstrap(&self) -> Result<Bootstrap> {
        if self.path.exists() {
            return Ok(Bootstrap::Existing);
        }

        info!(path = %self.path.display(), "No config file found, writing default template");
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .context(format!("Failed to create config directory: {}", parent.display()))?;
        }
        default_template()
            .write_to_file(&self.path)
            .context(format!("Failed to write config file to {}", self.path.display()))?;
        Ok(Bootstrap::Created)
    }

    pub fn read(&self) -> Result<Ini> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read config from {:?}", self.path))?;
        Ini::load_from_str(&contents)
            .with_context(|| format!("Failed to parse INI from {:?}", self.path))
    }

    /// Read and validate the config file
    pub fn load(&self, layout_override: Option<Layout>) -> Result<UserConfig> {
        let ini = self.read()?;
        let config = UserConfig::from_ini(&ini, layout_override)
            .with_context(|| format!("Config file {} needs fixing", self.path.display()))?;
        debug!(
            rows = config.layout.rows().len(),
            screens = config.screens.len(),
            "Loaded config"
        );
        Ok(config)
    }
}

fn default_template() -> Ini {
    let mut ini = Ini::new();
    ini.with_section(Some(names::LAYOUT_SECTION))
        .set(format!("{}1", names::ROW_PREFIX), defaults::ROW);
    ini.with_section(Some(defaults::SCREEN_SECTION))
        .set(names::SCREEN_ID, defaults::SCREEN_ID)
        .set(names::SCREEN_NAME, defaults::SCREEN_NAME)
        .set(names::SCREEN_RESOLUTION, defaults::SCREEN_RESOLUTION)
        .set(names::SCREEN_REFRESH_RATE, defaults::SCREEN_REFRESH_RATE);
    ini
}
