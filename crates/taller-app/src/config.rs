//! Configuration management for taller
//!
//! Config stored at: ~/.config/taller/config.toml

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use taller_infra::sheet::delimiter_byte;
use taller_infra::{FilterCatalogLayout, PriceListLayout};
use taller_types::{ConfigError, Result};

/// Environment variable naming an alternative config file
pub const CONFIG_ENV: &str = "TALLER_CONFIG";

/// Application configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Address the HTTP server listens on
    #[serde(default = "default_bind")]
    pub bind: String,

    /// Directory holding the table files (default: platform data dir)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// Table file names, relative to `data_dir` unless absolute
    #[serde(default)]
    pub files: TableFiles,

    /// Log file (default: `<data_dir>/server.log`)
    #[serde(default)]
    pub log_file: Option<PathBuf>,

    /// Pid file written by `serve` (default: `<data_dir>/server.pid`)
    #[serde(default)]
    pub pid_file: Option<PathBuf>,

    #[serde(default)]
    pub log_format: LogFormat,

    /// Shared key that allows self-registration without admin credentials
    #[serde(default)]
    pub registration_key: Option<String>,

    /// Names that get the admin flag when no user has it yet
    #[serde(default = "default_admin_usernames")]
    pub admin_usernames: Vec<String>,

    /// Account created on first start when there is no admin
    #[serde(default = "default_bootstrap_admin")]
    pub bootstrap_admin: Option<BootstrapAdmin>,

    #[serde(default)]
    pub price_list: PriceListConfig,

    #[serde(default)]
    pub filter_catalog: FilterCatalogConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TableFiles {
    pub users: PathBuf,
    pub clients: PathBuf,
    pub vehicles: PathBuf,
    pub messages: PathBuf,
}

impl Default for TableFiles {
    fn default() -> Self {
        Self {
            users: PathBuf::from("usuarios.csv"),
            clients: PathBuf::from("clientes.csv"),
            vehicles: PathBuf::from("vehiculos.csv"),
            messages: PathBuf::from("mensajes.csv"),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BootstrapAdmin {
    pub username: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PriceListConfig {
    /// Spreadsheet export; quotes are unavailable without it
    pub path: Option<PathBuf>,
    #[serde(flatten)]
    pub layout: PriceListLayout,
    pub oil_category: String,
    pub accessories_category: String,
}

impl Default for PriceListConfig {
    fn default() -> Self {
        Self {
            path: None,
            layout: PriceListLayout::default(),
            oil_category: "aceites".to_string(),
            accessories_category: "complementos".to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterCatalogConfig {
    /// Vehicle to filter sheet; filter lookups are unavailable without it
    pub path: Option<PathBuf>,
    #[serde(flatten)]
    pub layout: FilterCatalogLayout,
}

fn default_bind() -> String {
    "0.0.0.0:3000".to_string()
}

fn default_admin_usernames() -> Vec<String> {
    ["admin", "Admin", "Admmin"].iter().map(|s| s.to_string()).collect()
}

fn default_bootstrap_admin() -> Option<BootstrapAdmin> {
    Some(BootstrapAdmin {
        username: "admin".to_string(),
        password: "Admin123".to_string(),
    })
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            data_dir: None,
            files: TableFiles::default(),
            log_file: None,
            pid_file: None,
            log_format: LogFormat::default(),
            registration_key: None,
            admin_usernames: default_admin_usernames(),
            bootstrap_admin: default_bootstrap_admin(),
            price_list: PriceListConfig::default(),
            filter_catalog: FilterCatalogConfig::default(),
        }
    }
}

impl Config {
    /// Get the config directory path
    pub fn config_dir() -> Result<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or(ConfigError::NotFound)?
            .join("taller");
        Ok(config_dir)
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Config file to use: explicit path, then `TALLER_CONFIG`, then the default
    pub fn resolve_path(explicit: Option<&Path>) -> Result<PathBuf> {
        if let Some(path) = explicit {
            return Ok(path.to_path_buf());
        }
        match std::env::var_os(CONFIG_ENV) {
            Some(path) if !path.is_empty() => Ok(PathBuf::from(path)),
            _ => Self::config_path(),
        }
    }

    /// Load config from file (defaults when missing), then apply env overrides
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let path = Self::resolve_path(explicit)?;
        let mut config = Self::load_from(&path)?;
        config.apply_overrides(|name| std::env::var(name).ok());
        Ok(config)
    }

    /// Load a config file without env overrides
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }
        let content = std::fs::read_to_string(path)?;
        let config: Config =
            toml::from_str(&content).map_err(|e| ConfigError::ParseError(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values that parse but cannot be used
    pub fn validate(&self) -> Result<()> {
        for (key, delimiter) in [
            ("price_list.delimiter", self.price_list.layout.delimiter),
            ("filter_catalog.delimiter", self.filter_catalog.layout.delimiter),
        ] {
            delimiter_byte(delimiter)
                .map_err(|e| ConfigError::ParseError(format!("{key}: {e}")))?;
        }
        Ok(())
    }

    /// Apply `TALLER_*` overrides; empty values are ignored
    pub fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        let var = |name: &str| var(name).filter(|v| !v.trim().is_empty());
        if let Some(bind) = var("TALLER_BIND") {
            self.bind = bind;
        }
        if let Some(dir) = var("TALLER_DATA_DIR") {
            self.data_dir = Some(PathBuf::from(dir));
        }
        if let Some(key) = var("TALLER_REGISTRATION_KEY") {
            self.registration_key = Some(key);
        }
        if let Some(path) = var("TALLER_PRICE_LIST") {
            self.price_list.path = Some(PathBuf::from(path));
        }
        if let Some(path) = var("TALLER_FILTER_CATALOG") {
            self.filter_catalog.path = Some(PathBuf::from(path));
        }
    }

    /// Save config to `path`
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| ConfigError::SaveError(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the data directory path
    pub fn data_dir(&self) -> Result<PathBuf> {
        if let Some(ref dir) = self.data_dir {
            return Ok(dir.clone());
        }
        let data_dir = dirs::data_dir()
            .ok_or(ConfigError::NotFound)?
            .join("taller");
        Ok(data_dir)
    }

    /// Resolve a path against the data directory
    pub fn data_path(&self, file: &Path) -> Result<PathBuf> {
        if file.is_absolute() {
            return Ok(file.to_path_buf());
        }
        Ok(self.data_dir()?.join(file))
    }

    pub fn log_file(&self) -> Result<PathBuf> {
        match &self.log_file {
            Some(path) => self.data_path(path),
            None => Ok(self.data_dir()?.join("server.log")),
        }
    }

    pub fn pid_file(&self) -> Result<PathBuf> {
        match &self.pid_file {
            Some(path) => self.data_path(path),
            None => Ok(self.data_dir()?.join("server.pid")),
        }
    }
}

impl std::fmt::Display for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let show = |p: Result<PathBuf>| {
            p.map(|p| p.display().to_string())
                .unwrap_or_else(|_| "(error)".to_string())
        };

        writeln!(f, "Taller Configuration")?;
        writeln!(f, "====================")?;
        writeln!(f)?;
        writeln!(f, "Bind:             {}", self.bind)?;
        writeln!(f, "Data dir:         {}", show(self.data_dir()))?;
        writeln!(f, "Users file:       {}", show(self.data_path(&self.files.users)))?;
        writeln!(f, "Clients file:     {}", show(self.data_path(&self.files.clients)))?;
        writeln!(f, "Vehicles file:    {}", show(self.data_path(&self.files.vehicles)))?;
        writeln!(f, "Messages file:    {}", show(self.data_path(&self.files.messages)))?;
        writeln!(f, "Log file:         {}", show(self.log_file()))?;
        writeln!(f, "Pid file:         {}", show(self.pid_file()))?;
        writeln!(
            f,
            "Registration key: {}",
            if self.registration_key.is_some() { "(set)" } else { "(none)" }
        )?;
        writeln!(f, "Admin names:      {}", self.admin_usernames.join(", "))?;
        writeln!(
            f,
            "Price list:       {}",
            self.price_list
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(none)".to_string())
        )?;
        writeln!(
            f,
            "Filter catalog:   {}",
            self.filter_catalog
                .path
                .as_ref()
                .map(|p| p.display().to_string())
                .unwrap_or_else(|| "(none)".to_string())
        )?;
        Ok(())
    }
}
