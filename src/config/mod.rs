// schemasync/src/config/mod.rs
use serde::{Deserialize, Serialize, Serializer};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{AppError, Result};
use crate::scope::ScopeMatcher;
use crate::utils::dsn::redact_dsn;

/// Root of the TOML configuration file.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default, serialize_with = "serialize_redacted")]
    pub source: String,
    #[serde(default, serialize_with = "serialize_redacted")]
    pub dest: String,
    #[serde(default)]
    pub tables: Vec<String>,
    #[serde(default)]
    pub tables_ignore: Vec<String>,
    /// Keyed by table-name pattern.
    #[serde(default)]
    pub alter_ignore: BTreeMap<String, AlterIgnoreTable>,
    #[serde(default)]
    pub overwrite_data: OverwriteData,
    pub email: Option<EmailConfig>,
    /// File the configuration was read from. Stamped by `load_from_toml`.
    #[serde(skip_deserializing)]
    pub config_path: PathBuf,
}

/// Objects of matching tables that schema operations leave alone.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AlterIgnoreTable {
    #[serde(default)]
    pub column: Vec<String>,
    #[serde(default)]
    pub index: Vec<String>,
    #[serde(default)]
    pub foreign: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct OverwriteData {
    /// Processed in this order; foreign-key ordering is up to the operator.
    #[serde(default)]
    pub tables: Vec<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct EmailConfig {
    #[serde(default = "default_send_mail")]
    pub send_mail: bool,
    pub from: String,
    /// Comma-separated recipients.
    pub to: String,
    /// Path to a sendmail-compatible binary. Looked up on PATH when unset.
    pub sendmail: Option<PathBuf>,
}

fn default_send_mail() -> bool {
    true
}

fn serialize_redacted<S: Serializer>(dsn: &str, serializer: S) -> std::result::Result<S::Ok, S::Error> {
    serializer.serialize_str(&redact_dsn(dsn))
}

impl Config {
    /// Reads and validates the configuration file, stamping its path.
    pub fn load_from_toml(config_path: &Path) -> Result<Self> {
        let content = fs::read_to_string(config_path)?;
        let mut config = Self::from_toml_str(&content)?;
        config.config_path = config_path.to_path_buf();
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Config = toml::from_str(content)?;
        config.check()?;
        Ok(config)
    }

    /// Both connection descriptors are required.
    pub fn check(&self) -> Result<()> {
        if self.source.trim().is_empty() {
            return Err(AppError::Config("source dsn is empty".to_string()));
        }
        if self.dest.trim().is_empty() {
            return Err(AppError::Config("dest dsn is empty".to_string()));
        }
        Ok(())
    }

    /// Replaces the notification recipients, as requested on the command line.
    /// Has no effect when no `[email]` section is configured.
    pub fn override_mail_to(&mut self, to: &str) {
        if let Some(email) = self.email.as_mut() {
            email.to = to.to_string();
        }
    }

    pub fn scope(&self) -> ScopeMatcher<'_> {
        ScopeMatcher::new(self)
    }
}

/// Pretty JSON with connection passwords masked.
impl fmt::Display for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let json = serde_json::to_string_pretty(self).map_err(|_| fmt::Error)?;
        f.write_str(&json)
    }
}
