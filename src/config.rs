use std::collections::BTreeMap;
use std::fs;
use std::path::Path;
use serde::Deserialize;
use config as config_rs;
use thiserror::Error;

use crate::property_access::KeyPolicy;
use crate::string_table::StringTables;

/// Rewrite tables recovered by hand for one particular bundle.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RewriteTables {
    /// Obfuscated identifier to readable name.
    #[serde(default)]
    pub renames: BTreeMap<String, String>,
    /// Lookup function name to (decimal code to string).
    #[serde(default)]
    pub string_tables: StringTables,
}

#[derive(Debug, Default, Clone)]
pub struct PipelineConfig {
    pub tables: RewriteTables,
    pub decode_escapes: bool,
    pub fold_booleans: bool,
    pub key_policy: KeyPolicy,
}

/// Settings given on the command line. Flags only ever switch a stage on.
#[derive(Debug, Default, Clone)]
pub struct CliOverrides {
    pub decode_escapes: bool,
    pub fold_booleans: bool,
    pub key_policy: Option<KeyPolicy>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("parse error: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("yaml parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),
    #[error("config error: {0}")]
    Config(#[from] config_rs::ConfigError),
    #[error("invalid value: {0}")]
    InvalidValue(String),
}

/// Read a rules file. `.yaml`/`.yml` files are parsed as YAML, anything
/// else as JSON.
pub fn load_tables(path: &Path) -> Result<RewriteTables, ConfigError> {
    let content = fs::read_to_string(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml") | Some("yml")
    );
    if is_yaml {
        Ok(serde_yaml::from_str(&content)?)
    } else {
        Ok(serde_json::from_str(&content)?)
    }
}

pub fn load_config(
    rules: Option<&Path>,
    overrides: &CliOverrides,
) -> Result<PipelineConfig, ConfigError> {
    let tables = match rules {
        Some(path) => load_tables(path)?,
        None => RewriteTables::default(),
    };

    // Defaults, then environment, then CLI flags
    let mut builder = config_rs::Config::builder()
        .set_default("decode_escapes", false)?
        .set_default("fold_booleans", false)?
        .set_default("key_policy", "permissive")?;

    if let Ok(v) = std::env::var("DEOBF_DECODE_ESCAPES") {
        builder = builder.set_override("decode_escapes", v)?;
    }
    if let Ok(v) = std::env::var("DEOBF_FOLD_BOOLEANS") {
        builder = builder.set_override("fold_booleans", v)?;
    }
    if let Ok(v) = std::env::var("DEOBF_KEY_POLICY") {
        builder = builder.set_override("key_policy", v)?;
    }

    if overrides.decode_escapes {
        builder = builder.set_override("decode_escapes", true)?;
    }
    if overrides.fold_booleans {
        builder = builder.set_override("fold_booleans", true)?;
    }
    if let Some(policy) = overrides.key_policy {
        let name = match policy {
            KeyPolicy::Permissive => "permissive",
            KeyPolicy::IdentifierOnly => "identifier-only",
        };
        builder = builder.set_override("key_policy", name)?;
    }

    let cfg = builder.build()?;
    let key_policy = cfg
        .get_string("key_policy")?
        .parse::<KeyPolicy>()
        .map_err(ConfigError::InvalidValue)?;

    Ok(PipelineConfig {
        tables,
        decode_escapes: cfg.get_bool("decode_escapes")?,
        fold_booleans: cfg.get_bool("fold_booleans")?,
        key_policy,
    })
}
