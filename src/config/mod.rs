/// Configuration system for tubeseo.
///
/// Provides a layered configuration hierarchy:
///
/// 1. **Built-in defaults** — hardcoded in [`schema::TubeseoConfig::default()`]
/// 2. **User global config** — `~/.tubeseo/config.toml`
/// 3. **Project local config** — `.tubeseo.toml` in the current working directory
/// 4. **Environment variables** — `TUBESEO_*` overrides (highest precedence)
///
/// Later layers override earlier ones at the field level. Missing sections
/// or keys in a TOML file keep the previous layer's values.
///
/// # Usage
///
/// ```rust,ignore
/// use tubeseo::config;
///
/// let cfg = config::load();
/// let client = tubeseo::api::ApiClient::from_config(&cfg.api);
/// ```
pub mod schema;

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub use schema::TubeseoConfig;

// ---------------------------------------------------------------------------
// Config loading
// ---------------------------------------------------------------------------

/// Load the fully resolved tubeseo configuration.
///
/// Merges all layers in order: defaults → global TOML → project TOML → env
/// vars. This is the primary entry point for everything that needs
/// configuration.
pub fn load() -> TubeseoConfig {
    let mut config = load_from(global_config_path(), project_config_path());
    apply_env_overrides(&mut config, |name| std::env::var(name).ok());
    config
}

/// Merge defaults with the given global and project files (no env vars).
///
/// Missing or malformed files are skipped so that a broken config never
/// stops the tool from running.
pub fn load_from(global: Option<PathBuf>, project: Option<PathBuf>) -> TubeseoConfig {
    let Ok(mut merged) = toml::Value::try_from(TubeseoConfig::default()) else {
        return TubeseoConfig::default();
    };

    for layer in [global, project].into_iter().flatten() {
        if let Some(overlay) = load_toml_value(&layer) {
            merge_values(&mut merged, overlay);
        }
    }

    merged.try_into().unwrap_or_default()
}

/// Read a TOML file as a raw value tree, if it exists and parses.
fn load_toml_value(path: &Path) -> Option<toml::Value> {
    let content = fs::read_to_string(path).ok()?;
    let value: toml::Value = toml::from_str(&content).ok()?;
    // reject layers whose values have the wrong types
    value.clone().try_into::<TubeseoConfig>().ok()?;
    Some(value)
}

/// Overlay `overlay` onto `base`, table by table. Non-table values replace.
fn merge_values(base: &mut toml::Value, overlay: toml::Value) {
    match (base, overlay) {
        (toml::Value::Table(base_table), toml::Value::Table(overlay_table)) => {
            for (key, value) in overlay_table {
                match base_table.get_mut(&key) {
                    Some(existing) => merge_values(existing, value),
                    None => {
                        base_table.insert(key, value);
                    }
                }
            }
        }
        (base, overlay) => *base = overlay,
    }
}

// ---------------------------------------------------------------------------
// File paths
// ---------------------------------------------------------------------------

/// Path to the user global config: `~/.tubeseo/config.toml`.
fn global_config_path() -> Option<PathBuf> {
    dirs::home_dir().map(|home| home.join(".tubeseo").join("config.toml"))
}

/// Path to the project local config: `.tubeseo.toml` in the current directory.
fn project_config_path() -> Option<PathBuf> {
    std::env::current_dir()
        .ok()
        .map(|cwd| cwd.join(".tubeseo.toml"))
}

/// Return the path to the global config file for display/init purposes.
pub fn global_config_file() -> Option<PathBuf> {
    global_config_path()
}

/// Return the path to the project config file for display purposes.
pub fn project_config_file() -> Option<PathBuf> {
    project_config_path()
}

// ---------------------------------------------------------------------------
// Environment variable overrides
// ---------------------------------------------------------------------------

/// Apply environment variable overrides (highest precedence layer).
///
/// Supported variables:
/// - `TUBESEO_BASE_URL` — backend base URL
/// - `TUBESEO_TIMEOUT_MS` — request timeout
/// - `TUBESEO_CHUNK_SIZE` — stream read size in bytes
/// - `TUBESEO_BIND` — dashboard bind address
/// - `TUBESEO_DEFAULT_DAYS` — default analytics range
/// - `TUBESEO_LOGGING` — diagnostic log on/off (`1`/`true`/`yes`/`on`)
/// - `TUBESEO_LOG_PATH` — diagnostic log file
///
/// Unparseable values are ignored.
pub fn apply_env_overrides(config: &mut TubeseoConfig, var: impl Fn(&str) -> Option<String>) {
    if let Some(val) = var("TUBESEO_BASE_URL")
        && !val.is_empty()
    {
        config.api.base_url = val;
    }
    if let Some(val) = var("TUBESEO_TIMEOUT_MS")
        && let Ok(ms) = val.parse::<u64>()
    {
        config.api.timeout_ms = ms;
    }
    if let Some(val) = var("TUBESEO_CHUNK_SIZE")
        && let Ok(size) = val.parse::<usize>()
        && size > 0
    {
        config.stream.chunk_size = size;
    }
    if let Some(val) = var("TUBESEO_BIND")
        && !val.is_empty()
    {
        config.dashboard.bind = val;
    }
    if let Some(val) = var("TUBESEO_DEFAULT_DAYS")
        && let Ok(days) = val.parse::<u32>()
    {
        config.dashboard.default_days = days;
    }
    if let Some(val) = var("TUBESEO_LOGGING") {
        config.logging.enabled = is_truthy(&val);
    }
    if let Some(val) = var("TUBESEO_LOG_PATH")
        && !val.is_empty()
    {
        config.logging.path = val;
    }
}

/// Check if a string value represents a truthy boolean.
fn is_truthy(val: &str) -> bool {
    matches!(
        val.to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}

// ---------------------------------------------------------------------------
// Config init / set / reset
// ---------------------------------------------------------------------------

/// Write the default annotated config to `~/.tubeseo/config.toml`.
///
/// Returns an error if the file already exists (use `force = true` to
/// overwrite).
pub fn init_config(force: bool) -> Result<PathBuf> {
    let path = global_config_path().context("could not determine home directory")?;
    init_config_at(&path, force)?;
    Ok(path)
}

/// Write the default annotated config to `path`.
pub fn init_config_at(path: &Path, force: bool) -> Result<()> {
    if path.exists() && !force {
        anyhow::bail!(
            "config file already exists at {}. Use --force to overwrite.",
            path.display()
        );
    }

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }

    fs::write(path, TubeseoConfig::default_toml()).context("failed to write config file")?;

    Ok(())
}

/// Set a single config key to a value in the global config file.
///
/// Supports dotted keys like `api.base_url`.
pub fn set_config_value(key: &str, value: &str) -> Result<()> {
    let path = global_config_path().context("could not determine home directory")?;
    set_config_value_at(&path, key, value)
}

/// Set a dotted config key in the file at `path`, creating it from the
/// defaults if it does not exist yet.
pub fn set_config_value_at(path: &Path, key: &str, value: &str) -> Result<()> {
    let mut root: toml::Value = if path.exists() {
        let content = fs::read_to_string(path).context("failed to read config file")?;
        toml::from_str(&content).context("failed to parse config as TOML value")?
    } else {
        toml::Value::try_from(TubeseoConfig::default())
            .context("failed to serialize default config")?
    };

    set_toml_value(&mut root, key, value)?;

    // refuse to write a file that would no longer load
    root.clone()
        .try_into::<TubeseoConfig>()
        .with_context(|| format!("invalid value '{value}' for '{key}'"))?;

    let output = toml::to_string_pretty(&root).context("failed to serialize updated config")?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).context("failed to create config directory")?;
    }
    fs::write(path, output).context("failed to write config file")?;

    Ok(())
}

/// Set a value in a TOML value tree using a dotted key path.
///
/// Only keys of the schema are accepted. The new value keeps the type of the
/// schema default for that key.
fn set_toml_value(root: &mut toml::Value, key: &str, raw_value: &str) -> Result<()> {
    let (section, leaf) = key
        .split_once('.')
        .with_context(|| format!("config key must be 'section.key', got '{key}'"))?;

    let defaults = toml::Value::try_from(TubeseoConfig::default())
        .context("failed to serialize default config")?;
    let template = defaults
        .get(section)
        .and_then(|s| s.get(leaf))
        .with_context(|| format!("config key not found: '{key}'"))?;

    let new_value = match template {
        toml::Value::Boolean(_) => toml::Value::Boolean(is_truthy(raw_value)),
        toml::Value::Integer(_) => {
            let n: i64 = raw_value
                .parse()
                .with_context(|| format!("expected integer for '{key}', got '{raw_value}'"))?;
            toml::Value::Integer(n)
        }
        toml::Value::Float(_) => {
            let f: f64 = raw_value
                .parse()
                .with_context(|| format!("expected float for '{key}', got '{raw_value}'"))?;
            toml::Value::Float(f)
        }
        _ => toml::Value::String(raw_value.to_string()),
    };

    let root_table = root
        .as_table_mut()
        .context("config file root is not a table")?;
    let section_table = root_table
        .entry(section.to_string())
        .or_insert(toml::Value::Table(toml::map::Map::new()))
        .as_table_mut()
        .with_context(|| format!("expected table at '{section}'"))?;

    section_table.insert(leaf.to_string(), new_value);
    Ok(())
}

/// Reset the global config to defaults (overwrite the file).
pub fn reset_config() -> Result<PathBuf> {
    init_config(true)
}

/// Show the effective (fully resolved) config as TOML.
pub fn show_effective_config() -> Result<String> {
    let config = load();
    toml::to_string_pretty(&config).context("failed to serialize effective config")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
