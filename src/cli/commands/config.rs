//! Config command - show or edit configuration

use crate::cli::args::{ConfigAction, ConfigArgs};
use crate::config::{Config, ConfigManager, LOCAL_CONFIG_NAME};
use crate::error::{VutilError, VutilResult};
use console::style;
use std::path::PathBuf;
use tokio::fs;

/// Execute the config command
pub async fn execute(args: ConfigArgs, config: &Config, manager: &ConfigManager) -> VutilResult<()> {
    match args.action {
        None | Some(ConfigAction::Show) => show_config(config),
        Some(ConfigAction::Path) => show_path(manager),
        Some(ConfigAction::Init { force }) => init_config(manager, force).await?,
        Some(ConfigAction::Set { key, value, local }) => {
            if local {
                set_local_value(&key, &value).await?
            } else {
                set_value(manager, config, &key, &value).await?
            }
        }
    }

    Ok(())
}

fn show_config(config: &Config) {
    let toml =
        toml::to_string_pretty(config).unwrap_or_else(|_| "Error serializing config".to_string());
    println!("{}", toml);
}

fn show_path(manager: &ConfigManager) {
    println!("{}", manager.path().display());
}

async fn init_config(manager: &ConfigManager, force: bool) -> VutilResult<()> {
    let path = manager.path();

    if path.exists() && !force {
        println!(
            "{} Config already exists at {} (use --force to overwrite)",
            style("[WARN]").yellow(),
            path.display()
        );
        return Ok(());
    }

    manager.save(&Config::default()).await?;
    println!(
        "{} Configuration initialized at {}",
        style("[OK]").green(),
        path.display()
    );

    Ok(())
}

async fn set_value(
    manager: &ConfigManager,
    config: &Config,
    key: &str,
    value: &str,
) -> VutilResult<()> {
    let mut config = config.clone();
    apply_key(&mut config, key, value)?;
    manager.save(&config).await?;

    println!("{} Set {} = {}", style("[OK]").green(), key, value);
    Ok(())
}

/// Apply a dot-separated key to the typed config
fn apply_key(config: &mut Config, key: &str, value: &str) -> VutilResult<()> {
    let parts: Vec<&str> = key.split('.').collect();

    match parts.as_slice() {
        ["general", "verbose"] => config.general.verbose = parse_bool(value)?,
        ["general", "log_format"] => config.general.log_format = value.to_string(),

        ["notifications", "not_detected"] => {
            config.notifications.not_detected = parse_bool(value)?
        }

        ["watch", "debounce_ms"] => config.watch.debounce_ms = parse_u64(value)?,

        ["cache", "enabled"] => config.cache.enabled = parse_bool(value)?,
        ["cache", "dir"] => config.cache.dir = Some(PathBuf::from(value)),

        _ => {
            return Err(VutilError::User(format!(
                "Unknown configuration key: {}",
                key
            )))
        }
    }

    Ok(())
}

/// Edit the project-local .vutil.toml, preserving comments and layout
async fn set_local_value(key: &str, value: &str) -> VutilResult<()> {
    // Validate against the typed schema before touching the file.
    apply_key(&mut Config::default(), key, value)?;

    let cwd = std::env::current_dir()
        .map_err(|e| VutilError::io("getting current directory", e))?;
    let path = ConfigManager::find_local_config(&cwd).unwrap_or_else(|| cwd.join(LOCAL_CONFIG_NAME));

    let content = match fs::read_to_string(&path).await {
        Ok(content) => content,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(e) => {
            return Err(VutilError::io(
                format!("reading {}", path.display()),
                e,
            ))
        }
    };

    let mut doc: toml_edit::DocumentMut =
        content.parse().map_err(|e: toml_edit::TomlError| {
            VutilError::ConfigInvalid {
                path: path.clone(),
                reason: e.to_string(),
            }
        })?;

    let (section, field) = key
        .split_once('.')
        .ok_or_else(|| VutilError::User(format!("Invalid key format: {}", key)))?;

    let item = if let Ok(b) = value.parse::<bool>() {
        toml_edit::value(b)
    } else if let Ok(n) = value.parse::<i64>() {
        toml_edit::value(n)
    } else {
        toml_edit::value(value)
    };
    doc[section][field] = item;

    fs::write(&path, doc.to_string())
        .await
        .map_err(|e| VutilError::io(format!("writing {}", path.display()), e))?;

    println!(
        "{} Set {} = {} in {}",
        style("[OK]").green(),
        key,
        value,
        path.display()
    );
    Ok(())
}

fn parse_bool(value: &str) -> VutilResult<bool> {
    value
        .parse()
        .map_err(|_| VutilError::User(format!("Expected true/false, got '{}'", value)))
}

fn parse_u64(value: &str) -> VutilResult<u64> {
    value
        .parse()
        .map_err(|_| VutilError::User(format!("Expected a number, got '{}'", value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apply_known_keys() {
        let mut config = Config::default();

        apply_key(&mut config, "notifications.not_detected", "false").unwrap();
        assert!(!config.notifications.not_detected);

        apply_key(&mut config, "watch.debounce_ms", "250").unwrap();
        assert_eq!(config.watch.debounce_ms, 250);

        apply_key(&mut config, "cache.dir", "/tmp/vutil-cache").unwrap();
        assert_eq!(config.cache.dir, Some(PathBuf::from("/tmp/vutil-cache")));
    }

    #[test]
    fn apply_unknown_key_fails() {
        let mut config = Config::default();
        assert!(apply_key(&mut config, "nope.nothing", "1").is_err());
    }

    #[test]
    fn parse_bool_rejects_garbage() {
        assert!(parse_bool("true").unwrap());
        assert!(parse_bool("maybe").is_err());
    }
}
