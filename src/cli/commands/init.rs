//! Init command - create project-local .vutil.toml

use crate::cli::args::InitArgs;
use crate::config::LOCAL_CONFIG_NAME;
use crate::error::{VutilError, VutilResult};
use console::style;
use tokio::fs;

/// Template for project-local config
const INIT_TEMPLATE: &str = r#"# vutil project configuration
# Settings here override your global config (~/.config/vutil/config.toml)

[general]
# verbose = true
# log_format = "text"        # text, json

[notifications]
# not_detected = false       # silence the "no vuetify detected" notice

[watch]
# debounce_ms = 1000         # filesystem event debounce window

[cache]
# enabled = true
# dir = ".vutil-cache"       # override the cache location
"#;

/// Execute the init command
pub async fn execute(args: InitArgs) -> VutilResult<()> {
    let target_dir = match args.path {
        Some(ref p) => p.clone(),
        None => {
            std::env::current_dir().map_err(|e| VutilError::io("getting current directory", e))?
        }
    };

    let config_path = target_dir.join(LOCAL_CONFIG_NAME);

    if config_path.exists() && !args.force {
        println!(
            "{} {} already exists (use --force to overwrite)",
            style("[WARN]").yellow(),
            config_path.display()
        );
        return Ok(());
    }

    fs::write(&config_path, INIT_TEMPLATE)
        .await
        .map_err(|e| VutilError::io(format!("writing {}", config_path.display()), e))?;

    println!(
        "{} Created {}",
        style("[OK]").green(),
        config_path.display()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn init_writes_template() {
        let temp = TempDir::new().unwrap();
        let args = InitArgs {
            force: false,
            path: Some(temp.path().to_path_buf()),
        };

        execute(args).await.unwrap();

        let content = std::fs::read_to_string(temp.path().join(LOCAL_CONFIG_NAME)).unwrap();
        assert!(content.contains("[notifications]"));
        // The template must stay parseable as a config overlay.
        let _: toml::Value = toml::from_str(&content).unwrap();
    }

    #[tokio::test]
    async fn init_refuses_overwrite_without_force() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join(LOCAL_CONFIG_NAME);
        std::fs::write(&path, "# custom").unwrap();

        let args = InitArgs {
            force: false,
            path: Some(temp.path().to_path_buf()),
        };
        execute(args).await.unwrap();

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "# custom");
    }
}
