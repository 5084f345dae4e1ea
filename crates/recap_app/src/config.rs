use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use recap_core::DEFAULT_LANGUAGE;
use recap_engine::ClientSettings;
use recap_logging::recap_info;
use serde::Deserialize;

use crate::cli::Args;

/// Picked up from the working directory when `--config` is not given.
pub const DEFAULT_CONFIG_FILE: &str = "recap.ron";

/// On-disk settings. Every field is optional; CLI flags win over the file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server_url: Option<String>,
    pub submit_path: Option<String>,
    pub language: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub read_timeout_secs: Option<u64>,
    pub max_frame_bytes: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub client: ClientSettings,
    pub language: String,
}

pub fn load(explicit: Option<&Path>) -> anyhow::Result<FileConfig> {
    match explicit {
        Some(path) => read(path),
        None => {
            let path = Path::new(DEFAULT_CONFIG_FILE);
            if path.exists() {
                read(path)
            } else {
                Ok(FileConfig::default())
            }
        }
    }
}

fn read(path: &Path) -> anyhow::Result<FileConfig> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    let config = ron::from_str(&text)
        .with_context(|| format!("failed to parse config file {}", path.display()))?;
    recap_info!("Loaded config from {}", path.display());
    Ok(config)
}

impl FileConfig {
    pub fn into_settings(self, args: &Args) -> Settings {
        let defaults = ClientSettings::default();
        let client = ClientSettings {
            base_url: args
                .server
                .clone()
                .or(self.server_url)
                .unwrap_or(defaults.base_url),
            submit_path: self.submit_path.unwrap_or(defaults.submit_path),
            connect_timeout: self
                .connect_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
            read_timeout: self
                .read_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(defaults.read_timeout),
            max_frame_bytes: self.max_frame_bytes.unwrap_or(defaults.max_frame_bytes),
        };
        let language = args
            .language
            .clone()
            .or(self.language)
            .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string());
        Settings { client, language }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use clap::Parser;

    use super::*;

    #[test]
    fn file_values_apply_and_flags_override_them() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"(
                server_url: Some("http://files.example:9000"),
                language: Some("french"),
                read_timeout_secs: Some(60),
            )"#
        )
        .unwrap();

        let config = load(Some(file.path())).unwrap();
        assert_eq!(config.language.as_deref(), Some("french"));

        let args = Args::parse_from(["recap", "https://youtu.be/abc", "--server", "http://cli:1"]);
        let settings = config.into_settings(&args);
        assert_eq!(settings.client.base_url, "http://cli:1");
        assert_eq!(settings.client.read_timeout, Duration::from_secs(60));
        assert_eq!(settings.client.submit_path, "/summarize");
        assert_eq!(settings.language, "french");
    }

    #[test]
    fn defaults_without_a_file() {
        let args = Args::parse_from(["recap", "https://youtu.be/abc", "-l", "german"]);
        let settings = FileConfig::default().into_settings(&args);

        assert_eq!(settings.client.base_url, ClientSettings::default().base_url);
        assert_eq!(settings.language, "german");
    }

    #[test]
    fn explicit_missing_or_broken_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load(Some(&dir.path().join("absent.ron"))).is_err());

        let broken = dir.path().join("broken.ron");
        fs::write(&broken, "(server_url: 42").unwrap();
        let err = load(Some(&broken)).unwrap_err();
        assert!(format!("{err:#}").contains("broken.ron"));
    }
}
