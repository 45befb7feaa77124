// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::{Context, Result, anyhow, bail};
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tablero_app::state::EnhanceOptions;

const CONFIG_VERSION: i64 = 1;
const DEFAULT_CURRENT_PATH: &str = "/admin";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub version: i64,
    #[serde(default)]
    pub storage: Storage,
    #[serde(default)]
    pub ui: Ui,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            storage: Storage::default(),
            ui: Ui::default(),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct Storage {
    pub prefs_path: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Ui {
    pub rescan_delay: Option<String>,
    pub ripple_lifetime: Option<String>,
    pub mobile_breakpoint: Option<i64>,
    pub scroll_threshold: Option<i64>,
    pub viewport_width: Option<i64>,
    pub current_path: Option<String>,
}

impl Default for Ui {
    fn default() -> Self {
        Self {
            rescan_delay: Some("500ms".to_owned()),
            ripple_lifetime: Some("600ms".to_owned()),
            mobile_breakpoint: None,
            scroll_threshold: None,
            viewport_width: None,
            current_path: Some(DEFAULT_CURRENT_PATH.to_owned()),
        }
    }
}

impl Config {
    pub fn default_path() -> Result<PathBuf> {
        if let Some(path) = env::var_os("TABLERO_CONFIG_PATH") {
            return Ok(PathBuf::from(path));
        }

        let config_root = dirs::config_dir().ok_or_else(|| {
            anyhow!("cannot resolve config directory; set TABLERO_CONFIG_PATH to the config file")
        })?;

        let app_dir = config_root.join(tablero_prefs::APP_NAME);
        fs::create_dir_all(&app_dir)
            .with_context(|| format!("create config directory {}", app_dir.display()))?;
        Ok(app_dir.join("config.toml"))
    }

    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        let value: toml::Value = toml::from_str(&raw)
            .with_context(|| format!("parse TOML config {}", path.display()))?;

        let version = value
            .get("version")
            .and_then(toml::Value::as_integer)
            .ok_or_else(|| {
                anyhow!(
                    "config file {} is unversioned. Add `version = 1` and move values under [storage] and [ui]",
                    path.display()
                )
            })?;

        if version != CONFIG_VERSION {
            bail!(
                "unsupported config version {} in {}; expected version = 1",
                version,
                path.display()
            );
        }

        let config: Config = value
            .try_into()
            .with_context(|| format!("decode config {}", path.display()))?;
        config.validate(path)?;
        Ok(config)
    }

    fn validate(&self, path: &Path) -> Result<()> {
        if self.version != CONFIG_VERSION {
            bail!(
                "config {} has version {}; expected 1",
                path.display(),
                self.version
            );
        }

        if let Some(prefs_path) = &self.storage.prefs_path {
            tablero_prefs::validate_prefs_path(prefs_path)?;
        }

        for (key, raw) in [
            ("ui.rescan_delay", &self.ui.rescan_delay),
            ("ui.ripple_lifetime", &self.ui.ripple_lifetime),
        ] {
            if let Some(raw) = raw {
                let parsed = parse_duration(raw)?;
                if parsed <= Duration::ZERO {
                    bail!("{key} in {} must be positive, got {raw}", path.display());
                }
            }
        }

        for (key, value) in [
            ("ui.mobile_breakpoint", self.ui.mobile_breakpoint),
            ("ui.scroll_threshold", self.ui.scroll_threshold),
            ("ui.viewport_width", self.ui.viewport_width),
        ] {
            if let Some(value) = value {
                if value <= 0 {
                    bail!("{key} in {} must be positive, got {value}", path.display());
                }
                if u32::try_from(value).is_err() {
                    bail!(
                        "{key} in {} must fit in 32 bits, got {value}",
                        path.display()
                    );
                }
            }
        }

        Ok(())
    }

    pub fn prefs_path(&self) -> Result<PathBuf> {
        match &self.storage.prefs_path {
            Some(path) => Ok(PathBuf::from(path)),
            None => tablero_prefs::default_prefs_path(),
        }
    }

    pub fn enhance_options(&self) -> Result<EnhanceOptions> {
        let defaults = EnhanceOptions::default();
        Ok(EnhanceOptions {
            rescan_delay: match &self.ui.rescan_delay {
                Some(raw) => parse_duration(raw)?,
                None => defaults.rescan_delay,
            },
            ripple_lifetime: match &self.ui.ripple_lifetime {
                Some(raw) => parse_duration(raw)?,
                None => defaults.ripple_lifetime,
            },
            mobile_breakpoint: match self.ui.mobile_breakpoint {
                Some(value) => u32::try_from(value)
                    .with_context(|| format!("ui.mobile_breakpoint {value} out of range"))?,
                None => defaults.mobile_breakpoint,
            },
            scroll_threshold: match self.ui.scroll_threshold {
                Some(value) => u32::try_from(value)
                    .with_context(|| format!("ui.scroll_threshold {value} out of range"))?,
                None => defaults.scroll_threshold,
            },
        })
    }

    pub fn viewport_width(&self) -> Option<u32> {
        self.ui
            .viewport_width
            .and_then(|value| u32::try_from(value).ok())
    }

    pub fn current_path(&self) -> &str {
        self.ui.current_path.as_deref().unwrap_or(DEFAULT_CURRENT_PATH)
    }

    pub fn example_config(path: &Path) -> String {
        format!(
            "# tablero config\n# Place this file at: {}\n\nversion = 1\n\n[storage]\n# Optional. Default is platform data dir (for example ~/.local/share/tablero/prefs.db)\n# prefs_path = \"/absolute/path/to/prefs.db\"\n\n[ui]\nrescan_delay = \"500ms\"\nripple_lifetime = \"600ms\"\n# mobile_breakpoint = 768\n# scroll_threshold = 300\n# viewport_width = 1280\ncurrent_path = \"{}\"\n",
            path.display(),
            DEFAULT_CURRENT_PATH,
        )
    }
}

fn parse_duration(raw: &str) -> Result<Duration> {
    if let Some(value) = raw.strip_suffix("ms") {
        let millis: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_millis(millis));
    }
    if let Some(value) = raw.strip_suffix('s') {
        let secs: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(secs));
    }
    if let Some(value) = raw.strip_suffix('m') {
        let mins: u64 = value
            .parse()
            .with_context(|| format!("invalid duration {raw:?}"))?;
        return Ok(Duration::from_secs(mins * 60));
    }

    bail!("invalid duration {raw:?}; use one of: <N>ms, <N>s, <N>m (for example 500ms or 5s)")
}

#[cfg(test)]
mod tests {
    use super::{Config, parse_duration};
    use anyhow::Result;
    use std::path::PathBuf;
    use std::sync::{Mutex, OnceLock};
    use std::time::Duration;

    fn write_config(content: &str) -> Result<(tempfile::TempDir, PathBuf)> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        std::fs::write(&path, content)?;
        Ok((temp, path))
    }

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        static ENV_LOCK: OnceLock<Mutex<()>> = OnceLock::new();
        match ENV_LOCK.get_or_init(|| Mutex::new(())).lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    #[test]
    fn missing_config_uses_defaults() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let config = Config::load(&temp.path().join("missing.toml"))?;
        assert_eq!(config.version, 1);
        assert_eq!(config.current_path(), "/admin");
        let options = config.enhance_options()?;
        assert_eq!(options.rescan_delay, Duration::from_millis(500));
        assert_eq!(options.mobile_breakpoint, 768);
        Ok(())
    }

    #[test]
    fn unversioned_config_is_rejected_with_actionable_message() -> Result<()> {
        let (_temp, path) = write_config("[ui]\ncurrent_path = \"/admin/users\"\n")?;
        let error = Config::load(&path).expect_err("unversioned schema should fail");
        let message = error.to_string();
        assert!(message.contains("version = 1"));
        assert!(message.contains("[storage] and [ui]"));
        Ok(())
    }

    #[test]
    fn v1_config_parses() -> Result<()> {
        let (_temp, path) = write_config(
            "version = 1\n[ui]\nrescan_delay = \"1s\"\nmobile_breakpoint = 900\nscroll_threshold = 150\nviewport_width = 640\ncurrent_path = \"/admin/orders\"\n",
        )?;

        let config = Config::load(&path)?;
        let options = config.enhance_options()?;
        assert_eq!(options.rescan_delay, Duration::from_secs(1));
        assert_eq!(options.mobile_breakpoint, 900);
        assert_eq!(options.scroll_threshold, 150);
        assert_eq!(config.viewport_width(), Some(640));
        assert_eq!(config.current_path(), "/admin/orders");
        Ok(())
    }

    #[test]
    fn malformed_config_returns_parse_error() -> Result<()> {
        let (_temp, path) = write_config("{{not toml")?;
        let error = Config::load(&path).expect_err("malformed config should fail");
        assert!(error.to_string().contains("parse TOML config"));
        Ok(())
    }

    #[test]
    fn unsupported_config_version_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 7\n")?;
        let error = Config::load(&path).expect_err("v7 config should fail");
        assert!(error.to_string().contains("unsupported config version 7"));
        Ok(())
    }

    #[test]
    fn default_path_honors_env_override() -> Result<()> {
        let _guard = env_lock();
        let temp = tempfile::tempdir()?;
        let override_path = temp.path().join("custom-config.toml");
        // SAFETY: test-only process-local env mutation.
        unsafe {
            std::env::set_var("TABLERO_CONFIG_PATH", &override_path);
        }
        let resolved = Config::default_path()?;
        // SAFETY: test cleanup for process-local env mutation.
        unsafe {
            std::env::remove_var("TABLERO_CONFIG_PATH");
        }
        assert_eq!(resolved, override_path);
        Ok(())
    }

    #[test]
    fn prefs_path_prefers_storage_config() -> Result<()> {
        let (_temp, path) =
            write_config("version = 1\n[storage]\nprefs_path = \"/explicit/prefs.db\"\n")?;
        let config = Config::load(&path)?;
        assert_eq!(config.prefs_path()?, PathBuf::from("/explicit/prefs.db"));
        Ok(())
    }

    #[test]
    fn prefs_path_rejects_uri_style_storage_value() -> Result<()> {
        let (_temp, path) =
            write_config("version = 1\n[storage]\nprefs_path = \"https://evil.example/prefs.db\"\n")?;
        let error = Config::load(&path).expect_err("URI prefs_path should fail validation");
        let message = error.to_string();
        assert!(
            message.contains("looks like a URI") || message.contains("filesystem path"),
            "unexpected message: {message}"
        );
        Ok(())
    }

    #[test]
    fn zero_rescan_delay_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nrescan_delay = \"0ms\"\n")?;
        let error = Config::load(&path).expect_err("zero delay should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn non_positive_breakpoint_is_rejected() -> Result<()> {
        let (_temp, path) = write_config("version = 1\n[ui]\nmobile_breakpoint = 0\n")?;
        let error = Config::load(&path).expect_err("zero breakpoint should fail");
        assert!(error.to_string().contains("must be positive"));
        Ok(())
    }

    #[test]
    fn oversized_breakpoint_is_rejected_not_truncated() -> Result<()> {
        // 2^32 + 768 would silently truncate to 768 under a plain cast.
        let (_temp, path) = write_config("version = 1\n[ui]\nmobile_breakpoint = 4294968064\n")?;
        let error = Config::load(&path).expect_err("out-of-range breakpoint should fail");
        assert!(error.to_string().contains("must fit in 32 bits"));
        Ok(())
    }

    #[test]
    fn durations_parse_ms_seconds_and_minutes() -> Result<()> {
        assert_eq!(parse_duration("500ms")?, Duration::from_millis(500));
        assert_eq!(parse_duration("5s")?, Duration::from_secs(5));
        assert_eq!(parse_duration("2m")?, Duration::from_secs(120));
        Ok(())
    }

    #[test]
    fn invalid_duration_is_rejected() {
        let error = parse_duration("oops").expect_err("invalid duration should fail");
        assert!(error.to_string().contains("invalid duration"));
    }

    #[test]
    fn example_config_includes_required_sections() -> Result<()> {
        let temp = tempfile::tempdir()?;
        let path = temp.path().join("config.toml");
        let example = Config::example_config(&path);
        assert!(example.contains("version = 1"));
        assert!(example.contains("[storage]"));
        assert!(example.contains("[ui]"));
        assert!(example.contains("rescan_delay"));
        Ok(())
    }
}
