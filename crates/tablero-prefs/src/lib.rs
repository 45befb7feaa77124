// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

//! Persisted UI preferences: a small key-value store with typed accessors.
//! The only flag today is the sidebar collapsed state, written on every
//! toggle and read once at load.

use anyhow::{Context, Result, anyhow, bail};
use rusqlite::{Connection, OptionalExtension, params};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;

pub const APP_NAME: &str = "tablero";

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS ui_prefs (
  key TEXT PRIMARY KEY,
  value TEXT NOT NULL,
  updated_at TEXT NOT NULL
);
";

const REQUIRED_COLUMNS: [&str; 3] = ["key", "value", "updated_at"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrefKey {
    SidebarCollapsed,
}

impl PrefKey {
    pub const ALL: [Self; 1] = [Self::SidebarCollapsed];

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SidebarCollapsed => "sidebarCollapsed",
        }
    }
}

pub struct PrefStore {
    conn: Connection,
}

impl PrefStore {
    pub fn open(path: &Path) -> Result<Self> {
        let printable = path.to_string_lossy().to_string();
        validate_prefs_path(&printable)?;
        let existed = path.exists();
        let conn = Connection::open(path)
            .with_context(|| format!("open preference store at {}", path.display()))?;
        configure_connection(&conn)?;
        if !existed && printable != ":memory:" {
            set_private_permissions(path)?;
        }
        Ok(Self { conn })
    }

    pub fn open_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("open in-memory preference store")?;
        configure_connection(&conn)?;
        Ok(Self { conn })
    }

    pub fn raw_connection(&self) -> &Connection {
        &self.conn
    }

    pub fn bootstrap(&self) -> Result<()> {
        if has_prefs_table(&self.conn)? {
            validate_schema(&self.conn)?;
        } else {
            self.conn
                .execute_batch(SCHEMA)
                .context("create preference schema")?;
        }
        Ok(())
    }

    fn get_raw(&self, key: &str) -> Result<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM ui_prefs WHERE key = ?",
                params![key],
                |row| row.get::<_, String>(0),
            )
            .optional()
            .with_context(|| format!("read preference {key}"))
    }

    fn put_raw(&self, key: &str, value: &str) -> Result<()> {
        let now = now_rfc3339()?;
        self.conn
            .execute(
                "
                INSERT INTO ui_prefs (key, value, updated_at)
                VALUES (?, ?, ?)
                ON CONFLICT(key) DO UPDATE SET
                  value = excluded.value,
                  updated_at = excluded.updated_at
                ",
                params![key, value, now],
            )
            .with_context(|| format!("upsert preference {key}"))?;
        Ok(())
    }

    /// Reads the persisted sidebar flag. Only the literal string `true`
    /// restores the collapsed state; any other stored value means expanded,
    /// and an absent key means the user never toggled.
    pub fn sidebar_collapsed(&self) -> Result<Option<bool>> {
        let raw = self.get_raw(PrefKey::SidebarCollapsed.as_str())?;
        Ok(raw.map(|value| value == "true"))
    }

    pub fn set_sidebar_collapsed(&self, collapsed: bool) -> Result<()> {
        let value = if collapsed { "true" } else { "false" };
        self.put_raw(PrefKey::SidebarCollapsed.as_str(), value)
    }

    /// Raw view over every known key, for `--check` style diagnostics.
    pub fn list_prefs(&self) -> Result<Vec<(PrefKey, Option<String>)>> {
        let mut prefs = Vec::with_capacity(PrefKey::ALL.len());
        for key in PrefKey::ALL {
            prefs.push((key, self.get_raw(key.as_str())?));
        }
        Ok(prefs)
    }
}

fn has_prefs_table(conn: &Connection) -> Result<bool> {
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'ui_prefs'",
            [],
            |row| row.get(0),
        )
        .context("inspect preference schema")?;
    Ok(count > 0)
}

fn validate_schema(conn: &Connection) -> Result<()> {
    let mut stmt = conn
        .prepare("SELECT name FROM pragma_table_info('ui_prefs')")
        .context("prepare schema inspection")?;
    let columns = stmt
        .query_map([], |row| row.get::<_, String>(0))
        .context("query schema columns")?
        .collect::<rusqlite::Result<Vec<String>>>()
        .context("collect schema columns")?;

    let missing: Vec<&str> = REQUIRED_COLUMNS
        .iter()
        .copied()
        .filter(|required| !columns.iter().any(|column| column == required))
        .collect();
    if !missing.is_empty() {
        bail!(
            "table `ui_prefs` is missing required columns: {}; delete the store and let tablero recreate it",
            missing.join(", ")
        );
    }
    Ok(())
}

fn configure_connection(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        PRAGMA journal_mode = WAL;
        PRAGMA foreign_keys = ON;
        PRAGMA busy_timeout = 5000;
        ",
    )
    .context("configure sqlite pragmas")
}

pub fn default_prefs_path() -> Result<PathBuf> {
    if let Some(override_path) = env::var_os("TABLERO_PREFS_PATH") {
        return Ok(PathBuf::from(override_path));
    }

    let data_root = dirs::data_local_dir().ok_or_else(|| {
        anyhow!("cannot resolve data directory; set TABLERO_PREFS_PATH to a writable store path")
    })?;

    let app_dir = data_root.join(APP_NAME);
    fs::create_dir_all(&app_dir)
        .with_context(|| format!("create data directory {}", app_dir.display()))?;
    Ok(app_dir.join("prefs.db"))
}

pub fn validate_prefs_path(path: &str) -> Result<()> {
    if path.is_empty() {
        bail!("preference store path must not be empty");
    }
    if path == ":memory:" {
        return Ok(());
    }

    if let Some(index) = path.find("://")
        && index > 0
    {
        let scheme = &path[..index];
        if scheme.chars().all(char::is_alphabetic) {
            bail!(
                "preference store path {path:?} looks like a URI ({scheme}://); pass a filesystem path instead"
            );
        }
    }

    if path.starts_with("file:") {
        bail!("preference store path {path:?} uses file: URI syntax; pass a plain filesystem path");
    }

    if path.contains('?') {
        bail!(
            "preference store path {path:?} contains '?'; remove query parameters and use a plain file path"
        );
    }

    Ok(())
}

fn now_rfc3339() -> Result<String> {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .context("format current timestamp")
}

fn set_private_permissions(path: &Path) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let mut permissions = fs::metadata(path)
            .with_context(|| format!("stat {}", path.display()))?
            .permissions();
        permissions.set_mode(0o600);
        fs::set_permissions(path, permissions)
            .with_context(|| format!("set permissions on {}", path.display()))?;
    }
    Ok(())
}
