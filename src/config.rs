use anyhow::{Context, Result};
use log::{debug, error, info, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use toml::{Table, Value};

/// Config location relative to the home directory
pub const CONFIG_PATH: &str = ".config/gomu/config";

/// Fallback when `general.popup_timeout` is missing or invalid
pub const DEFAULT_POPUP_TIMEOUT: Duration = Duration::from_secs(5);

/// Written on first run. Keys missing from the user's file fall back to
/// the values here.
pub const DEFAULT_CONFIG: &str = r##"[general]
# confirmation popup to add the whole playlist to the queue
confirm_bulk_add = true
confirm_on_exit = true
load_prev_queue = true
# change this to directory that contains mp3 files
music_dir = "~/music"
# url history of downloaded audio will be saved here
history_path = "~/.local/share/gomu/urls"
popup_timeout = "5s"
# initial volume when gomu starts up
volume = 100

# not all colors can be reproducible in terminal
# changing hex colors may or may not produce expected result
[color]
accent = "#008B8B"
foreground = "#FFFFFF"
now_playing_title = "#017702"
popup = "#0A0F14"
"##;

/// Player configuration backed by a TOML document
#[derive(Debug, Clone)]
pub struct Config {
    path: Option<PathBuf>,
    user: Table,
    defaults: Table,
}

impl Config {
    /// Default config path under the user's home directory
    pub fn default_path() -> Result<PathBuf> {
        Ok(dirs::home_dir()
            .context("Failed to get home directory")?
            .join(CONFIG_PATH))
    }

    /// Write the default document to `path` unless a file is already there.
    ///
    /// Returns whether a file was created.
    pub fn ensure_exists(path: &Path) -> Result<bool> {
        if path.exists() {
            return Ok(false);
        }

        if let Some(dir) = path.parent() {
            if !dir.exists() {
                fs::create_dir_all(dir)
                    .with_context(|| format!("Failed to create config directory: {:?}", dir))?;
                info!("Created config directory: {:?}", dir);
            }
        }

        fs::write(path, DEFAULT_CONFIG)
            .with_context(|| format!("Failed to write default config: {:?}", path))?;
        info!("Wrote default config to {:?}", path);
        Ok(true)
    }

    /// Load the config at the per-user `path`, creating it on first run.
    ///
    /// I/O and parse failures are logged and the built-in defaults are used.
    pub fn load(path: &Path) -> Self {
        if let Err(e) = Self::ensure_exists(path) {
            error!("{:#}", e);
        }
        Self::open(path)
    }

    /// Load an existing config without creating it
    pub fn open(path: &Path) -> Self {
        let user = match Self::read(path) {
            Ok(table) => table,
            Err(e) => {
                error!("{:#}", e);
                Table::new()
            }
        };

        Self {
            path: Some(path.to_path_buf()),
            user,
            defaults: builtin_defaults(),
        }
    }

    fn read(path: &Path) -> Result<Table> {
        debug!("Loading config from: {:?}", path);
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;
        content
            .parse::<Table>()
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Config made of the built-in defaults only
    pub fn builtin() -> Self {
        Self {
            path: None,
            user: Table::new(),
            defaults: builtin_defaults(),
        }
    }

    /// Config from an in-memory document, falling back to the defaults
    pub fn parse(content: &str) -> Result<Self> {
        let user = content.parse::<Table>().context("Failed to parse config")?;
        Ok(Self {
            path: None,
            user,
            defaults: builtin_defaults(),
        })
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Look up a dotted key such as `general.popup_timeout`
    pub fn get(&self, key: &str) -> Option<&Value> {
        lookup(&self.user, key).or_else(|| lookup(&self.defaults, key))
    }

    fn typed<T>(&self, key: &str, convert: impl Fn(&Value) -> Option<T>) -> Option<T> {
        if let Some(value) = lookup(&self.user, key) {
            match convert(value) {
                Some(v) => return Some(v),
                None => warn!("Config key {} has unexpected value {}", key, value),
            }
        }
        lookup(&self.defaults, key).and_then(convert)
    }

    pub fn get_bool(&self, key: &str) -> bool {
        self.typed(key, Value::as_bool).unwrap_or(false)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.typed(key, Value::as_integer)
    }

    pub fn get_string(&self, key: &str) -> Option<String> {
        self.typed(key, |v| v.as_str().map(str::to_string))
    }

    pub fn get_path(&self, key: &str) -> Option<PathBuf> {
        self.get_string(key).map(|p| expand_path(&p))
    }

    /// How long timed popups stay open
    pub fn popup_timeout(&self) -> Duration {
        let raw = self.get_string("general.popup_timeout").unwrap_or_default();
        match parse_duration(&raw) {
            Ok(timeout) => timeout,
            Err(e) => {
                error!("{:#}", e);
                DEFAULT_POPUP_TIMEOUT
            }
        }
    }

    /// Initial volume clamped to 0..=100
    pub fn volume(&self) -> u8 {
        self.get_int("general.volume")
            .map(|v| v.clamp(0, 100) as u8)
            .unwrap_or(100)
    }
}

fn builtin_defaults() -> Table {
    DEFAULT_CONFIG.parse::<Table>().unwrap_or_else(|e| {
        error!("Built-in config is invalid: {}", e);
        Table::new()
    })
}

fn lookup<'a>(table: &'a Table, key: &str) -> Option<&'a Value> {
    let mut parts = key.split('.');
    let mut value = table.get(parts.next()?)?;
    for part in parts {
        value = value.as_table()?.get(part)?;
    }
    Some(value)
}

/// Expand a leading `~` to the home directory
pub fn expand_path(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    }
    if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

/// Parse durations like `500ms`, `5s`, `2m` or `1h30m`
pub fn parse_duration(input: &str) -> Result<Duration> {
    let input = input.trim();
    if input.is_empty() {
        anyhow::bail!("Invalid duration: empty string");
    }

    let mut total = Duration::ZERO;
    let mut rest = input;
    while !rest.is_empty() {
        let digits = rest
            .find(|c: char| !c.is_ascii_digit() && c != '.')
            .unwrap_or(rest.len());
        if digits == 0 {
            anyhow::bail!("Invalid duration {:?}: expected a number", input);
        }
        let amount: f64 = rest[..digits]
            .parse()
            .with_context(|| format!("Invalid duration {:?}", input))?;
        rest = &rest[digits..];

        let unit_len = rest
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(rest.len());
        let seconds = match &rest[..unit_len] {
            "ms" => amount / 1000.0,
            "s" => amount,
            "m" => amount * 60.0,
            "h" => amount * 3600.0,
            "" => anyhow::bail!("Invalid duration {:?}: missing unit", input),
            unit => anyhow::bail!("Invalid duration {:?}: unknown unit {:?}", input, unit),
        };
        rest = &rest[unit_len..];

        let part = Duration::try_from_secs_f64(seconds)
            .with_context(|| format!("Invalid duration {:?}: out of range", input))?;
        total = total
            .checked_add(part)
            .with_context(|| format!("Invalid duration {:?}: out of range", input))?;
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_defaults_parse() {
        let config = Config::builtin();
        assert_eq!(config.popup_timeout(), Duration::from_secs(5));
        assert!(config.get_bool("general.load_prev_queue"));
        assert!(config.get_bool("general.confirm_on_exit"));
        assert!(config.get_bool("general.confirm_bulk_add"));
        assert_eq!(config.volume(), 100);
        assert!(config.get("general.music_dir").is_some());
    }

    #[test]
    fn test_user_values_override_defaults() {
        let config = Config::parse(
            r#"
            [general]
            popup_timeout = "2s"
            confirm_on_exit = false
            "#,
        )
        .unwrap();

        assert_eq!(config.popup_timeout(), Duration::from_secs(2));
        assert!(!config.get_bool("general.confirm_on_exit"));
        // Missing keys still come from the defaults
        assert!(config.get_bool("general.load_prev_queue"));
    }

    #[test]
    fn test_invalid_timeout_falls_back() {
        let config = Config::parse("[general]\npopup_timeout = \"soon\"").unwrap();
        assert_eq!(config.popup_timeout(), DEFAULT_POPUP_TIMEOUT);
    }

    #[test]
    fn test_wrong_type_falls_back() {
        let config = Config::parse("[general]\nload_prev_queue = \"yes\"").unwrap();
        assert!(config.get_bool("general.load_prev_queue"));
    }

    #[test]
    fn test_unknown_key() {
        let config = Config::builtin();
        assert!(config.get("general.nope").is_none());
        assert!(config.get("nope").is_none());
    }

    #[test]
    fn test_parse_duration() {
        assert_eq!(parse_duration("5s").unwrap(), Duration::from_secs(5));
        assert_eq!(parse_duration("500ms").unwrap(), Duration::from_millis(500));
        assert_eq!(parse_duration("1h30m").unwrap(), Duration::from_secs(5400));
        assert_eq!(parse_duration("1.5s").unwrap(), Duration::from_millis(1500));
        assert!(parse_duration("").is_err());
        assert!(parse_duration("5").is_err());
        assert!(parse_duration("5d").is_err());
        assert!(parse_duration("s").is_err());
        assert!(parse_duration("99999999999999999999h").is_err());
        assert!(parse_duration("18446744073709551615s1s").is_err());
    }

    #[test]
    fn test_huge_timeout_falls_back() {
        let config = Config::parse(r#"[general]
popup_timeout = "99999999999999999999h""#).unwrap();
        assert_eq!(config.popup_timeout(), DEFAULT_POPUP_TIMEOUT);
    }

    #[test]
    fn test_expand_path() {
        assert_eq!(expand_path("/tmp/music"), PathBuf::from("/tmp/music"));
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~/music"), home.join("music"));
        }
    }
}
