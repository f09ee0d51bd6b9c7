use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use cross_xdg::BaseDirs;

/// When to color diagnostics on stderr and the timing line on stdout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorMode {
    #[default]
    Auto,
    Always,
    Never,
}

impl ColorMode {
    fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(ColorMode::Auto),
            "always" | "true" | "on" => Some(ColorMode::Always),
            "never" | "false" | "off" => Some(ColorMode::Never),
            _ => None,
        }
    }
}

/// Execution limits and output preferences.
///
/// Values are resolved flags -> environment -> `bfi.toml` -> defaults. The
/// defaults impose no limits, so a non-terminating program runs until killed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Settings {
    pub max_steps: Option<usize>,
    pub timeout_ms: Option<u64>,
    pub color: ColorMode,
}

pub const ENV_MAX_STEPS: &str = "BFI_MAX_STEPS";
pub const ENV_TIMEOUT_MS: &str = "BFI_TIMEOUT_MS";

impl Settings {
    /// Settings from the config file, overridden by the environment.
    pub fn load() -> Self {
        let mut settings = config_path()
            .and_then(|path| fs::read_to_string(path).ok())
            .map(|content| parse_settings(&content))
            .unwrap_or_default();
        settings.apply_env(|key| std::env::var(key).ok());
        settings
    }

    /// Override fields from environment lookups. Unparsable values are ignored.
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(n) = lookup(ENV_MAX_STEPS).and_then(|s| s.trim().parse::<usize>().ok()) {
            self.max_steps = Some(n);
        }
        if let Some(ms) = lookup(ENV_TIMEOUT_MS).and_then(|s| s.trim().parse::<u64>().ok()) {
            self.timeout_ms = timeout(ms);
        }
    }

    /// Override fields from command-line flags, when given. `--timeout 0`
    /// switches the timeout off.
    pub fn apply_flags(&mut self, max_steps: Option<usize>, timeout_ms: Option<u64>) {
        if max_steps.is_some() {
            self.max_steps = max_steps;
        }
        if let Some(ms) = timeout_ms {
            self.timeout_ms = timeout(ms);
        }
    }
}

// Zero disables the timeout.
fn timeout(ms: u64) -> Option<u64> {
    (ms > 0).then_some(ms)
}

/// `$XDG_CONFIG_HOME/bfi.toml`, or the platform equivalent.
pub fn config_path() -> Option<PathBuf> {
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bfi.toml");
    Some(path)
}

/// Parse the `[limits]` and `[output]` sections of a config file.
///
/// Only `key = value` lines are understood; values may be quoted. Unknown
/// keys and values that fail to parse are skipped.
pub fn parse_settings(content: &str) -> Settings {
    let mut section = String::new();
    let mut map: HashMap<(String, String), String> = HashMap::new();
    for line in content.lines() {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') { continue; }
        if line.starts_with('[') && line.ends_with(']') {
            section = line[1..line.len() - 1].trim().to_string();
            continue;
        }
        if let Some((key, val_raw)) = line.split_once('=') {
            let val_raw = val_raw.trim();
            let val = val_raw
                .strip_prefix('"')
                .and_then(|v| v.strip_suffix('"'))
                .unwrap_or(val_raw);
            map.insert((section.clone(), key.trim().to_string()), val.to_string());
        }
    }

    let get = |section: &str, key: &str| map.get(&(section.to_string(), key.to_string()));

    let mut settings = Settings::default();
    if let Some(n) = get("limits", "max_steps").and_then(|v| v.parse::<usize>().ok()) {
        settings.max_steps = Some(n);
    }
    if let Some(ms) = get("limits", "timeout_ms").and_then(|v| v.parse::<u64>().ok()) {
        settings.timeout_ms = timeout(ms);
    }
    if let Some(color) = get("output", "color").and_then(|v| ColorMode::parse(v)) {
        settings.color = color;
    }
    settings
}
