use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Embedded default configuration.
const DEFAULT_CONFIG: &str = include_str!("../config.default.toml");

// ── Final (merged) config types ──

#[derive(Debug, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub settings: Settings,
    #[serde(default)]
    pub checks: Checks,
}

#[derive(Debug, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    /// Name of the env var carrying the API token.
    #[serde(default)]
    pub token_env_var: String,
    /// JSON-lines audit file. Empty disables file auditing.
    #[serde(default)]
    pub audit_log: String,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Upper bound on one full evaluation; expiry is treated as not approved.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            token_env_var: String::new(),
            audit_log: String::new(),
            log_level: default_log_level(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.github.com".into()
}

fn default_log_level() -> String {
    "info".into()
}

fn default_timeout_secs() -> u64 {
    30
}

#[derive(Debug, Deserialize, Serialize, Default)]
pub struct Checks {
    #[serde(default)]
    pub owlbot_template_changes: bool,
    #[serde(default)]
    pub author_title: Vec<AuthorTitleRule>,
}

/// A conjunctive rule: author must equal `author` and every configured pattern must match.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AuthorTitleRule {
    pub name: String,
    pub author: String,
    pub title: String,
    #[serde(default)]
    pub body: Option<String>,
    /// Every changed path must match.
    #[serde(default)]
    pub files: Option<String>,
}

// ── Overlay types (user config that merges with defaults) ──

#[derive(Debug, Deserialize, Default)]
struct ConfigOverlay {
    #[serde(default)]
    settings: SettingsOverlay,
    #[serde(default)]
    checks: ChecksOverlay,
}

#[derive(Debug, Deserialize, Default)]
struct SettingsOverlay {
    api_base_url: Option<String>,
    token_env_var: Option<String>,
    audit_log: Option<String>,
    log_level: Option<String>,
    timeout_secs: Option<u64>,
}

#[derive(Debug, Deserialize, Default)]
struct ChecksOverlay {
    #[serde(default)]
    replace: bool,
    owlbot_template_changes: Option<bool>,
    #[serde(default)]
    author_title: Vec<AuthorTitleRule>,
    #[serde(default)]
    remove_author_title: Vec<String>,
}

// ── Merge logic ──

/// Merge user rules into default rules.
/// In replace mode: user rules replace defaults entirely.
/// In merge mode: remove by name first, then add; a rule with an existing name replaces it in place.
fn merge_rules(
    base: &mut Vec<AuthorTitleRule>,
    add: Vec<AuthorTitleRule>,
    remove: &[String],
    replace: bool,
) {
    if replace {
        *base = add;
        return;
    }
    base.retain(|rule| !remove.contains(&rule.name));
    for rule in add {
        match base.iter_mut().find(|r| r.name == rule.name) {
            Some(existing) => *existing = rule,
            None => base.push(rule),
        }
    }
}

impl Config {
    /// Load the default embedded configuration.
    pub fn default_config() -> Self {
        toml::from_str(DEFAULT_CONFIG).expect("embedded default config must parse")
    }

    /// Load configuration with resolution order:
    /// 1. Start with embedded defaults
    /// 2. Merge user overlay from ~/.config/auto-approve/config.toml (if exists)
    ///
    /// An overlay that exists but does not parse is an error, not a silent fallback.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::default_config();
        if let Some(overlay) = Self::load_overlay()? {
            config.apply_overlay(overlay);
        }
        Ok(config)
    }

    /// Defaults merged with an overlay given as TOML text.
    pub fn from_overlay_str(toml_str: &str) -> Result<Self, ConfigError> {
        let overlay: ConfigOverlay = toml::from_str(toml_str)?;
        let mut config = Self::default_config();
        config.apply_overlay(overlay);
        Ok(config)
    }

    /// Try to load user overlay from ~/.config/auto-approve/config.toml.
    fn load_overlay() -> Result<Option<ConfigOverlay>, ConfigError> {
        let Some(home) = std::env::var_os("HOME") else {
            return Ok(None);
        };
        let path = std::path::Path::new(&home).join(".config/auto-approve/config.toml");
        let Ok(content) = std::fs::read_to_string(path) else {
            return Ok(None);
        };
        Ok(Some(toml::from_str(&content)?))
    }

    /// Apply an overlay on top of this config (merge semantics).
    fn apply_overlay(&mut self, overlay: ConfigOverlay) {
        // Settings: scalar overrides
        let s = overlay.settings;
        if let Some(v) = s.api_base_url {
            self.settings.api_base_url = v;
        }
        if let Some(v) = s.token_env_var {
            self.settings.token_env_var = v;
        }
        if let Some(v) = s.audit_log {
            self.settings.audit_log = v;
        }
        if let Some(v) = s.log_level {
            self.settings.log_level = v;
        }
        if let Some(v) = s.timeout_secs {
            self.settings.timeout_secs = v;
        }

        // Checks
        let c = overlay.checks;
        if let Some(v) = c.owlbot_template_changes {
            self.checks.owlbot_template_changes = v;
        }
        merge_rules(
            &mut self.checks.author_title,
            c.author_title,
            &c.remove_author_title,
            c.replace,
        );
    }

    /// API token from the configured env var, if set and non-empty.
    pub fn token(&self) -> Option<String> {
        if self.settings.token_env_var.is_empty() {
            return None;
        }
        std::env::var(&self.settings.token_env_var)
            .ok()
            .filter(|t| !t.is_empty())
    }
}
