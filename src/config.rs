use std::time::Duration;

use serde::Deserialize;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Base URL of the recommendation backend
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Reference backend host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Reference backend port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Horizontal drag distance a release must exceed to count as a swipe
    #[serde(default = "default_swipe_threshold_px")]
    pub swipe_threshold_px: f64,

    #[serde(default = "default_animation_ms")]
    pub exit_animation_ms: u64,

    #[serde(default = "default_animation_ms")]
    pub enter_animation_ms: u64,

    /// Slider value every metadata weight resets to on a category switch
    #[serde(default = "default_weight")]
    pub default_weight: f64,

    #[serde(default = "default_true")]
    pub enable_reasons: bool,

    #[serde(default = "default_true")]
    pub enable_insights: bool,
}

fn default_api_base_url() -> String {
    "http://127.0.0.1:3000".to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_swipe_threshold_px() -> f64 {
    100.0
}

fn default_animation_ms() -> u64 {
    300
}

fn default_weight() -> f64 {
    0.5
}

fn default_true() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: default_api_base_url(),
            host: default_host(),
            port: default_port(),
            swipe_threshold_px: default_swipe_threshold_px(),
            exit_animation_ms: default_animation_ms(),
            enter_animation_ms: default_animation_ms(),
            default_weight: default_weight(),
            enable_reasons: true,
            enable_insights: true,
        }
    }
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    /// Feature toggles handed to a session instead of a global flag service
    pub fn feature_flags(&self) -> FeatureFlags {
        FeatureFlags {
            enable_reasons: self.enable_reasons,
            enable_insights: self.enable_insights,
        }
    }

    pub fn swipe_settings(&self) -> SwipeSettings {
        SwipeSettings {
            threshold_px: self.swipe_threshold_px,
            exit_animation: Duration::from_millis(self.exit_animation_ms),
            enter_animation: Duration::from_millis(self.enter_animation_ms),
        }
    }
}

/// Toggles for the secondary enhancement endpoints
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureFlags {
    pub enable_reasons: bool,
    pub enable_insights: bool,
}

impl Default for FeatureFlags {
    fn default() -> Self {
        Self {
            enable_reasons: true,
            enable_insights: true,
        }
    }
}

/// Gesture threshold and animation pacing for the swipe controller
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SwipeSettings {
    pub threshold_px: f64,
    pub exit_animation: Duration,
    pub enter_animation: Duration,
}

impl Default for SwipeSettings {
    fn default() -> Self {
        Config::default().swipe_settings()
    }
}

impl SwipeSettings {
    /// Settings with no animation delays, for headless drivers
    pub fn instant() -> Self {
        Self {
            exit_animation: Duration::ZERO,
            enter_animation: Duration::ZERO,
            ..Self::default()
        }
    }
}
