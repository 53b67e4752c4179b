use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::ui::MarqueeConfig;

pub const DEFAULT_SETTINGS_PATH: &str = "data/marquee.ron";

/// Top-level settings file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Defaults for every marquee that does not override them.
    pub marquee: MarqueeConfig,
    /// Cadence of the periodic marquee tick in milliseconds.
    pub tick_interval_ms: u64,
    /// Replace every plain label with a marquee after loading the layout.
    pub substitute_labels: bool,
    pub preview: PreviewSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            marquee: MarqueeConfig::default(),
            tick_interval_ms: 16,
            substitute_labels: false,
            preview: PreviewSettings::default(),
        }
    }
}

impl Settings {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(1))
    }

    /// Clamp out-of-range values into something the runtime accepts.
    pub fn sanitized(mut self) -> Self {
        self.marquee = self.marquee.sanitized();
        self.tick_interval_ms = self.tick_interval_ms.max(1);
        self.preview = self.preview.sanitized();
        self
    }
}

/// Parameters of the headless preview loop.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreviewSettings {
    /// Simulated run length.
    pub seconds: f32,
    /// Nominal host frame time.
    pub frame_ms: u64,
    /// Frames are stretched by up to this many milliseconds at random.
    pub jitter_ms: u64,
    pub seed: u64,
    /// How often the preview prints each marquee's visible text.
    pub report_every_ms: u64,
    pub screen_width: f32,
    pub screen_height: f32,
}

impl Default for PreviewSettings {
    fn default() -> Self {
        Self {
            seconds: 6.0,
            frame_ms: 16,
            jitter_ms: 4,
            seed: 42,
            report_every_ms: 250,
            screen_width: 640.0,
            screen_height: 360.0,
        }
    }
}

impl PreviewSettings {
    fn sanitized(mut self) -> Self {
        let defaults = Self::default();
        if !self.seconds.is_finite() || self.seconds < 0.0 {
            self.seconds = defaults.seconds;
        }
        self.frame_ms = self.frame_ms.max(1);
        self.report_every_ms = self.report_every_ms.max(1);
        if !(self.screen_width > 0.0) || !self.screen_width.is_finite() {
            self.screen_width = defaults.screen_width;
        }
        if !(self.screen_height > 0.0) || !self.screen_height.is_finite() {
            self.screen_height = defaults.screen_height;
        }
        self
    }
}

/// Parse settings from RON text.
pub fn parse_settings(src: &str) -> Result<Settings, ron::error::SpannedError> {
    ron::from_str::<Settings>(src).map(Settings::sanitized)
}

/// Load settings from a RON file. Logs a warning and returns defaults on failure.
pub fn load_settings(path: &str) -> Settings {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            log::warn!("failed to read {}: {}, using default settings", path, e);
            return Settings::default();
        }
    };
    match parse_settings(&content) {
        Ok(settings) => settings,
        Err(e) => {
            log::warn!("failed to parse RON {}: {}, using default settings", path, e);
            Settings::default()
        }
    }
}
