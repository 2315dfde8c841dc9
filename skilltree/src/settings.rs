use std::fs;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use engine::throttle::{DEFAULT_THROTTLE_INTERVAL, Throttle};

const MIN_THROTTLE: Duration = Duration::from_millis(16);
const MAX_THROTTLE: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct ResizeSettings {
    #[serde(rename = "throttleMs", with = "crate::serde_duration")]
    pub throttle: Duration,
    /// Also re-measure once at the end of a burst.
    pub trailing: bool,
}

impl Default for ResizeSettings {
    fn default() -> Self {
        Self {
            throttle: DEFAULT_THROTTLE_INTERVAL,
            trailing: false,
        }
    }
}

impl ResizeSettings {
    pub fn to_throttle(self) -> Throttle {
        Throttle::new(self.throttle).with_trailing(self.trailing)
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutSettings {
    pub node_width: f32,
    pub node_height: f32,
    pub horizontal_gap: f32,
    pub vertical_gap: f32,
    pub margin_top: f32,
}

impl Default for LayoutSettings {
    fn default() -> Self {
        Self {
            node_width: 56.0,
            node_height: 56.0,
            horizontal_gap: 24.0,
            vertical_gap: 48.0,
            margin_top: 32.0,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderSettings {
    pub edge_thickness: u32,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self { edge_thickness: 3 }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TreeSettings {
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub resize: ResizeSettings,
    #[serde(default)]
    pub layout: LayoutSettings,
    #[serde(default)]
    pub render: RenderSettings,
}

impl Default for TreeSettings {
    fn default() -> Self {
        Self {
            version: default_version(),
            resize: ResizeSettings::default(),
            layout: LayoutSettings::default(),
            render: RenderSettings::default(),
        }
    }
}

impl TreeSettings {
    pub fn sanitized(mut self) -> Self {
        self.version = default_version();
        self.resize.throttle = self.resize.throttle.clamp(MIN_THROTTLE, MAX_THROTTLE);

        let defaults = LayoutSettings::default();
        let layout = &mut self.layout;
        layout.node_width = positive_or(layout.node_width, defaults.node_width);
        layout.node_height = positive_or(layout.node_height, defaults.node_height);
        layout.horizontal_gap = non_negative(layout.horizontal_gap);
        layout.vertical_gap = non_negative(layout.vertical_gap);
        layout.margin_top = non_negative(layout.margin_top);

        self.render.edge_thickness = self.render.edge_thickness.clamp(1, 16);
        self
    }
}

fn positive_or(value: f32, fallback: f32) -> f32 {
    if value.is_finite() && value > 0.0 {
        value
    } else {
        fallback
    }
}

fn non_negative(value: f32) -> f32 {
    if value.is_finite() { value.max(0.0) } else { 0.0 }
}

fn default_version() -> u32 {
    1
}

#[derive(Debug, Clone)]
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn from_env() -> Self {
        if let Some(explicit) = std::env::var_os("SKILLTREE_SETTINGS_PATH") {
            return Self::new(explicit);
        }

        let base = std::env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".config")))
            .unwrap_or_else(|| PathBuf::from("."));

        Self::new(base.join("skilltree").join("settings.json"))
    }

    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Missing or malformed files fall back to defaults.
    pub fn load(&self) -> TreeSettings {
        let Ok(bytes) = fs::read(&self.path) else {
            return TreeSettings::default();
        };
        match serde_json::from_slice::<TreeSettings>(&bytes) {
            Ok(settings) => settings.sanitized(),
            Err(err) => {
                tracing::warn!(path = %self.path.display(), %err, "ignoring invalid settings file");
                TreeSettings::default()
            }
        }
    }

    pub fn save(&self, settings: &TreeSettings) -> io::Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let text = serde_json::to_string_pretty(settings)
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
        fs::write(&self.path, text)
    }
}
