//! Startup settings. The host page may embed JSON in an element with id
//! `sketch-config`; anything missing falls back to the defaults below.

use log::LevelFilter;
use serde::Deserialize;

use crate::error::ViewError;
use crate::model::{ScreenRect, ViewState, WorldRect};

pub const CONFIG_ELEMENT_ID: &str = "sketch-config";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct SketchConfig {
    /// World region shown on the canvas.
    pub world: WorldRect,
    pub near: f64,
    pub far: f64,
    /// Grid lines are drawn at every integer from -extent to +extent.
    pub grid_extent: i32,
    /// Straight segments used to display each curve.
    pub curve_subdivisions: usize,
    pub export_file_name: String,
    pub log_level: String,
}

impl Default for SketchConfig {
    fn default() -> Self {
        Self {
            world: WorldRect {
                xmin: -30.0,
                xmax: 30.0,
                ymin: -30.0,
                ymax: 30.0,
            },
            near: 1.0,
            far: 1000.0,
            grid_extent: 50,
            curve_subdivisions: 200,
            export_file_name: "sketch2d.3dm".to_string(),
            log_level: "info".to_string(),
        }
    }
}

impl SketchConfig {
    pub fn from_json(raw: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(raw)
    }

    /// Reads the embedded page config, if any.
    pub fn load() -> Self {
        let raw = web_sys::window()
            .and_then(|w| w.document())
            .and_then(|d| d.get_element_by_id(CONFIG_ELEMENT_ID))
            .and_then(|el| el.text_content());
        match raw {
            Some(raw) if !raw.trim().is_empty() => Self::from_json(&raw).unwrap_or_else(|e| {
                log::warn!("ignoring malformed #{CONFIG_ELEMENT_ID}: {e}");
                Self::default()
            }),
            _ => Self::default(),
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        self.log_level.parse().unwrap_or(LevelFilter::Info)
    }

    /// View for a canvas of the given client size.
    pub fn view_state(&self, width: f64, height: f64) -> Result<ViewState, ViewError> {
        ViewState::new(
            self.world,
            ScreenRect {
                x: 0.0,
                y: 0.0,
                width,
                height,
            },
            self.near,
            self.far,
        )
    }
}
