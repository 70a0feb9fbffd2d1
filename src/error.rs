use thiserror::Error;

use crate::model::{ScreenRect, WorldRect};

/// Finalize was attempted before three points were committed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("not enough points to finalize the curve ({count} accumulated, need at least 4)")]
pub struct InsufficientPoints {
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ViewError {
    #[error("visible world rect is empty: {0:?}")]
    EmptyWorldRect(WorldRect),
    #[error("screen rect is empty: {0:?}")]
    EmptyScreenRect(ScreenRect),
    #[error("far plane ({far}) must lie beyond near plane ({near})")]
    DepthRange { near: f64, far: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KernelError {
    #[error("geometry kernel unavailable: {0}")]
    Unavailable(String),
    #[error("curve construction failed: {0}")]
    Curve(String),
    #[error("transform construction failed: {0}")]
    Transform(String),
    #[error("document serialization failed: {0}")]
    Serialize(String),
}

#[derive(Debug, Error)]
pub enum SketchError {
    #[error(transparent)]
    InsufficientPoints(#[from] InsufficientPoints),
    #[error("no geometry to export")]
    EmptyExport,
    #[error(transparent)]
    InvalidView(#[from] ViewError),
    #[error(transparent)]
    Kernel(#[from] KernelError),
    #[error("browser host error: {0}")]
    Host(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl SketchError {
    pub fn severity(&self) -> Severity {
        match self {
            SketchError::EmptyExport => Severity::Info,
            SketchError::InsufficientPoints(_) => Severity::Warning,
            SketchError::InvalidView(_) | SketchError::Kernel(_) | SketchError::Host(_) => {
                Severity::Error
            }
        }
    }

    /// Logs at the level matching `severity`.
    pub fn report(&self) {
        match self.severity() {
            Severity::Info => log::info!("{self}"),
            Severity::Warning => log::warn!("{self}"),
            Severity::Error => log::error!("{self}"),
        }
    }
}

impl From<wasm_bindgen::JsValue> for SketchError {
    fn from(value: wasm_bindgen::JsValue) -> Self {
        SketchError::Host(js_message(&value))
    }
}

/// Best-effort text for a thrown JS value.
pub fn js_message(value: &wasm_bindgen::JsValue) -> String {
    if let Some(s) = value.as_string() {
        return s;
    }
    if let Some(err) = wasm_bindgen::JsCast::dyn_ref::<js_sys::Error>(value) {
        return String::from(err.message());
    }
    format!("{value:?}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn severities() {
        assert_eq!(SketchError::EmptyExport.severity(), Severity::Info);
        assert_eq!(
            SketchError::from(InsufficientPoints { count: 3 }).severity(),
            Severity::Warning
        );
        assert_eq!(
            SketchError::from(KernelError::Curve("bad".into())).severity(),
            Severity::Error
        );
    }

    #[test]
    fn insufficient_points_message_mentions_count() {
        let msg = SketchError::from(InsufficientPoints { count: 2 }).to_string();
        assert!(msg.contains("2 accumulated"), "{msg}");
    }
}
