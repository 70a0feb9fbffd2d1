use yew::prelude::*;

use crate::error::{Severity, SketchError};

#[derive(Clone, Debug, PartialEq)]
pub struct Status {
    pub text: String,
    pub severity: Severity,
}

impl Status {
    pub fn info(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            severity: Severity::Info,
        }
    }
}

impl From<&SketchError> for Status {
    fn from(e: &SketchError) -> Self {
        Self {
            text: e.to_string(),
            severity: e.severity(),
        }
    }
}

#[derive(Properties, PartialEq, Clone)]
pub struct ToolbarProps {
    pub can_export: bool,
    pub curve_count: usize,
    pub on_export: Callback<()>,
    pub status: Option<Status>,
}

#[function_component(Toolbar)]
pub fn toolbar(props: &ToolbarProps) -> Html {
    let export_cb = {
        let cb = props.on_export.clone();
        Callback::from(move |_| cb.emit(()))
    };
    let status = props.status.as_ref().map(|s| {
        let color = match s.severity {
            Severity::Info => "#8b949e",
            Severity::Warning => "#d29922",
            Severity::Error => "#f85149",
        };
        html! { <div style={format!("font-size:11px; line-height:1.2; color:{color}; background:#1c2128; border:1px solid #30363d; padding:4px 6px; border-radius:6px;")}>{ s.text.clone() }</div> }
    });
    html! {<div style="position:absolute; top:12px; right:12px; background:rgba(22,27,34,0.9); color:#c9d1d9; border:1px solid #30363d; border-radius:8px; padding:8px; min-width:200px; display:flex; flex-direction:column; gap:6px;">
        <button id="downloadButton" disabled={!props.can_export} onclick={export_cb}>{"Download .3dm"}</button>
        <div style="font-size:11px; opacity:0.7;">{ format!("Curves: {}", props.curve_count) }</div>
        <div style="font-size:11px; opacity:0.7;">{"Click to add points, Enter to finish. Keys: 'l' line, 'p' polyline, 'c' circle"}</div>
        { status.unwrap_or_default() }
    </div>}
}
