use std::rc::Rc;

use wasm_bindgen_futures::spawn_local;
use yew::prelude::*;

use super::sketch_view::SketchView;
use crate::config::SketchConfig;
use crate::kernel::Rhino3dm;

#[derive(Clone)]
enum KernelState {
    Loading,
    Ready(Rc<Rhino3dm>),
    Failed(String),
}

#[derive(Properties, PartialEq, Clone)]
pub struct AppProps {
    pub config: SketchConfig,
}

#[function_component(App)]
pub fn app(props: &AppProps) -> Html {
    let kernel = use_state(|| KernelState::Loading);

    // Load the geometry kernel once
    {
        let kernel = kernel.clone();
        use_effect_with((), move |_| {
            spawn_local(async move {
                match Rhino3dm::load().await {
                    Ok(k) => kernel.set(KernelState::Ready(Rc::new(k))),
                    Err(e) => {
                        log::error!("{e}");
                        kernel.set(KernelState::Failed(e.to_string()));
                    }
                }
            });
            || ()
        });
    }

    let message = |text: String| {
        html! { <div style="position:absolute; top:50%; left:50%; transform:translate(-50%, -50%); font-size:14px; opacity:0.85;">{ text }</div> }
    };

    match &*kernel {
        KernelState::Loading => message("Loading geometry kernel...".to_string()),
        KernelState::Failed(err) => message(format!("Could not load the geometry kernel: {err}")),
        KernelState::Ready(k) => html! { <SketchView kernel={k.clone()} config={props.config.clone()} /> },
    }
}
