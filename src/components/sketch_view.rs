use std::cell::RefCell;
use std::rc::Rc;

use glam::DVec2;
use wasm_bindgen::JsCast;
use wasm_bindgen::closure::Closure;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, Window};
use yew::prelude::*;

use super::toolbar::{Status, Toolbar};
use crate::config::SketchConfig;
use crate::controller::{InputEvent, Outcome, Sketch};
use crate::error::SketchError;
use crate::export::BrowserDownload;
use crate::kernel::Rhino3dm;
use crate::render::{CanvasSurface, RenderSettings};
use crate::state::ViewMapper;

type SharedSketch = Rc<RefCell<Option<Sketch<Rhino3dm>>>>;

#[derive(Properties, PartialEq, Clone)]
pub struct SketchViewProps {
    pub kernel: Rc<Rhino3dm>,
    pub config: SketchConfig,
}

/// DOM listeners registered on mount; removed when dropped.
struct Listeners {
    canvas: HtmlCanvasElement,
    window: Window,
    mousedown: Closure<dyn FnMut(MouseEvent)>,
    mousemove: Closure<dyn FnMut(MouseEvent)>,
    keyup: Closure<dyn FnMut(KeyboardEvent)>,
}

impl Drop for Listeners {
    fn drop(&mut self) {
        let _ = self.canvas.remove_event_listener_with_callback(
            "mousedown",
            self.mousedown.as_ref().unchecked_ref(),
        );
        let _ = self.canvas.remove_event_listener_with_callback(
            "mousemove",
            self.mousemove.as_ref().unchecked_ref(),
        );
        let _ = self
            .window
            .remove_event_listener_with_callback("keyup", self.keyup.as_ref().unchecked_ref());
    }
}

#[function_component(SketchView)]
pub fn sketch_view(props: &SketchViewProps) -> Html {
    let canvas_ref = use_node_ref();
    let sketch: SharedSketch = use_mut_ref(|| None);
    let curve_count = use_state(|| 0usize);
    let status = use_state(|| None::<Status>);

    // Mount: size the canvas, build the sketch state, wire events
    {
        let canvas_ref = canvas_ref.clone();
        let sketch = sketch.clone();
        let kernel = props.kernel.clone();
        let config = props.config.clone();
        let curve_count = curve_count.clone();
        let status = status.clone();
        use_effect_with((), move |_| {
            let listeners =
                mount(&canvas_ref, &sketch, kernel, &config, curve_count, status.clone())
                    .map_err(|e| {
                        e.report();
                        status.set(Some(Status::from(&e)));
                    })
                    .ok();
            move || drop(listeners)
        });
    }

    let on_export = {
        let sketch = sketch.clone();
        let kernel = props.kernel.clone();
        let file_name = props.config.export_file_name.clone();
        let status = status.clone();
        Callback::from(move |()| {
            let guard = sketch.borrow();
            let Some(s) = guard.as_ref() else {
                return;
            };
            match s.export(&*kernel, &file_name, &mut BrowserDownload) {
                Ok(n) => status.set(Some(Status::info(format!("Saved {file_name} ({n} bytes)")))),
                Err(e) => {
                    e.report();
                    status.set(Some(Status::from(&e)));
                }
            }
        })
    };

    html! {<div style="position:relative; width:100vw; height:100vh; background:#ffffff;">
        <canvas ref={canvas_ref} id="canvas" style="display:block; width:100%; height:100%;"></canvas>
        <Toolbar can_export={*curve_count > 0} curve_count={*curve_count} on_export={on_export} status={(*status).clone()} />
    </div>}
}

fn mount(
    canvas_ref: &NodeRef,
    sketch: &SharedSketch,
    kernel: Rc<Rhino3dm>,
    config: &SketchConfig,
    curve_count: UseStateHandle<usize>,
    status: UseStateHandle<Option<Status>>,
) -> Result<Listeners, SketchError> {
    let window = web_sys::window().ok_or_else(|| SketchError::Host("no window".into()))?;
    let canvas = canvas_ref
        .cast::<HtmlCanvasElement>()
        .ok_or_else(|| SketchError::Host("canvas not mounted".into()))?;

    // Fixed at startup; resizing the window does not update the view.
    let width = canvas.client_width().max(0) as u32;
    let height = canvas.client_height().max(0) as u32;
    canvas.set_width(width);
    canvas.set_height(height);
    let view = config.view_state(width as f64, height as f64)?;

    let ctx = canvas
        .get_context("2d")?
        .ok_or_else(|| SketchError::Host("2d context unavailable".into()))?
        .dyn_into::<CanvasRenderingContext2d>()
        .map_err(|_| SketchError::Host("unexpected context type".into()))?;
    let surface = Rc::new(RefCell::new(CanvasSurface::new(ctx)));

    let settings = RenderSettings {
        grid_extent: config.grid_extent,
        curve_subdivisions: config.curve_subdivisions,
    };
    let state: Sketch<Rhino3dm> = Sketch::new(ViewMapper::new(view), settings);
    state.redraw(&*kernel, &mut *surface.borrow_mut())?;
    *sketch.borrow_mut() = Some(state);
    log::info!("sketch canvas ready ({width}x{height})");

    let dispatch: Rc<dyn Fn(InputEvent)> = {
        let sketch = sketch.clone();
        Rc::new(move |event: InputEvent| {
            let mut guard = sketch.borrow_mut();
            let Some(s) = guard.as_mut() else {
                return;
            };
            match s.dispatch(&*kernel, event, &mut *surface.borrow_mut()) {
                Ok(outcome) => {
                    if let Outcome::CurveAdded { total } = outcome {
                        curve_count.set(total);
                    }
                    // any successful change replaces an earlier warning
                    if outcome.changed() {
                        status.set(None);
                    }
                }
                Err(e) => {
                    e.report();
                    status.set(Some(Status::from(&e)));
                }
            }
        })
    };

    let offset = |e: &MouseEvent| DVec2::new(e.offset_x() as f64, e.offset_y() as f64);

    let mousedown = {
        let dispatch = dispatch.clone();
        Closure::wrap(Box::new(move |e: MouseEvent| {
            if e.button() == 0 {
                dispatch(InputEvent::PointerDown(offset(&e)));
            }
        }) as Box<dyn FnMut(_)>)
    };
    canvas.add_event_listener_with_callback("mousedown", mousedown.as_ref().unchecked_ref())?;

    let mousemove = {
        let dispatch = dispatch.clone();
        Closure::wrap(Box::new(move |e: MouseEvent| {
            dispatch(InputEvent::PointerMove(offset(&e)));
        }) as Box<dyn FnMut(_)>)
    };
    canvas.add_event_listener_with_callback("mousemove", mousemove.as_ref().unchecked_ref())?;

    let keyup = Closure::wrap(Box::new(move |e: KeyboardEvent| {
        dispatch(InputEvent::Key(e.key()));
    }) as Box<dyn FnMut(_)>);
    window.add_event_listener_with_callback("keyup", keyup.as_ref().unchecked_ref())?;

    Ok(Listeners {
        canvas,
        window,
        mousedown,
        mousemove,
        keyup,
    })
}
