//! Interaction state machine.
//!
//! [`Sketch`] is the whole application state: view, point accumulator and curve
//! store. Input events are dispatched one at a time; any event that changes the
//! accumulator or the store redraws before `dispatch` returns. A failing event
//! leaves both structures exactly as they were.

use crate::error::SketchError;
use crate::export::{SaveTarget, export_curves};
use crate::kernel::{CoordinateSystem, GeometryKernel};
use crate::model::{Preset, ScreenPoint, curve_degree};
use crate::render::{RenderSettings, Scene, Surface, draw_frame, draw_scene};
use crate::state::{CurveStore, PointAccumulator, ViewMapper};

#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown(ScreenPoint),
    PointerMove(ScreenPoint),
    Key(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Finalize,
    Insert(Preset),
}

impl Command {
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "Enter" => Some(Command::Finalize),
            "l" => Some(Command::Insert(Preset::Line)),
            "p" => Some(Command::Insert(Preset::Polyline)),
            "c" => Some(Command::Insert(Preset::Circle)),
            _ => None,
        }
    }
}

enum Step {
    Click(ScreenPoint),
    Track(ScreenPoint),
    Run(Command),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    Idle,
    Sketching,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// Nothing changed; no frame was drawn.
    Unchanged,
    /// The accumulator changed and a frame was drawn.
    Sketched,
    /// A curve was appended and a frame was drawn.
    CurveAdded { total: usize },
}

impl Outcome {
    /// True when the model changed and a frame was drawn.
    pub fn changed(self) -> bool {
        self != Outcome::Unchanged
    }
}

pub struct Sketch<K: GeometryKernel> {
    view: ViewMapper,
    points: PointAccumulator,
    curves: CurveStore<K::Curve>,
    settings: RenderSettings,
}

impl<K: GeometryKernel> Sketch<K> {
    pub fn new(view: ViewMapper, settings: RenderSettings) -> Self {
        Self {
            view,
            points: PointAccumulator::new(),
            curves: CurveStore::new(),
            settings,
        }
    }

    pub fn mode(&self) -> Mode {
        if self.points.is_empty() {
            Mode::Idle
        } else {
            Mode::Sketching
        }
    }

    pub fn view(&self) -> &ViewMapper {
        &self.view
    }

    pub fn points(&self) -> &PointAccumulator {
        &self.points
    }

    pub fn curves(&self) -> &CurveStore<K::Curve> {
        &self.curves
    }

    pub fn can_export(&self) -> bool {
        !self.curves.is_empty()
    }

    pub fn dispatch<S: Surface>(
        &mut self,
        kernel: &K,
        event: InputEvent,
        surface: &mut S,
    ) -> Result<Outcome, SketchError> {
        let step = match event {
            InputEvent::PointerDown(at) => Step::Click(at),
            InputEvent::PointerMove(_) if self.points.is_empty() => return Ok(Outcome::Unchanged),
            InputEvent::PointerMove(at) => Step::Track(at),
            InputEvent::Key(key) => match Command::from_key(&key) {
                Some(command) => Step::Run(command),
                None => return Ok(Outcome::Unchanged),
            },
        };

        // Built before anything changes: once the model is mutated the frame
        // must not fail.
        let w2s = self
            .view
            .projection(kernel, CoordinateSystem::World, CoordinateSystem::Screen)?;

        let before = self.mode();
        let outcome = match step {
            Step::Click(at) => self.pointer_down(kernel, at)?,
            Step::Track(at) => self.pointer_move(kernel, at)?,
            Step::Run(Command::Finalize) => self.finalize(kernel)?,
            Step::Run(Command::Insert(preset)) => self.insert(kernel, preset)?,
        };
        let after = self.mode();
        if before != after {
            log::debug!("{before:?} -> {after:?}");
        }

        let scene = Scene {
            view: &self.view,
            points: &self.points,
            curves: &self.curves,
        };
        draw_scene(kernel, &w2s, &scene, &self.settings, surface);
        Ok(outcome)
    }

    pub fn redraw<S: Surface>(&self, kernel: &K, surface: &mut S) -> Result<(), SketchError> {
        let scene = Scene {
            view: &self.view,
            points: &self.points,
            curves: &self.curves,
        };
        draw_frame(kernel, &scene, &self.settings, surface)?;
        Ok(())
    }

    pub fn export<T: SaveTarget>(
        &self,
        kernel: &K,
        file_name: &str,
        target: &mut T,
    ) -> Result<usize, SketchError> {
        export_curves(kernel, &self.curves, file_name, target)
    }

    fn pointer_down(&mut self, kernel: &K, at: ScreenPoint) -> Result<Outcome, SketchError> {
        let p = self.view.screen_to_world(kernel, at)?;
        self.points.begin_stroke(p);
        log::debug!("point {} at ({:.3}, {:.3})", self.points.len() - 1, p.x, p.y);
        Ok(Outcome::Sketched)
    }

    fn pointer_move(&mut self, kernel: &K, at: ScreenPoint) -> Result<Outcome, SketchError> {
        let p = self.view.screen_to_world(kernel, at)?;
        self.points.update_live(p);
        Ok(Outcome::Sketched)
    }

    fn finalize(&mut self, kernel: &K) -> Result<Outcome, SketchError> {
        let snapshot = self.points.clone();
        let committed = self.points.finalize()?;
        let degree = curve_degree(committed.len());
        match kernel.create_curve(true, degree, &committed) {
            Ok(curve) => {
                self.curves.push(curve);
                log::info!(
                    "curve {} finalized from {} points (degree {degree})",
                    self.curves.len(),
                    committed.len()
                );
                Ok(Outcome::CurveAdded {
                    total: self.curves.len(),
                })
            }
            Err(e) => {
                self.points = snapshot;
                Err(e.into())
            }
        }
    }

    fn insert(&mut self, kernel: &K, preset: Preset) -> Result<Outcome, SketchError> {
        let curve = kernel.create_curve(preset.closed(), preset.degree(), &preset.points())?;
        self.curves.push(curve);
        log::info!("{} preset added", preset.label());
        Ok(Outcome::CurveAdded {
            total: self.curves.len(),
        })
    }
}
