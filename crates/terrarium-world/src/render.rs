//! Renderer collaborator seam.
//!
//! The engine only calls forward through these primitives and never reads
//! render state back.

use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use terrarium_core::Vec3;

/// Opaque handle to a shape owned by the renderer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ShapeHandle(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShapeKind {
    Sphere { radius: f64 },
    Cube { size: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShapeSpec {
    pub kind: ShapeKind,
    pub position: Vec3,
    pub color: [f32; 3],
}

/// External drawing collaborator.
pub trait Renderer {
    fn create_shape(&mut self, spec: ShapeSpec) -> ShapeHandle;
    fn move_shape(&mut self, handle: ShapeHandle, position: Vec3);
    fn set_visible(&mut self, handle: ShapeHandle, visible: bool);
}

/// Headless renderer: hands out handles, draws nothing.
#[derive(Debug, Default)]
pub struct NullRenderer {
    next: u64,
}

impl NullRenderer {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Renderer for NullRenderer {
    fn create_shape(&mut self, _spec: ShapeSpec) -> ShapeHandle {
        let handle = ShapeHandle(self.next);
        self.next += 1;
        handle
    }

    fn move_shape(&mut self, _handle: ShapeHandle, _position: Vec3) {}

    fn set_visible(&mut self, _handle: ShapeHandle, _visible: bool) {}
}

/// One recorded renderer call
#[derive(Debug, Clone, PartialEq)]
pub enum RenderOp {
    Created { handle: ShapeHandle, spec: ShapeSpec },
    Moved { handle: ShapeHandle, position: Vec3 },
    Visibility { handle: ShapeHandle, visible: bool },
}

/// Shared view onto a `RecordingRenderer`'s op stream, usable after the
/// renderer itself has been handed to a world.
#[derive(Debug, Clone, Default)]
pub struct RenderLog(Rc<RefCell<Vec<RenderOp>>>);

impl RenderLog {
    pub fn ops(&self) -> Vec<RenderOp> {
        self.0.borrow().clone()
    }

    /// Handles hidden via `set_visible(_, false)`, in call order.
    pub fn hidden(&self) -> Vec<ShapeHandle> {
        self.0
            .borrow()
            .iter()
            .filter_map(|op| match op {
                RenderOp::Visibility {
                    handle,
                    visible: false,
                } => Some(*handle),
                _ => None,
            })
            .collect()
    }

    pub fn created(&self) -> Vec<(ShapeHandle, ShapeSpec)> {
        self.0
            .borrow()
            .iter()
            .filter_map(|op| match op {
                RenderOp::Created { handle, spec } => Some((*handle, *spec)),
                _ => None,
            })
            .collect()
    }
}

/// Test double capturing every call.
#[derive(Debug, Default)]
pub struct RecordingRenderer {
    next: u64,
    log: RenderLog,
}

impl RecordingRenderer {
    /// The renderer plus a log view that stays readable after the renderer
    /// is boxed into a world.
    pub fn new() -> (Self, RenderLog) {
        let renderer = Self::default();
        let log = renderer.log.clone();
        (renderer, log)
    }
}

impl Renderer for RecordingRenderer {
    fn create_shape(&mut self, spec: ShapeSpec) -> ShapeHandle {
        let handle = ShapeHandle(self.next);
        self.next += 1;
        self.log.0.borrow_mut().push(RenderOp::Created { handle, spec });
        handle
    }

    fn move_shape(&mut self, handle: ShapeHandle, position: Vec3) {
        self.log.0.borrow_mut().push(RenderOp::Moved { handle, position });
    }

    fn set_visible(&mut self, handle: ShapeHandle, visible: bool) {
        self.log
            .0
            .borrow_mut()
            .push(RenderOp::Visibility { handle, visible });
    }
}
