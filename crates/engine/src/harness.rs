//! In-process test harness driving the engine through real input events.
//!
//! The harness owns a model, camera, config and manager, and converts world
//! points into the NDC pointer events the manager consumes, with a synthetic
//! clock for double-click timing. Used by the integration tests; exported so
//! host crates can script the engine the same way.

use glam::{DVec2, DVec3};
use shared::ToolType;

use crate::camera::OrbitCamera;
use crate::constraints::ToolConfig;
use crate::events::{InputEvent, Modifiers};
use crate::manager::{ManagerAction, ToolManager};
use crate::model::ModelStore;
use crate::tools::{ToolCtx, ToolResult};

pub struct TestHarness {
    pub model: ModelStore,
    pub camera: OrbitCamera,
    pub config: ToolConfig,
    pub manager: ToolManager,
    time: f64,
}

impl TestHarness {
    pub fn new() -> Self {
        Self {
            model: ModelStore::new(),
            camera: OrbitCamera::new(),
            config: ToolConfig::default(),
            manager: ToolManager::new(),
            time: 0.0,
        }
    }

    /// Advance the synthetic clock
    pub fn tick(&mut self, secs: f64) {
        self.time += secs;
    }

    pub fn activate(&mut self, tool: ToolType) -> bool {
        let mut ctx = ToolCtx {
            model: &mut self.model,
            camera: &self.camera,
            config: &self.config,
        };
        self.manager.activate_tool(tool, &mut ctx)
    }

    /// NDC projection of a world point; panics when behind the camera
    pub fn ndc_of(&self, world: DVec3) -> DVec2 {
        self.camera
            .project(world)
            .expect("world point is behind the camera")
    }

    /// Route one event through the manager
    pub fn send(&mut self, event: InputEvent) -> Option<ToolResult> {
        let mut ctx = ToolCtx {
            model: &mut self.model,
            camera: &self.camera,
            config: &self.config,
        };
        self.manager.handle_event(&event, &mut ctx)
    }

    /// Pointer down then up at the NDC projection of a world point. The
    /// clock advances beforehand so consecutive clicks never register as a
    /// double click.
    pub fn click_world(&mut self, world: DVec3) -> Option<ToolResult> {
        self.tick(1.0);
        let ndc = self.ndc_of(world);
        let down = self.send(InputEvent::pointer_down(
            DVec3::new(ndc.x, ndc.y, 0.0),
            self.time,
        ));
        let up = self.send(InputEvent::pointer_up(
            DVec3::new(ndc.x, ndc.y, 0.0),
            self.time,
        ));
        down.or(up)
    }

    /// Two clicks within the double-click window
    pub fn double_click_world(&mut self, world: DVec3) -> Option<ToolResult> {
        let first = self.click_world(world);
        self.tick(0.1);
        let ndc = self.ndc_of(world);
        let second = self.send(InputEvent::pointer_down(
            DVec3::new(ndc.x, ndc.y, 0.0),
            self.time,
        ));
        self.send(InputEvent::pointer_up(
            DVec3::new(ndc.x, ndc.y, 0.0),
            self.time,
        ));
        second.or(first)
    }

    /// Pointer move over a world point
    pub fn move_world(&mut self, world: DVec3) -> Option<ToolResult> {
        self.tick(0.05);
        let ndc = self.ndc_of(world);
        self.send(InputEvent::pointer_move(
            DVec3::new(ndc.x, ndc.y, 0.0),
            self.time,
        ))
    }

    /// Full drag: down at `from`, moves through `via`, up at `to`
    pub fn drag_world(&mut self, from: DVec3, via: &[DVec3], to: DVec3) -> Option<ToolResult> {
        self.tick(1.0);
        let ndc = self.ndc_of(from);
        self.send(InputEvent::pointer_down(
            DVec3::new(ndc.x, ndc.y, 0.0),
            self.time,
        ));
        for p in via {
            self.move_world(*p);
        }
        self.move_world(to);
        self.tick(0.05);
        let ndc = self.ndc_of(to);
        self.send(InputEvent::pointer_up(
            DVec3::new(ndc.x, ndc.y, 0.0),
            self.time,
        ))
    }

    pub fn key(&mut self, key: &str) -> Option<ToolResult> {
        self.key_mods(key, Modifiers::NONE)
    }

    pub fn key_mods(&mut self, key: &str, modifiers: Modifiers) -> Option<ToolResult> {
        self.tick(0.05);
        self.send(InputEvent::key_down(key, self.time).with_modifiers(modifiers))
    }

    /// Queued undo/redo requests
    pub fn actions(&mut self) -> Vec<ManagerAction> {
        self.manager.take_actions()
    }
}

impl Default for TestHarness {
    fn default() -> Self {
        Self::new()
    }
}
