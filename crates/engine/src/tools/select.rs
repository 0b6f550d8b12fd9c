//! Selection tool: ray picking with ctrl-toggle for multi-select.

use glam::DVec2;
use shared::ToolType;

use crate::events::InputEvent;
use crate::geometry::pick_nearest;

use super::{Tool, ToolCtx, ToolResult};

/// Picks the nearest element under the pointer. A plain click replaces the
/// selection, ctrl-click toggles membership, a click on empty space clears.
#[derive(Default)]
pub struct SelectTool;

impl SelectTool {
    pub fn new() -> Self {
        Self
    }
}

impl Tool for SelectTool {
    fn tool_type(&self) -> ToolType {
        ToolType::Select
    }

    fn on_pointer_down(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        let ray = ctx
            .camera
            .ndc_ray(DVec2::new(event.position.x, event.position.y));
        let hit = pick_nearest(&ray, &ctx.model.element_aabbs());

        match hit {
            Some(id) => {
                if event.modifiers.ctrl {
                    ctx.model.selection.toggle(id);
                } else {
                    ctx.model.selection.select(id);
                }
                let count = ctx.model.selection.count();
                Some(ToolResult::ok(format!(
                    "Selected {count} element{}",
                    if count == 1 { "" } else { "s" }
                )))
            }
            None => {
                if !event.modifiers.ctrl {
                    ctx.model.selection.clear();
                }
                None
            }
        }
    }
}
