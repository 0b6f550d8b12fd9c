//! Tool manager: the single ingress for input events.
//!
//! Owns the tool registry, routes events to the active tool, commits the
//! elements successful results carry, and maintains the global keyboard
//! shortcuts. Undo/redo is requested by the user here but executed by the
//! host, which drains the queued actions after every event.

use std::collections::HashMap;

use shared::{ElementId, ToolType};

use crate::events::{EventKind, InputEvent};
use crate::tools::{ToolCtx, ToolKind, ToolResult};

/// Request the manager cannot satisfy itself, drained by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ManagerAction {
    UndoRequested,
    RedoRequested,
}

/// Registry and router for the nine interactive tools
pub struct ToolManager {
    tools: HashMap<ToolType, ToolKind>,
    active: ToolType,
    actions: Vec<ManagerAction>,
}

impl ToolManager {
    /// Manager with every tool registered and Select active
    pub fn new() -> Self {
        let tools = ToolType::all()
            .iter()
            .map(|&t| (t, ToolKind::new(t)))
            .collect();
        Self {
            tools,
            active: ToolType::Select,
            actions: Vec::new(),
        }
    }

    pub fn active_tool(&self) -> ToolType {
        self.active
    }

    /// Switch the active tool. The outgoing tool's transient state is
    /// released first; switching to the already-active tool re-runs its
    /// activation hook only.
    pub fn activate_tool(&mut self, tool_type: ToolType, ctx: &mut ToolCtx) -> bool {
        if !self.tools.contains_key(&tool_type) {
            return false;
        }

        if tool_type != self.active {
            if let Some(current) = self.tools.get_mut(&self.active) {
                current.deactivate(ctx);
            }
        }

        self.active = tool_type;
        ctx.model.active_tool = Some(tool_type);
        if let Some(tool) = self.tools.get_mut(&tool_type) {
            tool.activate(ctx);
        }
        tracing::info!("Activated tool: {}", tool_type.label());
        true
    }

    /// Route one event. The active tool sees it first; unconsumed key-downs
    /// fall through to the global shortcuts.
    pub fn handle_event(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        let result = self
            .tools
            .get_mut(&self.active)
            .and_then(|tool| tool.handle_event(event, ctx));

        if let Some(result) = result {
            return Some(self.process_result(result, ctx));
        }

        if event.kind == EventKind::KeyDown {
            return self.handle_shortcut(event, ctx);
        }
        None
    }

    /// Actions queued since the last drain
    pub fn take_actions(&mut self) -> Vec<ManagerAction> {
        std::mem::take(&mut self.actions)
    }

    /// Release the active tool's transient state; safe to call repeatedly
    pub fn dispose(&mut self, ctx: &mut ToolCtx) {
        if let Some(tool) = self.tools.get_mut(&self.active) {
            tool.deactivate(ctx);
        }
    }

    /// Commit a successful result into the model, or surface the failure
    fn process_result(&mut self, result: ToolResult, ctx: &mut ToolCtx) -> ToolResult {
        if !result.success {
            let error = result.error.clone().unwrap_or_else(|| "Tool error".into());
            tracing::warn!("{} tool: {error}", self.active.label());
            ctx.model.set_error(error);
            return result;
        }

        let committed: Vec<ElementId> = result
            .all_elements()
            .iter()
            .map(|e| e.id.clone())
            .collect();
        if !committed.is_empty() {
            for element in result.all_elements() {
                ctx.model.add_element(element.clone());
            }
            let description = result
                .message
                .clone()
                .unwrap_or_else(|| "Tool action".into());
            ctx.model.push_history(description, committed);
            ctx.model.clear_preview();
        }

        ctx.model.clear_error();
        if let Some(message) = &result.message {
            tracing::info!("{} tool: {message}", self.active.label());
        }
        result
    }

    fn handle_shortcut(&mut self, event: &InputEvent, ctx: &mut ToolCtx) -> Option<ToolResult> {
        let key = event.key_lower();

        if event.modifiers.ctrl {
            return match key.as_str() {
                "z" if event.modifiers.shift => {
                    self.actions.push(ManagerAction::RedoRequested);
                    Some(ToolResult::ok("Redo requested"))
                }
                "z" => {
                    self.actions.push(ManagerAction::UndoRequested);
                    Some(ToolResult::ok("Undo requested"))
                }
                "a" => {
                    let ids: Vec<ElementId> =
                        ctx.model.elements().iter().map(|e| e.id.clone()).collect();
                    ctx.model.selection.clear();
                    for id in ids {
                        ctx.model.selection.add(id);
                    }
                    let n = ctx.model.selection.count();
                    Some(ToolResult::ok(format!("Selected {n} element(s)")))
                }
                "d" => {
                    let ids = ctx.model.duplicate_selected();
                    if ids.is_empty() {
                        return Some(ToolResult::fail("Nothing to duplicate"));
                    }
                    let n = ids.len();
                    ctx.model
                        .push_history(format!("Duplicated {n} element(s)"), ids);
                    Some(ToolResult::ok(format!("Duplicated {n} element(s)")))
                }
                _ => None,
            };
        }

        // Single-key shortcuts only fire as bare keystrokes
        if event.modifiers.alt {
            return None;
        }

        match key.as_str() {
            "v" => self.shortcut_activate(ToolType::Select, ctx),
            "w" => self.shortcut_activate(ToolType::Wall, ctx),
            "f" => self.shortcut_activate(ToolType::Floor, ctx),
            "d" => self.shortcut_activate(ToolType::Door, ctx),
            "n" => self.shortcut_activate(ToolType::Window, ctx),
            "k" => self.shortcut_activate(ToolType::Cut, ctx),
            "m" => self.shortcut_activate(ToolType::Move, ctx),
            "r" => self.shortcut_activate(ToolType::Rotate, ctx),
            "s" => self.shortcut_activate(ToolType::Scale, ctx),
            "delete" | "backspace" => self.delete_selection(ctx),
            "escape" => {
                if ctx.model.selection.count() == 0 && ctx.model.preview().is_none() {
                    return None;
                }
                ctx.model.selection.clear();
                ctx.model.clear_preview();
                Some(ToolResult::ok("Selection cleared"))
            }
            _ => None,
        }
    }

    fn shortcut_activate(&mut self, tool_type: ToolType, ctx: &mut ToolCtx) -> Option<ToolResult> {
        self.activate_tool(tool_type, ctx);
        Some(ToolResult::ok(format!("{} tool", tool_type.label())))
    }

    /// Delete the unlocked part of the selection
    fn delete_selection(&mut self, ctx: &mut ToolCtx) -> Option<ToolResult> {
        let ids: Vec<ElementId> = ctx
            .model
            .elements()
            .iter()
            .filter(|e| ctx.model.selection.is_selected(&e.id) && !e.locked)
            .map(|e| e.id.clone())
            .collect();
        if ids.is_empty() {
            return None;
        }

        let removed = ctx.model.remove_elements(&ids);
        let n = removed.len();
        ctx.model
            .push_history(format!("Deleted {n} element(s)"), removed);
        tracing::info!("Deleted {n} element(s)");
        Some(ToolResult::ok(format!("Deleted {n} element(s)")))
    }
}

impl Default for ToolManager {
    fn default() -> Self {
        Self::new()
    }
}
