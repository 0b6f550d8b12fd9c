//! Input event shape consumed by the tool manager

use glam::DVec3;

/// Kind of a raw input event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    PointerDown,
    PointerMove,
    PointerUp,
    KeyDown,
    KeyUp,
    Wheel,
}

/// Pointer button of a pointer event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PointerButton {
    #[default]
    Primary,
    Secondary,
    Middle,
}

/// Modifier keys held during an event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Modifiers {
    pub ctrl: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub const NONE: Modifiers = Modifiers {
        ctrl: false,
        shift: false,
        alt: false,
    };

    pub fn ctrl() -> Self {
        Self {
            ctrl: true,
            ..Self::NONE
        }
    }

    pub fn shift() -> Self {
        Self {
            shift: true,
            ..Self::NONE
        }
    }
}

/// A single input event from the host environment.
///
/// `position` is in normalized device coordinates (x/y in [-1, 1], z unused).
/// `time` is a host-supplied clock in seconds, used for double-click detection.
#[derive(Debug, Clone)]
pub struct InputEvent {
    pub kind: EventKind,
    pub position: DVec3,
    pub button: PointerButton,
    pub key: Option<String>,
    pub modifiers: Modifiers,
    pub wheel_delta: Option<f64>,
    pub time: f64,
}

impl InputEvent {
    fn new(kind: EventKind, position: DVec3, time: f64) -> Self {
        Self {
            kind,
            position,
            button: PointerButton::Primary,
            key: None,
            modifiers: Modifiers::NONE,
            wheel_delta: None,
            time,
        }
    }

    pub fn pointer_down(position: DVec3, time: f64) -> Self {
        Self::new(EventKind::PointerDown, position, time)
    }

    pub fn pointer_move(position: DVec3, time: f64) -> Self {
        Self::new(EventKind::PointerMove, position, time)
    }

    pub fn pointer_up(position: DVec3, time: f64) -> Self {
        Self::new(EventKind::PointerUp, position, time)
    }

    pub fn key_down(key: &str, time: f64) -> Self {
        Self {
            key: Some(key.to_string()),
            ..Self::new(EventKind::KeyDown, DVec3::ZERO, time)
        }
    }

    pub fn key_up(key: &str, time: f64) -> Self {
        Self {
            key: Some(key.to_string()),
            ..Self::new(EventKind::KeyUp, DVec3::ZERO, time)
        }
    }

    pub fn wheel(delta: f64, time: f64) -> Self {
        Self {
            wheel_delta: Some(delta),
            ..Self::new(EventKind::Wheel, DVec3::ZERO, time)
        }
    }

    pub fn with_button(mut self, button: PointerButton) -> Self {
        self.button = button;
        self
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    /// Key name, lowercased, or empty string for non-key events
    pub fn key_lower(&self) -> String {
        self.key.as_deref().unwrap_or("").to_lowercase()
    }
}
