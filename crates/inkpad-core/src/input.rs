//! Pointer and keyboard events delivered by the host surface.

use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

/// Pointer event type for unified mouse/touch handling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PointerEvent {
    Down { position: Point, button: MouseButton },
    Up { position: Point, button: MouseButton },
    Move { position: Point },
}

/// Keyboard event type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum KeyEvent {
    Pressed(String),
    Released(String),
}

impl KeyEvent {
    /// Whether this is a press of the Delete key.
    ///
    /// Accepts the key name as well as the legacy key code `46`.
    pub fn is_delete_press(&self) -> bool {
        match self {
            KeyEvent::Pressed(key) => {
                let key = key.trim();
                key.eq_ignore_ascii_case("delete") || key == "46"
            }
            KeyEvent::Released(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delete_detection() {
        assert!(KeyEvent::Pressed("Delete".into()).is_delete_press());
        assert!(KeyEvent::Pressed("46".into()).is_delete_press());
        assert!(!KeyEvent::Pressed("Backspace".into()).is_delete_press());
        assert!(!KeyEvent::Released("Delete".into()).is_delete_press());
    }
}
