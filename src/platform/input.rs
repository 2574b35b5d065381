//! Input events to hits
//!
//! The host page (or terminal driver) forwards raw events here; only the
//! spacebar and pointer presses on the stage count as hits.

use glam::Vec2;

/// A raw input event as delivered by the host
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Keyboard key press (`code` as in `KeyboardEvent.code`, `key` as in `.key`)
    Key { code: String, key: String },
    /// Pointer press in client coordinates, with the stage's top-left corner
    Pointer { client: Vec2, stage_origin: Vec2 },
}

/// One accepted hit. Keyboard hits carry no position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub position: Option<Vec2>,
}

impl InputEvent {
    /// Map the event to a hit, or `None` if it should be ignored
    pub fn to_hit(&self) -> Option<Hit> {
        match self {
            InputEvent::Key { code, key } => {
                (code == "Space" || key == " ").then_some(Hit { position: None })
            }
            InputEvent::Pointer {
                client,
                stage_origin,
            } => Some(Hit {
                position: Some(*client - *stage_origin),
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: &str, key: &str) -> InputEvent {
        InputEvent::Key {
            code: code.to_string(),
            key: key.to_string(),
        }
    }

    #[test]
    fn test_space_is_positionless_hit() {
        assert_eq!(key("Space", " ").to_hit(), Some(Hit { position: None }));
        // Some layouts only report the key value
        assert_eq!(key("", " ").to_hit(), Some(Hit { position: None }));
    }

    #[test]
    fn test_other_keys_ignored() {
        assert_eq!(key("KeyA", "a").to_hit(), None);
        assert_eq!(key("Enter", "Enter").to_hit(), None);
    }

    #[test]
    fn test_pointer_is_stage_local() {
        let event = InputEvent::Pointer {
            client: Vec2::new(150.0, 90.0),
            stage_origin: Vec2::new(50.0, 40.0),
        };
        assert_eq!(event.to_hit().unwrap().position, Some(Vec2::new(100.0, 50.0)));
    }

    #[test]
    fn test_pointer_at_stage_corner_keeps_position() {
        let event = InputEvent::Pointer {
            client: Vec2::new(20.0, 20.0),
            stage_origin: Vec2::new(20.0, 20.0),
        };
        assert_eq!(event.to_hit().unwrap().position, Some(Vec2::ZERO));
    }
}
