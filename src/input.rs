//! Platform-neutral keyboard input
//!
//! Browser `KeyboardEvent.key` values are mapped to [`Key`] once at the
//! edge; everything past that point works with the enum.

use serde::{Deserialize, Serialize};

/// Keys the games react to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,
    /// Anything else; always a no-op
    Other,
}

impl Key {
    /// Map a `KeyboardEvent.key` string
    pub fn from_key_name(name: &str) -> Self {
        match name {
            "ArrowUp" => Key::ArrowUp,
            "ArrowDown" => Key::ArrowDown,
            "ArrowLeft" => Key::ArrowLeft,
            "ArrowRight" => Key::ArrowRight,
            _ => Key::Other,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arrow_names() {
        assert_eq!(Key::from_key_name("ArrowLeft"), Key::ArrowLeft);
        assert_eq!(Key::from_key_name("ArrowDown"), Key::ArrowDown);
        assert_eq!(Key::from_key_name("ArrowUp"), Key::ArrowUp);
        assert_eq!(Key::from_key_name("ArrowRight"), Key::ArrowRight);
    }

    #[test]
    fn test_unknown_keys_are_other() {
        assert_eq!(Key::from_key_name("a"), Key::Other);
        assert_eq!(Key::from_key_name("arrowleft"), Key::Other);
        assert_eq!(Key::from_key_name(" "), Key::Other);
    }
}
