//! Fixed button set and what each button types.
//!
//! The mapping is an exhaustive `match`: adding a button without an
//! action does not compile.

use crate::config::{BUTTON_COUNT, MACRO_1_TEXT, MACRO_2_TEXT, MACRO_3_TEXT};
use crate::hid::KeyCode;

/// Physical buttons, in wiring order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Enter,
    Escape,
    PageUp,
    PageDown,
    Macro1,
    Macro2,
    Macro3,
}

/// Output of a button press.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyAction {
    /// Tap a single key.
    Key(KeyCode),
    /// Type a literal string.
    Text(&'static str),
}

impl Button {
    pub const ALL: [Button; BUTTON_COUNT] = [
        Button::Enter,
        Button::Escape,
        Button::PageUp,
        Button::PageDown,
        Button::Macro1,
        Button::Macro2,
        Button::Macro3,
    ];

    pub const fn action(self) -> KeyAction {
        match self {
            Button::Enter => KeyAction::Key(KeyCode::RETURN),
            Button::Escape => KeyAction::Key(KeyCode::ESCAPE),
            Button::PageUp => KeyAction::Key(KeyCode::PAGE_UP),
            Button::PageDown => KeyAction::Key(KeyCode::PAGE_DOWN),
            Button::Macro1 => KeyAction::Text(MACRO_1_TEXT),
            Button::Macro2 => KeyAction::Text(MACRO_2_TEXT),
            Button::Macro3 => KeyAction::Text(MACRO_3_TEXT),
        }
    }

    /// 1-based number printed on the case.
    pub const fn number(self) -> u8 {
        match self {
            Button::Enter => 1,
            Button::Escape => 2,
            Button::PageUp => 3,
            Button::PageDown => 4,
            Button::Macro1 => 5,
            Button::Macro2 => 6,
            Button::Macro3 => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_buttons_tap_keys() {
        assert_eq!(Button::Enter.action(), KeyAction::Key(KeyCode::RETURN));
        assert_eq!(Button::Escape.action(), KeyAction::Key(KeyCode::ESCAPE));
        assert_eq!(Button::PageUp.action(), KeyAction::Key(KeyCode::PAGE_UP));
        assert_eq!(Button::PageDown.action(), KeyAction::Key(KeyCode::PAGE_DOWN));
    }

    #[test]
    fn macro_buttons_type_fixed_text() {
        assert_eq!(Button::Macro1.action(), KeyAction::Text("Macro 1 Output"));
        assert_eq!(Button::Macro2.action(), KeyAction::Text("Macro 2 Output"));
        assert_eq!(Button::Macro3.action(), KeyAction::Text("Macro 3 Output"));
    }

    #[test]
    fn numbers_follow_wiring_order() {
        for (i, button) in Button::ALL.iter().enumerate() {
            assert_eq!(button.number() as usize, i + 1);
        }
    }

    #[test]
    fn macro_text_is_typeable() {
        for button in Button::ALL {
            if let KeyAction::Text(text) = button.action() {
                assert!(text.chars().all(|c| crate::hid::ascii::encode(c).is_some()));
            }
        }
    }
}
