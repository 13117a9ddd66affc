//! US-layout translation of printable ASCII into keystrokes.

use super::keycodes::{modifier, KeyCode};

/// One key (plus modifiers) that types a character.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Keystroke {
    pub modifier: u8,
    pub key: KeyCode,
}

impl Keystroke {
    const fn plain(key: KeyCode) -> Self {
        Self {
            modifier: modifier::NONE,
            key,
        }
    }

    const fn shifted(key: KeyCode) -> Self {
        Self {
            modifier: modifier::LEFT_SHIFT,
            key,
        }
    }
}

/// Keystroke for `c` on a US keyboard, or `None` if it cannot be typed.
pub fn encode(c: char) -> Option<Keystroke> {
    let stroke = match c {
        'a'..='z' => Keystroke::plain(KeyCode(KeyCode::A.0 + (c as u8 - b'a'))),
        'A'..='Z' => Keystroke::shifted(KeyCode(KeyCode::A.0 + (c as u8 - b'A'))),
        '1'..='9' => Keystroke::plain(KeyCode(KeyCode::DIGIT_1.0 + (c as u8 - b'1'))),
        '0' => Keystroke::plain(KeyCode::DIGIT_0),
        ' ' => Keystroke::plain(KeyCode::SPACE),
        '\n' => Keystroke::plain(KeyCode::RETURN),
        '\t' => Keystroke::plain(KeyCode::TAB),
        '!' => Keystroke::shifted(KeyCode(KeyCode::DIGIT_1.0)),
        '@' => Keystroke::shifted(KeyCode(KeyCode::DIGIT_1.0 + 1)),
        '#' => Keystroke::shifted(KeyCode(KeyCode::DIGIT_1.0 + 2)),
        '$' => Keystroke::shifted(KeyCode(KeyCode::DIGIT_1.0 + 3)),
        '%' => Keystroke::shifted(KeyCode(KeyCode::DIGIT_1.0 + 4)),
        '^' => Keystroke::shifted(KeyCode(KeyCode::DIGIT_1.0 + 5)),
        '&' => Keystroke::shifted(KeyCode(KeyCode::DIGIT_1.0 + 6)),
        '*' => Keystroke::shifted(KeyCode(KeyCode::DIGIT_1.0 + 7)),
        '(' => Keystroke::shifted(KeyCode(KeyCode::DIGIT_1.0 + 8)),
        ')' => Keystroke::shifted(KeyCode::DIGIT_0),
        '-' => Keystroke::plain(KeyCode::MINUS),
        '_' => Keystroke::shifted(KeyCode::MINUS),
        '=' => Keystroke::plain(KeyCode::EQUAL),
        '+' => Keystroke::shifted(KeyCode::EQUAL),
        '[' => Keystroke::plain(KeyCode::LEFT_BRACKET),
        '{' => Keystroke::shifted(KeyCode::LEFT_BRACKET),
        ']' => Keystroke::plain(KeyCode::RIGHT_BRACKET),
        '}' => Keystroke::shifted(KeyCode::RIGHT_BRACKET),
        '\\' => Keystroke::plain(KeyCode::BACKSLASH),
        '|' => Keystroke::shifted(KeyCode::BACKSLASH),
        ';' => Keystroke::plain(KeyCode::SEMICOLON),
        ':' => Keystroke::shifted(KeyCode::SEMICOLON),
        '\'' => Keystroke::plain(KeyCode::QUOTE),
        '"' => Keystroke::shifted(KeyCode::QUOTE),
        '`' => Keystroke::plain(KeyCode::GRAVE),
        '~' => Keystroke::shifted(KeyCode::GRAVE),
        ',' => Keystroke::plain(KeyCode::COMMA),
        '<' => Keystroke::shifted(KeyCode::COMMA),
        '.' => Keystroke::plain(KeyCode::DOT),
        '>' => Keystroke::shifted(KeyCode::DOT),
        '/' => Keystroke::plain(KeyCode::SLASH),
        '?' => Keystroke::shifted(KeyCode::SLASH),
        _ => return None,
    };
    Some(stroke)
}
