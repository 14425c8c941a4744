//! Linux input key codes (`linux/input-event-codes.h`).

use phf::phf_map;

use super::{CharClass, LogicalButton};

pub const EV_KEY: u16 = 0x01;

pub const KEY_ENTER: u16 = 28;
pub const KEY_SPACE: u16 = 57;
pub const KEY_KPENTER: u16 = 96;
pub const KEY_HOME: u16 = 102;
pub const KEY_PAGEUP: u16 = 104;
pub const KEY_PAGEDOWN: u16 = 109;
pub const KEY_POWER: u16 = 116;

/// Key-down value in `input_event.value` (0 = up, 2 = autorepeat)
pub const VALUE_DOWN: i32 = 1;
pub const VALUE_UP: i32 = 0;
pub const VALUE_REPEAT: i32 = 2;

/// Key codes that belong to device buttons rather than the keyboard
pub static BUTTON_CODES: phf::Map<u16, LogicalButton> = phf_map! {
    102u16 => LogicalButton::Home,
    104u16 => LogicalButton::PageLeft,
    109u16 => LogicalButton::PageRight,
    116u16 => LogicalButton::Power,
};

pub fn button_for_code(code: u16) -> Option<LogicalButton> {
    BUTTON_CODES.get(&code).copied()
}

/// Classify a keyboard key code for word counting.
pub fn char_class(code: u16) -> CharClass {
    match code {
        // KEY_1..=KEY_0
        2..=11
        // KEY_Q..=KEY_P
        | 16..=25
        // KEY_A..=KEY_L
        | 30..=38
        // KEY_Z..=KEY_M
        | 44..=50 => CharClass::Alphanumeric,
        KEY_ENTER | KEY_SPACE | KEY_KPENTER => CharClass::Separator,
        _ => CharClass::Other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn letters_and_digits_are_alphanumeric() {
        // KEY_A, KEY_Z, KEY_M, KEY_1, KEY_0, KEY_Q, KEY_P
        for code in [30, 44, 50, 2, 11, 16, 25] {
            assert_eq!(char_class(code), CharClass::Alphanumeric, "code {code}");
        }
    }

    #[test]
    fn separators_and_others() {
        assert_eq!(char_class(KEY_SPACE), CharClass::Separator);
        assert_eq!(char_class(KEY_ENTER), CharClass::Separator);
        assert_eq!(char_class(KEY_KPENTER), CharClass::Separator);
        // KEY_ESC, KEY_MINUS, KEY_LEFTSHIFT, KEY_COMMA
        for code in [1, 12, 42, 51] {
            assert_eq!(char_class(code), CharClass::Other, "code {code}");
        }
    }

    #[test]
    fn device_buttons_map_to_logical_buttons() {
        assert_eq!(button_for_code(KEY_POWER), Some(LogicalButton::Power));
        assert_eq!(button_for_code(KEY_HOME), Some(LogicalButton::Home));
        assert_eq!(button_for_code(KEY_PAGEUP), Some(LogicalButton::PageLeft));
        assert_eq!(button_for_code(KEY_PAGEDOWN), Some(LogicalButton::PageRight));
        assert_eq!(button_for_code(KEY_SPACE), None);
    }
}
