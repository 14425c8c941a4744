//! Decoding of raw Linux `struct input_event` frames.
//!
//! The kernel writes fixed-size records: a `timeval` followed by
//! `type: u16`, `code: u16`, `value: i32`. The `timeval` is two native longs,
//! so frames are 24 bytes on 64-bit targets and 16 bytes on 32-bit ARM.

use chrono::{DateTime, Local};
use quill_types::DeviceRole;

use super::codes::{EV_KEY, VALUE_DOWN, VALUE_REPEAT, VALUE_UP, button_for_code, char_class};
use super::error::DecodeError;
use super::{InputEvent, KeyTransition, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLayout {
    /// 32-bit `timeval` (16-byte frames)
    Narrow,
    /// 64-bit `timeval` (24-byte frames)
    Wide,
}

impl FrameLayout {
    pub fn native() -> Self {
        #[cfg(target_pointer_width = "64")]
        {
            FrameLayout::Wide
        }
        #[cfg(not(target_pointer_width = "64"))]
        {
            FrameLayout::Narrow
        }
    }

    pub const fn frame_size(&self) -> usize {
        match self {
            FrameLayout::Narrow => 16,
            FrameLayout::Wide => 24,
        }
    }

    const fn time_field_size(&self) -> usize {
        match self {
            FrameLayout::Narrow => 4,
            FrameLayout::Wide => 8,
        }
    }
}

/// One undecorated kernel record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RawFrame {
    pub secs: i64,
    pub usecs: i64,
    pub kind: u16,
    pub code: u16,
    pub value: i32,
}

impl RawFrame {
    pub fn decode(bytes: &[u8], layout: FrameLayout) -> Result<Self, DecodeError> {
        let expected = layout.frame_size();
        if bytes.len() < expected {
            return Err(DecodeError::ShortFrame {
                expected,
                actual: bytes.len(),
            });
        }

        let t = layout.time_field_size();
        let (secs, usecs) = match layout {
            FrameLayout::Narrow => (
                i32::from_ne_bytes(field(bytes, 0)) as i64,
                i32::from_ne_bytes(field(bytes, t)) as i64,
            ),
            FrameLayout::Wide => (
                i64::from_ne_bytes(field(bytes, 0)),
                i64::from_ne_bytes(field(bytes, t)),
            ),
        };
        let rest = 2 * t;

        Ok(Self {
            secs,
            usecs,
            kind: u16::from_ne_bytes(field(bytes, rest)),
            code: u16::from_ne_bytes(field(bytes, rest + 2)),
            value: i32::from_ne_bytes(field(bytes, rest + 4)),
        })
    }

    /// Encode back into kernel layout (used by replay tools and tests)
    pub fn encode(&self, layout: FrameLayout) -> Vec<u8> {
        let mut out = Vec::with_capacity(layout.frame_size());
        match layout {
            FrameLayout::Narrow => {
                out.extend_from_slice(&(self.secs as i32).to_ne_bytes());
                out.extend_from_slice(&(self.usecs as i32).to_ne_bytes());
            }
            FrameLayout::Wide => {
                out.extend_from_slice(&self.secs.to_ne_bytes());
                out.extend_from_slice(&self.usecs.to_ne_bytes());
            }
        }
        out.extend_from_slice(&self.kind.to_ne_bytes());
        out.extend_from_slice(&self.code.to_ne_bytes());
        out.extend_from_slice(&self.value.to_ne_bytes());
        out
    }

    /// Instant of the frame, tagged with the local offset at that instant.
    /// Returns None for zero/negative or out-of-range times.
    pub fn timestamp(&self) -> Option<Timestamp> {
        if self.secs <= 0 || !(0..1_000_000).contains(&self.usecs) {
            return None;
        }
        let nanos = u32::try_from(self.usecs * 1000).ok()?;
        DateTime::from_timestamp(self.secs, nanos)
            .map(|utc| utc.with_timezone(&Local).fixed_offset())
    }

    /// Turn the frame into an engine event for a device of the given role.
    ///
    /// Button devices only yield the body buttons; keyboards only yield
    /// keystrokes, whatever the key. Non-key frames, autorepeat, keyboard
    /// key releases, unknown values and corrupt timestamps yield None.
    pub fn classify(&self, role: DeviceRole) -> Option<InputEvent> {
        if self.kind != EV_KEY || self.value == VALUE_REPEAT {
            return None;
        }
        let transition = match self.value {
            VALUE_DOWN => KeyTransition::Down,
            VALUE_UP => KeyTransition::Up,
            _ => return None,
        };
        let timestamp = self.timestamp()?;

        match role {
            DeviceRole::Buttons => button_for_code(self.code).map(|button| InputEvent::Button {
                timestamp,
                button,
                transition,
            }),
            DeviceRole::Keyboard => match transition {
                KeyTransition::Down => Some(InputEvent::Keystroke {
                    timestamp,
                    class: char_class(self.code),
                }),
                KeyTransition::Up => None,
            },
        }
    }
}

fn field<const N: usize>(bytes: &[u8], offset: usize) -> [u8; N] {
    let mut buf = [0u8; N];
    buf.copy_from_slice(&bytes[offset..offset + N]);
    buf
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::codes::{KEY_HOME, KEY_POWER, KEY_SPACE};
    use crate::input::{CharClass, LogicalButton};

    fn frame(kind: u16, code: u16, value: i32) -> RawFrame {
        RawFrame {
            secs: 1_700_000_000,
            usecs: 250_000,
            kind,
            code,
            value,
        }
    }

    #[test]
    fn decodes_both_layouts() {
        let original = frame(EV_KEY, KEY_POWER, VALUE_DOWN);
        for layout in [FrameLayout::Narrow, FrameLayout::Wide] {
            let bytes = original.encode(layout);
            assert_eq!(bytes.len(), layout.frame_size());
            assert_eq!(RawFrame::decode(&bytes, layout), Ok(original));
        }
    }

    #[test]
    fn short_frame_is_an_error() {
        let err = RawFrame::decode(&[0u8; 10], FrameLayout::Wide).unwrap_err();
        assert_eq!(
            err,
            DecodeError::ShortFrame {
                expected: 24,
                actual: 10
            }
        );
    }

    #[test]
    fn button_frames_become_button_events() {
        let event = frame(EV_KEY, KEY_POWER, VALUE_UP).classify(DeviceRole::Buttons);
        assert!(matches!(
            event,
            Some(InputEvent::Button {
                button: LogicalButton::Power,
                transition: KeyTransition::Up,
                ..
            })
        ));
    }

    #[test]
    fn keyboard_only_counts_key_down() {
        let keyboard = DeviceRole::Keyboard;
        assert!(matches!(
            frame(EV_KEY, KEY_SPACE, VALUE_DOWN).classify(keyboard),
            Some(InputEvent::Keystroke {
                class: CharClass::Separator,
                ..
            })
        ));
        assert_eq!(frame(EV_KEY, KEY_SPACE, VALUE_UP).classify(keyboard), None);
        assert_eq!(frame(EV_KEY, KEY_SPACE, VALUE_REPEAT).classify(keyboard), None);
    }

    #[test]
    fn keyboard_navigation_keys_are_keystrokes() {
        assert!(matches!(
            frame(EV_KEY, KEY_HOME, VALUE_DOWN).classify(DeviceRole::Keyboard),
            Some(InputEvent::Keystroke {
                class: CharClass::Other,
                ..
            })
        ));
        assert_eq!(frame(EV_KEY, KEY_HOME, VALUE_UP).classify(DeviceRole::Keyboard), None);
    }

    #[test]
    fn button_devices_ignore_other_keys() {
        assert_eq!(frame(EV_KEY, KEY_SPACE, VALUE_DOWN).classify(DeviceRole::Buttons), None);
    }

    #[test]
    fn timestamp_keeps_the_instant() {
        let stamp = frame(EV_KEY, KEY_POWER, VALUE_DOWN).timestamp().unwrap();
        assert_eq!(stamp.timestamp(), 1_700_000_000);
        assert_eq!(stamp.timestamp_subsec_micros(), 250_000);
    }

    #[test]
    fn non_key_and_corrupt_frames_are_dropped() {
        let buttons = DeviceRole::Buttons;
        // EV_SYN
        assert_eq!(frame(0x00, 0, 0).classify(buttons), None);
        // unexpected value
        assert_eq!(frame(EV_KEY, KEY_POWER, 7).classify(buttons), None);

        let mut corrupt = frame(EV_KEY, KEY_POWER, VALUE_DOWN);
        corrupt.secs = 0;
        assert_eq!(corrupt.classify(buttons), None);
        corrupt.secs = 1_700_000_000;
        corrupt.usecs = 5_000_000;
        assert_eq!(corrupt.classify(buttons), None);
    }
}
