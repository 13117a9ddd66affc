//! 8-byte boot keyboard report: `[modifiers, 0, key0..key5]`.
//!
//! hidpad only ever fills `key0`; one tap is a single-key report
//! followed by an all-zero one.  Modifier bits follow
//! [`super::keycodes::modifier`].

use super::keycodes::KeyCode;

/// Keyboard report size in bytes.
pub const KEYBOARD_REPORT_SIZE: usize = 8;

#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyboardReport {
    pub modifier: u8,
    pub reserved: u8,
    pub keycodes: [u8; 6],
}

impl KeyboardReport {
    /// All keys released.
    pub const fn release() -> Self {
        Self {
            modifier: 0,
            reserved: 0,
            keycodes: [0; 6],
        }
    }

    /// A single key held down with the given modifiers.
    pub const fn press(modifier: u8, key: KeyCode) -> Self {
        Self {
            modifier,
            reserved: 0,
            keycodes: [key.0, 0, 0, 0, 0, 0],
        }
    }

    /// Write the wire form into `buf`.  Returns 0 without touching `buf`
    /// when it is shorter than a report.
    pub fn serialize(&self, buf: &mut [u8]) -> usize {
        if buf.len() < KEYBOARD_REPORT_SIZE {
            return 0;
        }
        buf[0] = self.modifier;
        buf[1] = self.reserved;
        buf[2..8].copy_from_slice(&self.keycodes);
        KEYBOARD_REPORT_SIZE
    }

    /// Fixed-size byte form, as stored in the BLE input report.
    pub fn to_bytes(&self) -> [u8; KEYBOARD_REPORT_SIZE] {
        let mut buf = [0u8; KEYBOARD_REPORT_SIZE];
        self.serialize(&mut buf);
        buf
    }

    /// All-released report.
    pub fn is_empty(&self) -> bool {
        self.modifier == 0 && self.keycodes.iter().all(|&k| k == 0)
    }
}

/// Boot keyboard report descriptor.
///
/// Used verbatim as the USB HID class descriptor and as the BLE Report
/// Map, so both hosts parse the same 8-byte report.  No report IDs.
pub const KEYBOARD_REPORT_DESCRIPTOR: &[u8] = &[
    0x05, 0x01, 0x09, 0x06, 0xA1, 0x01, // Generic Desktop / Keyboard, Application
    // byte 0: modifiers E0..E7, one bit each
    0x05, 0x07, 0x19, 0xE0, 0x29, 0xE7, 0x15, 0x00, 0x25, 0x01,
    0x75, 0x01, 0x95, 0x08, 0x81, 0x02,
    // byte 1: constant
    0x95, 0x01, 0x75, 0x08, 0x81, 0x01,
    // host -> device: Num/Caps/Scroll/Compose/Kana, padded to a byte
    0x05, 0x08, 0x19, 0x01, 0x29, 0x05, 0x95, 0x05, 0x75, 0x01, 0x91, 0x02,
    0x95, 0x01, 0x75, 0x03, 0x91, 0x01,
    // bytes 2..8: key array
    0x05, 0x07, 0x19, 0x00, 0x29, 0xFF, 0x15, 0x00, 0x26, 0xFF, 0x00,
    0x95, 0x06, 0x75, 0x08, 0x81, 0x00,
    0xC0,
];

