//! HID keyboard reports and the report-queue output channel.
//!
//! Both the USB interface and the BLE HID service speak the same 8-byte
//! boot-protocol keyboard report, so everything here is transport-agnostic.

pub mod ascii;
pub mod channel;
pub mod keyboard;
pub mod keycodes;


pub use channel::{HidChannel, ReportQueue};
pub use keyboard::KeyboardReport;
pub use keycodes::KeyCode;
