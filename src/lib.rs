//! Host-testable core of the hidpad firmware.
//!
//! Everything here is pure logic over `embedded-hal` traits: debouncing,
//! polling, key mapping, channel selection and HID report encoding.  The
//! embedded binary (`main.rs`, `embedded` feature) wires it to the
//! nRF52840 GPIOs, the SoftDevice BLE stack and embassy-usb.
//!
//! Usage: `cargo test --lib` / `cargo test`

#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod debounce;
pub mod dispatch;
pub mod error;
pub mod hid;
pub mod indicator;
pub mod keymap;
pub mod link;
pub mod poller;

pub use debounce::{Debouncer, Edge};
pub use dispatch::{HidDispatcher, OutputChannel, Route};
pub use error::{ChannelError, DispatchError, Error};
pub use indicator::ConnectivityIndicator;
pub use keymap::{Button, KeyAction};
pub use link::{LinkFlag, LinkSnapshot, LinkStatus};
pub use poller::{InputLine, InputPoller};
