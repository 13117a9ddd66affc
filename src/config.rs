//! Application-wide constants and compile-time configuration.
//!
//! All timing parameters, device identity strings and macro payloads
//! live here so they can be tuned in one place.  Nothing is parsed at
//! runtime.

// Timing

/// Button debounce time (ms).  A raw level must hold for strictly longer
/// than this before it is trusted.
pub const BUTTON_DEBOUNCE_MS: u64 = 50;

/// Control loop period (ms).  Must be at most half the debounce time.
pub const POLL_INTERVAL_MS: u64 = 10;

const _: () = assert!(POLL_INTERVAL_MS * 2 <= BUTTON_DEBOUNCE_MS);

// BLE

/// Name advertised by the HID-over-GATT peripheral.
pub const BLE_DEVICE_NAME: &str = "nRF52840 Keyboard";

/// Manufacturer Name of the Device Information service.
pub const BLE_MANUFACTURER: &str = "hidpad";

/// GAP appearance: Generic HID / Keyboard (0x03C1).
pub const BLE_APPEARANCE_KEYBOARD: u16 = 0x03C1;

/// Advertising interval in 0.625 ms units.  160 = 100 ms.
pub const BLE_ADV_INTERVAL: u32 = 160;

/// Preferred connection interval range (in 1.25 ms units).
/// 6 = 7.5 ms (lowest latency for HID).
pub const BLE_CONN_INTERVAL_MIN: u16 = 6;
pub const BLE_CONN_INTERVAL_MAX: u16 = 12;

/// BLE slave latency (number of connection events the peripheral can skip).
pub const BLE_SLAVE_LATENCY: u16 = 0;

/// BLE supervision timeout (in 10 ms units). 400 = 4 s.
pub const BLE_SUP_TIMEOUT: u16 = 400;

/// Battery level reported by the Battery service (no fuel gauge fitted).
pub const BLE_BATTERY_LEVEL: u8 = 100;

// USB

/// USB VID/PID - use the "pid.codes" open-source test VID.
/// Replace with your own allocated VID/PID for production.
pub const USB_VID: u16 = 0x1209;
pub const USB_PID: u16 = 0x0001;

/// USB device strings.
pub const USB_MANUFACTURER: &str = "hidpad";
pub const USB_PRODUCT: &str = "hidpad USB Keyboard";
pub const USB_SERIAL_NUMBER: &str = "000001";

/// USB HID polling interval (ms).
pub const USB_HID_POLL_MS: u8 = 1;

// Macro payloads

pub const MACRO_1_TEXT: &str = "Macro 1 Output";
pub const MACRO_2_TEXT: &str = "Macro 2 Output";
pub const MACRO_3_TEXT: &str = "Macro 3 Output";

// Report queues

/// Depth of each transport's keyboard report queue.  Every character
/// costs two reports (press + release).
pub const REPORT_QUEUE_DEPTH: usize = 64;

const _: () = assert!(MACRO_1_TEXT.len() * 2 <= REPORT_QUEUE_DEPTH);
const _: () = assert!(MACRO_2_TEXT.len() * 2 <= REPORT_QUEUE_DEPTH);
const _: () = assert!(MACRO_3_TEXT.len() * 2 <= REPORT_QUEUE_DEPTH);

// Status LED

/// Number of flashes played at boot.
pub const BOOT_BLINK_COUNT: u8 = 5;

/// On and off time of each boot flash (ms).
pub const BOOT_BLINK_MS: u32 = 100;

// GPIO pin assignments (nRF52840-DK defaults)
//
// The concrete `embassy_nrf::peripherals::*` pins are taken in `main.rs`.
// Adjust for your custom PCB.  All buttons are active-low with the
// internal pull-up enabled.
//
//   Enter        → P0.11
//   Escape       → P0.12
//   Page Up      → P0.24
//   Page Down    → P0.25
//   Macro 1      → P0.03
//   Macro 2      → P0.04
//   Macro 3      → P0.28
//   Status LED   → P0.13

/// Number of physical buttons.
pub const BUTTON_COUNT: usize = 7;
