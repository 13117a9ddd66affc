//! USB Device subsystem - presents a boot-protocol HID keyboard to the host.
//!
//! The nRF52840's built-in USB 2.0 Full-Speed controller is driven by
//! `embassy-usb`.  The SoftDevice owns the POWER peripheral, so VBUS
//! detection is fed from SoftDevice SoC events through a
//! `SoftwareVbusDetect`.
//!
//! The wired link flag is up while the host has configured the device
//! and the bus is not suspended.

pub mod hid_device;
