//! Unified error types for hidpad.
//!
//! We avoid `alloc` - all error variants carry only fixed-size data.
//! Implements `defmt::Format` for efficient on-target logging when the
//! `defmt` feature is enabled.

use crate::dispatch::Route;

/// Top-level error type for transport start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    // BLE
    /// The SoftDevice returned a BLE-level error.
    Ble(BleError),

    /// GATT service registration failed.
    GattRegistration,
}

/// Subset of BLE errors we propagate (keeps the enum `Copy`-friendly).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BleError {
    /// Advertising could not start or was aborted.
    AdvertiseFailed,
    /// A notification could not be queued on the connection.
    NotifyFailed,
}

/// Failure of a single output channel write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ChannelError {
    /// The transport's report queue has no room for the whole write.
    QueueFull,
    /// A text payload contains a character with no US-layout keystroke.
    Unencodable(char),
}

/// Failure of a dispatch that did select a channel.
///
/// "No channel available" is not an error: it is `Ok(Route::Dropped)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DispatchError {
    /// Channel the write was attempted on.
    pub route: Route,
    pub cause: ChannelError,
}

// Convenience conversions

impl From<BleError> for Error {
    fn from(e: BleError) -> Self {
        Error::Ble(e)
    }
}
