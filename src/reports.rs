//! Bounded report queues between the control loop and the transports.
//!
//! The control loop only ever uses `try_send`, so a stalled transport can
//! never block button polling.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;
use hidpad::config::REPORT_QUEUE_DEPTH;
use hidpad::error::ChannelError;
use hidpad::hid::{KeyboardReport, ReportQueue};

pub type ReportChannel = Channel<CriticalSectionRawMutex, KeyboardReport, REPORT_QUEUE_DEPTH>;

/// Drained by the BLE connection into input report notifications.
pub static BLE_REPORTS: ReportChannel = Channel::new();

/// Drained by the USB HID writer task.
pub static USB_REPORTS: ReportChannel = Channel::new();

/// Producer side of a report channel.
pub struct ChannelQueue(&'static ReportChannel);

impl ChannelQueue {
    pub const fn new(channel: &'static ReportChannel) -> Self {
        Self(channel)
    }
}

impl ReportQueue for ChannelQueue {
    fn free_slots(&self) -> usize {
        self.0.free_capacity()
    }

    fn try_push(&mut self, report: KeyboardReport) -> Result<(), ChannelError> {
        self.0.try_send(report).map_err(|_| ChannelError::QueueFull)
    }
}

/// Discard reports left over from a previous link.
pub fn drain(channel: &ReportChannel) -> usize {
    let mut dropped = 0;
    while channel.try_receive().is_ok() {
        dropped += 1;
    }
    dropped
}
