//! Connectivity flags shared between the transport tasks and the
//! control loop.
//!
//! The BLE and USB tasks are the only writers.  The control loop reads a
//! [`LinkSnapshot`] once per tick; single-word atomics are enough since
//! nothing else is shared.

use core::sync::atomic::{AtomicBool, Ordering};

/// One "link is usable" flag.
pub struct LinkFlag(AtomicBool);

impl LinkFlag {
    pub const fn new() -> Self {
        Self(AtomicBool::new(false))
    }

    pub fn set(&self, up: bool) {
        self.0.store(up, Ordering::Release);
    }

    /// Store `up` and return the previous state.  A `true` return with
    /// `up == false` is a falling edge.
    pub fn replace(&self, up: bool) -> bool {
        self.0.swap(up, Ordering::AcqRel)
    }

    pub fn get(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}

impl Default for LinkFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Both output links.
pub struct LinkStatus {
    /// A BLE central is connected.
    pub wireless: LinkFlag,
    /// USB is configured by the host and not suspended.
    pub wired: LinkFlag,
}

impl LinkStatus {
    pub const fn new() -> Self {
        Self {
            wireless: LinkFlag::new(),
            wired: LinkFlag::new(),
        }
    }

    pub fn snapshot(&self) -> LinkSnapshot {
        LinkSnapshot {
            wireless: self.wireless.get(),
            wired: self.wired.get(),
        }
    }
}

impl Default for LinkStatus {
    fn default() -> Self {
        Self::new()
    }
}

/// Plain copy of [`LinkStatus`] taken at one instant.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LinkSnapshot {
    pub wireless: bool,
    pub wired: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_start_down() {
        let status = LinkStatus::new();
        assert_eq!(status.snapshot(), LinkSnapshot::default());
    }

    #[test]
    fn replace_reports_falling_edge_once() {
        let flag = LinkFlag::new();
        assert!(!flag.replace(true));
        assert!(flag.replace(true));
        assert!(flag.replace(false), "first drop sees the link was up");
        assert!(!flag.replace(false), "repeated drop is not an edge");
        assert!(!flag.get());
    }

    #[test]
    fn snapshot_reflects_latest_writes() {
        static STATUS: LinkStatus = LinkStatus::new();
        STATUS.wireless.set(true);
        assert_eq!(
            STATUS.snapshot(),
            LinkSnapshot {
                wireless: true,
                wired: false
            }
        );
        STATUS.wired.set(true);
        STATUS.wireless.set(false);
        assert_eq!(
            STATUS.snapshot(),
            LinkSnapshot {
                wireless: false,
                wired: true
            }
        );
    }
}
