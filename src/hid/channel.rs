//! Report-queue backed output channel.
//!
//! Both transports are fed the same way: the control loop turns a key or
//! a text string into press/release report pairs and pushes them into a
//! bounded queue that the transport task drains.  Every press is followed
//! by an explicit all-released report, so the host never sees a key held.

use super::ascii;
use super::keyboard::KeyboardReport;
use super::keycodes::{modifier, KeyCode};
use crate::dispatch::OutputChannel;
use crate::error::ChannelError;
use crate::link::LinkFlag;

/// Non-blocking sink for keyboard reports.
pub trait ReportQueue {
    /// Free slots right now.
    fn free_slots(&self) -> usize;

    /// Enqueue without waiting.  Callers check `free_slots` first, so a
    /// rejection here means the queue was shared with another producer.
    fn try_push(&mut self, report: KeyboardReport) -> Result<(), ChannelError>;
}

/// [`OutputChannel`] over a link flag and a report queue.
pub struct HidChannel<'a, Q> {
    link: &'a LinkFlag,
    queue: Q,
}

impl<'a, Q: ReportQueue> HidChannel<'a, Q> {
    pub fn new(link: &'a LinkFlag, queue: Q) -> Self {
        Self { link, queue }
    }

    fn push_stroke(&mut self, modifier: u8, key: KeyCode) -> Result<(), ChannelError> {
        self.queue.try_push(KeyboardReport::press(modifier, key))?;
        self.queue.try_push(KeyboardReport::release())
    }

    #[cfg(test)]
    pub(crate) fn queue(&self) -> &Q {
        &self.queue
    }
}

impl<Q: ReportQueue> OutputChannel for HidChannel<'_, Q> {
    fn is_connected(&self) -> bool {
        self.link.get()
    }

    fn send_key(&mut self, key: KeyCode) -> Result<(), ChannelError> {
        if self.queue.free_slots() < 2 {
            return Err(ChannelError::QueueFull);
        }
        self.push_stroke(modifier::NONE, key)
    }

    fn send_text(&mut self, text: &str) -> Result<(), ChannelError> {
        // Validate everything before the first push so a macro is written
        // completely or not at all.
        let mut strokes = 0usize;
        for c in text.chars() {
            ascii::encode(c).ok_or(ChannelError::Unencodable(c))?;
            strokes += 1;
        }
        if self.queue.free_slots() < strokes * 2 {
            return Err(ChannelError::QueueFull);
        }

        for c in text.chars() {
            if let Some(stroke) = ascii::encode(c) {
                self.push_stroke(stroke.modifier, stroke.key)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Bounded in-memory queue.
    struct VecQueue<const N: usize>(heapless::Vec<KeyboardReport, N>);

    impl<const N: usize> ReportQueue for VecQueue<N> {
        fn free_slots(&self) -> usize {
            N - self.0.len()
        }

        fn try_push(&mut self, report: KeyboardReport) -> Result<(), ChannelError> {
            self.0.push(report).map_err(|_| ChannelError::QueueFull)
        }
    }

    fn channel<const N: usize>(link: &LinkFlag) -> HidChannel<'_, VecQueue<N>> {
        HidChannel::new(link, VecQueue(heapless::Vec::new()))
    }

    #[test]
    fn connectivity_follows_the_flag() {
        let link = LinkFlag::new();
        let ch = channel::<4>(&link);
        assert!(!ch.is_connected());
        link.set(true);
        assert!(ch.is_connected());
    }

    #[test]
    fn key_is_pressed_then_released() {
        let link = LinkFlag::new();
        let mut ch = channel::<4>(&link);
        ch.send_key(KeyCode::RETURN).unwrap();

        let reports = &ch.queue().0;
        assert_eq!(reports.len(), 2);
        assert_eq!(reports[0].keycodes[0], 0x28);
        assert_eq!(reports[0].modifier, 0);
        assert!(reports[1].is_empty());
    }

    #[test]
    fn text_becomes_stroke_pairs() {
        let link = LinkFlag::new();
        let mut ch = channel::<8>(&link);
        ch.send_text("Hi!").unwrap();

        let reports = &ch.queue().0;
        assert_eq!(reports.len(), 6);
        assert_eq!(
            reports[0],
            KeyboardReport::press(modifier::LEFT_SHIFT, KeyCode(0x0B))
        );
        assert!(reports[1].is_empty());
        assert_eq!(reports[2], KeyboardReport::press(0, KeyCode(0x0C)));
        assert!(reports[3].is_empty());
        assert_eq!(
            reports[4],
            KeyboardReport::press(modifier::LEFT_SHIFT, KeyCode(0x1E))
        );
        assert!(reports[5].is_empty());
    }

    #[test]
    fn repeated_letters_are_separated_by_releases() {
        let link = LinkFlag::new();
        let mut ch = channel::<4>(&link);
        ch.send_text("oo").unwrap();
        let reports = &ch.queue().0;
        assert_eq!(reports[0], reports[2]);
        assert!(reports[1].is_empty());
    }

    #[test]
    fn text_that_does_not_fit_writes_nothing() {
        let link = LinkFlag::new();
        let mut ch = channel::<5>(&link);
        assert_eq!(ch.send_text("abc"), Err(ChannelError::QueueFull));
        assert!(ch.queue().0.is_empty());
    }

    #[test]
    fn unencodable_text_writes_nothing() {
        let link = LinkFlag::new();
        let mut ch = channel::<16>(&link);
        assert_eq!(ch.send_text("ok é"), Err(ChannelError::Unencodable('é')));
        assert!(ch.queue().0.is_empty());
    }

    #[test]
    fn key_needs_room_for_both_reports() {
        let link = LinkFlag::new();
        let mut ch = channel::<3>(&link);
        ch.send_key(KeyCode::ESCAPE).unwrap();
        assert_eq!(ch.send_key(KeyCode::ESCAPE), Err(ChannelError::QueueFull));
        assert_eq!(ch.queue().0.len(), 2);
    }

    #[test]
    fn empty_text_is_a_no_op() {
        let link = LinkFlag::new();
        let mut ch = channel::<2>(&link);
        ch.send_text("").unwrap();
        assert!(ch.queue().0.is_empty());
    }
}
