//! Routes button presses to the wireless or wired HID channel.
//!
//! Policy per press:
//!
//! 1. wireless connected → write there
//! 2. otherwise wired ready → write there
//! 3. otherwise drop the press (no queueing, no retry)
//!
//! Exactly one channel receives exactly one write, or none does.

use crate::error::{ChannelError, DispatchError};
use crate::hid::KeyCode;
use crate::keymap::{Button, KeyAction};

/// An HID output path.
pub trait OutputChannel {
    /// Whether a host is currently listening on this channel.
    fn is_connected(&self) -> bool;

    /// Tap one key (press followed by release).
    fn send_key(&mut self, key: KeyCode) -> Result<(), ChannelError>;

    /// Type a string.
    fn send_text(&mut self, text: &str) -> Result<(), ChannelError>;
}

/// Where a press ended up.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Route {
    Wireless,
    Wired,
    /// Neither channel was available.
    Dropped,
}

/// Owns both channels and applies the routing policy.
pub struct HidDispatcher<W, U> {
    wireless: W,
    wired: U,
}

impl<W: OutputChannel, U: OutputChannel> HidDispatcher<W, U> {
    pub fn new(wireless: W, wired: U) -> Self {
        Self { wireless, wired }
    }

    /// Channel a press would take right now.
    pub fn route(&self) -> Route {
        if self.wireless.is_connected() {
            Route::Wireless
        } else if self.wired.is_connected() {
            Route::Wired
        } else {
            Route::Dropped
        }
    }

    /// Send the action mapped to `button`.
    ///
    /// No available channel is not an error and yields `Ok(Route::Dropped)`.
    pub fn dispatch(&mut self, button: Button) -> Result<Route, DispatchError> {
        let action = button.action();
        let route = self.route();
        let result = match route {
            Route::Wireless => write(&mut self.wireless, action),
            Route::Wired => write(&mut self.wired, action),
            Route::Dropped => Ok(()),
        };
        result
            .map(|()| route)
            .map_err(|cause| DispatchError { route, cause })
    }

    pub fn wireless(&self) -> &W {
        &self.wireless
    }

    pub fn wired(&self) -> &U {
        &self.wired
    }
}

fn write<C: OutputChannel>(channel: &mut C, action: KeyAction) -> Result<(), ChannelError> {
    match action {
        KeyAction::Key(key) => channel.send_key(key),
        KeyAction::Text(text) => channel.send_text(text),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    enum Call {
        Key(KeyCode),
        Text(&'static str),
    }

    /// Records every write; `text` must be one of the macro strings.
    #[derive(Default)]
    struct FakeChannel {
        connected: bool,
        fail_with: Option<ChannelError>,
        calls: heapless::Vec<Call, 8>,
    }

    impl FakeChannel {
        fn up() -> Self {
            Self {
                connected: true,
                ..Default::default()
            }
        }
    }

    impl OutputChannel for FakeChannel {
        fn is_connected(&self) -> bool {
            self.connected
        }

        fn send_key(&mut self, key: KeyCode) -> Result<(), ChannelError> {
            self.calls.push(Call::Key(key)).unwrap();
            self.fail_with.map_or(Ok(()), Err)
        }

        fn send_text(&mut self, text: &str) -> Result<(), ChannelError> {
            let known = Button::ALL.iter().find_map(|b| match b.action() {
                KeyAction::Text(t) if t == text => Some(t),
                _ => None,
            });
            self.calls.push(Call::Text(known.unwrap())).unwrap();
            self.fail_with.map_or(Ok(()), Err)
        }
    }

    #[test]
    fn wireless_preferred_when_connected() {
        let mut d = HidDispatcher::new(FakeChannel::up(), FakeChannel::up());
        assert_eq!(d.dispatch(Button::Enter), Ok(Route::Wireless));
        assert_eq!(d.wireless().calls.as_slice(), &[Call::Key(KeyCode::RETURN)]);
        assert!(d.wired().calls.is_empty());
    }

    #[test]
    fn wired_fallback_when_wireless_down() {
        let mut d = HidDispatcher::new(FakeChannel::default(), FakeChannel::up());
        assert_eq!(d.dispatch(Button::PageUp), Ok(Route::Wired));
        assert!(d.wireless().calls.is_empty());
        assert_eq!(d.wired().calls.as_slice(), &[Call::Key(KeyCode::PAGE_UP)]);
    }

    #[test]
    fn dropped_silently_when_nothing_is_up() {
        let mut d = HidDispatcher::new(FakeChannel::default(), FakeChannel::default());
        assert_eq!(d.route(), Route::Dropped);
        assert_eq!(d.dispatch(Button::Macro2), Ok(Route::Dropped));
        assert!(d.wireless().calls.is_empty());
        assert!(d.wired().calls.is_empty());
    }

    #[test]
    fn macro_sends_exact_text_and_no_keys() {
        let mut d = HidDispatcher::new(FakeChannel::up(), FakeChannel::default());
        assert_eq!(d.dispatch(Button::Macro1), Ok(Route::Wireless));
        assert_eq!(d.wireless().calls.as_slice(), &[Call::Text("Macro 1 Output")]);
    }

    #[test]
    fn channel_failure_reports_route_and_cause() {
        let mut wired = FakeChannel::up();
        wired.fail_with = Some(ChannelError::QueueFull);
        let mut d = HidDispatcher::new(FakeChannel::default(), wired);

        assert_eq!(
            d.dispatch(Button::Escape),
            Err(DispatchError {
                route: Route::Wired,
                cause: ChannelError::QueueFull
            })
        );
        // The write was attempted once; no retry on the other channel.
        assert_eq!(d.wired().calls.len(), 1);
        assert!(d.wireless().calls.is_empty());
    }

    #[test]
    fn each_press_is_one_write() {
        let mut d = HidDispatcher::new(FakeChannel::up(), FakeChannel::up());
        for button in [Button::Enter, Button::Macro3, Button::PageDown] {
            d.dispatch(button).unwrap();
        }
        assert_eq!(
            d.wireless().calls.as_slice(),
            &[
                Call::Key(KeyCode::RETURN),
                Call::Text("Macro 3 Output"),
                Call::Key(KeyCode::PAGE_DOWN)
            ]
        );
    }
}
