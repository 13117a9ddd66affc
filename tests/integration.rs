//! Integration tests for the control loop pieces: poller → dispatcher →
//! report queues, plus the connectivity indicator.

use std::cell::RefCell;

use embedded_hal_mock::eh1::digital::{
    Mock as PinMock, State as PinState, Transaction as PinTransaction,
};
use hidpad::config::{BUTTON_DEBOUNCE_MS, POLL_INTERVAL_MS};
use hidpad::hid::keycodes::modifier;
use hidpad::hid::{HidChannel, KeyCode, KeyboardReport, ReportQueue};
use hidpad::{
    Button, ChannelError, ConnectivityIndicator, HidDispatcher, InputLine, InputPoller,
    LinkStatus, Route,
};

/// Report queue backed by a shared buffer the test can inspect.
struct SharedQueue<'a> {
    reports: &'a RefCell<Vec<KeyboardReport>>,
    capacity: usize,
}

impl ReportQueue for SharedQueue<'_> {
    fn free_slots(&self) -> usize {
        self.capacity - self.reports.borrow().len()
    }

    fn try_push(&mut self, report: KeyboardReport) -> Result<(), ChannelError> {
        let mut reports = self.reports.borrow_mut();
        if reports.len() >= self.capacity {
            return Err(ChannelError::QueueFull);
        }
        reports.push(report);
        Ok(())
    }
}

fn held_low_after(released: usize, total: usize) -> PinMock {
    let txns: Vec<_> = (0..total)
        .map(|i| {
            PinTransaction::get(if i < released {
                PinState::High
            } else {
                PinState::Low
            })
        })
        .collect();
    PinMock::new(&txns)
}

fn typed(reports: &[KeyboardReport]) -> Vec<KeyboardReport> {
    reports.iter().copied().filter(|r| !r.is_empty()).collect()
}

#[test]
fn press_travels_to_the_wireless_queue() {
    let status = LinkStatus::new();
    status.wireless.set(true);
    status.wired.set(true);

    let ble = RefCell::new(Vec::new());
    let usb = RefCell::new(Vec::new());
    let mut dispatcher = HidDispatcher::new(
        HidChannel::new(&status.wireless, SharedQueue { reports: &ble, capacity: 64 }),
        HidChannel::new(&status.wired, SharedQueue { reports: &usb, capacity: 64 }),
    );

    let mut poller = InputPoller::new([InputLine::new(
        held_low_after(5, 15),
        Button::Enter,
        0,
        BUTTON_DEBOUNCE_MS,
    )]);

    let mut routes = Vec::new();
    for tick in 0..15u64 {
        for button in poller.poll(tick * POLL_INTERVAL_MS) {
            routes.push(dispatcher.dispatch(button).unwrap());
        }
    }

    assert_eq!(routes, vec![Route::Wireless]);
    assert_eq!(
        *ble.borrow(),
        vec![
            KeyboardReport::press(modifier::NONE, KeyCode::RETURN),
            KeyboardReport::release()
        ]
    );
    assert!(usb.borrow().is_empty());

    for mut pin in poller.into_pins() {
        pin.done();
    }
}

#[test]
fn macro_falls_back_to_usb_as_one_text_write() {
    let status = LinkStatus::new();
    status.wired.set(true);

    let ble = RefCell::new(Vec::new());
    let usb = RefCell::new(Vec::new());
    let mut dispatcher = HidDispatcher::new(
        HidChannel::new(&status.wireless, SharedQueue { reports: &ble, capacity: 64 }),
        HidChannel::new(&status.wired, SharedQueue { reports: &usb, capacity: 64 }),
    );

    assert_eq!(dispatcher.dispatch(Button::Macro1), Ok(Route::Wired));
    assert!(ble.borrow().is_empty());

    let usb = usb.borrow();
    // "Macro 1 Output" is 14 characters: press + release each.
    assert_eq!(usb.len(), 28);
    assert!(usb.iter().skip(1).step_by(2).all(KeyboardReport::is_empty));
    let strokes = typed(&usb);
    assert_eq!(strokes[0], KeyboardReport::press(modifier::LEFT_SHIFT, KeyCode(0x10)));
    assert_eq!(strokes[5], KeyboardReport::press(modifier::NONE, KeyCode::SPACE));
    assert_eq!(strokes[6], KeyboardReport::press(modifier::NONE, KeyCode(0x1E)));
}

#[test]
fn nothing_is_written_without_a_link() {
    let status = LinkStatus::new();
    let ble = RefCell::new(Vec::new());
    let usb = RefCell::new(Vec::new());
    let mut dispatcher = HidDispatcher::new(
        HidChannel::new(&status.wireless, SharedQueue { reports: &ble, capacity: 64 }),
        HidChannel::new(&status.wired, SharedQueue { reports: &usb, capacity: 64 }),
    );

    for button in Button::ALL {
        assert_eq!(dispatcher.dispatch(button), Ok(Route::Dropped));
    }
    assert!(ble.borrow().is_empty());
    assert!(usb.borrow().is_empty());
}

#[test]
fn full_queue_surfaces_as_dispatch_error() {
    let status = LinkStatus::new();
    status.wireless.set(true);
    let ble = RefCell::new(Vec::new());
    let usb = RefCell::new(Vec::new());
    let mut dispatcher = HidDispatcher::new(
        HidChannel::new(&status.wireless, SharedQueue { reports: &ble, capacity: 10 }),
        HidChannel::new(&status.wired, SharedQueue { reports: &usb, capacity: 64 }),
    );

    let err = dispatcher.dispatch(Button::Macro2).unwrap_err();
    assert_eq!(err.route, Route::Wireless);
    assert_eq!(err.cause, ChannelError::QueueFull);
    assert!(ble.borrow().is_empty());

    // A single key still fits afterwards.
    assert_eq!(dispatcher.dispatch(Button::Escape), Ok(Route::Wireless));
    assert_eq!(ble.borrow().len(), 2);
}

#[test]
fn indicator_flips_on_the_next_tick() {
    let status = LinkStatus::new();
    let led = PinMock::new(&[
        PinTransaction::set(PinState::Low),
        PinTransaction::set(PinState::High),
        PinTransaction::set(PinState::High),
        PinTransaction::set(PinState::Low),
    ]);
    let mut indicator = ConnectivityIndicator::new(led);

    indicator.update(status.snapshot().wireless).unwrap();
    status.wireless.set(true);
    indicator.update(status.snapshot().wireless).unwrap();
    // Wired state never lights the LED.
    status.wired.set(true);
    indicator.update(status.snapshot().wireless).unwrap();
    status.wireless.set(false);
    indicator.update(status.snapshot().wireless).unwrap();

    indicator.release().done();
}
