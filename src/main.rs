//! hidpad firmware entry point (nRF52840 + SoftDevice S140).
//!
//! Task layout:
//!
//! | task              | owns                                          |
//! |-------------------|-----------------------------------------------|
//! | `softdevice_task` | SoftDevice event loop, VBUS events            |
//! | `ble_task`        | advertising, GATT server, BLE notifications   |
//! | `usb_task`        | USB device state machine                      |
//! | `usb_writer_task` | USB HID keyboard endpoint                     |
//! | `control_task`    | button polling, dispatch, status LED          |
//!
//! The control task never awaits a transport.  It talks to the others
//! through the link flags and the bounded report queues only.

#![no_std]
#![no_main]

mod ble;
mod reports;
mod usb;

use defmt::{debug, error, info, warn};
use defmt_rtt as _;
use panic_probe as _;

use embassy_executor::Spawner;
use embassy_nrf::gpio::{Input, Level, Output, OutputDrive, Pull};
use embassy_nrf::interrupt::Priority;
use embassy_nrf::usb::vbus_detect::SoftwareVbusDetect;
use embassy_time::{Delay, Duration, Instant, Ticker};
use embassy_usb::class::hid::HidWriter;
use embassy_usb::UsbDevice;
use nrf_softdevice::{raw, SocEvent, Softdevice};
use static_cell::StaticCell;

use hidpad::config::{
    BOOT_BLINK_COUNT, BOOT_BLINK_MS, BUTTON_COUNT, BUTTON_DEBOUNCE_MS, POLL_INTERVAL_MS,
};
use hidpad::hid::keyboard::KEYBOARD_REPORT_SIZE;
use hidpad::hid::HidChannel;
use hidpad::{
    Button, ConnectivityIndicator, Error, HidDispatcher, InputLine, InputPoller, LinkSnapshot,
    LinkStatus, Route,
};

use crate::ble::server::Server;
use crate::reports::{ChannelQueue, ReportChannel, BLE_REPORTS, USB_REPORTS};
use crate::usb::hid_device::{self, UsbDriver};

static LINK_STATUS: LinkStatus = LinkStatus::new();
static SERVER: StaticCell<Server> = StaticCell::new();
static VBUS: StaticCell<SoftwareVbusDetect> = StaticCell::new();

/// USBREGSTATUS bits.
const USBREG_VBUS_DETECTED: u32 = 1 << 0;
const USBREG_OUTPUT_READY: u32 = 1 << 1;

type Keypad = InputPoller<Input<'static>, BUTTON_COUNT>;
type QueueChannel = HidChannel<'static, ChannelQueue>;
type Dispatcher = HidDispatcher<QueueChannel, QueueChannel>;
type StatusLed = ConnectivityIndicator<Output<'static>>;

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    info!("hidpad v{=str} starting", env!("CARGO_PKG_VERSION"));

    // SoftDevice reserves priorities 0, 1 and 4.
    let mut nrf_config = embassy_nrf::config::Config::default();
    nrf_config.gpiote_interrupt_priority = Priority::P2;
    nrf_config.time_interrupt_priority = Priority::P2;
    let p = embassy_nrf::init(nrf_config);

    let mut led = ConnectivityIndicator::new(Output::new(
        p.P0_13,
        Level::Low,
        OutputDrive::Standard,
    ));
    let _ = led.boot_blink(&mut Delay, BOOT_BLINK_COUNT, BOOT_BLINK_MS);

    let keypad = InputPoller::new([
        button_line(Input::new(p.P0_11, Pull::Up), Button::Enter),
        button_line(Input::new(p.P0_12, Pull::Up), Button::Escape),
        button_line(Input::new(p.P0_24, Pull::Up), Button::PageUp),
        button_line(Input::new(p.P0_25, Pull::Up), Button::PageDown),
        button_line(Input::new(p.P0_03, Pull::Up), Button::Macro1),
        button_line(Input::new(p.P0_04, Pull::Up), Button::Macro2),
        button_line(Input::new(p.P0_28, Pull::Up), Button::Macro3),
    ]);

    // BLE
    let sd = Softdevice::enable(&ble::softdevice_config());
    let server = match Server::new(sd) {
        Ok(server) => Some(&*SERVER.init(server)),
        Err(e) => {
            error!("{}: {}", Error::GattRegistration, e);
            None
        }
    };
    let sd: &'static Softdevice = sd;

    // USB
    let vbus = VBUS.init(initial_vbus_state());
    let usb = hid_device::init(p.USBD, vbus, &LINK_STATUS.wired, &USB_REPORTS);

    spawner.must_spawn(softdevice_task(sd, vbus));
    match server {
        Some(server) => spawner.must_spawn(ble_task(sd, server)),
        None => warn!("BLE disabled, USB only"),
    }
    spawner.must_spawn(usb_task(usb.device));
    spawner.must_spawn(usb_writer_task(usb.keyboard_writer, &USB_REPORTS));

    let dispatcher = HidDispatcher::new(
        HidChannel::new(&LINK_STATUS.wireless, ChannelQueue::new(&BLE_REPORTS)),
        HidChannel::new(&LINK_STATUS.wired, ChannelQueue::new(&USB_REPORTS)),
    );
    spawner.must_spawn(control_task(keypad, dispatcher, led));

    info!("hidpad running");
}

fn button_line(pin: Input<'static>, button: Button) -> InputLine<Input<'static>> {
    InputLine::new(pin, button, button.number(), BUTTON_DEBOUNCE_MS)
}

/// Seed VBUS detection from the POWER registers, then enable the SoC
/// events that keep it current.
fn initial_vbus_state() -> SoftwareVbusDetect {
    let mut status: u32 = 0;
    // SAFETY: plain SoftDevice SVCs, called after `Softdevice::enable`.
    unsafe {
        raw::sd_power_usbregstatus_get(&mut status);
        raw::sd_power_usbdetected_enable(1);
        raw::sd_power_usbremoved_enable(1);
        raw::sd_power_usbpwrrdy_enable(1);
    }
    SoftwareVbusDetect::new(
        status & USBREG_VBUS_DETECTED != 0,
        status & USBREG_OUTPUT_READY != 0,
    )
}

#[embassy_executor::task]
async fn softdevice_task(sd: &'static Softdevice, vbus: &'static SoftwareVbusDetect) -> ! {
    sd.run_with_callback(|event: SocEvent| match event {
        SocEvent::PowerUsbDetected => vbus.detected(true),
        SocEvent::PowerUsbRemoved => vbus.detected(false),
        SocEvent::PowerUsbPowerReady => vbus.ready(),
        _ => {}
    })
    .await
}

#[embassy_executor::task]
async fn ble_task(sd: &'static Softdevice, server: &'static Server) -> ! {
    ble::peripheral::run(sd, server, &LINK_STATUS.wireless, &BLE_REPORTS).await
}

#[embassy_executor::task]
async fn usb_task(device: UsbDevice<'static, UsbDriver>) -> ! {
    hid_device::run_usb_device(device).await
}

#[embassy_executor::task]
async fn usb_writer_task(
    writer: HidWriter<'static, UsbDriver, KEYBOARD_REPORT_SIZE>,
    reports: &'static ReportChannel,
) -> ! {
    hid_device::hid_writer_task(writer, reports).await
}

/// Fixed-rate control loop: sample, dispatch, drive the LED.
#[embassy_executor::task]
async fn control_task(mut keypad: Keypad, mut dispatcher: Dispatcher, mut led: StatusLed) -> ! {
    let mut ticker = Ticker::every(Duration::from_millis(POLL_INTERVAL_MS));
    let mut last_links = LinkSnapshot::default();

    loop {
        ticker.next().await;
        let now_ms = Instant::now().as_millis();

        for button in keypad.poll(now_ms) {
            match dispatcher.dispatch(button) {
                Ok(Route::Dropped) => {
                    warn!("button {} pressed with no link, dropped", button.number());
                }
                Ok(route) => debug!("button {} -> {}", button.number(), route),
                Err(e) => warn!("button {}: {}", button.number(), e),
            }
        }

        let links = LINK_STATUS.snapshot();
        if links != last_links {
            info!("links: wireless={} wired={}", links.wireless, links.wired);
            last_links = links;
        }
        let _ = led.update(links.wireless);
    }
}
