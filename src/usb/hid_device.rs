//! Wired transport: one HID keyboard interface on the nRF52840 USBD
//! peripheral, plus the task that feeds it from the USB report queue.

use crate::reports::{self, ReportChannel};
use defmt::{info, warn};
use embassy_nrf::interrupt::{self, InterruptExt, Priority};
use embassy_nrf::usb::vbus_detect::SoftwareVbusDetect;
use embassy_nrf::usb::Driver;
use embassy_nrf::{self, bind_interrupts, peripherals};
use embassy_usb::class::hid::{Config as HidConfig, HidWriter, State};
use embassy_usb::{Builder, Config, Handler, UsbDevice};
use hidpad::config;
use hidpad::hid::keyboard::{KEYBOARD_REPORT_DESCRIPTOR, KEYBOARD_REPORT_SIZE};
use hidpad::link::LinkFlag;
use static_cell::StaticCell;

bind_interrupts!(struct Irqs {
    USBD => embassy_nrf::usb::InterruptHandler<peripherals::USBD>;
});

pub type UsbDriver = Driver<'static, peripherals::USBD, &'static SoftwareVbusDetect>;

/// Descriptor and control buffers handed to the USB builder.
struct UsbBuffers {
    config: [u8; 256],
    bos: [u8; 256],
    msos: [u8; 128],
    control: [u8; 64],
}

static USB_BUFFERS: StaticCell<UsbBuffers> = StaticCell::new();
static HID_STATE: StaticCell<State> = StaticCell::new();
static USB_LINK_HANDLER: StaticCell<UsbLinkHandler> = StaticCell::new();

/// Tracks bus state and publishes "wired ready" to the control loop.
/// Reports still queued when the link drops are discarded, never typed
/// into the next host.
struct UsbLinkHandler {
    link: &'static LinkFlag,
    reports: &'static ReportChannel,
    configured: bool,
    suspended: bool,
}

impl UsbLinkHandler {
    fn publish(&self) {
        let ready = self.configured && !self.suspended;
        if self.link.replace(ready) && !ready {
            let dropped = reports::drain(self.reports);
            info!("USB link down ({} reports discarded)", dropped);
        }
    }
}

impl Handler for UsbLinkHandler {
    fn enabled(&mut self, enabled: bool) {
        if enabled {
            info!("USB plugged");
        } else {
            info!("USB unplugged");
            self.configured = false;
            self.suspended = false;
            self.publish();
        }
    }

    fn reset(&mut self) {
        self.configured = false;
        self.publish();
    }

    fn configured(&mut self, configured: bool) {
        info!("USB configured={}", configured);
        self.configured = configured;
        self.publish();
    }

    fn suspended(&mut self, suspended: bool) {
        if suspended {
            info!("USB suspended");
        } else {
            info!("USB resumed");
        }
        self.suspended = suspended;
        self.publish();
    }
}

/// Build result containing the USB device runner and the keyboard writer.
pub struct UsbHidDevice {
    pub device: UsbDevice<'static, UsbDriver>,
    pub keyboard_writer: HidWriter<'static, UsbDriver, KEYBOARD_REPORT_SIZE>,
}

/// Build the USB device.  Panics if called twice (static buffers).
pub fn init(
    usbd: peripherals::USBD,
    vbus: &'static SoftwareVbusDetect,
    link: &'static LinkFlag,
    reports: &'static ReportChannel,
) -> UsbHidDevice {
    // Keep clear of the priority levels reserved by the SoftDevice.
    interrupt::USBD.set_priority(Priority::P2);

    let driver = Driver::new(usbd, Irqs, vbus);

    let mut device_config = Config::new(config::USB_VID, config::USB_PID);
    device_config.manufacturer = Some(config::USB_MANUFACTURER);
    device_config.product = Some(config::USB_PRODUCT);
    device_config.serial_number = Some(config::USB_SERIAL_NUMBER);
    device_config.max_power = 100;
    device_config.max_packet_size_0 = 64;
    device_config.supports_remote_wakeup = false;

    let bufs = USB_BUFFERS.init(UsbBuffers {
        config: [0; 256],
        bos: [0; 256],
        msos: [0; 128],
        control: [0; 64],
    });
    let mut builder = Builder::new(
        driver,
        device_config,
        &mut bufs.config,
        &mut bufs.bos,
        &mut bufs.msos,
        &mut bufs.control,
    );

    let handler = USB_LINK_HANDLER.init(UsbLinkHandler {
        link,
        reports,
        configured: false,
        suspended: false,
    });
    builder.handler(handler);

    let keyboard_writer = HidWriter::new(
        &mut builder,
        HID_STATE.init(State::new()),
        HidConfig {
            report_descriptor: KEYBOARD_REPORT_DESCRIPTOR,
            request_handler: None,
            poll_ms: config::USB_HID_POLL_MS,
            max_packet_size: KEYBOARD_REPORT_SIZE as u16,
        },
    );

    info!("USB HID keyboard ready ({:04x}:{:04x})", config::USB_VID, config::USB_PID);
    UsbHidDevice {
        device: builder.build(),
        keyboard_writer,
    }
}

pub async fn run_usb_device(mut device: UsbDevice<'static, UsbDriver>) -> ! {
    device.run().await
}

/// Drain the wired report queue into the keyboard endpoint.
pub async fn hid_writer_task(
    mut keyboard: HidWriter<'static, UsbDriver, KEYBOARD_REPORT_SIZE>,
    reports: &'static ReportChannel,
) -> ! {
    let mut buf = [0u8; KEYBOARD_REPORT_SIZE];

    loop {
        let report = reports.receive().await;
        let n = report.serialize(&mut buf);
        if let Err(e) = keyboard.write(&buf[..n]).await {
            warn!("USB keyboard write failed: {}", e);
        }
    }
}
