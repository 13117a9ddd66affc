//! GATT server: HID-over-GATT keyboard, Battery and Device Information
//! services.
//!
//! Built with the SoftDevice service builder rather than the
//! `gatt_service` macro because the input report needs a Report
//! Reference descriptor.
//!
//! HID service (0x1812):
//!   - HID Information (0x2A4A)   read
//!   - Report Map (0x2A4B)        read, the boot keyboard descriptor
//!   - HID Control Point (0x2A4C) write without response
//!   - Protocol Mode (0x2A4E)     read, write without response
//!   - Report (0x2A4D)            read, notify; Report Reference (0x2908) = id 0, input

use defmt::{debug, info};
use hidpad::config::{BLE_BATTERY_LEVEL, BLE_MANUFACTURER};
use hidpad::hid::keyboard::{KEYBOARD_REPORT_DESCRIPTOR, KEYBOARD_REPORT_SIZE};
use nrf_softdevice::ble::gatt_server::builder::ServiceBuilder;
use nrf_softdevice::ble::gatt_server::characteristic::{Attribute, Metadata, Properties};
use nrf_softdevice::ble::gatt_server::{self, NotifyValueError, RegisterError, WriteOp};
use nrf_softdevice::ble::{Connection, SecurityMode, Uuid};
use nrf_softdevice::Softdevice;

const BATTERY_SERVICE: Uuid = Uuid::new_16(0x180F);
const BATTERY_LEVEL: Uuid = Uuid::new_16(0x2A19);

const DEVICE_INFO_SERVICE: Uuid = Uuid::new_16(0x180A);
const MANUFACTURER_NAME: Uuid = Uuid::new_16(0x2A29);

const HID_SERVICE: Uuid = Uuid::new_16(0x1812);
const HID_INFO: Uuid = Uuid::new_16(0x2A4A);
const REPORT_MAP: Uuid = Uuid::new_16(0x2A4B);
const HID_CONTROL_POINT: Uuid = Uuid::new_16(0x2A4C);
const HID_REPORT: Uuid = Uuid::new_16(0x2A4D);
const PROTOCOL_MODE: Uuid = Uuid::new_16(0x2A4E);
const HID_REPORT_REF: Uuid = Uuid::new_16(0x2908);

/// bcdHID 1.11, country code 0, flags: normally connectable.
const HID_INFO_VALUE: [u8; 4] = [0x11, 0x01, 0x00, 0x02];

/// Report ID 0 (no IDs in the report map), type Input.
const INPUT_REPORT_REF_VALUE: [u8; 2] = [0x00, 0x01];

/// Protocol Mode value for Report Protocol.
const REPORT_PROTOCOL: u8 = 0x01;

/// Events the control side cares about.
#[derive(Clone, Copy, defmt::Format)]
pub enum ServerEvent {
    /// Central toggled notifications on the input report.
    InputNotifications(bool),
    /// HID Control Point: `true` = suspend, `false` = exit suspend.
    HostSuspend(bool),
}

pub struct BatteryService {
    level: u16,
}

impl BatteryService {
    fn new(sd: &mut Softdevice) -> Result<Self, RegisterError> {
        let mut sb = ServiceBuilder::new(sd, BATTERY_SERVICE)?;
        let level = sb.add_characteristic(
            BATTERY_LEVEL,
            Attribute::new([BLE_BATTERY_LEVEL]).security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().read()),
        )?;
        let level_handle = level.build();
        let _service = sb.build();

        Ok(Self {
            level: level_handle.value_handle,
        })
    }
}

fn register_device_info(sd: &mut Softdevice) -> Result<(), RegisterError> {
    let mut sb = ServiceBuilder::new(sd, DEVICE_INFO_SERVICE)?;
    let name = sb.add_characteristic(
        MANUFACTURER_NAME,
        Attribute::new(BLE_MANUFACTURER.as_bytes()),
        Metadata::new(Properties::new().read()),
    )?;
    let _name = name.build();
    let _service = sb.build();
    Ok(())
}

pub struct HidService {
    input_report: u16,
    input_report_cccd: u16,
    control_point: u16,
    protocol_mode: u16,
}

impl HidService {
    fn new(sd: &mut Softdevice) -> Result<Self, RegisterError> {
        let mut sb = ServiceBuilder::new(sd, HID_SERVICE)?;

        let info = sb.add_characteristic(
            HID_INFO,
            Attribute::new(HID_INFO_VALUE).security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().read()),
        )?;
        let _info = info.build();

        let map = sb.add_characteristic(
            REPORT_MAP,
            Attribute::new(KEYBOARD_REPORT_DESCRIPTOR).security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().read()),
        )?;
        let _map = map.build();

        let control = sb.add_characteristic(
            HID_CONTROL_POINT,
            Attribute::new([0u8]).security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().write_without_response()),
        )?;
        let control_handle = control.build();

        let mode = sb.add_characteristic(
            PROTOCOL_MODE,
            Attribute::new([REPORT_PROTOCOL]).security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().read().write_without_response()),
        )?;
        let mode_handle = mode.build();

        let mut input = sb.add_characteristic(
            HID_REPORT,
            Attribute::new([0u8; KEYBOARD_REPORT_SIZE]).security(SecurityMode::JustWorks),
            Metadata::new(Properties::new().read().notify()),
        )?;
        let _report_ref = input.add_descriptor(
            HID_REPORT_REF,
            Attribute::new(INPUT_REPORT_REF_VALUE).security(SecurityMode::JustWorks),
        )?;
        let input_handle = input.build();

        let _service = sb.build();

        Ok(Self {
            input_report: input_handle.value_handle,
            input_report_cccd: input_handle.cccd_handle,
            control_point: control_handle.value_handle,
            protocol_mode: mode_handle.value_handle,
        })
    }

    fn on_write(&self, handle: u16, data: &[u8]) -> Option<ServerEvent> {
        let first = data.first().copied().unwrap_or(0);
        if handle == self.input_report_cccd {
            Some(ServerEvent::InputNotifications(first & 0x01 != 0))
        } else if handle == self.control_point {
            Some(ServerEvent::HostSuspend(first == 0x00))
        } else if handle == self.protocol_mode {
            debug!("HID protocol mode set to {}", first);
            None
        } else {
            None
        }
    }
}

pub struct Server {
    pub battery: BatteryService,
    pub hid: HidService,
}

impl Server {
    pub fn new(sd: &mut Softdevice) -> Result<Self, RegisterError> {
        register_device_info(sd)?;
        let battery = BatteryService::new(sd)?;
        let hid = HidService::new(sd)?;
        info!("GATT services registered (DIS, Battery, HID)");
        Ok(Self { battery, hid })
    }

    /// Send one 8-byte keyboard report to the central.
    pub fn notify_input(
        &self,
        conn: &Connection,
        report: &[u8; KEYBOARD_REPORT_SIZE],
    ) -> Result<(), NotifyValueError> {
        gatt_server::notify_value(conn, self.hid.input_report, report)
    }
}

impl gatt_server::Server for Server {
    type Event = ServerEvent;

    fn on_write(
        &self,
        _conn: &Connection,
        handle: u16,
        _op: WriteOp,
        _offset: usize,
        data: &[u8],
    ) -> Option<Self::Event> {
        if handle == self.battery.level {
            return None;
        }
        self.hid.on_write(handle, data)
    }
}
