//! HID-over-GATT peripheral: advertising, bonding and report notification.
//!
//! One central at a time.  The wireless link flag is up for the lifetime
//! of a connection; queued keyboard reports are sent as notifications on
//! the HID input report characteristic.

use core::cell::{Cell, RefCell};

use crate::ble::server::{Server, ServerEvent};
use crate::reports::{self, ReportChannel};
use defmt::{debug, info, warn};
use embassy_futures::select::select;
use embassy_time::{Duration, Timer};
use heapless::Vec;
use hidpad::config;
use hidpad::error::BleError;
use hidpad::hid::keyboard::KEYBOARD_REPORT_SIZE;
use hidpad::link::LinkFlag;
use nrf_softdevice::ble::advertisement_builder::{
    AdvertisementDataType, Flag, LegacyAdvertisementBuilder, LegacyAdvertisementPayload,
    ServiceList, ServiceUuid16,
};
use nrf_softdevice::ble::gatt_server::{self, NotifyValueError};
use nrf_softdevice::ble::peripheral::{self, ConnectableAdvertisement};
use nrf_softdevice::ble::security::{IoCapabilities, SecurityHandler};
use nrf_softdevice::ble::{Connection, EncryptionInfo, IdentityKey, MasterId, SecurityMode};
use nrf_softdevice::{raw, RawError, Softdevice};
use static_cell::StaticCell;

const APPEARANCE: [u8; 2] = config::BLE_APPEARANCE_KEYBOARD.to_le_bytes();

static ADV_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .flags(&[Flag::GeneralDiscovery, Flag::LE_Only])
    .services_16(
        ServiceList::Incomplete,
        &[ServiceUuid16::HUMAN_INTERFACE_DEVICE, ServiceUuid16::BATTERY],
    )
    .raw(AdvertisementDataType::APPEARANCE, &APPEARANCE)
    .build();

static SCAN_DATA: LegacyAdvertisementPayload = LegacyAdvertisementBuilder::new()
    .full_name(config::BLE_DEVICE_NAME)
    .build();

/// Notification attempts per report while the SoftDevice TX queue is full.
const NOTIFY_RETRIES: u8 = 10;
const NOTIFY_RETRY_DELAY: Duration = Duration::from_millis(5);

/// CCCD storage for the bonded central.
const SYS_ATTRS_LEN: usize = 64;

#[derive(Clone, Copy)]
struct PeerBond {
    master_id: MasterId,
    key: EncryptionInfo,
    peer_id: IdentityKey,
}

/// Keeps the last bonded central in RAM.  A power cycle forgets it.
struct Bonder {
    peer: Cell<Option<PeerBond>>,
    sys_attrs: RefCell<Vec<u8, SYS_ATTRS_LEN>>,
}

impl Bonder {
    fn new() -> Self {
        Self {
            peer: Cell::new(None),
            sys_attrs: RefCell::new(Vec::new()),
        }
    }

    fn is_bonded_peer(&self, conn: &Connection) -> bool {
        self.peer
            .get()
            .is_some_and(|p| p.peer_id.is_match(conn.peer_address()))
    }
}

impl SecurityHandler for Bonder {
    fn io_capabilities(&self) -> IoCapabilities {
        IoCapabilities::None
    }

    fn can_bond(&self, _conn: &Connection) -> bool {
        true
    }

    fn on_bonded(
        &self,
        _conn: &Connection,
        master_id: MasterId,
        key: EncryptionInfo,
        peer_id: IdentityKey,
    ) {
        info!("BLE bonded with new central");
        self.sys_attrs.borrow_mut().clear();
        self.peer.set(Some(PeerBond {
            master_id,
            key,
            peer_id,
        }));
    }

    fn get_key(&self, _conn: &Connection, master_id: MasterId) -> Option<EncryptionInfo> {
        self.peer
            .get()
            .and_then(|p| (p.master_id == master_id).then_some(p.key))
    }

    fn on_security_update(&self, _conn: &Connection, mode: SecurityMode) {
        info!("BLE security mode updated: {}", mode);
    }

    fn save_sys_attrs(&self, conn: &Connection) {
        if !self.is_bonded_peer(conn) {
            return;
        }
        let mut attrs = self.sys_attrs.borrow_mut();
        attrs.clear();
        if attrs.resize(SYS_ATTRS_LEN, 0).is_err() {
            return;
        }
        match gatt_server::get_sys_attrs(conn, &mut attrs) {
            Ok(len) => {
                attrs.truncate(len);
                debug!("saved {} bytes of system attributes", len);
            }
            Err(e) => {
                warn!("get_sys_attrs failed: {}", e);
                attrs.clear();
            }
        }
    }

    fn load_sys_attrs(&self, conn: &Connection) {
        let attrs = self.sys_attrs.borrow();
        let stored = (self.is_bonded_peer(conn) && !attrs.is_empty()).then_some(attrs.as_slice());
        if let Err(e) = gatt_server::set_sys_attrs(conn, stored) {
            warn!("set_sys_attrs failed: {}", e);
        }
    }
}

static BONDER: StaticCell<Bonder> = StaticCell::new();

/// Advertise, serve one central, repeat.  Never returns.
///
/// Must be called exactly once: it takes ownership of the bond store.
pub async fn run(
    sd: &'static Softdevice,
    server: &'static Server,
    link: &'static LinkFlag,
    reports: &'static ReportChannel,
) -> ! {
    let bonder: &'static Bonder = BONDER.init(Bonder::new());
    let adv_config = peripheral::Config {
        interval: config::BLE_ADV_INTERVAL,
        ..Default::default()
    };

    loop {
        info!("BLE advertising as \"{}\"", config::BLE_DEVICE_NAME);
        let adv = ConnectableAdvertisement::ScannableUndirected {
            adv_data: &ADV_DATA,
            scan_data: &SCAN_DATA,
        };

        let conn = match peripheral::advertise_pairable(sd, adv, &adv_config, bonder).await {
            Ok(conn) => conn,
            Err(e) => {
                warn!("{}: {}", BleError::AdvertiseFailed, e);
                Timer::after(Duration::from_secs(1)).await;
                continue;
            }
        };

        info!("BLE central connected");
        request_conn_params(&conn);

        let stale = reports::drain(reports);
        if stale > 0 {
            debug!("dropped {} stale BLE reports", stale);
        }
        link.set(true);

        serve(&conn, server, reports).await;

        link.set(false);
        let pending = reports::drain(reports);
        info!("BLE central disconnected ({} reports discarded)", pending);
    }
}

fn request_conn_params(conn: &Connection) {
    let params = raw::ble_gap_conn_params_t {
        min_conn_interval: config::BLE_CONN_INTERVAL_MIN,
        max_conn_interval: config::BLE_CONN_INTERVAL_MAX,
        slave_latency: config::BLE_SLAVE_LATENCY,
        conn_sup_timeout: config::BLE_SUP_TIMEOUT,
    };
    if conn.set_conn_params(params).is_err() {
        warn!("BLE connection parameter update rejected");
    }
}

/// Runs the GATT server and the notification pump until the link drops.
async fn serve(conn: &Connection, server: &Server, reports: &ReportChannel) {
    let gatt = gatt_server::run(conn, server, |event| match event {
        ServerEvent::InputNotifications(enabled) => {
            info!("HID input notifications enabled={}", enabled);
        }
        ServerEvent::HostSuspend(suspended) => {
            info!("HID host suspend={}", suspended);
        }
    });

    let pump = async {
        loop {
            let report = reports.receive().await;
            notify_with_retry(conn, server, &report.to_bytes()).await;
        }
    };

    let _ = select(gatt, pump).await;
}

async fn notify_with_retry(
    conn: &Connection,
    server: &Server,
    bytes: &[u8; KEYBOARD_REPORT_SIZE],
) {
    for _ in 0..NOTIFY_RETRIES {
        match server.notify_input(conn, bytes) {
            Ok(()) => return,
            Err(NotifyValueError::Raw(RawError::Resources)) => {
                Timer::after(NOTIFY_RETRY_DELAY).await;
            }
            Err(e) => {
                warn!("{}: {}", BleError::NotifyFailed, e);
                return;
            }
        }
    }
    warn!("{}: TX queue stayed full", BleError::NotifyFailed);
}
