//! Device identity derived from the factory MAC address.
//!
//! The broker client id must be stable across reboots so non-clean
//! sessions resume their subscription state. Format: `ESP-` followed by
//! the full 6-byte station MAC as 12 uppercase hex digits
//! (e.g. `ESP-DEADBEEFCAFE`).

/// Fixed-size client id string: "ESP-" + 12 hex digits = 16 chars.
pub type ClientIdString = heapless::String<20>;

/// Full 6-byte MAC address.
pub type MacAddress = [u8; 6];

/// Read the factory station MAC from eFuse.
#[cfg(target_os = "espidf")]
pub fn read_mac() -> MacAddress {
    let mut mac: MacAddress = [0u8; 6];
    unsafe {
        esp_idf_svc::sys::esp_efuse_mac_get_default(mac.as_mut_ptr());
    }
    mac
}

/// Simulation: returns a deterministic fake MAC.
#[cfg(not(target_os = "espidf"))]
pub fn read_mac() -> MacAddress {
    [0xDE, 0xAD, 0xBE, 0xEF, 0xCA, 0xFE]
}

/// Derive the broker client id from the MAC.
pub fn client_id(mac: &MacAddress) -> ClientIdString {
    let mut id = ClientIdString::new();
    use core::fmt::Write;
    let _ = write!(
        id,
        "ESP-{:02X}{:02X}{:02X}{:02X}{:02X}{:02X}",
        mac[0], mac[1], mac[2], mac[3], mac[4], mac[5]
    );
    id
}
