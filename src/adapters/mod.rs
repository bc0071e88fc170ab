//! Adapters — concrete implementations of the hexagonal port traits.
//!
//! | Adapter     | Implements    | Connects to                     |
//! |-------------|---------------|---------------------------------|
//! | `station`   | StationPort   | ESP-IDF WiFi STA                |
//! | `mqtt`      | SessionPort   | Broker TCP transport + client   |
//! | `time`      | Clock         | ESP high-resolution timer       |
//! | `device_id` | —             | Factory MAC → client identity   |
//!
//! Each adapter is dual-target: real driver calls under
//! `target_os = "espidf"`, a deterministic simulation everywhere else
//! so the tasks can be exercised on the host.

pub mod device_id;
pub mod mqtt;
pub mod station;
pub mod time;
