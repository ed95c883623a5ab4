//! Transport summary: which network is the default route and how good it is.

use serde::{Deserialize, Serialize};

use crate::signal::LinkQuality;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransportType {
    #[default]
    None,
    Mobile,
    Wifi,
    Wimax,
    Bluetooth,
    Ethernet,
}

impl TransportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportType::None => "none",
            TransportType::Mobile => "mobile",
            TransportType::Wifi => "wifi",
            TransportType::Wimax => "wimax",
            TransportType::Bluetooth => "bluetooth",
            TransportType::Ethernet => "ethernet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ConnectivitySnapshot {
    pub connected: bool,
    pub transport: TransportType,
    /// 0–100 score; values above 100 are treated as 100.
    pub link_quality: u8,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ConnectivityState {
    pub connected: bool,
    pub transport: TransportType,
    pub link_quality_raw: u8,
}

impl ConnectivityState {
    pub fn ingest_snapshot(&mut self, snapshot: ConnectivitySnapshot) {
        self.connected = snapshot.connected;
        self.transport = snapshot.transport;
        self.link_quality_raw = snapshot.link_quality.min(100);
    }

    pub fn link_quality(&self) -> LinkQuality {
        LinkQuality::from_raw(self.link_quality_raw)
    }

    pub fn bluetooth_tethered(&self) -> bool {
        self.connected && self.transport == TransportType::Bluetooth
    }

    pub fn ethernet_active(&self) -> bool {
        self.connected && self.transport == TransportType::Ethernet
    }
}
