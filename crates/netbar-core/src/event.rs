//! Input feeds, as one closed event type.

use serde::{Deserialize, Serialize};

use crate::cellular::{
    CallState, DataConnectionState, NetworkName, ServiceState, SignalStrength, SimState,
};
use crate::config::NetworkConfig;
use crate::connectivity::ConnectivitySnapshot;
use crate::icons::ActivityDirection;
use crate::wifi::{ConfiguredNetwork, WifiTransition};

/// One telemetry report. JSON form: `{"type": "wifi_rssi", "rssi": -61}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum TelemetryEvent {
    ServiceState(ServiceState),
    SignalStrength {
        #[serde(default)]
        signal: Option<SignalStrength>,
    },
    CallState {
        state: CallState,
    },
    DataConnection {
        state: DataConnectionState,
        /// Raw radio technology code.
        #[serde(default)]
        network_type: i32,
    },
    DataActivity {
        direction: ActivityDirection,
    },
    SimState {
        state: SimState,
    },
    NetworkName(NetworkName),
    WifiEnabled {
        enabled: bool,
    },
    WifiConnection(WifiTransition),
    WifiRssi {
        rssi: i32,
    },
    WifiActivity {
        direction: ActivityDirection,
    },
    WifiConfiguredNetworks {
        #[serde(default)]
        networks: Vec<ConfiguredNetwork>,
    },
    WimaxEnabled {
        enabled: bool,
    },
    WimaxSignalLevel {
        level: i32,
    },
    WimaxConnection {
        connected: bool,
        #[serde(default)]
        idle: bool,
    },
    WimaxNetworkState {
        state: i32,
        #[serde(default)]
        extra_state: i32,
    },
    Connectivity(ConnectivitySnapshot),
    AirplaneMode {
        enabled: bool,
    },
    Locale {
        locale: String,
    },
    ApplyConfig {
        config: Box<NetworkConfig>,
    },
    BootCompleted,
    BootGraceElapsed,
    Demo {
        command: DemoCommand,
    },
}

impl TelemetryEvent {
    pub fn kind(&self) -> &'static str {
        match self {
            TelemetryEvent::ServiceState(_) => "service_state",
            TelemetryEvent::SignalStrength { .. } => "signal_strength",
            TelemetryEvent::CallState { .. } => "call_state",
            TelemetryEvent::DataConnection { .. } => "data_connection",
            TelemetryEvent::DataActivity { .. } => "data_activity",
            TelemetryEvent::SimState { .. } => "sim_state",
            TelemetryEvent::NetworkName(_) => "network_name",
            TelemetryEvent::WifiEnabled { .. } => "wifi_enabled",
            TelemetryEvent::WifiConnection(_) => "wifi_connection",
            TelemetryEvent::WifiRssi { .. } => "wifi_rssi",
            TelemetryEvent::WifiActivity { .. } => "wifi_activity",
            TelemetryEvent::WifiConfiguredNetworks { .. } => "wifi_configured_networks",
            TelemetryEvent::WimaxEnabled { .. } => "wimax_enabled",
            TelemetryEvent::WimaxSignalLevel { .. } => "wimax_signal_level",
            TelemetryEvent::WimaxConnection { .. } => "wimax_connection",
            TelemetryEvent::WimaxNetworkState { .. } => "wimax_network_state",
            TelemetryEvent::Connectivity(_) => "connectivity",
            TelemetryEvent::AirplaneMode { .. } => "airplane_mode",
            TelemetryEvent::Locale { .. } => "locale",
            TelemetryEvent::ApplyConfig { .. } => "apply_config",
            TelemetryEvent::BootCompleted => "boot_completed",
            TelemetryEvent::BootGraceElapsed => "boot_grace_elapsed",
            TelemetryEvent::Demo { .. } => "demo",
        }
    }
}

// ─── Demo commands ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoCommand {
    Enter,
    Exit,
    Set(DemoParam),
}

/// A demo level: bar count, or `"null"` for the no-signal icon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum DemoLevel {
    Bars(u8),
    Named(DemoNamedLevel),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DemoNamedLevel {
    Null,
}

impl DemoLevel {
    pub fn bars(self) -> Option<usize> {
        match self {
            DemoLevel::Bars(n) => Some(n as usize),
            DemoLevel::Named(DemoNamedLevel::Null) => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DemoDataType {
    #[serde(rename = "1x")]
    OneX,
    #[serde(rename = "3g")]
    ThreeG,
    #[serde(rename = "4g")]
    FourG,
    #[serde(rename = "e")]
    E,
    #[serde(rename = "g")]
    G,
    #[serde(rename = "h")]
    H,
    #[serde(rename = "lte")]
    Lte,
    #[serde(rename = "roam")]
    Roam,
    #[serde(rename = "none")]
    None,
}

/// One `set(transport, field, value)` demo parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "transport", rename_all = "snake_case")]
pub enum DemoParam {
    Airplane {
        show: bool,
    },
    /// Link quality: fully connected or not.
    Fully {
        connected: bool,
    },
    Wifi {
        show: bool,
        #[serde(default)]
        level: Option<DemoLevel>,
    },
    Mobile {
        show: bool,
        #[serde(default)]
        level: Option<DemoLevel>,
        #[serde(default)]
        data_type: Option<DemoDataType>,
    },
}
