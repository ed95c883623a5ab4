//! Cellular radio tracker.
//!
//! Stores the most recent report from each radio feed. Nothing here picks
//! icons; the reconciler asks the predicates below and does the rest.

use serde::{Deserialize, Serialize};

use crate::generation::NetworkType;
use crate::icons::ActivityDirection;

/// ERI icon index meaning "roaming indicator off".
pub const ERI_INDICATOR_OFF: i32 = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SimState {
    Absent,
    #[default]
    Ready,
    PinRequired,
    PukRequired,
    NetworkLocked,
    Unknown,
}

impl SimState {
    pub fn as_str(&self) -> &'static str {
        match self {
            SimState::Absent => "absent",
            SimState::Ready => "ready",
            SimState::PinRequired => "pin_required",
            SimState::PukRequired => "puk_required",
            SimState::NetworkLocked => "network_locked",
            SimState::Unknown => "unknown",
        }
    }
}

/// Registration state of the voice or data domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RegState {
    InService,
    #[default]
    OutOfService,
    EmergencyOnly,
    PowerOff,
}

impl RegState {
    pub fn as_str(&self) -> &'static str {
        match self {
            RegState::InService => "in_service",
            RegState::OutOfService => "out_of_service",
            RegState::EmergencyOnly => "emergency_only",
            RegState::PowerOff => "power_off",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EriIconMode {
    #[default]
    Normal,
    Flash,
    Other,
}

/// Latest service-state report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceState {
    pub voice_reg: RegState,
    pub data_reg: RegState,
    pub roaming: bool,
    pub emergency_only: bool,
    pub eri_icon_index: i32,
    pub eri_icon_mode: EriIconMode,
    /// Numeric operator code (MCC+MNC), when registered.
    pub operator_numeric: Option<String>,
}

impl Default for ServiceState {
    fn default() -> Self {
        Self {
            voice_reg: RegState::OutOfService,
            data_reg: RegState::OutOfService,
            roaming: false,
            emergency_only: false,
            eri_icon_index: ERI_INDICATOR_OFF,
            eri_icon_mode: EriIconMode::Normal,
            operator_numeric: None,
        }
    }
}

/// Signal bars as computed by the radio layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SignalStrength {
    pub level: i32,
    pub is_gsm: bool,
    pub cdma_level: i32,
    pub six_bar_level: i32,
    pub six_bar_cdma_level: i32,
}

impl SignalStrength {
    /// Same level on every scale; used by the demo overlay.
    pub fn uniform(level: i32, is_gsm: bool) -> Self {
        Self {
            level,
            is_gsm,
            cdma_level: level,
            six_bar_level: level,
            six_bar_cdma_level: level,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataConnectionState {
    #[default]
    Disconnected,
    Connected,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CallState {
    #[default]
    Idle,
    Ringing,
    Offhook,
}

/// Operator display name as broadcast by the radio (SPN / PLMN).
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NetworkName {
    pub show_spn: bool,
    pub spn: Option<String>,
    pub show_plmn: bool,
    pub plmn: Option<String>,
}

impl NetworkName {
    /// PLMN then SPN, joined by `separator`; `default` when neither shows.
    pub fn render(&self, separator: &str, default: &str) -> String {
        let parts: Vec<&str> = [
            self.plmn.as_deref().filter(|_| self.show_plmn),
            self.spn.as_deref().filter(|_| self.show_spn),
        ]
        .into_iter()
        .flatten()
        .collect();
        if parts.is_empty() {
            default.to_string()
        } else {
            parts.join(separator)
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CellularState {
    pub sim: SimState,
    /// `None` until the first service-state report.
    pub service: Option<ServiceState>,
    /// `None` means no signal data yet.
    pub signal: Option<SignalStrength>,
    pub network_type: NetworkType,
    pub data_state: DataConnectionState,
    pub activity: ActivityDirection,
    pub call_state: CallState,
    pub network_name: NetworkName,
}

impl CellularState {
    pub fn ingest_service_state(&mut self, service: ServiceState) {
        self.service = Some(service);
    }

    pub fn ingest_signal_strength(&mut self, signal: Option<SignalStrength>) {
        self.signal = signal;
    }

    pub fn ingest_data_connection_state(
        &mut self,
        state: DataConnectionState,
        network_type: NetworkType,
    ) {
        self.data_state = state;
        self.network_type = network_type;
    }

    pub fn ingest_data_activity(&mut self, direction: ActivityDirection) {
        self.activity = direction;
    }

    pub fn ingest_sim_state(&mut self, sim: SimState) {
        self.sim = sim;
    }

    pub fn ingest_call_state(&mut self, call_state: CallState) {
        self.call_state = call_state;
    }

    pub fn ingest_network_name(&mut self, name: NetworkName) {
        self.network_name = name;
    }

    /// In service if voice is registered, or if voice is out of service /
    /// emergency-only while data is registered.
    pub fn has_service(&self) -> bool {
        match &self.service {
            None => false,
            Some(s) => match s.voice_reg {
                RegState::PowerOff => false,
                RegState::OutOfService | RegState::EmergencyOnly => {
                    s.data_reg == RegState::InService
                }
                RegState::InService => true,
            },
        }
    }

    pub fn is_cdma(&self) -> bool {
        self.signal.map(|s| !s.is_gsm).unwrap_or(false)
    }

    pub fn is_emergency_only(&self) -> bool {
        self.service.as_ref().map(|s| s.emergency_only).unwrap_or(false)
    }

    /// CDMA roaming from the ERI indicator. `combined_signal` lets a
    /// registered data domain stand in for voice service.
    pub fn is_cdma_eri(&self, combined_signal: bool) -> bool {
        let Some(s) = &self.service else {
            return false;
        };
        let registered =
            self.has_service() || (combined_signal && s.data_reg == RegState::InService);
        registered
            && s.eri_icon_index != ERI_INDICATOR_OFF
            && matches!(s.eri_icon_mode, EriIconMode::Normal | EriIconMode::Flash)
    }

    pub fn is_roaming(&self, combined_signal: bool) -> bool {
        if self.is_cdma() {
            self.is_cdma_eri(combined_signal)
        } else {
            self.service.as_ref().map(|s| s.roaming).unwrap_or(false)
        }
    }

    /// GSM data needs a usable SIM; CDMA does not.
    pub fn sim_usable(&self) -> bool {
        self.is_cdma() || matches!(self.sim, SimState::Ready | SimState::Unknown)
    }

    pub fn operator_numeric(&self) -> Option<&str> {
        self.service
            .as_ref()
            .and_then(|s| s.operator_numeric.as_deref())
    }
}
