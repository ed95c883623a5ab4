use std::collections::BTreeMap;
use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::carrier::CarrierIconTable;
use crate::error::ConfigError;
use crate::generation::{ClassifyOptions, DataGeneration};
use crate::icons::IconId;

pub const CONFIG_VERSION: u32 = 1;

pub const DEFAULT_STORED_SSIDS: usize = 5;
pub const DEFAULT_BOOT_GRACE: Duration = Duration::from_secs(30);

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NetworkConfigInput {
    pub version: u32,
    pub device: DeviceConfigInput,
    pub display: DisplayConfigInput,
    pub labels: LabelConfigInput,
    pub carrier_icons: BTreeMap<String, u32>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DeviceConfigInput {
    pub mobile_feature_present: Option<bool>,
    pub wimax_supported: Option<bool>,
    pub show_phone_rssi_for_data: Option<bool>,
    pub combined_signal: Option<bool>,
    pub data_and_wifi_stacked: Option<bool>,
    pub stored_ssids_capacity: Option<usize>,
    pub boot_grace_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct DisplayConfigInput {
    pub six_bar_enabled: Option<bool>,
    pub always_show_cdma_rssi: Option<bool>,
    pub show_at_least_three_gees: Option<bool>,
    pub hspa_data_distinguishable: Option<bool>,
    pub show_4g_for_lte: Option<bool>,
    pub direction_arrows_enabled: Option<bool>,
    pub hide_signal_bars: Option<bool>,
    pub custom_operator_label: Option<String>,
    pub emergency_only_allowed: Option<bool>,
    pub wifi_notifications: Option<u8>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct LabelConfigInput {
    pub disconnected: Option<String>,
    pub wifi_no_ssid: Option<String>,
    pub bluetooth_tethered: Option<String>,
    pub ethernet: Option<String>,
    pub network_name_default: Option<String>,
    pub network_name_separator: Option<String>,
    pub airplane_mode: Option<String>,
    pub no_wifi: Option<String>,
    pub no_wimax: Option<String>,
    pub bluetooth_tether_description: Option<String>,
    pub phone_signal_strength: Option<Vec<String>>,
    pub wifi_connection_strength: Option<Vec<String>>,
    pub wimax_connection_strength: Option<Vec<String>>,
    /// Keyed by generation name (`g`, `e`, `3g`, `h`, `hp`, `dc`, `1x`,
    /// `lte`, `4g`, `unknown`).
    pub data_type: BTreeMap<String, String>,
}

/// Static device capabilities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeviceConfig {
    pub mobile_feature_present: bool,
    pub wimax_supported: bool,
    pub show_phone_rssi_for_data: bool,
    /// Count data registration when deciding CDMA roaming.
    pub combined_signal: bool,
    /// Hide the "no network" Wi-Fi icon while disconnected.
    pub data_and_wifi_stacked: bool,
    pub stored_ssids_capacity: usize,
    pub boot_grace: Duration,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            mobile_feature_present: true,
            wimax_supported: false,
            show_phone_rssi_for_data: false,
            combined_signal: false,
            data_and_wifi_stacked: false,
            stored_ssids_capacity: DEFAULT_STORED_SSIDS,
            boot_grace: DEFAULT_BOOT_GRACE,
        }
    }
}

/// How Wi-Fi connection changes are announced by the notice collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WifiNotificationMode {
    #[default]
    Off,
    Toast,
    Notification,
    NotificationWithSound,
}

impl WifiNotificationMode {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(WifiNotificationMode::Off),
            1 => Some(WifiNotificationMode::Toast),
            2 => Some(WifiNotificationMode::Notification),
            3 => Some(WifiNotificationMode::NotificationWithSound),
            _ => None,
        }
    }

    pub fn is_enabled(self) -> bool {
        self != WifiNotificationMode::Off
    }
}

/// User-facing display toggles.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DisplayConfig {
    pub six_bar_enabled: bool,
    pub always_show_cdma_rssi: bool,
    pub show_at_least_three_gees: bool,
    pub hspa_data_distinguishable: bool,
    pub show_4g_for_lte: bool,
    pub direction_arrows_enabled: bool,
    pub hide_signal_bars: bool,
    pub custom_operator_label: Option<String>,
    pub emergency_only_allowed: bool,
    pub wifi_notifications: WifiNotificationMode,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            six_bar_enabled: false,
            always_show_cdma_rssi: false,
            show_at_least_three_gees: false,
            hspa_data_distinguishable: false,
            show_4g_for_lte: false,
            direction_arrows_enabled: false,
            hide_signal_bars: false,
            custom_operator_label: None,
            emergency_only_allowed: true,
            wifi_notifications: WifiNotificationMode::Off,
        }
    }
}

/// Fixed strings and accessibility tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelConfig {
    pub disconnected: String,
    pub wifi_no_ssid: String,
    pub bluetooth_tethered: String,
    pub ethernet: String,
    pub network_name_default: String,
    pub network_name_separator: String,
    pub airplane_mode: String,
    pub no_wifi: String,
    pub no_wimax: String,
    pub bluetooth_tether_description: String,
    pub phone_signal_strength: Vec<String>,
    pub wifi_connection_strength: Vec<String>,
    pub wimax_connection_strength: Vec<String>,
    /// Indexed by [`DataGeneration::index`].
    pub data_type: Vec<String>,
}

fn strings(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            disconnected: "No internet connection".into(),
            wifi_no_ssid: "Unnamed network".into(),
            bluetooth_tethered: "Bluetooth tethered".into(),
            ethernet: "Ethernet".into(),
            network_name_default: "No service".into(),
            network_name_separator: "|".into(),
            airplane_mode: "Airplane mode.".into(),
            no_wifi: "Wifi disconnected.".into(),
            no_wimax: "No WiMAX.".into(),
            bluetooth_tether_description: "Bluetooth tethering.".into(),
            phone_signal_strength: strings(&[
                "No phone.",
                "Phone one bar.",
                "Phone two bars.",
                "Phone three bars.",
                "Phone signal full.",
            ]),
            wifi_connection_strength: strings(&[
                "No wifi.",
                "Wifi one bar.",
                "Wifi two bars.",
                "Wifi three bars.",
                "Wifi signal full.",
            ]),
            wimax_connection_strength: strings(&[
                "No WiMAX.",
                "WiMAX one bar.",
                "WiMAX two bars.",
                "WiMAX signal full.",
            ]),
            data_type: strings(&[
                "GPRS", "GPRS", "EDGE", "3G", "3.5G", "HSPA+", "DC-HSPA+", "CDMA", "LTE", "4G",
            ]),
        }
    }
}

impl LabelConfig {
    /// Entry `level` of a description table, clamped to its last entry.
    pub fn describe(table: &[String], level: usize) -> String {
        table
            .get(level)
            .or_else(|| table.last())
            .cloned()
            .unwrap_or_default()
    }

    pub fn phone_signal(&self, level: usize) -> String {
        Self::describe(&self.phone_signal_strength, level)
    }

    pub fn wifi_signal(&self, level: usize) -> String {
        Self::describe(&self.wifi_connection_strength, level)
    }

    pub fn wimax_signal(&self, level: usize) -> String {
        Self::describe(&self.wimax_connection_strength, level)
    }

    pub fn data_type(&self, generation: DataGeneration) -> String {
        Self::describe(&self.data_type, generation.index())
    }
}

/// Resolved engine configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NetworkConfigInput")]
pub struct NetworkConfig {
    pub version: u32,
    pub device: DeviceConfig,
    pub display: DisplayConfig,
    #[serde(skip)]
    pub labels: LabelConfig,
    #[serde(skip)]
    pub carrier_icons: CarrierIconTable,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            version: CONFIG_VERSION,
            device: DeviceConfig::default(),
            display: DisplayConfig::default(),
            labels: LabelConfig::default(),
            carrier_icons: CarrierIconTable::default(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.and_then(|v| {
        let trimmed = v.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    })
}

fn string_table(
    field: &'static str,
    value: Option<Vec<String>>,
    default: Vec<String>,
) -> Result<Vec<String>, ConfigError> {
    match value {
        None => Ok(default),
        Some(items) if items.is_empty() => Err(ConfigError::Invalid {
            field,
            reason: "table must have at least one entry".into(),
        }),
        Some(items) => Ok(items),
    }
}

impl NetworkConfigInput {
    pub fn resolve(self) -> Result<NetworkConfig, ConfigError> {
        let version = if self.version == 0 {
            CONFIG_VERSION
        } else {
            self.version
        };
        if version != CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion(version));
        }

        let device_defaults = DeviceConfig::default();
        let stored_ssids_capacity = self
            .device
            .stored_ssids_capacity
            .unwrap_or(device_defaults.stored_ssids_capacity);
        if stored_ssids_capacity == 0 {
            return Err(ConfigError::Invalid {
                field: "device.stored_ssids_capacity",
                reason: "must be at least 1".into(),
            });
        }
        let device = DeviceConfig {
            mobile_feature_present: self
                .device
                .mobile_feature_present
                .unwrap_or(device_defaults.mobile_feature_present),
            wimax_supported: self
                .device
                .wimax_supported
                .unwrap_or(device_defaults.wimax_supported),
            show_phone_rssi_for_data: self
                .device
                .show_phone_rssi_for_data
                .unwrap_or(device_defaults.show_phone_rssi_for_data),
            combined_signal: self
                .device
                .combined_signal
                .unwrap_or(device_defaults.combined_signal),
            data_and_wifi_stacked: self
                .device
                .data_and_wifi_stacked
                .unwrap_or(device_defaults.data_and_wifi_stacked),
            stored_ssids_capacity,
            boot_grace: self
                .device
                .boot_grace_ms
                .map(Duration::from_millis)
                .unwrap_or(device_defaults.boot_grace),
        };

        let d = DisplayConfig::default();
        let wifi_notifications = match self.display.wifi_notifications {
            None => d.wifi_notifications,
            Some(raw) => {
                WifiNotificationMode::from_raw(raw).ok_or_else(|| ConfigError::Invalid {
                    field: "display.wifi_notifications",
                    reason: format!("expected 0..=3, got {}", raw),
                })?
            }
        };
        let display = DisplayConfig {
            six_bar_enabled: self.display.six_bar_enabled.unwrap_or(d.six_bar_enabled),
            always_show_cdma_rssi: self
                .display
                .always_show_cdma_rssi
                .unwrap_or(d.always_show_cdma_rssi),
            show_at_least_three_gees: self
                .display
                .show_at_least_three_gees
                .unwrap_or(d.show_at_least_three_gees),
            hspa_data_distinguishable: self
                .display
                .hspa_data_distinguishable
                .unwrap_or(d.hspa_data_distinguishable),
            show_4g_for_lte: self.display.show_4g_for_lte.unwrap_or(d.show_4g_for_lte),
            direction_arrows_enabled: self
                .display
                .direction_arrows_enabled
                .unwrap_or(d.direction_arrows_enabled),
            hide_signal_bars: self.display.hide_signal_bars.unwrap_or(d.hide_signal_bars),
            custom_operator_label: non_empty(self.display.custom_operator_label),
            emergency_only_allowed: self
                .display
                .emergency_only_allowed
                .unwrap_or(d.emergency_only_allowed),
            wifi_notifications,
        };

        let l = LabelConfig::default();
        let mut data_type = l.data_type.clone();
        for (key, text) in self.labels.data_type {
            let generation = DataGeneration::ALL
                .iter()
                .find(|g| g.as_str() == key.trim().to_ascii_lowercase())
                .ok_or_else(|| ConfigError::Invalid {
                    field: "labels.data_type",
                    reason: format!("unknown generation '{}'", key),
                })?;
            data_type[generation.index()] = text;
        }
        let labels = LabelConfig {
            disconnected: self.labels.disconnected.unwrap_or(l.disconnected),
            wifi_no_ssid: self.labels.wifi_no_ssid.unwrap_or(l.wifi_no_ssid),
            bluetooth_tethered: self
                .labels
                .bluetooth_tethered
                .unwrap_or(l.bluetooth_tethered),
            ethernet: self.labels.ethernet.unwrap_or(l.ethernet),
            network_name_default: self
                .labels
                .network_name_default
                .unwrap_or(l.network_name_default),
            network_name_separator: self
                .labels
                .network_name_separator
                .unwrap_or(l.network_name_separator),
            airplane_mode: self.labels.airplane_mode.unwrap_or(l.airplane_mode),
            no_wifi: self.labels.no_wifi.unwrap_or(l.no_wifi),
            no_wimax: self.labels.no_wimax.unwrap_or(l.no_wimax),
            bluetooth_tether_description: self
                .labels
                .bluetooth_tether_description
                .unwrap_or(l.bluetooth_tether_description),
            phone_signal_strength: string_table(
                "labels.phone_signal_strength",
                self.labels.phone_signal_strength,
                l.phone_signal_strength,
            )?,
            wifi_connection_strength: string_table(
                "labels.wifi_connection_strength",
                self.labels.wifi_connection_strength,
                l.wifi_connection_strength,
            )?,
            wimax_connection_strength: string_table(
                "labels.wimax_connection_strength",
                self.labels.wimax_connection_strength,
                l.wimax_connection_strength,
            )?,
            data_type,
        };

        let mut carrier_icons = CarrierIconTable::default();
        for (key, raw) in self.carrier_icons {
            if raw == 0 {
                return Err(ConfigError::Invalid {
                    field: "carrier_icons",
                    reason: format!("icon id for '{}' must be positive", key),
                });
            }
            carrier_icons.insert(&key, IconId::from_raw(raw));
        }

        Ok(NetworkConfig {
            version,
            device,
            display,
            labels,
            carrier_icons,
        })
    }
}

impl TryFrom<NetworkConfigInput> for NetworkConfig {
    type Error = ConfigError;

    fn try_from(input: NetworkConfigInput) -> Result<Self, Self::Error> {
        input.resolve()
    }
}

impl NetworkConfig {
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        if input.trim().is_empty() {
            return Ok(NetworkConfig::default());
        }
        let parsed: NetworkConfigInput = toml::from_str(input)?;
        parsed.resolve()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    pub fn classify_options(&self) -> ClassifyOptions {
        ClassifyOptions {
            show_at_least_three_gees: self.display.show_at_least_three_gees,
            hspa_data_distinguishable: self.display.hspa_data_distinguishable,
            show_4g_for_lte: self.display.show_4g_for_lte,
        }
    }
}
