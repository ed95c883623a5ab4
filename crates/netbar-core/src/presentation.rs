//! Output of a reconciliation pass.
//!
//! A [`DerivedPresentation`] is rebuilt from scratch on every pass and is
//! never edited in place. Observer tiers read different slices of it:
//! cluster observers get the whole value, field observers get one
//! [`FieldUpdate`] at a time, and signal callbacks get the
//! [`SignalBundle`].

use serde::Serialize;

use crate::generation::DataGeneration;
use crate::icons::IconId;

/// Which precedence rule produced the combined icon/label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CombinedSource {
    #[default]
    None,
    Airplane,
    Wimax,
    MobileData,
    Wifi,
    BluetoothTether,
    Ethernet,
    Disconnected,
}

impl CombinedSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            CombinedSource::None => "none",
            CombinedSource::Airplane => "airplane",
            CombinedSource::Wimax => "wimax",
            CombinedSource::MobileData => "mobile_data",
            CombinedSource::Wifi => "wifi",
            CombinedSource::BluetoothTether => "bluetooth_tether",
            CombinedSource::Ethernet => "ethernet",
            CombinedSource::Disconnected => "disconnected",
        }
    }
}

/// Accessibility strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Descriptions {
    pub phone_signal: String,
    pub wifi: String,
    pub wimax: String,
    pub data_type: String,
    pub combined_signal: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WifiIndicators {
    pub visible: bool,
    pub strength: IconId,
    pub activity: IconId,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MobileIndicators {
    pub visible: bool,
    pub strength: IconId,
    pub activity: IconId,
    pub data_type: IconId,
    pub strength_description: String,
    pub data_type_description: String,
}

/// What a signal cluster draws.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClusterView {
    pub wifi: WifiIndicators,
    pub mobile: MobileIndicators,
    pub airplane_mode: bool,
    pub airplane_icon: IconId,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct WifiSignal {
    pub enabled: bool,
    pub qs_icon: IconId,
    pub activity_in: bool,
    pub activity_out: bool,
    pub description: String,
    /// SSID shown next to the icon, only while enabled.
    pub ssid: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MobileSignal {
    pub enabled: bool,
    pub qs_icon: IconId,
    pub signal_description: String,
    pub qs_data_type: IconId,
    pub activity_in: bool,
    pub activity_out: bool,
    pub data_type_description: String,
    /// `None` while emergency-only.
    pub network_name: Option<String>,
}

/// Normalized bundle handed to signal callbacks on every pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SignalBundle {
    pub wifi: WifiSignal,
    pub mobile: MobileSignal,
    pub airplane_mode: bool,
}

/// Keys for carrier-logo lookup, chosen alongside the mobile label.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CarrierCandidates {
    pub number: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DerivedPresentation {
    pub phone_signal_icon: IconId,
    pub qs_phone_signal_icon: IconId,
    pub data_signal_icon: IconId,
    pub data_direction_icon: IconId,
    pub data_type_icon: IconId,
    pub qs_data_type_icon: IconId,
    pub wifi_icon: IconId,
    pub qs_wifi_icon: IconId,
    pub wifi_activity_icon: IconId,
    pub wimax_icon: IconId,
    pub mobile_activity_icon: IconId,
    pub combined_icon: IconId,
    pub combined_activity_icon: IconId,
    pub airplane_icon: IconId,
    /// Filled in by carrier resolution after reconcile.
    pub carrier_icon: IconId,

    pub combined_label: String,
    pub mobile_label: String,
    pub wifi_label: String,

    pub combined_source: CombinedSource,
    pub generation: DataGeneration,
    pub data_connected: bool,
    pub emergency_only: bool,
    pub airplane_mode: bool,
    pub locale: String,

    pub descriptions: Descriptions,
    pub cluster: ClusterView,
    pub signals: SignalBundle,
    pub carrier: CarrierCandidates,
}

/// Fields pushed to per-field view groups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    PhoneSignal,
    DataDirection,
    Wifi,
    Wimax,
    Combined,
    DataType,
    ActivityOverlay,
    CombinedLabel,
    WifiLabel,
    MobileLabel,
    EmergencyLabel,
}

impl Field {
    pub const ALL: [Field; 11] = [
        Field::PhoneSignal,
        Field::DataDirection,
        Field::Wifi,
        Field::Wimax,
        Field::Combined,
        Field::DataType,
        Field::ActivityOverlay,
        Field::CombinedLabel,
        Field::WifiLabel,
        Field::MobileLabel,
        Field::EmergencyLabel,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Field::PhoneSignal => "phone_signal",
            Field::DataDirection => "data_direction",
            Field::Wifi => "wifi",
            Field::Wimax => "wimax",
            Field::Combined => "combined",
            Field::DataType => "data_type",
            Field::ActivityOverlay => "activity_overlay",
            Field::CombinedLabel => "combined_label",
            Field::WifiLabel => "wifi_label",
            Field::MobileLabel => "mobile_label",
            Field::EmergencyLabel => "emergency_label",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldValue {
    Icon(IconId),
    Label(String),
}

/// One view group's slice of a presentation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldUpdate {
    pub field: Field,
    pub value: FieldValue,
    pub visible: bool,
    pub description: String,
}

impl FieldUpdate {
    fn icon(field: Field, id: IconId, description: &str) -> Self {
        FieldUpdate {
            field,
            value: FieldValue::Icon(id),
            visible: !id.is_none(),
            description: description.to_string(),
        }
    }

    fn label(field: Field, text: &str, visible: bool) -> Self {
        FieldUpdate {
            field,
            value: FieldValue::Label(text.to_string()),
            visible,
            description: String::new(),
        }
    }

    /// Whether a view group must be refreshed; descriptions ride along
    /// but do not trigger a push on their own.
    pub fn differs_from(&self, other: &FieldUpdate) -> bool {
        self.value != other.value || self.visible != other.visible
    }
}

/// The fixed checklist gating cluster pushes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ClusterKey {
    pub phone_signal_icon: IconId,
    pub combined_activity_icon: IconId,
    pub wifi_icon: IconId,
    pub wimax_icon: IconId,
    pub data_type_icon: IconId,
    pub airplane_mode: bool,
    pub locale: String,
}

impl DerivedPresentation {
    pub fn cluster_key(&self) -> ClusterKey {
        ClusterKey {
            phone_signal_icon: self.phone_signal_icon,
            combined_activity_icon: self.combined_activity_icon,
            wifi_icon: self.wifi_icon,
            wimax_icon: self.wimax_icon,
            data_type_icon: self.data_type_icon,
            airplane_mode: self.airplane_mode,
            locale: self.locale.clone(),
        }
    }

    pub fn field(&self, field: Field) -> FieldUpdate {
        let d = &self.descriptions;
        match field {
            Field::PhoneSignal => {
                FieldUpdate::icon(field, self.phone_signal_icon, &d.phone_signal)
            }
            Field::DataDirection => {
                FieldUpdate::icon(field, self.data_direction_icon, &d.data_type)
            }
            Field::Wifi => FieldUpdate::icon(field, self.wifi_icon, &d.wifi),
            Field::Wimax => FieldUpdate::icon(field, self.wimax_icon, &d.wimax),
            Field::Combined => FieldUpdate::icon(field, self.combined_icon, &d.combined_signal),
            Field::DataType => FieldUpdate::icon(field, self.data_type_icon, &d.data_type),
            Field::ActivityOverlay => {
                FieldUpdate::icon(field, self.combined_activity_icon, &d.data_type)
            }
            Field::CombinedLabel => {
                FieldUpdate::label(field, &self.combined_label, !self.combined_label.is_empty())
            }
            Field::WifiLabel => {
                FieldUpdate::label(field, &self.wifi_label, !self.wifi_label.is_empty())
            }
            Field::MobileLabel => {
                FieldUpdate::label(field, &self.mobile_label, !self.mobile_label.is_empty())
            }
            Field::EmergencyLabel => {
                FieldUpdate::label(field, &self.mobile_label, self.emergency_only)
            }
        }
    }

    pub fn fields(&self) -> Vec<FieldUpdate> {
        Field::ALL.iter().map(|f| self.field(*f)).collect()
    }
}
