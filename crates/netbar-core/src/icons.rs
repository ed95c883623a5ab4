//! Icon identifiers and lookup tables.
//!
//! Rendering and drawable lookup live outside this crate, so an icon is an
//! opaque [`IconId`]. Ids are structured so that diagnostics can name them:
//!
//! ```text
//!  31      16 15     8 7       0
//! ┌─────────┬────────┬─────────┐
//! │ family  │ quality│  index  │
//! └─────────┴────────┴─────────┘
//! ```
//!
//! `IconId::NONE` (all zero) is the "hidden" sentinel. Every table lookup
//! in this module clamps its level first, so no input can index out of
//! bounds.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::generation::DataGeneration;
use crate::signal::{clamp_level, LinkQuality};

/// Opaque icon identifier. `IconId::NONE` means "no icon".
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct IconId(u32);

impl IconId {
    pub const NONE: IconId = IconId(0);

    pub const fn from_raw(raw: u32) -> Self {
        IconId(raw)
    }

    pub const fn raw(self) -> u32 {
        self.0
    }

    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    pub fn family(self) -> Option<IconFamily> {
        IconFamily::from_code((self.0 >> 16) as u16)
    }

    /// Human-readable name, e.g. `wifi_signal[1][3]`; `(null)` for
    /// [`IconId::NONE`], `(unknown)` for ids outside the built-in families
    /// (carrier logos, for instance).
    pub fn name(self) -> String {
        if self.is_none() {
            return "(null)".to_string();
        }
        match self.family() {
            Some(family) => {
                let quality = (self.0 >> 8) & 0xff;
                let index = self.0 & 0xff;
                if family.is_tabled() {
                    format!("{}[{}][{}]", family.as_str(), quality, index)
                } else {
                    family.as_str().to_string()
                }
            }
            None => "(unknown)".to_string(),
        }
    }
}

impl fmt::Display for IconId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08x}/{}", self.0, self.name())
    }
}

/// Icon families known to the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum IconFamily {
    PhoneSignal = 1,
    PhoneSignalRoaming,
    PhoneSignalSixBar,
    DataSignal,
    QsPhoneSignal,
    QsPhoneSignalSixBar,
    PhoneSignalNull,
    PhoneSignalNullSixBar,
    QsPhoneNoSignal,
    QsPhoneNoSignalSixBar,
    WifiSignal,
    QsWifiSignal,
    WifiSignalNull,
    QsWifiNoNetwork,
    WimaxSignal,
    WimaxIdle,
    WimaxDisconnected,
    DataActivity,
    DataType,
    QsDataType,
    DataTypeRoaming,
    QsDataTypeRoaming,
    MobileActivity,
    WifiActivity,
    FlightMode,
    BluetoothTether,
    NoSim,
}

impl IconFamily {
    const ALL: [IconFamily; 27] = [
        IconFamily::PhoneSignal,
        IconFamily::PhoneSignalRoaming,
        IconFamily::PhoneSignalSixBar,
        IconFamily::DataSignal,
        IconFamily::QsPhoneSignal,
        IconFamily::QsPhoneSignalSixBar,
        IconFamily::PhoneSignalNull,
        IconFamily::PhoneSignalNullSixBar,
        IconFamily::QsPhoneNoSignal,
        IconFamily::QsPhoneNoSignalSixBar,
        IconFamily::WifiSignal,
        IconFamily::QsWifiSignal,
        IconFamily::WifiSignalNull,
        IconFamily::QsWifiNoNetwork,
        IconFamily::WimaxSignal,
        IconFamily::WimaxIdle,
        IconFamily::WimaxDisconnected,
        IconFamily::DataActivity,
        IconFamily::DataType,
        IconFamily::QsDataType,
        IconFamily::DataTypeRoaming,
        IconFamily::QsDataTypeRoaming,
        IconFamily::MobileActivity,
        IconFamily::WifiActivity,
        IconFamily::FlightMode,
        IconFamily::BluetoothTether,
        IconFamily::NoSim,
    ];

    fn from_code(code: u16) -> Option<Self> {
        Self::ALL.iter().copied().find(|f| *f as u16 == code)
    }

    /// Families whose ids carry a meaningful quality/index pair.
    fn is_tabled(self) -> bool {
        matches!(
            self,
            IconFamily::PhoneSignal
                | IconFamily::PhoneSignalRoaming
                | IconFamily::PhoneSignalSixBar
                | IconFamily::DataSignal
                | IconFamily::QsPhoneSignal
                | IconFamily::QsPhoneSignalSixBar
                | IconFamily::WifiSignal
                | IconFamily::QsWifiSignal
                | IconFamily::WimaxSignal
                | IconFamily::DataActivity
                | IconFamily::DataType
                | IconFamily::QsDataType
                | IconFamily::QsDataTypeRoaming
                | IconFamily::MobileActivity
                | IconFamily::WifiActivity
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IconFamily::PhoneSignal => "phone_signal",
            IconFamily::PhoneSignalRoaming => "phone_signal_roaming",
            IconFamily::PhoneSignalSixBar => "phone_signal_6bar",
            IconFamily::DataSignal => "data_signal",
            IconFamily::QsPhoneSignal => "qs_phone_signal",
            IconFamily::QsPhoneSignalSixBar => "qs_phone_signal_6bar",
            IconFamily::PhoneSignalNull => "phone_signal_null",
            IconFamily::PhoneSignalNullSixBar => "phone_signal_null_6bar",
            IconFamily::QsPhoneNoSignal => "qs_phone_no_signal",
            IconFamily::QsPhoneNoSignalSixBar => "qs_phone_no_signal_6bar",
            IconFamily::WifiSignal => "wifi_signal",
            IconFamily::QsWifiSignal => "qs_wifi_signal",
            IconFamily::WifiSignalNull => "wifi_signal_null",
            IconFamily::QsWifiNoNetwork => "qs_wifi_no_network",
            IconFamily::WimaxSignal => "wimax_signal",
            IconFamily::WimaxIdle => "wimax_idle",
            IconFamily::WimaxDisconnected => "wimax_disconnected",
            IconFamily::DataActivity => "data_activity",
            IconFamily::DataType => "data_type",
            IconFamily::QsDataType => "qs_data_type",
            IconFamily::DataTypeRoaming => "data_type_roaming",
            IconFamily::QsDataTypeRoaming => "qs_data_type_roaming",
            IconFamily::MobileActivity => "mobile_activity",
            IconFamily::WifiActivity => "wifi_activity",
            IconFamily::FlightMode => "flight_mode",
            IconFamily::BluetoothTether => "bluetooth_tether",
            IconFamily::NoSim => "no_sim",
        }
    }
}

const fn icon(family: IconFamily, quality: u8, index: u8) -> IconId {
    IconId(((family as u32) << 16) | ((quality as u32) << 8) | index as u32)
}

const fn fixed(family: IconFamily) -> IconId {
    icon(family, 0, 0)
}

/// A two-row table: `[link quality][level]`.
pub type IconTable<const N: usize> = [[IconId; N]; 2];

const fn table<const N: usize>(family: IconFamily, offset: u8) -> IconTable<N> {
    let mut out = [[IconId::NONE; N]; 2];
    let mut q = 0;
    while q < 2 {
        let mut l = 0;
        while l < N {
            out[q][l] = icon(family, q as u8, offset + l as u8);
            l += 1;
        }
        q += 1;
    }
    out
}

/// Look up `level` in `table`, clamping it into the row length first.
pub fn lookup<const N: usize>(table: &IconTable<N>, quality: LinkQuality, level: i32) -> IconId {
    table[quality.index()][clamp_level(level, N)]
}

// ─── Cellular signal ────────────────────────────────────────────────────

pub const SIGNAL_LEVELS: usize = 5;
pub const SIX_BAR_LEVELS: usize = 7;

pub const TELEPHONY_SIGNAL_STRENGTH: IconTable<SIGNAL_LEVELS> = table(IconFamily::PhoneSignal, 0);
pub const TELEPHONY_SIGNAL_STRENGTH_ROAMING: IconTable<SIGNAL_LEVELS> =
    table(IconFamily::PhoneSignalRoaming, 0);
pub const TELEPHONY_SIGNAL_STRENGTH_SIX_BAR: IconTable<SIX_BAR_LEVELS> =
    table(IconFamily::PhoneSignalSixBar, 0);
pub const DATA_SIGNAL_STRENGTH: IconTable<SIGNAL_LEVELS> = table(IconFamily::DataSignal, 0);
pub const QS_TELEPHONY_SIGNAL_STRENGTH: IconTable<SIGNAL_LEVELS> =
    table(IconFamily::QsPhoneSignal, 0);
pub const QS_TELEPHONY_SIGNAL_STRENGTH_SIX_BAR: IconTable<SIX_BAR_LEVELS> =
    table(IconFamily::QsPhoneSignalSixBar, 0);

pub const PHONE_SIGNAL_NULL: IconId = fixed(IconFamily::PhoneSignalNull);
pub const PHONE_SIGNAL_NULL_SIX_BAR: IconId = fixed(IconFamily::PhoneSignalNullSixBar);
pub const QS_PHONE_NO_SIGNAL: IconId = fixed(IconFamily::QsPhoneNoSignal);
pub const QS_PHONE_NO_SIGNAL_SIX_BAR: IconId = fixed(IconFamily::QsPhoneNoSignalSixBar);
pub const NO_SIM: IconId = fixed(IconFamily::NoSim);
pub const FLIGHT_MODE: IconId = fixed(IconFamily::FlightMode);
pub const BLUETOOTH_TETHER: IconId = fixed(IconFamily::BluetoothTether);

// ─── Wi-Fi ──────────────────────────────────────────────────────────────

pub const WIFI_LEVEL_COUNT: usize = 5;

pub const WIFI_SIGNAL_STRENGTH: IconTable<WIFI_LEVEL_COUNT> = table(IconFamily::WifiSignal, 0);
pub const QS_WIFI_SIGNAL_STRENGTH: IconTable<WIFI_LEVEL_COUNT> =
    table(IconFamily::QsWifiSignal, 0);
pub const WIFI_SIGNAL_NULL: IconId = fixed(IconFamily::WifiSignalNull);
pub const QS_WIFI_NO_NETWORK: IconId = fixed(IconFamily::QsWifiNoNetwork);

// ─── WiMAX ──────────────────────────────────────────────────────────────

pub const WIMAX_LEVELS: usize = 4;

pub const WIMAX_SIGNAL_STRENGTH: IconTable<WIMAX_LEVELS> = table(IconFamily::WimaxSignal, 0);
pub const WIMAX_IDLE: IconId = fixed(IconFamily::WimaxIdle);
pub const WIMAX_DISCONNECTED: IconId = fixed(IconFamily::WimaxDisconnected);

// ─── Activity arrows ────────────────────────────────────────────────────

/// Direction of traffic as reported by a transport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityDirection {
    #[default]
    None,
    In,
    Out,
    InOut,
    Dormant,
}

impl ActivityDirection {
    /// Column into an activity icon list: idle/dormant, in, out, in+out.
    pub fn column(self) -> usize {
        match self {
            ActivityDirection::None | ActivityDirection::Dormant => 0,
            ActivityDirection::In => 1,
            ActivityDirection::Out => 2,
            ActivityDirection::InOut => 3,
        }
    }

    pub fn has_in(self) -> bool {
        matches!(self, ActivityDirection::In | ActivityDirection::InOut)
    }

    pub fn has_out(self) -> bool {
        matches!(self, ActivityDirection::Out | ActivityDirection::InOut)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityDirection::None => "none",
            ActivityDirection::In => "in",
            ActivityDirection::Out => "out",
            ActivityDirection::InOut => "inout",
            ActivityDirection::Dormant => "dormant",
        }
    }
}

pub const ACTIVITY_COLUMNS: usize = 4;

/// Mobile overlay arrows, indexed by [`ActivityDirection::column`]; column
/// 0 is the neutral "no direction" icon.
pub const MOBILE_ACTIVITY: [IconId; ACTIVITY_COLUMNS] = [
    icon(IconFamily::MobileActivity, 0, 0),
    icon(IconFamily::MobileActivity, 0, 1),
    icon(IconFamily::MobileActivity, 0, 2),
    icon(IconFamily::MobileActivity, 0, 3),
];

pub const WIFI_ACTIVITY: [IconId; ACTIVITY_COLUMNS] = [
    icon(IconFamily::WifiActivity, 0, 0),
    icon(IconFamily::WifiActivity, 0, 1),
    icon(IconFamily::WifiActivity, 0, 2),
    icon(IconFamily::WifiActivity, 0, 3),
];

pub const MOBILE_ACTIVITY_NEUTRAL: IconId = MOBILE_ACTIVITY[0];
pub const WIFI_ACTIVITY_NEUTRAL: IconId = WIFI_ACTIVITY[0];

// ─── Per-generation data icons ──────────────────────────────────────────

/// Everything the data path needs for one generation bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GenerationIcons {
    /// Direction icon list, `[quality][ActivityDirection::column]`.
    pub activity: IconTable<ACTIVITY_COLUMNS>,
    /// Status-bar badge, `NONE` for the unknown bucket.
    pub data_type: IconId,
    /// Quick-settings badge per link quality.
    pub qs_data_type: [IconId; 2],
}

const fn generation_icons(index: u8, badge: bool) -> GenerationIcons {
    let activity = table(IconFamily::DataActivity, index * ACTIVITY_COLUMNS as u8);
    if badge {
        GenerationIcons {
            activity,
            data_type: icon(IconFamily::DataType, 0, index),
            qs_data_type: [
                icon(IconFamily::QsDataType, 0, index),
                icon(IconFamily::QsDataType, 1, index),
            ],
        }
    } else {
        GenerationIcons {
            activity,
            data_type: IconId::NONE,
            qs_data_type: [IconId::NONE, IconId::NONE],
        }
    }
}

/// Indexed by [`DataGeneration::index`]. The unknown bucket borrows the
/// G arrows but has no badge.
pub const GENERATION_ICONS: [GenerationIcons; 10] = [
    GenerationIcons {
        activity: table(IconFamily::DataActivity, ACTIVITY_COLUMNS as u8),
        data_type: IconId::NONE,
        qs_data_type: [IconId::NONE, IconId::NONE],
    },
    generation_icons(1, true),
    generation_icons(2, true),
    generation_icons(3, true),
    generation_icons(4, true),
    generation_icons(5, true),
    generation_icons(6, true),
    generation_icons(7, true),
    generation_icons(8, true),
    generation_icons(9, true),
];

pub fn generation_icons_for(generation: DataGeneration) -> &'static GenerationIcons {
    &GENERATION_ICONS[generation.index()]
}

pub const DATA_TYPE_ROAMING: IconId = fixed(IconFamily::DataTypeRoaming);
pub const QS_DATA_TYPE_ROAMING: [IconId; 2] = [
    icon(IconFamily::QsDataTypeRoaming, 0, 0),
    icon(IconFamily::QsDataTypeRoaming, 1, 0),
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn none_is_zero_and_named_null() {
        assert!(IconId::NONE.is_none());
        assert_eq!(IconId::NONE.name(), "(null)");
        assert_eq!(IconId::default(), IconId::NONE);
    }

    #[test]
    fn lookup_clamps_out_of_range_levels() {
        let top = lookup(&WIFI_SIGNAL_STRENGTH, LinkQuality::Good, 99);
        assert_eq!(top, WIFI_SIGNAL_STRENGTH[1][WIFI_LEVEL_COUNT - 1]);
        let bottom = lookup(&WIFI_SIGNAL_STRENGTH, LinkQuality::Poor, -5);
        assert_eq!(bottom, WIFI_SIGNAL_STRENGTH[0][0]);
    }

    #[test]
    fn table_ids_are_unique_and_nonzero() {
        let mut seen = HashSet::new();
        let mut push = |id: IconId| {
            assert!(!id.is_none());
            assert!(seen.insert(id), "duplicate icon id {}", id);
        };
        for row in TELEPHONY_SIGNAL_STRENGTH.iter() {
            row.iter().copied().for_each(&mut push);
        }
        for row in TELEPHONY_SIGNAL_STRENGTH_SIX_BAR.iter() {
            row.iter().copied().for_each(&mut push);
        }
        for row in WIFI_SIGNAL_STRENGTH.iter() {
            row.iter().copied().for_each(&mut push);
        }
        for row in WIMAX_SIGNAL_STRENGTH.iter() {
            row.iter().copied().for_each(&mut push);
        }
        for g in GENERATION_ICONS.iter().skip(1) {
            for row in g.activity.iter() {
                row.iter().copied().for_each(&mut push);
            }
            push(g.data_type);
        }
        push(DATA_TYPE_ROAMING);
        push(FLIGHT_MODE);
        push(BLUETOOTH_TETHER);
    }

    #[test]
    fn unknown_generation_has_no_badge_but_g_arrows() {
        let unknown = generation_icons_for(DataGeneration::Unknown);
        assert!(unknown.data_type.is_none());
        assert_eq!(
            unknown.activity,
            generation_icons_for(DataGeneration::G).activity
        );
    }

    #[test]
    fn names_describe_family_and_position() {
        assert_eq!(WIFI_SIGNAL_STRENGTH[1][3].name(), "wifi_signal[1][3]");
        assert_eq!(FLIGHT_MODE.name(), "flight_mode");
        assert_eq!(IconId::from_raw(0x7f02_0001).name(), "(unknown)");
        assert!(FLIGHT_MODE.to_string().starts_with("0x"));
    }

    #[test]
    fn activity_columns() {
        assert_eq!(ActivityDirection::Dormant.column(), 0);
        assert_eq!(ActivityDirection::InOut.column(), 3);
        assert!(ActivityDirection::InOut.has_in() && ActivityDirection::InOut.has_out());
        assert!(!ActivityDirection::Dormant.has_in());
    }
}
