//! Radio technology classification.
//!
//! Raw data-network type codes (as reported by the modem stack) are folded
//! into coarse [`DataGeneration`] buckets, which drive both the data-type
//! badge and the activity-arrow icon list. Classification is two-staged:
//!
//! ```text
//! raw code ─► NetworkType ─► base bucket ─► floor rule ─► DataGeneration
//! ```
//!
//! The roaming badge is not a bucket; the reconciler applies it on top of
//! whatever bucket comes out of here.

use serde::{Deserialize, Serialize};

/// Radio technology as reported with a data-connection change.
///
/// Codes follow the platform telephony numbering; anything not listed
/// becomes [`NetworkType::Other`] and classifies to
/// [`DataGeneration::Unknown`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NetworkType {
    #[default]
    Unknown,
    Gprs,
    Edge,
    Umts,
    Cdma,
    Evdo0,
    EvdoA,
    OneXRtt,
    Hsdpa,
    Hsupa,
    Hspa,
    Iden,
    EvdoB,
    Lte,
    Ehrpd,
    Hspap,
    Gsm,
    TdScdma,
    Iwlan,
    DcHspap,
    Other(i32),
}

impl NetworkType {
    pub fn from_raw(raw: i32) -> Self {
        match raw {
            0 => NetworkType::Unknown,
            1 => NetworkType::Gprs,
            2 => NetworkType::Edge,
            3 => NetworkType::Umts,
            4 => NetworkType::Cdma,
            5 => NetworkType::Evdo0,
            6 => NetworkType::EvdoA,
            7 => NetworkType::OneXRtt,
            8 => NetworkType::Hsdpa,
            9 => NetworkType::Hsupa,
            10 => NetworkType::Hspa,
            11 => NetworkType::Iden,
            12 => NetworkType::EvdoB,
            13 => NetworkType::Lte,
            14 => NetworkType::Ehrpd,
            15 => NetworkType::Hspap,
            16 => NetworkType::Gsm,
            17 => NetworkType::TdScdma,
            18 => NetworkType::Iwlan,
            30 => NetworkType::DcHspap,
            other => NetworkType::Other(other),
        }
    }

    pub fn raw(self) -> i32 {
        match self {
            NetworkType::Unknown => 0,
            NetworkType::Gprs => 1,
            NetworkType::Edge => 2,
            NetworkType::Umts => 3,
            NetworkType::Cdma => 4,
            NetworkType::Evdo0 => 5,
            NetworkType::EvdoA => 6,
            NetworkType::OneXRtt => 7,
            NetworkType::Hsdpa => 8,
            NetworkType::Hsupa => 9,
            NetworkType::Hspa => 10,
            NetworkType::Iden => 11,
            NetworkType::EvdoB => 12,
            NetworkType::Lte => 13,
            NetworkType::Ehrpd => 14,
            NetworkType::Hspap => 15,
            NetworkType::Gsm => 16,
            NetworkType::TdScdma => 17,
            NetworkType::Iwlan => 18,
            NetworkType::DcHspap => 30,
            NetworkType::Other(raw) => raw,
        }
    }

    /// Whether the type maps to a real data bucket.
    ///
    /// Unrecognized types are treated like `Unknown` for the purpose of
    /// deciding whether cellular data is up.
    pub fn is_recognized(self) -> bool {
        !matches!(
            self,
            NetworkType::Unknown
                | NetworkType::Iden
                | NetworkType::Gsm
                | NetworkType::Iwlan
                | NetworkType::Other(_)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            NetworkType::Unknown => "UNKNOWN",
            NetworkType::Gprs => "GPRS",
            NetworkType::Edge => "EDGE",
            NetworkType::Umts => "UMTS",
            NetworkType::Cdma => "CDMA",
            NetworkType::Evdo0 => "CDMA - EvDo rev. 0",
            NetworkType::EvdoA => "CDMA - EvDo rev. A",
            NetworkType::OneXRtt => "CDMA - 1xRTT",
            NetworkType::Hsdpa => "HSDPA",
            NetworkType::Hsupa => "HSUPA",
            NetworkType::Hspa => "HSPA",
            NetworkType::Iden => "iDEN",
            NetworkType::EvdoB => "CDMA - EvDo rev. B",
            NetworkType::Lte => "LTE",
            NetworkType::Ehrpd => "CDMA - eHRPD",
            NetworkType::Hspap => "HSPA+",
            NetworkType::Gsm => "GSM",
            NetworkType::TdScdma => "TD_SCDMA",
            NetworkType::Iwlan => "IWLAN",
            NetworkType::DcHspap => "DC-HSPA+",
            NetworkType::Other(_) => "UNKNOWN",
        }
    }
}

/// Coarse data-technology class driving the data-type badge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataGeneration {
    #[default]
    Unknown,
    G,
    E,
    ThreeG,
    H,
    HPlus,
    DualCarrier,
    OneX,
    Lte,
    FourG,
}

impl DataGeneration {
    pub const ALL: [DataGeneration; 10] = [
        DataGeneration::Unknown,
        DataGeneration::G,
        DataGeneration::E,
        DataGeneration::ThreeG,
        DataGeneration::H,
        DataGeneration::HPlus,
        DataGeneration::DualCarrier,
        DataGeneration::OneX,
        DataGeneration::Lte,
        DataGeneration::FourG,
    ];

    /// Stable index into per-generation tables.
    pub fn index(self) -> usize {
        match self {
            DataGeneration::Unknown => 0,
            DataGeneration::G => 1,
            DataGeneration::E => 2,
            DataGeneration::ThreeG => 3,
            DataGeneration::H => 4,
            DataGeneration::HPlus => 5,
            DataGeneration::DualCarrier => 6,
            DataGeneration::OneX => 7,
            DataGeneration::Lte => 8,
            DataGeneration::FourG => 9,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DataGeneration::Unknown => "unknown",
            DataGeneration::G => "g",
            DataGeneration::E => "e",
            DataGeneration::ThreeG => "3g",
            DataGeneration::H => "h",
            DataGeneration::HPlus => "hp",
            DataGeneration::DualCarrier => "dc",
            DataGeneration::OneX => "1x",
            DataGeneration::Lte => "lte",
            DataGeneration::FourG => "4g",
        }
    }

    /// Buckets lifted to 3G when the "at least 3G" floor is configured.
    pub fn below_floor(self) -> bool {
        matches!(
            self,
            DataGeneration::Unknown | DataGeneration::G | DataGeneration::E | DataGeneration::OneX
        )
    }
}

/// Display toggles that influence classification.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ClassifyOptions {
    pub show_at_least_three_gees: bool,
    pub hspa_data_distinguishable: bool,
    pub show_4g_for_lte: bool,
}

/// Base bucket for a network type, before the floor rule.
pub fn base_generation(network_type: NetworkType, opts: ClassifyOptions) -> DataGeneration {
    match network_type {
        NetworkType::Gprs => DataGeneration::G,
        NetworkType::Edge => DataGeneration::E,
        NetworkType::Umts | NetworkType::TdScdma => DataGeneration::ThreeG,
        NetworkType::Hsdpa | NetworkType::Hsupa | NetworkType::Hspa => {
            if opts.hspa_data_distinguishable {
                DataGeneration::H
            } else {
                DataGeneration::ThreeG
            }
        }
        NetworkType::Hspap => DataGeneration::HPlus,
        NetworkType::DcHspap => DataGeneration::DualCarrier,
        NetworkType::Cdma | NetworkType::OneXRtt => DataGeneration::OneX,
        NetworkType::Evdo0 | NetworkType::EvdoA | NetworkType::EvdoB | NetworkType::Ehrpd => {
            DataGeneration::ThreeG
        }
        NetworkType::Lte => {
            if opts.show_4g_for_lte {
                DataGeneration::FourG
            } else {
                DataGeneration::Lte
            }
        }
        NetworkType::Unknown
        | NetworkType::Iden
        | NetworkType::Gsm
        | NetworkType::Iwlan
        | NetworkType::Other(_) => DataGeneration::Unknown,
    }
}

/// Full classification: base bucket, then the 3G floor.
pub fn classify(network_type: NetworkType, opts: ClassifyOptions) -> DataGeneration {
    let base = base_generation(network_type, opts);
    if opts.show_at_least_three_gees && base.below_floor() {
        DataGeneration::ThreeG
    } else {
        base
    }
}
