//! Signal-level quantization and link-quality classification.
//!
//! Every transport reports strength in its own unit (dBm for Wi-Fi, a
//! radio-computed bar count for cellular, a raw level for WiMAX). Before
//! any of those values indexes an icon table it goes through this module:
//!
//! - [`quantize_rssi`] maps a Wi-Fi RSSI in dBm onto `0..level_count`,
//! - [`clamp_level`] forces any level into a table's valid range,
//! - [`LinkQuality`] thresholds the 0–100 connectivity score into the
//!   binary row selector used by every two-row icon table.

use serde::{Deserialize, Serialize};

/// RSSI at or below which Wi-Fi is reported as zero bars.
pub const MIN_RSSI_DBM: i32 = -100;

/// RSSI at or above which Wi-Fi is reported as full bars.
pub const MAX_RSSI_DBM: i32 = -55;

/// Raw RSSI used before the first RSSI report arrives.
pub const UNKNOWN_RSSI_DBM: i32 = -200;

/// Raw link-quality score strictly above which a link counts as good.
pub const LINK_QUALITY_THRESHOLD: u8 = 50;

/// Map an RSSI reading onto `level_count` evenly spaced buckets.
///
/// Monotonic non-decreasing in `rssi_dbm`; the result is always in
/// `0..level_count` (and `0` for a degenerate `level_count` of 0 or 1).
pub fn quantize_rssi(rssi_dbm: i32, level_count: usize) -> usize {
    if level_count <= 1 {
        return 0;
    }
    let top = level_count - 1;
    if rssi_dbm <= MIN_RSSI_DBM {
        0
    } else if rssi_dbm >= MAX_RSSI_DBM {
        top
    } else {
        let input_range = (MAX_RSSI_DBM - MIN_RSSI_DBM) as i64;
        let output_range = top as i64;
        let scaled = (rssi_dbm - MIN_RSSI_DBM) as i64 * output_range / input_range;
        (scaled as usize).min(top)
    }
}

/// Clamp an arbitrary level into `0..level_count`.
///
/// Negative input maps to 0, oversized input to the top bucket. A zero
/// `level_count` yields 0, so callers must not index an empty table.
pub fn clamp_level(level: i32, level_count: usize) -> usize {
    if level_count == 0 || level <= 0 {
        return 0;
    }
    (level as usize).min(level_count - 1)
}

/// Binary link-quality classification derived from the connectivity score.
///
/// Indexes the outer dimension of every `[[IconId; N]; 2]` table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkQuality {
    #[default]
    Poor,
    Good,
}

impl LinkQuality {
    /// Threshold the raw 0–100 score: strictly above 50 is good.
    pub fn from_raw(raw: u8) -> Self {
        if raw > LINK_QUALITY_THRESHOLD {
            LinkQuality::Good
        } else {
            LinkQuality::Poor
        }
    }

    /// Row index into a two-row icon table.
    pub fn index(self) -> usize {
        match self {
            LinkQuality::Poor => 0,
            LinkQuality::Good => 1,
        }
    }

    /// The 0/1 bit as reported in diagnostics.
    pub fn bit(self) -> u8 {
        self.index() as u8
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            LinkQuality::Poor => "poor",
            LinkQuality::Good => "good",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quantize_floor_and_ceiling() {
        assert_eq!(quantize_rssi(-120, 5), 0);
        assert_eq!(quantize_rssi(MIN_RSSI_DBM, 5), 0);
        assert_eq!(quantize_rssi(MAX_RSSI_DBM, 5), 4);
        assert_eq!(quantize_rssi(-30, 5), 4);
    }

    #[test]
    fn quantize_midrange() {
        // (-70 + 100) * 4 / 45 = 2
        assert_eq!(quantize_rssi(-70, 5), 2);
        // (-90 + 100) * 4 / 45 = 0
        assert_eq!(quantize_rssi(-90, 5), 0);
        // (-60 + 100) * 4 / 45 = 3
        assert_eq!(quantize_rssi(-60, 5), 3);
    }

    #[test]
    fn quantize_unknown_rssi_is_zero() {
        assert_eq!(quantize_rssi(UNKNOWN_RSSI_DBM, 5), 0);
    }

    #[test]
    fn quantize_degenerate_level_count() {
        assert_eq!(quantize_rssi(-40, 0), 0);
        assert_eq!(quantize_rssi(-40, 1), 0);
    }

    #[test]
    fn clamp_into_range() {
        assert_eq!(clamp_level(-3, 5), 0);
        assert_eq!(clamp_level(0, 5), 0);
        assert_eq!(clamp_level(4, 5), 4);
        assert_eq!(clamp_level(9, 5), 4);
        assert_eq!(clamp_level(3, 0), 0);
    }

    #[test]
    fn link_quality_threshold_is_strict() {
        assert_eq!(LinkQuality::from_raw(49), LinkQuality::Poor);
        assert_eq!(LinkQuality::from_raw(50), LinkQuality::Poor);
        assert_eq!(LinkQuality::from_raw(51), LinkQuality::Good);
        assert_eq!(LinkQuality::from_raw(100).bit(), 1);
        assert_eq!(LinkQuality::from_raw(0).bit(), 0);
    }
}
