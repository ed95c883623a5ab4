//! Wi-Fi tracker: enable flag, association, RSSI level and the
//! recent-SSID memory behind connection notices.

use std::collections::{BTreeMap, VecDeque};

use serde::{Deserialize, Serialize};

use crate::icons::{ActivityDirection, WIFI_LEVEL_COUNT};
use crate::signal::{quantize_rssi, UNKNOWN_RSSI_DBM};

/// Payload of an association change.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WifiTransition {
    pub connected: bool,
    pub ssid: Option<String>,
    /// Current association's network id, used when `ssid` is absent.
    pub network_id: Option<i32>,
    pub rssi: Option<i32>,
}

/// One saved network, as reported by the configured-networks feed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConfiguredNetwork {
    pub network_id: i32,
    pub ssid: String,
}

impl ConfiguredNetwork {
    pub fn new(network_id: i32, ssid: impl Into<String>) -> Self {
        Self {
            network_id,
            ssid: ssid.into(),
        }
    }
}

/// A fresh association with a resolved SSID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WifiConnection {
    pub ssid: String,
    /// The SSID was already in the recent-SSID memory.
    pub restored: bool,
}

/// Bounded FIFO of recently connected SSIDs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecentSsids {
    capacity: usize,
    entries: VecDeque<String>,
}

impl RecentSsids {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            entries: VecDeque::with_capacity(capacity.max(1)),
        }
    }

    /// Classify `ssid`, then remember it if it is new. A new SSID on a
    /// full store evicts the oldest entry first.
    pub fn record(&mut self, ssid: &str) -> bool {
        let restored = self.contains(ssid);
        if !restored {
            if self.entries.len() >= self.capacity {
                self.entries.pop_front();
            }
            self.entries.push_back(ssid.to_string());
        }
        restored
    }

    pub fn contains(&self, ssid: &str) -> bool {
        self.entries.iter().any(|s| s == ssid)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Shrinks (dropping oldest entries) or grows the store.
    pub fn set_capacity(&mut self, capacity: usize) {
        self.capacity = capacity.max(1);
        while self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(String::as_str)
    }
}

impl Default for RecentSsids {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_STORED_SSIDS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WifiState {
    pub enabled: bool,
    pub connected: bool,
    pub rssi: i32,
    pub level: usize,
    pub ssid: Option<String>,
    pub activity: ActivityDirection,
    pub configured_networks: BTreeMap<i32, String>,
    pub recent: RecentSsids,
}

impl Default for WifiState {
    fn default() -> Self {
        Self {
            enabled: false,
            connected: false,
            rssi: UNKNOWN_RSSI_DBM,
            level: 0,
            ssid: None,
            activity: ActivityDirection::None,
            configured_networks: BTreeMap::new(),
            recent: RecentSsids::default(),
        }
    }
}

impl WifiState {
    pub fn with_capacity(stored_ssids: usize) -> Self {
        Self {
            recent: RecentSsids::new(stored_ssids),
            ..Self::default()
        }
    }

    pub fn ingest_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn ingest_rssi(&mut self, rssi: i32) {
        self.rssi = rssi;
        self.level = quantize_rssi(rssi, WIFI_LEVEL_COUNT);
    }

    pub fn ingest_activity(&mut self, direction: ActivityDirection) {
        self.activity = direction;
    }

    /// Replace the saved-network table. A later entry for the same id wins.
    pub fn ingest_configured_networks(
        &mut self,
        networks: impl IntoIterator<Item = ConfiguredNetwork>,
    ) {
        self.configured_networks = networks
            .into_iter()
            .map(|n| (n.network_id, n.ssid))
            .collect();
    }

    /// Apply an association change. Returns the classified connection on
    /// a disconnected-to-connected edge whose SSID could be resolved.
    pub fn ingest_connection_transition(
        &mut self,
        transition: WifiTransition,
    ) -> Option<WifiConnection> {
        let was_connected = self.connected;
        self.connected = transition.connected;

        if !self.connected {
            self.ssid = None;
            return None;
        }
        if was_connected {
            return None;
        }

        if let Some(rssi) = transition.rssi {
            self.ingest_rssi(rssi);
        }
        self.ssid = self.resolve_ssid(&transition);
        let ssid = self.ssid.clone()?;
        let restored = self.recent.record(&ssid);
        Some(WifiConnection { ssid, restored })
    }

    fn resolve_ssid(&self, transition: &WifiTransition) -> Option<String> {
        if let Some(ssid) = transition.ssid.as_ref().filter(|s| !s.is_empty()) {
            return Some(ssid.clone());
        }
        transition
            .network_id
            .and_then(|id| self.configured_networks.get(&id))
            .cloned()
    }
}

/// Strip one leading and one trailing double quote from an SSID. Each side
/// is handled on its own, so unbalanced quotes are removed too.
pub fn strip_quotes(ssid: &str) -> &str {
    let ssid = ssid.strip_prefix('"').unwrap_or(ssid);
    ssid.strip_suffix('"').unwrap_or(ssid)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn connect(ssid: &str) -> WifiTransition {
        WifiTransition {
            connected: true,
            ssid: Some(ssid.to_string()),
            ..WifiTransition::default()
        }
    }

    fn disconnect() -> WifiTransition {
        WifiTransition::default()
    }

    #[test]
    fn ssid_from_payload_wins() {
        let mut wifi = WifiState::default();
        wifi.ingest_configured_networks([ConfiguredNetwork::new(4, "\"Home\"")]);
        let conn = wifi
            .ingest_connection_transition(WifiTransition {
                connected: true,
                ssid: Some("Cafe".into()),
                network_id: Some(4),
                rssi: None,
            })
            .unwrap();
        assert_eq!(conn.ssid, "Cafe");
        assert!(!conn.restored);
    }

    #[test]
    fn ssid_from_configured_networks() {
        let mut wifi = WifiState::default();
        wifi.ingest_configured_networks([ConfiguredNetwork::new(4, "\"Home\"")]);
        let conn = wifi
            .ingest_connection_transition(WifiTransition {
                connected: true,
                ssid: None,
                network_id: Some(4),
                rssi: Some(-60),
            })
            .unwrap();
        assert_eq!(conn.ssid, "\"Home\"");
        assert_eq!(wifi.level, 3);
    }

    #[test]
    fn unresolved_ssid_is_none() {
        let mut wifi = WifiState::default();
        let conn = wifi.ingest_connection_transition(WifiTransition {
            connected: true,
            network_id: Some(9),
            ..WifiTransition::default()
        });
        assert!(conn.is_none());
        assert!(wifi.connected);
        assert!(wifi.ssid.is_none());
    }

    #[test]
    fn repeated_connected_reports_do_not_reclassify() {
        let mut wifi = WifiState::default();
        assert!(wifi.ingest_connection_transition(connect("A")).is_some());
        assert!(wifi.ingest_connection_transition(connect("A")).is_none());
        assert_eq!(wifi.recent.len(), 1);
    }

    #[test]
    fn disconnect_clears_ssid() {
        let mut wifi = WifiState::default();
        wifi.ingest_connection_transition(connect("A"));
        wifi.ingest_connection_transition(disconnect());
        assert!(!wifi.connected);
        assert!(wifi.ssid.is_none());
    }

    #[test]
    fn reconnect_is_restored() {
        let mut wifi = WifiState::default();
        wifi.ingest_connection_transition(connect("A"));
        wifi.ingest_connection_transition(disconnect());
        let conn = wifi.ingest_connection_transition(connect("A")).unwrap();
        assert!(conn.restored);
        assert_eq!(wifi.recent.len(), 1);
    }

    #[test]
    fn full_store_evicts_oldest() {
        let mut recent = RecentSsids::new(3);
        for ssid in ["a", "b", "c"] {
            assert!(!recent.record(ssid));
        }
        assert!(!recent.record("d"));
        assert_eq!(recent.len(), 3);
        assert!(!recent.contains("a"));
        assert_eq!(recent.iter().collect::<Vec<_>>(), vec!["b", "c", "d"]);
    }

    #[test]
    fn restored_on_full_store_keeps_entries() {
        let mut recent = RecentSsids::new(2);
        recent.record("a");
        recent.record("b");
        assert!(recent.record("a"));
        assert_eq!(recent.iter().collect::<Vec<_>>(), vec!["a", "b"]);
    }

    #[test]
    fn shrinking_capacity_drops_oldest() {
        let mut recent = RecentSsids::new(4);
        for ssid in ["a", "b", "c", "d"] {
            recent.record(ssid);
        }
        recent.set_capacity(2);
        assert_eq!(recent.iter().collect::<Vec<_>>(), vec!["c", "d"]);
    }

    #[test]
    fn quotes_are_stripped_once_per_side() {
        assert_eq!(strip_quotes("\"Home\""), "Home");
        assert_eq!(strip_quotes("Home"), "Home");
        assert_eq!(strip_quotes("\"Half"), "Half");
        assert_eq!(strip_quotes("Half\""), "Half");
        assert_eq!(strip_quotes("\"\"Twice\"\""), "\"Twice\"");
        assert_eq!(strip_quotes("\"\""), "");
        assert_eq!(strip_quotes("\""), "");
    }
}
