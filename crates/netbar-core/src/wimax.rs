//! WiMAX tracker.

use crate::icons::{self, IconId, WIMAX_LEVELS, WIMAX_SIGNAL_STRENGTH};
use crate::signal::{clamp_level, LinkQuality};

/// Raw network-state code for "connected".
pub const WIMAX_STATE_CONNECTED: i32 = 7;
/// Raw extra-state code for "idle".
pub const WIMAX_EXTRA_IDLE: i32 = 6;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WimaxState {
    pub enabled: bool,
    pub connected: bool,
    pub idle: bool,
    pub signal_level: i32,
    pub raw_state: i32,
    pub raw_extra_state: i32,
}

impl WimaxState {
    pub fn ingest_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn ingest_signal_level(&mut self, level: i32) {
        self.signal_level = level;
    }

    pub fn ingest_connection_state(&mut self, connected: bool, idle: bool) {
        self.connected = connected;
        self.idle = idle;
    }

    /// Raw driver codes; connection and idle flags are derived from them.
    pub fn ingest_network_state(&mut self, raw_state: i32, raw_extra_state: i32) {
        self.raw_state = raw_state;
        self.raw_extra_state = raw_extra_state;
        self.ingest_connection_state(
            raw_state == WIMAX_STATE_CONNECTED,
            raw_extra_state == WIMAX_EXTRA_IDLE,
        );
    }

    pub fn level(&self) -> usize {
        clamp_level(self.signal_level, WIMAX_LEVELS)
    }

    pub fn icon(&self, quality: LinkQuality) -> IconId {
        match (self.enabled, self.connected) {
            (false, _) => IconId::NONE,
            (true, false) => icons::WIMAX_DISCONNECTED,
            (true, true) if self.idle => icons::WIMAX_IDLE,
            (true, true) => icons::lookup(&WIMAX_SIGNAL_STRENGTH, quality, self.signal_level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn disabled_has_no_icon() {
        let mut wimax = WimaxState::default();
        wimax.ingest_connection_state(true, false);
        assert!(wimax.icon(LinkQuality::Good).is_none());
    }

    #[test]
    fn enabled_disconnected_icon() {
        let mut wimax = WimaxState::default();
        wimax.ingest_enabled(true);
        assert_eq!(wimax.icon(LinkQuality::Poor), icons::WIMAX_DISCONNECTED);
    }

    #[test]
    fn idle_beats_signal() {
        let mut wimax = WimaxState::default();
        wimax.ingest_enabled(true);
        wimax.ingest_signal_level(3);
        wimax.ingest_connection_state(true, true);
        assert_eq!(wimax.icon(LinkQuality::Good), icons::WIMAX_IDLE);
    }

    #[test]
    fn connected_uses_table_with_clamp() {
        let mut wimax = WimaxState::default();
        wimax.ingest_enabled(true);
        wimax.ingest_network_state(WIMAX_STATE_CONNECTED, 0);
        wimax.ingest_signal_level(42);
        assert!(wimax.connected && !wimax.idle);
        assert_eq!(
            wimax.icon(LinkQuality::Good),
            WIMAX_SIGNAL_STRENGTH[1][WIMAX_LEVELS - 1]
        );
        assert_eq!(wimax.level(), WIMAX_LEVELS - 1);
    }

    #[test]
    fn raw_idle_state() {
        let mut wimax = WimaxState::default();
        wimax.ingest_network_state(WIMAX_STATE_CONNECTED, WIMAX_EXTRA_IDLE);
        assert!(wimax.connected && wimax.idle);
        wimax.ingest_network_state(2, WIMAX_EXTRA_IDLE);
        assert!(!wimax.connected);
    }
}
