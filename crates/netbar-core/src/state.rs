//! The full raw-state snapshot the reconciler reads.

use crate::cellular::CellularState;
use crate::connectivity::ConnectivityState;
use crate::wifi::WifiState;
use crate::wimax::WimaxState;

/// Every tracker plus the device-wide flags.
///
/// Owned by the controller; each field is mutated only by its own
/// ingestion operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NetworkState {
    pub cellular: CellularState,
    pub wifi: WifiState,
    pub wimax: WimaxState,
    pub connectivity: ConnectivityState,
    pub airplane_mode: bool,
    pub locale: String,
}

impl NetworkState {
    pub fn new(stored_ssids: usize) -> Self {
        Self {
            wifi: WifiState::with_capacity(stored_ssids),
            ..Self::default()
        }
    }
}
