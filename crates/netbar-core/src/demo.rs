//! Demo overlay: synthetic inputs for screenshots and UI tests.
//!
//! On enter the overlay clones the real state and config into a shadow
//! copy. Parameters only ever touch the shadow, and the shadow is fed to
//! the same [`reconcile`] as real state.

use serde::Serialize;

use crate::cellular::{
    DataConnectionState, RegState, ServiceState, SignalStrength, SimState,
};
use crate::config::NetworkConfig;
use crate::event::{DemoDataType, DemoParam};
use crate::generation::NetworkType;
use crate::icons::{IconId, SIGNAL_LEVELS, WIFI_LEVEL_COUNT};
use crate::presentation::DerivedPresentation;
use crate::reconcile::reconcile;
use crate::signal::LinkQuality;
use crate::state::NetworkState;

/// Real values captured when the overlay was entered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DemoBaseline {
    pub link_quality: LinkQuality,
    pub wifi_level: usize,
    pub data_type_icon: IconId,
    /// `None` when there was no signal report.
    pub mobile_level: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct DemoOverlay {
    baseline: DemoBaseline,
    state: NetworkState,
    config: NetworkConfig,
    wifi_level: Option<usize>,
    mobile_level: Option<i32>,
}

impl DemoOverlay {
    pub fn enter(state: &NetworkState, config: &NetworkConfig, shown: &DerivedPresentation) -> Self {
        let mobile_level = state.cellular.signal.map(|s| s.level);
        let baseline = DemoBaseline {
            link_quality: state.connectivity.link_quality(),
            wifi_level: state.wifi.level,
            data_type_icon: shown.data_type_icon,
            mobile_level,
        };
        Self {
            wifi_level: Some(state.wifi.level),
            mobile_level,
            baseline,
            state: state.clone(),
            config: config.clone(),
        }
    }

    pub fn baseline(&self) -> &DemoBaseline {
        &self.baseline
    }

    pub fn shadow(&self) -> &NetworkState {
        &self.state
    }

    pub fn apply(&mut self, param: &DemoParam) {
        match param {
            DemoParam::Airplane { show } => {
                self.state.airplane_mode = *show;
            }
            DemoParam::Fully { connected } => {
                self.state.connectivity.link_quality_raw = if *connected { 100 } else { 0 };
            }
            DemoParam::Wifi { show, level } => {
                if let Some(level) = level {
                    self.wifi_level = level.bars().map(|n| n.min(WIFI_LEVEL_COUNT - 1));
                }
                let wifi = &mut self.state.wifi;
                wifi.enabled = *show;
                wifi.connected = *show && self.wifi_level.is_some();
                wifi.level = self.wifi_level.unwrap_or(0);
            }
            DemoParam::Mobile {
                show,
                level,
                data_type,
            } => {
                if let Some(level) = level {
                    self.mobile_level = level.bars().map(|n| n.min(SIGNAL_LEVELS - 1) as i32);
                }
                self.config.device.mobile_feature_present = *show;
                self.config.display.six_bar_enabled = false;
                self.config.display.hide_signal_bars = false;

                let cell = &mut self.state.cellular;
                cell.signal = self.mobile_level.map(|l| SignalStrength::uniform(l, true));
                let roaming = cell.service.as_ref().map(|s| s.roaming).unwrap_or(false);
                cell.service = Some(ServiceState {
                    voice_reg: RegState::InService,
                    data_reg: RegState::InService,
                    roaming,
                    ..ServiceState::default()
                });
                cell.sim = SimState::Ready;
                if let Some(data_type) = data_type {
                    self.apply_data_type(*data_type);
                }
            }
        }
    }

    fn apply_data_type(&mut self, data_type: DemoDataType) {
        let display = &mut self.config.display;
        display.show_at_least_three_gees = false;
        let cell = &mut self.state.cellular;
        let network_type = match data_type {
            DemoDataType::OneX => NetworkType::OneXRtt,
            DemoDataType::ThreeG => NetworkType::Umts,
            DemoDataType::FourG => {
                display.show_4g_for_lte = true;
                NetworkType::Lte
            }
            DemoDataType::E => NetworkType::Edge,
            DemoDataType::G => NetworkType::Gprs,
            DemoDataType::H => {
                display.hspa_data_distinguishable = true;
                NetworkType::Hspa
            }
            DemoDataType::Lte => {
                display.show_4g_for_lte = false;
                NetworkType::Lte
            }
            DemoDataType::Roam => cell.network_type,
            DemoDataType::None => NetworkType::Unknown,
        };
        if let Some(service) = cell.service.as_mut() {
            service.roaming = data_type == DemoDataType::Roam;
        }
        let state = if network_type == NetworkType::Unknown {
            DataConnectionState::Disconnected
        } else {
            DataConnectionState::Connected
        };
        cell.ingest_data_connection_state(state, network_type);
    }

    pub fn presentation(&self) -> DerivedPresentation {
        reconcile(&self.state, &self.config)
    }
}
