//! Pure derivation of a [`DerivedPresentation`] from raw state and config.
//!
//! Combined icon/label precedence, later steps overriding earlier ones:
//!
//! ```text
//!  WiMAX connected ─► else mobile data ─► Wi-Fi ─► BT tether ─► Ethernet (label)
//!                                                                   │
//!        airplane suppression  ◄── or ──►  nothing connected ◄──────┘
//!                                                                   │
//!                                               custom operator label
//! ```
//!
//! Airplane suppression is evaluated after the transport rules so that it
//! wins over all of them; Wi-Fi survives it.

use crate::cellular::{CellularState, DataConnectionState};
use crate::config::{DisplayConfig, LabelConfig, NetworkConfig};
use crate::generation::{classify, DataGeneration};
use crate::icons::{
    self, generation_icons_for, IconId, DATA_SIGNAL_STRENGTH, MOBILE_ACTIVITY,
    MOBILE_ACTIVITY_NEUTRAL, QS_TELEPHONY_SIGNAL_STRENGTH, QS_TELEPHONY_SIGNAL_STRENGTH_SIX_BAR,
    QS_WIFI_SIGNAL_STRENGTH, SIGNAL_LEVELS, SIX_BAR_LEVELS, TELEPHONY_SIGNAL_STRENGTH,
    TELEPHONY_SIGNAL_STRENGTH_ROAMING, TELEPHONY_SIGNAL_STRENGTH_SIX_BAR, WIFI_ACTIVITY,
    WIFI_ACTIVITY_NEUTRAL, WIFI_SIGNAL_STRENGTH,
};
use crate::presentation::{
    CarrierCandidates, ClusterView, CombinedSource, DerivedPresentation, MobileIndicators,
    MobileSignal, SignalBundle, WifiIndicators, WifiSignal,
};
use crate::signal::{clamp_level, LinkQuality};
use crate::state::NetworkState;
use crate::wifi::{strip_quotes, WifiState};

struct PhoneSignal {
    phone: IconId,
    qs_phone: IconId,
    data: IconId,
    description: String,
}

fn phone_signal(
    cell: &CellularState,
    display: &DisplayConfig,
    labels: &LabelConfig,
    quality: LinkQuality,
    roaming: bool,
) -> PhoneSignal {
    let hide = |id: IconId| {
        if display.hide_signal_bars {
            IconId::NONE
        } else {
            id
        }
    };

    let signal = match cell.signal {
        Some(signal) if cell.has_service() => signal,
        _ => {
            let (null, qs_null) = if display.six_bar_enabled {
                (icons::PHONE_SIGNAL_NULL_SIX_BAR, icons::QS_PHONE_NO_SIGNAL_SIX_BAR)
            } else {
                (icons::PHONE_SIGNAL_NULL, icons::QS_PHONE_NO_SIGNAL)
            };
            return PhoneSignal {
                phone: hide(null),
                qs_phone: qs_null,
                data: hide(null),
                description: labels.phone_signal(0),
            };
        }
    };

    let cdma_rssi = cell.is_cdma() && display.always_show_cdma_rssi;
    let level = match (cdma_rssi, display.six_bar_enabled) {
        (true, true) => signal.six_bar_cdma_level,
        (true, false) => signal.cdma_level,
        (false, true) => signal.six_bar_level,
        (false, false) => signal.level,
    };

    if display.six_bar_enabled {
        let phone = icons::lookup(&TELEPHONY_SIGNAL_STRENGTH_SIX_BAR, quality, level);
        PhoneSignal {
            phone: hide(phone),
            qs_phone: icons::lookup(&QS_TELEPHONY_SIGNAL_STRENGTH_SIX_BAR, quality, level),
            data: hide(phone),
            description: labels.phone_signal(clamp_level(level, SIX_BAR_LEVELS)),
        }
    } else {
        let table = if roaming {
            &TELEPHONY_SIGNAL_STRENGTH_ROAMING
        } else {
            &TELEPHONY_SIGNAL_STRENGTH
        };
        PhoneSignal {
            phone: hide(icons::lookup(table, quality, level)),
            qs_phone: icons::lookup(&QS_TELEPHONY_SIGNAL_STRENGTH, quality, level),
            data: hide(icons::lookup(&DATA_SIGNAL_STRENGTH, quality, level)),
            description: labels.phone_signal(clamp_level(level, SIGNAL_LEVELS)),
        }
    }
}

fn wifi_icons(
    wifi: &WifiState,
    stacked: bool,
    labels: &LabelConfig,
    quality: LinkQuality,
) -> (IconId, IconId, String) {
    if wifi.connected {
        (
            icons::lookup(&WIFI_SIGNAL_STRENGTH, quality, wifi.level as i32),
            icons::lookup(&QS_WIFI_SIGNAL_STRENGTH, quality, wifi.level as i32),
            labels.wifi_signal(wifi.level),
        )
    } else if stacked || !wifi.enabled {
        (IconId::NONE, IconId::NONE, labels.no_wifi.clone())
    } else {
        (
            icons::WIFI_SIGNAL_NULL,
            icons::QS_WIFI_NO_NETWORK,
            labels.no_wifi.clone(),
        )
    }
}

/// Data is considered up for a recognized technology with a usable SIM.
pub fn data_connected(cell: &CellularState) -> bool {
    cell.network_type.is_recognized()
        && cell.sim_usable()
        && cell.data_state == DataConnectionState::Connected
}

/// Derive the full presentation. Pure: identical inputs give identical
/// output, and nothing here can fail.
pub fn reconcile(state: &NetworkState, config: &NetworkConfig) -> DerivedPresentation {
    let device = &config.device;
    let display = &config.display;
    let labels = &config.labels;
    let cell = &state.cellular;
    let wifi = &state.wifi;
    let conn = &state.connectivity;

    let quality = conn.link_quality();
    let q = quality.index();
    let mobile_feature = device.mobile_feature_present;
    let emergency_only = display.emergency_only_allowed && cell.is_emergency_only();
    let roaming = cell.is_roaming(device.combined_signal);
    let wimax_active = device.wimax_supported && state.wimax.enabled && state.wimax.connected;
    let bluetooth_tethered = conn.bluetooth_tethered();
    let ethernet_active = conn.ethernet_active();
    let network_name = cell
        .network_name
        .render(&labels.network_name_separator, &labels.network_name_default);

    let mut p = DerivedPresentation {
        airplane_mode: state.airplane_mode,
        locale: state.locale.clone(),
        emergency_only,
        ..DerivedPresentation::default()
    };

    // ── Cellular signal ──
    let signal = phone_signal(cell, display, labels, quality, roaming);
    p.phone_signal_icon = signal.phone;
    p.qs_phone_signal_icon = signal.qs_phone;
    p.data_signal_icon = signal.data;
    p.descriptions.phone_signal = signal.description;

    // ── Generation and data type ──
    p.generation = if wimax_active {
        DataGeneration::FourG
    } else {
        classify(cell.network_type, config.classify_options())
    };
    let generation_icons = generation_icons_for(p.generation);
    p.data_type_icon = generation_icons.data_type;
    p.qs_data_type_icon = generation_icons.qs_data_type[q];
    p.descriptions.data_type = labels.data_type(p.generation);
    if roaming {
        p.data_type_icon = icons::DATA_TYPE_ROAMING;
        p.qs_data_type_icon = icons::QS_DATA_TYPE_ROAMING[q];
    }

    // ── Data direction ──
    p.data_connected = data_connected(cell);
    p.data_direction_icon = if p.data_connected {
        generation_icons.activity[q][cell.activity.column()]
    } else if cell.network_type.is_recognized() && !cell.sim_usable() {
        icons::NO_SIM
    } else {
        IconId::NONE
    };

    // ── Wi-Fi and WiMAX icons ──
    let (wifi_icon, qs_wifi_icon, wifi_description) =
        wifi_icons(wifi, device.data_and_wifi_stacked, labels, quality);
    p.wifi_icon = wifi_icon;
    p.qs_wifi_icon = qs_wifi_icon;
    p.descriptions.wifi = wifi_description;

    if device.wimax_supported {
        p.wimax_icon = state.wimax.icon(quality);
        p.descriptions.wimax = if state.wimax.enabled && state.wimax.connected {
            labels.wimax_signal(state.wimax.level())
        } else {
            labels.no_wimax.clone()
        };
    }

    // ── Mobile label and carrier candidates ──
    if !mobile_feature {
        p.phone_signal_icon = IconId::NONE;
        p.data_signal_icon = IconId::NONE;
        p.qs_phone_signal_icon = IconId::NONE;
    } else if p.data_connected {
        p.mobile_label = network_name.clone();
    } else if conn.connected || emergency_only {
        if cell.has_service() || wimax_active || emergency_only {
            p.mobile_label = network_name.clone();
            p.carrier = CarrierCandidates {
                number: cell.operator_numeric().map(str::to_string),
                name: Some(network_name.clone()),
            };
        }
    } else {
        p.mobile_label = labels.disconnected.clone();
        p.carrier = CarrierCandidates {
            number: cell.operator_numeric().map(str::to_string),
            name: Some(network_name.clone()),
        };
    }

    if mobile_feature && p.data_connected {
        p.mobile_activity_icon = if display.direction_arrows_enabled {
            MOBILE_ACTIVITY[cell.activity.column()]
        } else {
            MOBILE_ACTIVITY_NEUTRAL
        };
    }

    // ── Transport precedence ──
    if wimax_active {
        p.combined_icon = if display.always_show_cdma_rssi {
            p.phone_signal_icon
        } else {
            p.wimax_icon
        };
        p.combined_activity_icon = p.mobile_activity_icon;
        p.combined_label = network_name.clone();
        p.descriptions.combined_signal = p.descriptions.wimax.clone();
        p.combined_source = CombinedSource::Wimax;
    } else if mobile_feature && p.data_connected {
        p.combined_icon = p.data_signal_icon;
        p.combined_activity_icon = p.mobile_activity_icon;
        p.combined_label = p.mobile_label.clone();
        p.descriptions.combined_signal = p.descriptions.data_type.clone();
        p.combined_source = CombinedSource::MobileData;
    }

    if wifi.connected {
        match wifi.ssid.as_deref().map(strip_quotes).filter(|s| !s.is_empty()) {
            None => {
                p.wifi_label = labels.wifi_no_ssid.clone();
                p.wifi_activity_icon = IconId::NONE;
            }
            Some(ssid) => {
                p.wifi_label = ssid.to_string();
                p.wifi_activity_icon = if display.direction_arrows_enabled {
                    WIFI_ACTIVITY[wifi.activity.column()]
                } else {
                    WIFI_ACTIVITY_NEUTRAL
                };
            }
        }
        p.combined_icon = p.wifi_icon;
        p.combined_activity_icon = p.wifi_activity_icon;
        p.combined_label = p.wifi_label.clone();
        p.descriptions.combined_signal = p.descriptions.wifi.clone();
        p.combined_source = CombinedSource::Wifi;
    } else if !mobile_feature {
        p.wifi_label = labels.disconnected.clone();
    }

    if bluetooth_tethered {
        p.combined_icon = icons::BLUETOOTH_TETHER;
        p.combined_label = labels.bluetooth_tethered.clone();
        p.descriptions.combined_signal = labels.bluetooth_tether_description.clone();
        p.combined_source = CombinedSource::BluetoothTether;
    }

    if ethernet_active {
        p.combined_label = labels.ethernet.clone();
        p.combined_source = CombinedSource::Ethernet;
    }

    if state.airplane_mode {
        p.airplane_icon = icons::FLIGHT_MODE;
    }
    let airplane_suppresses = state.airplane_mode
        && (cell.service.is_none() || (!cell.has_service() && !emergency_only));
    let nothing_connected = !p.data_connected
        && !wifi.connected
        && !bluetooth_tethered
        && !wimax_active
        && !ethernet_active;

    if airplane_suppresses {
        p.descriptions.phone_signal = labels.airplane_mode.clone();
        p.phone_signal_icon = IconId::NONE;
        p.data_signal_icon = IconId::NONE;
        p.data_type_icon = IconId::NONE;
        p.qs_data_type_icon = IconId::NONE;
        p.qs_phone_signal_icon = IconId::NONE;

        if wifi.connected {
            p.mobile_label = String::new();
        } else {
            p.wifi_label = if mobile_feature {
                String::new()
            } else {
                labels.disconnected.clone()
            };
            p.combined_label = labels.disconnected.clone();
            p.combined_icon = p.data_signal_icon;
            p.descriptions.combined_signal = p.descriptions.phone_signal.clone();
            p.combined_source = CombinedSource::Airplane;
        }
    } else if nothing_connected {
        p.combined_label = labels.disconnected.clone();
        if mobile_feature {
            p.combined_icon = p.data_signal_icon;
            p.descriptions.combined_signal = p.descriptions.data_type.clone();
        } else {
            p.combined_icon = p.wifi_icon;
            p.descriptions.combined_signal = p.descriptions.wifi.clone();
        }
        p.data_type_icon = IconId::NONE;
        p.qs_data_type_icon = IconId::NONE;
        if roaming {
            p.data_type_icon = icons::DATA_TYPE_ROAMING;
            p.qs_data_type_icon = icons::QS_DATA_TYPE_ROAMING[q];
        }
        p.combined_source = CombinedSource::Disconnected;
    }

    if let Some(custom) = display
        .custom_operator_label
        .as_deref()
        .filter(|s| !s.is_empty())
    {
        p.combined_label = custom.to_string();
        p.mobile_label = custom.to_string();
    }

    p.cluster = cluster_view(&p, state, config, wimax_active);
    p.signals = signal_bundle(&p, state, config, wimax_active, &network_name);
    p
}

fn cluster_view(
    p: &DerivedPresentation,
    state: &NetworkState,
    config: &NetworkConfig,
    wimax_active: bool,
) -> ClusterView {
    let mobile_feature = config.device.mobile_feature_present;
    let wifi = WifiIndicators {
        visible: state.wifi.enabled && (state.wifi.connected || !mobile_feature),
        strength: p.wifi_icon,
        activity: p.wifi_activity_icon,
        description: p.descriptions.wifi.clone(),
    };

    let mobile = if wimax_active {
        MobileIndicators {
            visible: true,
            strength: if config.display.always_show_cdma_rssi {
                p.phone_signal_icon
            } else {
                p.wimax_icon
            },
            activity: p.mobile_activity_icon,
            data_type: p.data_type_icon,
            strength_description: p.descriptions.wimax.clone(),
            data_type_description: p.descriptions.data_type.clone(),
        }
    } else {
        MobileIndicators {
            visible: mobile_feature,
            strength: if config.device.show_phone_rssi_for_data {
                p.phone_signal_icon
            } else {
                p.data_signal_icon
            },
            activity: p.mobile_activity_icon,
            data_type: p.data_type_icon,
            strength_description: p.descriptions.phone_signal.clone(),
            data_type_description: p.descriptions.data_type.clone(),
        }
    };

    ClusterView {
        wifi,
        mobile,
        airplane_mode: p.airplane_mode,
        airplane_icon: p.airplane_icon,
    }
}

fn signal_bundle(
    p: &DerivedPresentation,
    state: &NetworkState,
    config: &NetworkConfig,
    wimax_active: bool,
    network_name: &str,
) -> SignalBundle {
    let wifi_state = &state.wifi;
    let wifi_enabled = wifi_state.enabled
        && (wifi_state.connected || !config.device.mobile_feature_present);
    let ssid = wifi_state
        .ssid
        .as_deref()
        .filter(|_| wifi_enabled)
        .map(strip_quotes)
        .filter(|s| !s.is_empty())
        .map(str::to_string);
    let wifi_activity = wifi_state.activity;
    let wifi = WifiSignal {
        enabled: wifi_enabled,
        qs_icon: p.qs_wifi_icon,
        activity_in: ssid.is_some() && wifi_activity.has_in(),
        activity_out: ssid.is_some() && wifi_activity.has_out(),
        description: p.descriptions.wifi.clone(),
        ssid,
    };

    let mobile_activity = state.cellular.activity;
    let (enabled, name) = if p.emergency_only {
        (false, None)
    } else if wimax_active {
        (true, Some(network_name.to_string()))
    } else {
        (
            config.device.mobile_feature_present,
            Some(network_name.to_string()),
        )
    };
    let mobile = MobileSignal {
        enabled,
        qs_icon: p.qs_phone_signal_icon,
        signal_description: p.descriptions.phone_signal.clone(),
        qs_data_type: p.qs_data_type_icon,
        activity_in: p.data_connected && mobile_activity.has_in(),
        activity_out: p.data_connected && mobile_activity.has_out(),
        data_type_description: p.descriptions.data_type.clone(),
        network_name: name,
    };

    SignalBundle {
        wifi,
        mobile,
        airplane_mode: p.airplane_mode,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cellular::{NetworkName, RegState, ServiceState, SignalStrength, SimState};
    use crate::connectivity::{ConnectivitySnapshot, TransportType};
    use crate::generation::NetworkType;
    use crate::icons::ActivityDirection;
    use crate::wifi::{ConfiguredNetwork, WifiTransition};

    fn in_service(state: &mut NetworkState) {
        state.cellular.ingest_service_state(ServiceState {
            voice_reg: RegState::InService,
            data_reg: RegState::InService,
            operator_numeric: Some("310260".into()),
            ..ServiceState::default()
        });
        state
            .cellular
            .ingest_signal_strength(Some(SignalStrength::uniform(3, true)));
        state.cellular.ingest_network_name(NetworkName {
            show_plmn: true,
            plmn: Some("Carrier".into()),
            ..NetworkName::default()
        });
    }

    fn data_up(state: &mut NetworkState, network_type: NetworkType) {
        in_service(state);
        state
            .cellular
            .ingest_data_connection_state(DataConnectionState::Connected, network_type);
        state.connectivity.ingest_snapshot(ConnectivitySnapshot {
            connected: true,
            transport: TransportType::Mobile,
            link_quality: 100,
        });
    }

    fn wifi_up(state: &mut NetworkState, ssid: &str, rssi: i32) {
        state.wifi.ingest_enabled(true);
        state.wifi.ingest_connection_transition(WifiTransition {
            connected: true,
            ssid: Some(ssid.to_string()),
            network_id: None,
            rssi: Some(rssi),
        });
    }

    #[test]
    fn default_state_is_disconnected() {
        let p = reconcile(&NetworkState::default(), &NetworkConfig::default());
        assert_eq!(p.combined_source, CombinedSource::Disconnected);
        assert_eq!(p.combined_label, "No internet connection");
        assert_eq!(p.mobile_label, "No internet connection");
        assert_eq!(p.phone_signal_icon, icons::PHONE_SIGNAL_NULL);
        assert_eq!(p.combined_icon, icons::PHONE_SIGNAL_NULL);
        assert!(p.data_type_icon.is_none());
        assert_eq!(p.carrier.name.as_deref(), Some("No service"));
    }

    #[test]
    fn mobile_data_wins_without_wifi() {
        let mut state = NetworkState::default();
        data_up(&mut state, NetworkType::Hspap);
        let p = reconcile(&state, &NetworkConfig::default());
        assert_eq!(p.combined_source, CombinedSource::MobileData);
        assert_eq!(p.combined_label, "Carrier");
        assert_eq!(p.combined_icon, DATA_SIGNAL_STRENGTH[1][3]);
        assert_eq!(p.generation, DataGeneration::HPlus);
        assert_eq!(p.combined_activity_icon, MOBILE_ACTIVITY_NEUTRAL);
        assert_eq!(p.descriptions.combined_signal, "HSPA+");
        assert_eq!(p.carrier, CarrierCandidates::default());
    }

    #[test]
    fn direction_arrows_follow_activity() {
        let mut state = NetworkState::default();
        data_up(&mut state, NetworkType::Umts);
        state.cellular.ingest_data_activity(ActivityDirection::InOut);
        let mut config = NetworkConfig::default();
        config.display.direction_arrows_enabled = true;
        let p = reconcile(&state, &config);
        assert_eq!(p.combined_activity_icon, MOBILE_ACTIVITY[3]);
        assert_eq!(
            p.data_direction_icon,
            generation_icons_for(DataGeneration::ThreeG).activity[1][3]
        );
        assert!(p.signals.mobile.activity_in && p.signals.mobile.activity_out);
    }

    #[test]
    fn wifi_overrides_mobile_data() {
        let mut state = NetworkState::default();
        data_up(&mut state, NetworkType::Lte);
        wifi_up(&mut state, "\"Home\"", -60);
        let p = reconcile(&state, &NetworkConfig::default());
        assert_eq!(p.combined_source, CombinedSource::Wifi);
        assert_eq!(p.combined_label, "Home");
        assert_eq!(p.wifi_label, "Home");
        assert_eq!(p.combined_icon, p.wifi_icon);
        assert_eq!(p.wifi_icon, WIFI_SIGNAL_STRENGTH[1][3]);
        assert_eq!(p.combined_activity_icon, WIFI_ACTIVITY_NEUTRAL);
        assert_eq!(p.mobile_label, "Carrier");
    }

    #[test]
    fn wifi_without_ssid_uses_fallback_label() {
        let mut state = NetworkState::default();
        state.wifi.ingest_enabled(true);
        state.wifi.ingest_connection_transition(WifiTransition {
            connected: true,
            ..WifiTransition::default()
        });
        let p = reconcile(&state, &NetworkConfig::default());
        assert_eq!(p.wifi_label, "Unnamed network");
        assert!(p.wifi_activity_icon.is_none());
        assert!(p.signals.wifi.ssid.is_none());
    }

    #[test]
    fn empty_saved_ssid_uses_fallback_label() {
        let mut state = NetworkState::default();
        state.wifi.ingest_enabled(true);
        state
            .wifi
            .ingest_configured_networks([ConfiguredNetwork::new(5, "\"\"")]);
        state.wifi.ingest_connection_transition(WifiTransition {
            connected: true,
            network_id: Some(5),
            ..WifiTransition::default()
        });
        let p = reconcile(&state, &NetworkConfig::default());
        assert_eq!(p.wifi_label, "Unnamed network");
        assert_eq!(p.combined_label, "Unnamed network");
        assert!(p.signals.wifi.ssid.is_none());
    }

    #[test]
    fn bluetooth_tether_overrides_wifi() {
        let mut state = NetworkState::default();
        wifi_up(&mut state, "Home", -60);
        state.connectivity.ingest_snapshot(ConnectivitySnapshot {
            connected: true,
            transport: TransportType::Bluetooth,
            link_quality: 100,
        });
        let p = reconcile(&state, &NetworkConfig::default());
        assert_eq!(p.combined_source, CombinedSource::BluetoothTether);
        assert_eq!(p.combined_icon, icons::BLUETOOTH_TETHER);
        assert_eq!(p.combined_label, "Bluetooth tethered");
        assert_eq!(p.wifi_label, "Home");
    }

    #[test]
    fn ethernet_overrides_label_only() {
        let mut state = NetworkState::default();
        wifi_up(&mut state, "Home", -60);
        state.connectivity.ingest_snapshot(ConnectivitySnapshot {
            connected: true,
            transport: TransportType::Ethernet,
            link_quality: 100,
        });
        let p = reconcile(&state, &NetworkConfig::default());
        assert_eq!(p.combined_label, "Ethernet");
        assert_eq!(p.combined_icon, p.wifi_icon);
        assert!(!p.combined_icon.is_none());
    }

    #[test]
    fn wimax_precedes_mobile_data() {
        let mut state = NetworkState::default();
        data_up(&mut state, NetworkType::Edge);
        state.wimax.ingest_enabled(true);
        state.wimax.ingest_connection_state(true, false);
        state.wimax.ingest_signal_level(2);
        let mut config = NetworkConfig::default();
        config.device.wimax_supported = true;
        let p = reconcile(&state, &config);
        assert_eq!(p.combined_source, CombinedSource::Wimax);
        assert_eq!(p.combined_icon, icons::WIMAX_SIGNAL_STRENGTH[1][2]);
        assert_eq!(p.generation, DataGeneration::FourG);
        assert_eq!(
            p.data_type_icon,
            generation_icons_for(DataGeneration::FourG).data_type
        );
        assert_eq!(p.combined_label, "Carrier");
        assert!(p.cluster.mobile.visible);
        assert_eq!(p.cluster.mobile.strength, p.wimax_icon);

        config.display.always_show_cdma_rssi = true;
        let p = reconcile(&state, &config);
        assert_eq!(p.combined_icon, p.phone_signal_icon);
    }

    #[test]
    fn wimax_ignored_when_unsupported() {
        let mut state = NetworkState::default();
        state.wimax.ingest_enabled(true);
        state.wimax.ingest_connection_state(true, false);
        let p = reconcile(&state, &NetworkConfig::default());
        assert!(p.wimax_icon.is_none());
        assert_eq!(p.combined_source, CombinedSource::Disconnected);
    }

    #[test]
    fn airplane_suppresses_radio_icons() {
        let mut state = NetworkState::default();
        state
            .cellular
            .ingest_signal_strength(Some(SignalStrength::uniform(4, true)));
        state.airplane_mode = true;
        let p = reconcile(&state, &NetworkConfig::default());
        assert_eq!(p.combined_source, CombinedSource::Airplane);
        assert!(p.phone_signal_icon.is_none());
        assert!(p.data_signal_icon.is_none());
        assert!(p.data_type_icon.is_none());
        assert!(p.combined_icon.is_none());
        assert_eq!(p.airplane_icon, icons::FLIGHT_MODE);
        assert_eq!(p.descriptions.phone_signal, "Airplane mode.");
        assert_eq!(p.combined_label, "No internet connection");
        assert_eq!(p.wifi_label, "");
    }

    #[test]
    fn airplane_keeps_connected_wifi() {
        let mut state = NetworkState::default();
        wifi_up(&mut state, "Plane", -50);
        state.airplane_mode = true;
        let p = reconcile(&state, &NetworkConfig::default());
        assert_eq!(p.combined_source, CombinedSource::Wifi);
        assert_eq!(p.combined_label, "Plane");
        assert_eq!(p.mobile_label, "");
        assert!(p.phone_signal_icon.is_none());
    }

    #[test]
    fn airplane_with_emergency_service_does_not_suppress() {
        let mut state = NetworkState::default();
        state.cellular.ingest_service_state(ServiceState {
            voice_reg: RegState::EmergencyOnly,
            emergency_only: true,
            ..ServiceState::default()
        });
        state.airplane_mode = true;
        let p = reconcile(&state, &NetworkConfig::default());
        assert_ne!(p.combined_source, CombinedSource::Airplane);
        assert!(p.emergency_only);
        assert!(!p.signals.mobile.enabled);
        assert!(p.signals.mobile.network_name.is_none());

        let mut config = NetworkConfig::default();
        config.display.emergency_only_allowed = false;
        let p = reconcile(&state, &config);
        assert_eq!(p.combined_source, CombinedSource::Airplane);
        assert!(!p.emergency_only);
    }

    #[test]
    fn no_mobile_feature_disconnected() {
        let mut state = NetworkState::default();
        state.wifi.ingest_enabled(true);
        let mut config = NetworkConfig::default();
        config.device.mobile_feature_present = false;
        let p = reconcile(&state, &config);
        assert_eq!(p.combined_label, "No internet connection");
        assert_eq!(p.combined_icon, icons::WIFI_SIGNAL_NULL);
        assert_eq!(p.wifi_label, "No internet connection");
        assert_eq!(p.mobile_label, "");
        assert!(p.cluster.wifi.visible);
        assert!(!p.cluster.mobile.visible);
    }

    #[test]
    fn stacked_mode_hides_disconnected_wifi() {
        let mut state = NetworkState::default();
        state.wifi.ingest_enabled(true);
        let mut config = NetworkConfig::default();
        config.device.data_and_wifi_stacked = true;
        let p = reconcile(&state, &config);
        assert!(p.wifi_icon.is_none());
        assert!(p.qs_wifi_icon.is_none());
    }

    #[test]
    fn roaming_overrides_data_type() {
        let mut state = NetworkState::default();
        data_up(&mut state, NetworkType::Lte);
        if let Some(service) = state.cellular.service.as_mut() {
            service.roaming = true;
        }
        let p = reconcile(&state, &NetworkConfig::default());
        assert_eq!(p.data_type_icon, icons::DATA_TYPE_ROAMING);
        assert_eq!(p.qs_data_type_icon, icons::QS_DATA_TYPE_ROAMING[1]);
        assert_eq!(p.phone_signal_icon, TELEPHONY_SIGNAL_STRENGTH_ROAMING[1][3]);
    }

    #[test]
    fn roaming_overlay_survives_disconnect() {
        let mut state = NetworkState::default();
        in_service(&mut state);
        if let Some(service) = state.cellular.service.as_mut() {
            service.roaming = true;
        }
        let p = reconcile(&state, &NetworkConfig::default());
        assert_eq!(p.combined_source, CombinedSource::Disconnected);
        assert_eq!(p.data_type_icon, icons::DATA_TYPE_ROAMING);
    }

    #[test]
    fn six_bar_uses_six_bar_level() {
        let mut state = NetworkState::default();
        in_service(&mut state);
        state.cellular.ingest_signal_strength(Some(SignalStrength {
            level: 2,
            is_gsm: true,
            cdma_level: 0,
            six_bar_level: 6,
            six_bar_cdma_level: 0,
        }));
        let mut config = NetworkConfig::default();
        config.display.six_bar_enabled = true;
        let p = reconcile(&state, &config);
        assert_eq!(p.phone_signal_icon, TELEPHONY_SIGNAL_STRENGTH_SIX_BAR[0][6]);
        assert_eq!(p.descriptions.phone_signal, "Phone signal full.");
    }

    #[test]
    fn cdma_rssi_level_source() {
        let mut state = NetworkState::default();
        in_service(&mut state);
        state.cellular.ingest_signal_strength(Some(SignalStrength {
            level: 4,
            is_gsm: false,
            cdma_level: 1,
            six_bar_level: 0,
            six_bar_cdma_level: 0,
        }));
        let mut config = NetworkConfig::default();
        assert_eq!(
            reconcile(&state, &config).phone_signal_icon,
            TELEPHONY_SIGNAL_STRENGTH[0][4]
        );
        config.display.always_show_cdma_rssi = true;
        assert_eq!(
            reconcile(&state, &config).phone_signal_icon,
            TELEPHONY_SIGNAL_STRENGTH[0][1]
        );
    }

    #[test]
    fn hide_signal_bars_keeps_qs_icon() {
        let mut state = NetworkState::default();
        in_service(&mut state);
        let mut config = NetworkConfig::default();
        config.display.hide_signal_bars = true;
        let p = reconcile(&state, &config);
        assert!(p.phone_signal_icon.is_none());
        assert!(p.data_signal_icon.is_none());
        assert_eq!(p.qs_phone_signal_icon, QS_TELEPHONY_SIGNAL_STRENGTH[0][3]);
    }

    #[test]
    fn gsm_without_sim_shows_no_sim_direction() {
        let mut state = NetworkState::default();
        data_up(&mut state, NetworkType::Umts);
        state.cellular.ingest_sim_state(SimState::Absent);
        let p = reconcile(&state, &NetworkConfig::default());
        assert!(!p.data_connected);
        assert_eq!(p.data_direction_icon, icons::NO_SIM);
    }

    #[test]
    fn unrecognized_type_is_not_data() {
        let mut state = NetworkState::default();
        data_up(&mut state, NetworkType::Iden);
        let p = reconcile(&state, &NetworkConfig::default());
        assert!(!p.data_connected);
        assert_eq!(p.generation, DataGeneration::Unknown);
    }

    #[test]
    fn connected_elsewhere_without_service_has_empty_mobile_label() {
        let mut state = NetworkState::default();
        wifi_up(&mut state, "Home", -60);
        state.connectivity.ingest_snapshot(ConnectivitySnapshot {
            connected: true,
            transport: TransportType::Wifi,
            link_quality: 80,
        });
        let p = reconcile(&state, &NetworkConfig::default());
        assert_eq!(p.mobile_label, "");
        assert_eq!(p.carrier, CarrierCandidates::default());
    }

    #[test]
    fn custom_label_replaces_both_labels() {
        let mut state = NetworkState::default();
        data_up(&mut state, NetworkType::Lte);
        let mut config = NetworkConfig::default();
        config.display.custom_operator_label = Some("Acme Mobile".into());
        let p = reconcile(&state, &config);
        assert_eq!(p.mobile_label, "Acme Mobile");
        assert_eq!(p.combined_label, "Acme Mobile");
    }

    #[test]
    fn empty_custom_label_is_ignored() {
        let mut state = NetworkState::default();
        data_up(&mut state, NetworkType::Lte);
        let mut config = NetworkConfig::default();
        config.display.custom_operator_label = Some(String::new());
        let p = reconcile(&state, &config);
        assert_eq!(p.mobile_label, "Carrier");
        assert_eq!(p.combined_label, "Carrier");
    }

    #[test]
    fn pure_and_repeatable() {
        let mut state = NetworkState::default();
        data_up(&mut state, NetworkType::Lte);
        wifi_up(&mut state, "Home", -70);
        let config = NetworkConfig::default();
        assert_eq!(reconcile(&state, &config), reconcile(&state, &config));
    }
}
