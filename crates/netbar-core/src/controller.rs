use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, info, warn};

use crate::carrier::CarrierResolver;
use crate::config::NetworkConfig;
use crate::demo::DemoOverlay;
use crate::event::{DemoCommand, TelemetryEvent};
use crate::generation::NetworkType;
use crate::icons::IconId;
use crate::notify::{
    deliver_signals, CarrierObserver, ChangeDetector, ClusterObserver, FieldObserver,
    NotifyReport, ObserverId, ObserverKind, Observers, SignalCallback, WifiConnectionNotice,
    WifiConnectionObserver,
};
use crate::presentation::{DerivedPresentation, Field};
use crate::reconcile::reconcile;
use crate::state::NetworkState;
use crate::wifi::WifiTransition;

/// Owns all raw state and runs ingest → reconcile → notify synchronously.
///
/// Not thread-safe by itself; [`NetworkRuntime`](crate::runtime::NetworkRuntime)
/// serializes access by confining a controller to one worker thread.
pub struct NetworkController {
    config: NetworkConfig,
    state: NetworkState,
    observers: Arc<Observers>,
    detector: ChangeDetector,
    carrier: CarrierResolver,
    demo: Option<DemoOverlay>,
    latest: DerivedPresentation,
    boot_grace_active: bool,
    last_announced_ssid: Option<String>,
    passes: u64,
}

impl NetworkController {
    pub fn new(config: NetworkConfig) -> Self {
        Self::with_observers(config, Arc::new(Observers::new()))
    }

    pub fn with_observers(config: NetworkConfig, observers: Arc<Observers>) -> Self {
        let state = NetworkState::new(config.device.stored_ssids_capacity);
        let latest = reconcile(&state, &config);
        Self {
            config,
            state,
            observers,
            detector: ChangeDetector::default(),
            carrier: CarrierResolver::default(),
            demo: None,
            latest,
            boot_grace_active: true,
            last_announced_ssid: None,
            passes: 0,
        }
    }

    pub fn config(&self) -> &NetworkConfig {
        &self.config
    }

    pub fn state(&self) -> &NetworkState {
        &self.state
    }

    pub fn observers(&self) -> &Arc<Observers> {
        &self.observers
    }

    pub fn detector(&self) -> &ChangeDetector {
        &self.detector
    }

    pub fn demo(&self) -> Option<&DemoOverlay> {
        self.demo.as_ref()
    }

    pub fn in_demo(&self) -> bool {
        self.demo.is_some()
    }

    /// Last presentation derived from real state.
    pub fn latest(&self) -> &DerivedPresentation {
        &self.latest
    }

    pub fn carrier_icon(&self) -> IconId {
        self.carrier.current()
    }

    pub fn boot_grace(&self) -> Duration {
        self.config.device.boot_grace
    }

    pub fn boot_grace_active(&self) -> bool {
        self.boot_grace_active
    }

    pub fn last_announced_ssid(&self) -> Option<&str> {
        self.last_announced_ssid.as_deref()
    }

    pub fn passes(&self) -> u64 {
        self.passes
    }

    // ─── Registration ───────────────────────────────────────────────────

    pub fn add_cluster_observer(&mut self, observer: Arc<dyn ClusterObserver>) -> ObserverId {
        let id = self.observers.add_cluster(observer);
        self.replay(id);
        id
    }

    pub fn add_field_observer(
        &mut self,
        fields: &[Field],
        observer: Arc<dyn FieldObserver>,
    ) -> ObserverId {
        let id = self.observers.add_fields(fields, observer);
        self.replay(id);
        id
    }

    pub fn add_signal_callback(&mut self, callback: Arc<dyn SignalCallback>) -> ObserverId {
        let id = self.observers.add_signal(callback);
        self.replay(id);
        id
    }

    pub fn add_carrier_observer(
        &mut self,
        observer: Arc<dyn CarrierObserver>,
    ) -> ObserverId {
        let id = self.observers.add_carrier(observer);
        self.replay(id);
        id
    }

    pub fn add_connection_observer(
        &mut self,
        observer: Arc<dyn WifiConnectionObserver>,
    ) -> ObserverId {
        self.observers.add_connection(observer)
    }

    pub fn remove_observer(&mut self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    /// Push current state to one freshly registered observer.
    pub fn replay(&self, id: ObserverId) {
        match self.observers.kind_of(id) {
            Some(ObserverKind::Cluster) => {
                if let Some(observer) = self.observers.cluster.get(id) {
                    observer.on_presentation(&self.displayed());
                }
            }
            Some(ObserverKind::Field) => {
                if let Some(sub) = self.observers.fields.get(id) {
                    for field in &sub.fields {
                        sub.observer.on_field(&self.latest.field(*field));
                    }
                }
            }
            Some(ObserverKind::Signal) => {
                if let Some(callback) = self.observers.signals.get(id) {
                    deliver_signals(callback.as_ref(), &self.latest.signals);
                }
            }
            Some(ObserverKind::Carrier) => {
                let icon = self.carrier.current();
                if let (Some(observer), false) = (self.observers.carrier.get(id), icon.is_none()) {
                    observer.set_carrier_icon(icon);
                }
            }
            Some(ObserverKind::Connection) | None => {}
        }
    }

    // ─── Ingestion ──────────────────────────────────────────────────────

    pub fn handle(&mut self, event: TelemetryEvent) -> NotifyReport {
        debug!(event = event.kind(), "handling telemetry");
        let mut notice = None;
        match event {
            TelemetryEvent::ServiceState(service) => {
                self.state.cellular.ingest_service_state(service)
            }
            TelemetryEvent::SignalStrength { signal } => {
                self.state.cellular.ingest_signal_strength(signal)
            }
            TelemetryEvent::CallState { state } => self.state.cellular.ingest_call_state(state),
            TelemetryEvent::DataConnection {
                state,
                network_type,
            } => {
                let network_type = NetworkType::from_raw(network_type);
                if let NetworkType::Other(raw) = network_type {
                    warn!(code = raw, "unrecognized radio technology code");
                }
                self.state
                    .cellular
                    .ingest_data_connection_state(state, network_type);
            }
            TelemetryEvent::DataActivity { direction } => {
                self.state.cellular.ingest_data_activity(direction)
            }
            TelemetryEvent::SimState { state } => self.state.cellular.ingest_sim_state(state),
            TelemetryEvent::NetworkName(name) => self.state.cellular.ingest_network_name(name),
            TelemetryEvent::WifiEnabled { enabled } => self.state.wifi.ingest_enabled(enabled),
            TelemetryEvent::WifiConnection(transition) => {
                notice = self.ingest_wifi_transition(transition);
            }
            TelemetryEvent::WifiRssi { rssi } => self.state.wifi.ingest_rssi(rssi),
            TelemetryEvent::WifiActivity { direction } => {
                self.state.wifi.ingest_activity(direction)
            }
            TelemetryEvent::WifiConfiguredNetworks { networks } => {
                self.state.wifi.ingest_configured_networks(networks)
            }
            TelemetryEvent::WimaxEnabled { enabled } => self.state.wimax.ingest_enabled(enabled),
            TelemetryEvent::WimaxSignalLevel { level } => {
                self.state.wimax.ingest_signal_level(level)
            }
            TelemetryEvent::WimaxConnection { connected, idle } => {
                self.state.wimax.ingest_connection_state(connected, idle)
            }
            TelemetryEvent::WimaxNetworkState { state, extra_state } => {
                self.state.wimax.ingest_network_state(state, extra_state)
            }
            TelemetryEvent::Connectivity(snapshot) => {
                self.state.connectivity.ingest_snapshot(snapshot)
            }
            TelemetryEvent::AirplaneMode { enabled } => self.state.airplane_mode = enabled,
            TelemetryEvent::Locale { locale } => self.state.locale = locale,
            TelemetryEvent::ApplyConfig { config } => self.apply_config(*config),
            TelemetryEvent::BootCompleted => {
                debug!("boot completed; grace timer is owned by the runtime");
            }
            TelemetryEvent::BootGraceElapsed => {
                if self.boot_grace_active {
                    info!("boot grace elapsed, wifi connection notices enabled");
                }
                self.boot_grace_active = false;
            }
            TelemetryEvent::Demo { command } => return self.dispatch_demo(command),
        }

        let mut report = self.refresh();
        if let Some(notice) = notice {
            if self.demo.is_some() {
                debug!(ssid = %notice.ssid, "wifi connection notice held by demo mode");
            } else {
                self.observers.push_connection(&notice);
                report.connection = Some(notice);
            }
        }
        report
    }

    fn ingest_wifi_transition(&mut self, transition: WifiTransition) -> Option<WifiConnectionNotice> {
        let was_connected = self.state.wifi.connected;
        let connection = self.state.wifi.ingest_connection_transition(transition);
        let fresh = !was_connected && self.state.wifi.connected;

        let mut notice = None;
        if let Some(connection) = connection {
            let mode = self.config.display.wifi_notifications;
            if mode.is_enabled() {
                let repeated = self.last_announced_ssid.as_deref() == Some(connection.ssid.as_str());
                if !self.boot_grace_active && !repeated {
                    notice = Some(WifiConnectionNotice {
                        ssid: connection.ssid.clone(),
                        restored: connection.restored,
                        mode,
                    });
                }
                self.last_announced_ssid = Some(connection.ssid);
            }
        }
        if fresh {
            self.boot_grace_active = false;
        }
        notice
    }

    fn apply_config(&mut self, config: NetworkConfig) {
        self.state
            .wifi
            .recent
            .set_capacity(config.device.stored_ssids_capacity);
        info!(
            mobile = config.device.mobile_feature_present,
            wimax = config.device.wimax_supported,
            six_bar = config.display.six_bar_enabled,
            "config applied"
        );
        self.config = config;
    }

    /// Re-run reconciliation on unchanged state.
    pub fn refresh(&mut self) -> NotifyReport {
        self.recompute();
        if self.demo.is_some() {
            return NotifyReport {
                held_by_demo: true,
                ..NotifyReport::default()
            };
        }
        self.notify_latest()
    }

    fn recompute(&mut self) {
        let mut presentation = reconcile(&self.state, &self.config);
        presentation.carrier_icon = self
            .carrier
            .resolve(&presentation.carrier, &self.config.carrier_icons);
        self.latest = presentation;
        self.passes += 1;
    }

    fn notify_latest(&mut self) -> NotifyReport {
        let mut report = NotifyReport::default();
        let latest = &self.latest;

        self.observers.push_signals(&latest.signals);
        self.detector.record_signals(&latest.signals);
        report.signals = true;

        if !latest.carrier_icon.is_none() {
            self.observers.push_carrier(latest.carrier_icon);
            report.carrier = Some(latest.carrier_icon);
        }

        if self.detector.cluster_changed(latest) {
            self.observers.push_cluster(latest);
            report.cluster = true;
        }

        for update in self.detector.changed_fields(latest) {
            self.observers.push_field(&update);
            report.fields.push(update.field);
        }

        debug!(
            source = latest.combined_source.as_str(),
            combined = %latest.combined_icon,
            label = %latest.combined_label,
            cluster = report.cluster,
            fields = report.fields.len(),
            "reconciled"
        );
        report
    }

    // ─── Demo ───────────────────────────────────────────────────────────

    fn dispatch_demo(&mut self, command: DemoCommand) -> NotifyReport {
        match command {
            DemoCommand::Enter => {
                if self.demo.is_some() {
                    warn!("demo enter ignored: already in demo mode");
                } else {
                    self.demo = Some(DemoOverlay::enter(&self.state, &self.config, &self.latest));
                    info!("demo mode entered");
                }
                NotifyReport::default()
            }
            DemoCommand::Set(param) => match self.demo.as_mut() {
                Some(demo) => {
                    demo.apply(&param);
                    let shown = demo.presentation();
                    self.observers.push_cluster(&shown);
                    NotifyReport {
                        cluster: true,
                        ..NotifyReport::default()
                    }
                }
                None => {
                    warn!(?param, "demo parameter ignored outside demo mode");
                    NotifyReport::default()
                }
            },
            DemoCommand::Exit => {
                if self.demo.take().is_none() {
                    warn!("demo exit ignored: not in demo mode");
                    return NotifyReport::default();
                }
                info!("demo mode exited");
                self.recompute();
                self.observers.push_cluster(&self.latest);
                self.detector.mark_cluster(&self.latest);
                let mut report = self.notify_latest();
                report.cluster = true;
                report
            }
        }
    }

    /// What cluster observers currently show: the demo view while the
    /// overlay is active, real state otherwise.
    pub fn displayed(&self) -> DerivedPresentation {
        match &self.demo {
            Some(demo) => demo.presentation(),
            None => self.latest.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cellular::{DataConnectionState, RegState, ServiceState};
    use crate::config::WifiNotificationMode;
    use crate::event::{DemoLevel, DemoParam};
    use std::sync::Mutex;

    #[derive(Default)]
    struct Notices(Mutex<Vec<WifiConnectionNotice>>);

    impl WifiConnectionObserver for Notices {
        fn on_wifi_connection(&self, notice: &WifiConnectionNotice) {
            self.0.lock().unwrap().push(notice.clone());
        }
    }

    fn connect(ssid: &str) -> TelemetryEvent {
        TelemetryEvent::WifiConnection(WifiTransition {
            connected: true,
            ssid: Some(ssid.into()),
            ..WifiTransition::default()
        })
    }

    fn disconnect() -> TelemetryEvent {
        TelemetryEvent::WifiConnection(WifiTransition::default())
    }

    fn notifying_controller() -> (NetworkController, Arc<Notices>) {
        let mut config = NetworkConfig::default();
        config.display.wifi_notifications = WifiNotificationMode::Toast;
        let mut controller = NetworkController::new(config);
        let notices = Arc::new(Notices::default());
        controller.add_connection_observer(notices.clone());
        (controller, notices)
    }

    #[test]
    fn first_connection_during_boot_is_silent() {
        let (mut controller, notices) = notifying_controller();
        let report = controller.handle(connect("Home"));
        assert!(report.connection.is_none());
        assert!(!controller.boot_grace_active());
        assert_eq!(controller.last_announced_ssid(), Some("Home"));

        controller.handle(disconnect());
        controller.handle(connect("Cafe"));
        let seen = notices.0.lock().unwrap();
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].ssid, "Cafe");
        assert!(!seen[0].restored);
        assert_eq!(seen[0].mode, WifiNotificationMode::Toast);
    }

    #[test]
    fn same_ssid_is_not_announced_twice() {
        let (mut controller, notices) = notifying_controller();
        controller.handle(TelemetryEvent::BootGraceElapsed);
        controller.handle(connect("Home"));
        controller.handle(disconnect());
        controller.handle(connect("Home"));
        assert_eq!(notices.0.lock().unwrap().len(), 1);

        controller.handle(disconnect());
        controller.handle(connect("Cafe"));
        controller.handle(disconnect());
        let report = controller.handle(connect("Home"));
        let notice = report.connection.unwrap();
        assert!(notice.restored);
    }

    #[test]
    fn notices_off_by_default() {
        let mut controller = NetworkController::new(NetworkConfig::default());
        controller.handle(TelemetryEvent::BootGraceElapsed);
        let report = controller.handle(connect("Home"));
        assert!(report.connection.is_none());
        assert!(controller.last_announced_ssid().is_none());
    }

    #[test]
    fn repeated_event_is_quiet() {
        let mut controller = NetworkController::new(NetworkConfig::default());
        let first = controller.handle(TelemetryEvent::AirplaneMode { enabled: true });
        assert!(first.cluster);
        let second = controller.handle(TelemetryEvent::AirplaneMode { enabled: true });
        assert!(second.is_quiet());
        assert!(second.signals);
    }

    #[test]
    fn demo_holds_real_notifications() {
        let mut controller = NetworkController::new(NetworkConfig::default());
        controller.refresh();
        controller.handle(TelemetryEvent::Demo {
            command: DemoCommand::Enter,
        });
        let report = controller.handle(TelemetryEvent::ServiceState(ServiceState {
            voice_reg: RegState::InService,
            ..ServiceState::default()
        }));
        assert!(report.held_by_demo);
        assert!(report.is_quiet());
        assert!(controller.state().cellular.has_service());

        let report = controller.handle(TelemetryEvent::Demo {
            command: DemoCommand::Set(DemoParam::Wifi {
                show: true,
                level: Some(DemoLevel::Bars(1)),
            }),
        });
        assert!(report.cluster);
        assert!(!controller.state().wifi.connected);

        let report = controller.handle(TelemetryEvent::Demo {
            command: DemoCommand::Exit,
        });
        assert!(report.cluster);
        assert!(!controller.in_demo());
    }

    #[test]
    fn demo_commands_out_of_mode_are_ignored() {
        let mut controller = NetworkController::new(NetworkConfig::default());
        let report = controller.handle(TelemetryEvent::Demo {
            command: DemoCommand::Exit,
        });
        assert_eq!(report, NotifyReport::default());
        let report = controller.handle(TelemetryEvent::Demo {
            command: DemoCommand::Set(DemoParam::Airplane { show: true }),
        });
        assert_eq!(report, NotifyReport::default());
    }

    #[test]
    fn unknown_radio_code_classifies_as_unknown() {
        let mut controller = NetworkController::new(NetworkConfig::default());
        controller.handle(TelemetryEvent::DataConnection {
            state: DataConnectionState::Connected,
            network_type: 777,
        });
        assert_eq!(
            controller.state().cellular.network_type,
            NetworkType::Other(777)
        );
        assert!(!controller.latest().data_connected);
    }

    #[test]
    fn apply_config_resizes_ssid_memory() {
        let mut controller = NetworkController::new(NetworkConfig::default());
        let mut config = NetworkConfig::default();
        config.device.stored_ssids_capacity = 2;
        controller.handle(TelemetryEvent::ApplyConfig {
            config: Box::new(config),
        });
        assert_eq!(controller.state().wifi.recent.capacity(), 2);
    }
}
