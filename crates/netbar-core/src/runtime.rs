use crate::config::NetworkConfig;
use crate::controller::NetworkController;
use crate::diagnostics;
use crate::error::RuntimeError;
use crate::event::TelemetryEvent;
use crate::notify::{
    CarrierObserver, ClusterObserver, FieldObserver, ObserverId, Observers, SignalCallback,
    WifiConnectionObserver,
};
use crate::presentation::{DerivedPresentation, Field};
use anyhow::Context;
use arc_swap::ArcSwap;
use crossbeam_channel::{after, bounded, never, select, unbounded, Receiver, Sender, TrySendError};
use std::sync::Arc;
use std::thread;
use std::time::Instant;
use tracing::{debug, info, warn};

const QUEUE_CAPACITY: usize = 1000;

enum RuntimeMessage {
    Event(TelemetryEvent),
    Dump(Sender<String>),
    Shutdown,
}

/// Serialized front end for a [`NetworkController`].
///
/// Every producer posts into one bounded queue; a single worker thread owns
/// the controller and runs ingestion, reconciliation and notification in
/// arrival order. Observer registration goes straight to the shared
/// registries. Replay requests travel on a separate unbounded channel, so
/// registering never blocks, even from a callback on the worker while the
/// event queue is full.
pub struct NetworkRuntime {
    sender: Sender<RuntimeMessage>,
    registrar: Registrar,
    latest: Arc<ArcSwap<DerivedPresentation>>,
    handle: Option<thread::JoinHandle<()>>,
}

impl NetworkRuntime {
    pub fn new(config: NetworkConfig) -> Self {
        let (tx, rx) = bounded(QUEUE_CAPACITY);
        let (replay_tx, replay_rx) = unbounded();
        let observers = Arc::new(Observers::new());
        let controller = NetworkController::with_observers(config, observers.clone());
        let latest = Arc::new(ArcSwap::from_pointee(controller.latest().clone()));
        let latest_clone = latest.clone();

        let handle =
            thread::spawn(move || runtime_worker(rx, replay_rx, controller, latest_clone));
        info!("network runtime started");

        Self {
            sender: tx,
            registrar: Registrar {
                observers,
                replays: replay_tx,
            },
            latest,
            handle: Some(handle),
        }
    }

    pub fn post(&self, event: TelemetryEvent) -> anyhow::Result<()> {
        self.sender
            .send(RuntimeMessage::Event(event))
            .map_err(|e| anyhow::anyhow!("Failed to post telemetry: {}", e))
    }

    pub fn try_post(&self, event: TelemetryEvent) -> Result<(), RuntimeError> {
        match self.sender.try_send(RuntimeMessage::Event(event)) {
            Ok(_) => Ok(()),
            Err(TrySendError::Full(_)) => Err(RuntimeError::Full),
            Err(TrySendError::Disconnected(_)) => Err(RuntimeError::Disconnected),
        }
    }

    /// Diagnostic dump, rendered on the worker after everything already queued.
    pub fn dump(&self) -> anyhow::Result<String> {
        let (reply_tx, reply_rx) = bounded(1);
        self.sender
            .send(RuntimeMessage::Dump(reply_tx))
            .map_err(|e| anyhow::anyhow!("Failed to request dump: {}", e))?;
        reply_rx.recv().context("runtime stopped before answering dump")
    }

    /// Last presentation derived from real state.
    pub fn latest(&self) -> Arc<DerivedPresentation> {
        self.latest.load_full()
    }

    pub fn observers(&self) -> Arc<Observers> {
        self.registrar.observers.clone()
    }

    /// Cloneable registration handle, usable from observer callbacks.
    pub fn registrar(&self) -> Registrar {
        self.registrar.clone()
    }

    pub fn add_cluster_observer(&self, observer: Arc<dyn ClusterObserver>) -> ObserverId {
        self.registrar.add_cluster_observer(observer)
    }

    pub fn add_field_observer(
        &self,
        fields: &[Field],
        observer: Arc<dyn FieldObserver>,
    ) -> ObserverId {
        self.registrar.add_field_observer(fields, observer)
    }

    pub fn add_signal_callback(&self, callback: Arc<dyn SignalCallback>) -> ObserverId {
        self.registrar.add_signal_callback(callback)
    }

    pub fn add_carrier_observer(&self, observer: Arc<dyn CarrierObserver>) -> ObserverId {
        self.registrar.add_carrier_observer(observer)
    }

    pub fn add_connection_observer(&self, observer: Arc<dyn WifiConnectionObserver>) -> ObserverId {
        self.registrar.add_connection_observer(observer)
    }

    pub fn remove_observer(&self, id: ObserverId) -> bool {
        self.registrar.remove_observer(id)
    }

    pub fn shutdown(&mut self) {
        if let Some(handle) = self.handle.take() {
            let _ = self.sender.send(RuntimeMessage::Shutdown);
            let _ = handle.join();
        }
    }
}

impl Drop for NetworkRuntime {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// Registers observers with a running [`NetworkRuntime`] and asks its worker
/// to replay current state to them.
#[derive(Clone)]
pub struct Registrar {
    observers: Arc<Observers>,
    replays: Sender<ObserverId>,
}

impl Registrar {
    pub fn add_cluster_observer(&self, observer: Arc<dyn ClusterObserver>) -> ObserverId {
        let id = self.observers.add_cluster(observer);
        self.request_replay(id);
        id
    }

    pub fn add_field_observer(
        &self,
        fields: &[Field],
        observer: Arc<dyn FieldObserver>,
    ) -> ObserverId {
        let id = self.observers.add_fields(fields, observer);
        self.request_replay(id);
        id
    }

    pub fn add_signal_callback(&self, callback: Arc<dyn SignalCallback>) -> ObserverId {
        let id = self.observers.add_signal(callback);
        self.request_replay(id);
        id
    }

    pub fn add_carrier_observer(&self, observer: Arc<dyn CarrierObserver>) -> ObserverId {
        let id = self.observers.add_carrier(observer);
        self.request_replay(id);
        id
    }

    /// Connection notices are edge events; nothing is replayed.
    pub fn add_connection_observer(&self, observer: Arc<dyn WifiConnectionObserver>) -> ObserverId {
        self.observers.add_connection(observer)
    }

    pub fn remove_observer(&self, id: ObserverId) -> bool {
        self.observers.remove(id)
    }

    fn request_replay(&self, id: ObserverId) {
        if let Err(e) = self.replays.send(id) {
            warn!(observer = id.raw(), error = %e, "replay not delivered");
        }
    }
}

/// Serve every pending replay request.
fn drain_replays(replays: &Receiver<ObserverId>, controller: &NetworkController) {
    while let Ok(id) = replays.try_recv() {
        controller.replay(id);
    }
}

fn runtime_worker(
    rx: Receiver<RuntimeMessage>,
    replay_rx: Receiver<ObserverId>,
    mut controller: NetworkController,
    latest: Arc<ArcSwap<DerivedPresentation>>,
) {
    let mut replays_open = true;
    let mut grace_timer: Option<Receiver<Instant>> = None;
    let mut grace_scheduled = false;

    loop {
        let replays = if replays_open {
            replay_rx.clone()
        } else {
            never()
        };
        let timer = grace_timer.clone().unwrap_or_else(never);
        select! {
            recv(replays) -> id => match id {
                Ok(id) => controller.replay(id),
                // Every registrar is gone.
                Err(_) => replays_open = false,
            },
            recv(rx) -> msg => {
                // Replays requested before this message was queued go first.
                drain_replays(&replays, &controller);
                match msg {
                    Ok(RuntimeMessage::Event(event)) => {
                        if matches!(event, TelemetryEvent::BootCompleted) && !grace_scheduled {
                            let delay = controller.boot_grace();
                            grace_timer = Some(after(delay));
                            grace_scheduled = true;
                            info!(delay_ms = delay.as_millis() as u64, "boot grace timer scheduled");
                        }
                        let report = controller.handle(event);
                        debug!(
                            cluster = report.cluster,
                            fields = report.fields.len(),
                            held = report.held_by_demo,
                            "event processed"
                        );
                        latest.store(Arc::new(controller.latest().clone()));
                    }
                    Ok(RuntimeMessage::Dump(reply)) => {
                        let _ = reply.send(diagnostics::dump(&controller));
                    }
                    Ok(RuntimeMessage::Shutdown) | Err(_) => break,
                }
            },
            recv(timer) -> _ => {
                grace_timer = None;
                controller.handle(TelemetryEvent::BootGraceElapsed);
                latest.store(Arc::new(controller.latest().clone()));
            }
        }
    }
    info!(passes = controller.passes(), "network runtime stopped");
}
