//! Change detection and observer fan-out.
//!
//! Three notification tiers share one reconciliation pass:
//!
//! - **cluster**: gated by a fixed checklist ([`ClusterKey`]); on any
//!   difference the whole [`DerivedPresentation`] goes to every cluster
//!   observer.
//! - **field**: every [`Field`] is diffed on its own; only view groups whose
//!   field changed are pushed.
//! - **signal callbacks**: invoked every pass with a fresh [`SignalBundle`].
//!
//! Registries are copy-on-write ([`arc_swap::ArcSwap`]): a notification
//! pass iterates a snapshot, so observers may register or unregister from
//! any thread, including from inside a callback.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use arc_swap::ArcSwap;
use serde::Serialize;

use crate::config::WifiNotificationMode;
use crate::icons::IconId;
use crate::presentation::{
    ClusterKey, DerivedPresentation, Field, FieldUpdate, MobileSignal, SignalBundle, WifiSignal,
};

// ─── Observer traits ────────────────────────────────────────────────────

/// Receives the full presentation whenever the cluster checklist changes.
pub trait ClusterObserver: Send + Sync {
    fn on_presentation(&self, presentation: &DerivedPresentation);
}

/// A view group bound to one or more fields.
pub trait FieldObserver: Send + Sync {
    fn on_field(&self, update: &FieldUpdate);
}

/// Normalized per-pass callbacks (quick settings and friends).
pub trait SignalCallback: Send + Sync {
    fn on_wifi_signal_changed(&self, wifi: &WifiSignal);
    fn on_mobile_data_signal_changed(&self, mobile: &MobileSignal);
    fn on_airplane_mode_changed(&self, enabled: bool);
}

pub trait CarrierObserver: Send + Sync {
    fn set_carrier_icon(&self, icon: IconId);
}

/// Announcement of a fresh Wi-Fi association.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WifiConnectionNotice {
    pub ssid: String,
    pub restored: bool,
    pub mode: WifiNotificationMode,
}

pub trait WifiConnectionObserver: Send + Sync {
    fn on_wifi_connection(&self, notice: &WifiConnectionNotice);
}

// ─── Registries ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct ObserverId(u64);

impl ObserverId {
    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Copy-on-write observer list.
pub struct Registry<E> {
    entries: ArcSwap<Vec<(ObserverId, E)>>,
}

impl<E: Clone> Registry<E> {
    pub fn new() -> Self {
        Self {
            entries: ArcSwap::from_pointee(Vec::new()),
        }
    }

    pub fn add(&self, id: ObserverId, entry: E) {
        self.entries.rcu(|current| {
            let mut next = (**current).clone();
            next.push((id, entry.clone()));
            next
        });
    }

    pub fn remove(&self, id: ObserverId) -> bool {
        let mut removed = false;
        self.entries.rcu(|current| {
            let next: Vec<(ObserverId, E)> =
                current.iter().filter(|(i, _)| *i != id).cloned().collect();
            removed = next.len() != current.len();
            next
        });
        removed
    }

    pub fn get(&self, id: ObserverId) -> Option<E> {
        self.entries
            .load()
            .iter()
            .find(|(i, _)| *i == id)
            .map(|(_, e)| e.clone())
    }

    /// Stable view for one notification pass.
    pub fn snapshot(&self) -> Arc<Vec<(ObserverId, E)>> {
        self.entries.load_full()
    }

    pub fn len(&self) -> usize {
        self.entries.load().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl<E: Clone> Default for Registry<E> {
    fn default() -> Self {
        Self::new()
    }
}

/// A field observer together with the fields it displays.
#[derive(Clone)]
pub struct FieldSubscription {
    pub fields: Vec<Field>,
    pub observer: Arc<dyn FieldObserver>,
}

impl FieldSubscription {
    pub fn wants(&self, field: Field) -> bool {
        self.fields.contains(&field)
    }
}

/// Which registry an id belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ObserverKind {
    Cluster,
    Field,
    Signal,
    Carrier,
    Connection,
}

/// All observer groups, shared between the runtime handle and its worker.
#[derive(Default)]
pub struct Observers {
    next_id: AtomicU64,
    pub cluster: Registry<Arc<dyn ClusterObserver>>,
    pub fields: Registry<FieldSubscription>,
    pub signals: Registry<Arc<dyn SignalCallback>>,
    pub carrier: Registry<Arc<dyn CarrierObserver>>,
    pub connections: Registry<Arc<dyn WifiConnectionObserver>>,
}

impl Observers {
    pub fn new() -> Self {
        Self::default()
    }

    fn allocate(&self) -> ObserverId {
        ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }

    pub fn add_cluster(&self, observer: Arc<dyn ClusterObserver>) -> ObserverId {
        let id = self.allocate();
        self.cluster.add(id, observer);
        id
    }

    pub fn add_fields(&self, fields: &[Field], observer: Arc<dyn FieldObserver>) -> ObserverId {
        let id = self.allocate();
        self.fields.add(
            id,
            FieldSubscription {
                fields: fields.to_vec(),
                observer,
            },
        );
        id
    }

    pub fn add_signal(&self, callback: Arc<dyn SignalCallback>) -> ObserverId {
        let id = self.allocate();
        self.signals.add(id, callback);
        id
    }

    pub fn add_carrier(&self, observer: Arc<dyn CarrierObserver>) -> ObserverId {
        let id = self.allocate();
        self.carrier.add(id, observer);
        id
    }

    pub fn add_connection(&self, observer: Arc<dyn WifiConnectionObserver>) -> ObserverId {
        let id = self.allocate();
        self.connections.add(id, observer);
        id
    }

    /// Remove `id` from whichever group holds it.
    pub fn remove(&self, id: ObserverId) -> bool {
        self.cluster.remove(id)
            || self.fields.remove(id)
            || self.signals.remove(id)
            || self.carrier.remove(id)
            || self.connections.remove(id)
    }

    pub fn kind_of(&self, id: ObserverId) -> Option<ObserverKind> {
        if self.cluster.get(id).is_some() {
            Some(ObserverKind::Cluster)
        } else if self.fields.get(id).is_some() {
            Some(ObserverKind::Field)
        } else if self.signals.get(id).is_some() {
            Some(ObserverKind::Signal)
        } else if self.carrier.get(id).is_some() {
            Some(ObserverKind::Carrier)
        } else if self.connections.get(id).is_some() {
            Some(ObserverKind::Connection)
        } else {
            None
        }
    }

    // ─── Fan-out ────────────────────────────────────────────────────────

    pub fn push_cluster(&self, presentation: &DerivedPresentation) {
        for (_, observer) in self.cluster.snapshot().iter() {
            observer.on_presentation(presentation);
        }
    }

    pub fn push_field(&self, update: &FieldUpdate) {
        for (_, sub) in self.fields.snapshot().iter() {
            if sub.wants(update.field) {
                sub.observer.on_field(update);
            }
        }
    }

    pub fn push_signals(&self, bundle: &SignalBundle) {
        for (_, callback) in self.signals.snapshot().iter() {
            deliver_signals(callback.as_ref(), bundle);
        }
    }

    pub fn push_carrier(&self, icon: IconId) {
        for (_, observer) in self.carrier.snapshot().iter() {
            observer.set_carrier_icon(icon);
        }
    }

    pub fn push_connection(&self, notice: &WifiConnectionNotice) {
        for (_, observer) in self.connections.snapshot().iter() {
            observer.on_wifi_connection(notice);
        }
    }
}

pub fn deliver_signals(callback: &dyn SignalCallback, bundle: &SignalBundle) {
    callback.on_wifi_signal_changed(&bundle.wifi);
    callback.on_mobile_data_signal_changed(&bundle.mobile);
    callback.on_airplane_mode_changed(bundle.airplane_mode);
}

// ─── Change detection ───────────────────────────────────────────────────

/// Last-notified snapshots, one per tier.
#[derive(Debug, Clone, Default)]
pub struct ChangeDetector {
    last_cluster: Option<ClusterKey>,
    last_fields: BTreeMap<Field, FieldUpdate>,
    last_signals: Option<SignalBundle>,
}

impl ChangeDetector {
    /// True (and the snapshot is replaced) when the checklist differs.
    pub fn cluster_changed(&mut self, presentation: &DerivedPresentation) -> bool {
        let key = presentation.cluster_key();
        if self.last_cluster.as_ref() == Some(&key) {
            return false;
        }
        self.last_cluster = Some(key);
        true
    }

    /// Record a push that bypassed the checklist.
    pub fn mark_cluster(&mut self, presentation: &DerivedPresentation) {
        self.last_cluster = Some(presentation.cluster_key());
    }

    /// Updates for every field whose value or visibility changed.
    pub fn changed_fields(&mut self, presentation: &DerivedPresentation) -> Vec<FieldUpdate> {
        let mut changed = Vec::new();
        for field in Field::ALL {
            let update = presentation.field(field);
            let differs = self
                .last_fields
                .get(&field)
                .map(|last| update.differs_from(last))
                .unwrap_or(true);
            if differs {
                self.last_fields.insert(field, update.clone());
                changed.push(update);
            }
        }
        changed
    }

    pub fn record_signals(&mut self, bundle: &SignalBundle) {
        self.last_signals = Some(bundle.clone());
    }

    pub fn last_cluster(&self) -> Option<&ClusterKey> {
        self.last_cluster.as_ref()
    }

    pub fn last_fields(&self) -> &BTreeMap<Field, FieldUpdate> {
        &self.last_fields
    }

    pub fn last_signals(&self) -> Option<&SignalBundle> {
        self.last_signals.as_ref()
    }
}

/// What one pass delivered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NotifyReport {
    pub cluster: bool,
    pub fields: Vec<Field>,
    pub signals: bool,
    pub carrier: Option<IconId>,
    pub connection: Option<WifiConnectionNotice>,
    /// Real state changed but the demo overlay held notifications back.
    pub held_by_demo: bool,
}

impl NotifyReport {
    /// Neither diffed tier fired.
    pub fn is_quiet(&self) -> bool {
        !self.cluster && self.fields.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Recorder {
        seen: Mutex<Vec<String>>,
    }

    impl ClusterObserver for Recorder {
        fn on_presentation(&self, p: &DerivedPresentation) {
            self.seen.lock().unwrap().push(p.combined_label.clone());
        }
    }

    impl FieldObserver for Recorder {
        fn on_field(&self, update: &FieldUpdate) {
            self.seen
                .lock()
                .unwrap()
                .push(update.field.as_str().to_string());
        }
    }

    #[test]
    fn cluster_gate_fires_once() {
        let mut detector = ChangeDetector::default();
        let p = DerivedPresentation::default();
        assert!(detector.cluster_changed(&p));
        assert!(!detector.cluster_changed(&p));
    }

    #[test]
    fn label_change_does_not_open_cluster_gate() {
        let mut detector = ChangeDetector::default();
        let mut p = DerivedPresentation::default();
        detector.cluster_changed(&p);
        detector.changed_fields(&p);
        p.combined_label = "Home".into();
        assert!(!detector.cluster_changed(&p));
        let fields: Vec<Field> = detector
            .changed_fields(&p)
            .into_iter()
            .map(|u| u.field)
            .collect();
        assert_eq!(fields, vec![Field::CombinedLabel]);
    }

    #[test]
    fn locale_opens_cluster_gate() {
        let mut detector = ChangeDetector::default();
        let mut p = DerivedPresentation::default();
        detector.cluster_changed(&p);
        p.locale = "fr-FR".into();
        assert!(detector.cluster_changed(&p));
    }

    #[test]
    fn first_pass_pushes_every_field() {
        let mut detector = ChangeDetector::default();
        let p = DerivedPresentation::default();
        assert_eq!(detector.changed_fields(&p).len(), Field::ALL.len());
        assert!(detector.changed_fields(&p).is_empty());
    }

    #[test]
    fn registry_add_remove() {
        let observers = Observers::new();
        let rec = Arc::new(Recorder::default());
        let a = observers.add_cluster(rec.clone());
        let b = observers.add_fields(&[Field::Wifi], rec.clone());
        assert_ne!(a, b);
        assert_eq!(observers.kind_of(a), Some(ObserverKind::Cluster));
        assert_eq!(observers.kind_of(b), Some(ObserverKind::Field));
        assert!(observers.remove(a));
        assert!(!observers.remove(a));
        assert_eq!(observers.kind_of(a), None);
        assert_eq!(observers.cluster.len(), 0);
        assert_eq!(observers.fields.len(), 1);
    }

    #[test]
    fn field_push_respects_subscription() {
        let observers = Observers::new();
        let rec = Arc::new(Recorder::default());
        observers.add_fields(&[Field::Wifi, Field::WifiLabel], rec.clone());
        let p = DerivedPresentation::default();
        for update in p.fields() {
            observers.push_field(&update);
        }
        assert_eq!(
            *rec.seen.lock().unwrap(),
            vec!["wifi".to_string(), "wifi_label".to_string()]
        );
    }

    struct SelfRemoving {
        observers: Arc<Observers>,
        id: Mutex<Option<ObserverId>>,
        calls: Mutex<u32>,
    }

    impl ClusterObserver for SelfRemoving {
        fn on_presentation(&self, _: &DerivedPresentation) {
            *self.calls.lock().unwrap() += 1;
            if let Some(id) = self.id.lock().unwrap().take() {
                self.observers.remove(id);
            }
        }
    }

    #[test]
    fn removal_during_push_is_safe() {
        let observers = Arc::new(Observers::new());
        let obs = Arc::new(SelfRemoving {
            observers: observers.clone(),
            id: Mutex::new(None),
            calls: Mutex::new(0),
        });
        let id = observers.add_cluster(obs.clone());
        *obs.id.lock().unwrap() = Some(id);
        let rec = Arc::new(Recorder::default());
        observers.add_cluster(rec.clone());

        let p = DerivedPresentation::default();
        observers.push_cluster(&p);
        observers.push_cluster(&p);

        assert_eq!(*obs.calls.lock().unwrap(), 1);
        assert_eq!(rec.seen.lock().unwrap().len(), 2);
    }
}
