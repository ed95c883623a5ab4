//! Observers that render notifications as JSON lines.

use crossbeam_channel::Sender;
use netbar_core::icons::IconId;
use netbar_core::notify::{
    CarrierObserver, ClusterObserver, FieldObserver, SignalCallback, WifiConnectionNotice,
    WifiConnectionObserver,
};
use netbar_core::presentation::{DerivedPresentation, FieldUpdate, MobileSignal, WifiSignal};
use serde::Serialize;

#[derive(Serialize)]
#[serde(tag = "tier", rename_all = "snake_case")]
enum Line<'a> {
    Cluster {
        combined_icon: String,
        combined_label: &'a str,
        source: &'a str,
        cluster: &'a netbar_core::presentation::ClusterView,
    },
    Field(&'a FieldUpdate),
    WifiSignal(&'a WifiSignal),
    MobileSignal(&'a MobileSignal),
    Airplane { enabled: bool },
    Carrier { icon: String },
    Connection(&'a WifiConnectionNotice),
}

/// Serializes each notification and hands it to the output thread.
pub struct JsonPrinter {
    out: Sender<String>,
    signals: bool,
}

impl JsonPrinter {
    pub fn new(out: Sender<String>, signals: bool) -> Self {
        Self { out, signals }
    }

    fn emit(&self, line: &Line<'_>) {
        match serde_json::to_string(line) {
            Ok(text) => {
                let _ = self.out.send(text);
            }
            Err(e) => tracing::warn!(error = %e, "failed to encode notification"),
        }
    }
}

impl ClusterObserver for JsonPrinter {
    fn on_presentation(&self, p: &DerivedPresentation) {
        self.emit(&Line::Cluster {
            combined_icon: p.combined_icon.to_string(),
            combined_label: &p.combined_label,
            source: p.combined_source.as_str(),
            cluster: &p.cluster,
        });
    }
}

impl FieldObserver for JsonPrinter {
    fn on_field(&self, update: &FieldUpdate) {
        self.emit(&Line::Field(update));
    }
}

impl SignalCallback for JsonPrinter {
    fn on_wifi_signal_changed(&self, wifi: &WifiSignal) {
        if self.signals {
            self.emit(&Line::WifiSignal(wifi));
        }
    }

    fn on_mobile_data_signal_changed(&self, mobile: &MobileSignal) {
        if self.signals {
            self.emit(&Line::MobileSignal(mobile));
        }
    }

    fn on_airplane_mode_changed(&self, enabled: bool) {
        if self.signals {
            self.emit(&Line::Airplane { enabled });
        }
    }
}

impl CarrierObserver for JsonPrinter {
    fn set_carrier_icon(&self, icon: IconId) {
        self.emit(&Line::Carrier {
            icon: icon.to_string(),
        });
    }
}

impl WifiConnectionObserver for JsonPrinter {
    fn on_wifi_connection(&self, notice: &WifiConnectionNotice) {
        self.emit(&Line::Connection(notice));
    }
}
