//! Status-bar network aggregation engine.
//!
//! Per-transport trackers hold raw telemetry, [`reconcile`](reconcile::reconcile)
//! turns the full snapshot into a [`DerivedPresentation`], and the notifier
//! fans changes out to observer tiers. [`NetworkController`] runs that
//! pipeline synchronously; [`NetworkRuntime`] serializes it on a worker.

pub mod carrier;
pub mod cellular;
pub mod config;
pub mod connectivity;
pub mod controller;
pub mod demo;
pub mod diagnostics;
pub mod error;
pub mod event;
pub mod generation;
pub mod icons;
pub mod notify;
pub mod presentation;
pub mod reconcile;
pub mod runtime;
pub mod signal;
pub mod state;
pub mod wifi;
pub mod wimax;

pub use config::NetworkConfig;
pub use controller::NetworkController;
pub use error::{ConfigError, RuntimeError};
pub use event::TelemetryEvent;
pub use icons::IconId;
pub use notify::NotifyReport;
pub use presentation::{DerivedPresentation, Field};
pub use runtime::{NetworkRuntime, Registrar};
pub use state::NetworkState;
