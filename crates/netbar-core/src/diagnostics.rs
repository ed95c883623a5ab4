//! Support dump of every raw and derived field.

use std::fmt::{self, Write};

use serde::Serialize;

use crate::controller::NetworkController;
use crate::presentation::DerivedPresentation;
use crate::state::NetworkState;

/// Render the whole controller as plain text. Never fails: formatting
/// errors are ignored, and unset values print as their defaults.
pub fn dump(controller: &NetworkController) -> String {
    let mut out = String::new();
    let _ = write_dump(&mut out, controller);
    out
}

fn write_dump(out: &mut String, controller: &NetworkController) -> fmt::Result {
    writeln!(out, "NetworkController state:")?;
    writeln!(
        out,
        "  passes={} demo={} boot_grace_active={} last_announced_ssid={:?}",
        controller.passes(),
        controller.in_demo(),
        controller.boot_grace_active(),
        controller.last_announced_ssid()
    )?;
    write_state(out, controller.state())?;

    writeln!(out, "  - icons ------")?;
    write_icons(out, controller.latest())?;
    writeln!(out, "  carrier_icon={}", controller.carrier_icon())?;

    writeln!(out, "  - labels ------")?;
    let p = controller.latest();
    writeln!(out, "  combined_label={:?} source={}", p.combined_label, p.combined_source.as_str())?;
    writeln!(out, "  mobile_label={:?}", p.mobile_label)?;
    writeln!(out, "  wifi_label={:?}", p.wifi_label)?;
    writeln!(out, "  emergency_only={}", p.emergency_only)?;
    writeln!(out, "  descriptions={}", json(&p.descriptions))?;

    writeln!(out, "  - last notified ------")?;
    let detector = controller.detector();
    writeln!(out, "  cluster={}", json(&detector.last_cluster()))?;
    for (field, update) in detector.last_fields() {
        writeln!(
            out,
            "  field {}: {} visible={}",
            field.as_str(),
            json(&update.value),
            update.visible
        )?;
    }
    writeln!(out, "  signals={}", json(&detector.last_signals()))?;

    if let Some(demo) = controller.demo() {
        writeln!(out, "  - demo ------")?;
        writeln!(out, "  baseline={}", json(demo.baseline()))?;
        writeln!(out, "  shown_wifi_level={}", demo.shadow().wifi.level)?;
    }
    Ok(())
}

fn write_state(out: &mut String, state: &NetworkState) -> fmt::Result {
    let cell = &state.cellular;
    writeln!(out, "  - telephony ------")?;
    writeln!(out, "  sim_state={}", cell.sim.as_str())?;
    match &cell.service {
        Some(s) => writeln!(
            out,
            "  service voice={} data={} roaming={} emergency_only={} eri={}/{:?} operator={:?}",
            s.voice_reg.as_str(),
            s.data_reg.as_str(),
            s.roaming,
            s.emergency_only,
            s.eri_icon_index,
            s.eri_icon_mode,
            s.operator_numeric
        )?,
        None => writeln!(out, "  service=(none)")?,
    }
    match &cell.signal {
        Some(s) => writeln!(
            out,
            "  signal level={} gsm={} cdma={} six_bar={} six_bar_cdma={}",
            s.level, s.is_gsm, s.cdma_level, s.six_bar_level, s.six_bar_cdma_level
        )?,
        None => writeln!(out, "  signal=(none)")?,
    }
    writeln!(
        out,
        "  network_type={} ({}) data_state={:?} activity={} call_state={:?}",
        cell.network_type.as_str(),
        cell.network_type.raw(),
        cell.data_state,
        cell.activity.as_str(),
        cell.call_state
    )?;
    writeln!(out, "  network_name={:?}", cell.network_name)?;
    writeln!(out, "  has_service={} roaming={}", cell.has_service(), cell.is_roaming(false))?;

    let wifi = &state.wifi;
    writeln!(out, "  - wifi ------")?;
    writeln!(
        out,
        "  enabled={} connected={} rssi={} level={} ssid={:?} activity={}",
        wifi.enabled,
        wifi.connected,
        wifi.rssi,
        wifi.level,
        wifi.ssid,
        wifi.activity.as_str()
    )?;
    writeln!(out, "  configured_networks={}", wifi.configured_networks.len())?;
    let recent: Vec<&str> = wifi.recent.iter().collect();
    writeln!(out, "  recent_ssids={:?} capacity={}", recent, wifi.recent.capacity())?;

    let wimax = &state.wimax;
    writeln!(out, "  - wimax ------")?;
    writeln!(
        out,
        "  enabled={} connected={} idle={} level={} state={} extra={}",
        wimax.enabled,
        wimax.connected,
        wimax.idle,
        wimax.signal_level,
        wimax.raw_state,
        wimax.raw_extra_state
    )?;

    let conn = &state.connectivity;
    writeln!(out, "  - connectivity ------")?;
    writeln!(
        out,
        "  connected={} transport={} link_quality={} ({}) bt_tethered={}",
        conn.connected,
        conn.transport.as_str(),
        conn.link_quality_raw,
        conn.link_quality().as_str(),
        conn.bluetooth_tethered()
    )?;
    writeln!(out, "  airplane_mode={} locale={:?}", state.airplane_mode, state.locale)
}

fn write_icons(out: &mut String, p: &DerivedPresentation) -> fmt::Result {
    let icons = [
        ("phone_signal", p.phone_signal_icon),
        ("qs_phone_signal", p.qs_phone_signal_icon),
        ("data_signal", p.data_signal_icon),
        ("data_direction", p.data_direction_icon),
        ("data_type", p.data_type_icon),
        ("qs_data_type", p.qs_data_type_icon),
        ("wifi", p.wifi_icon),
        ("qs_wifi", p.qs_wifi_icon),
        ("wifi_activity", p.wifi_activity_icon),
        ("wimax", p.wimax_icon),
        ("mobile_activity", p.mobile_activity_icon),
        ("combined", p.combined_icon),
        ("combined_activity", p.combined_activity_icon),
        ("airplane", p.airplane_icon),
    ];
    for (name, icon) in icons {
        writeln!(out, "  {}={}", name, icon)?;
    }
    writeln!(out, "  generation={} data_connected={}", p.generation.as_str(), p.data_connected)
}

fn json<T: Serialize>(value: &T) -> String {
    serde_json::to_string(value).unwrap_or_else(|e| format!("<{}>", e))
}
