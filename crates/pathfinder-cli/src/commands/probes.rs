//! Probe commands - read-only device status

use anyhow::Result;
use pathfinder_core::{Diagnostics, Response};
use pathfinder_provider::Provider;

use crate::output::{yes_no, OutputContext, WifiRow};

/// Print diagnostics, or a note when the device reported nothing
fn report<T>(response: Response<T>, what: &str, ctx: &OutputContext) -> (Option<T>, Diagnostics) {
    if response.state.is_none() && !response.has_error() {
        ctx.info(&format!("Device reports no {}", what));
    }
    (response.state, response.diagnostics)
}

/// Show device identity and versions
pub async fn device(provider: &Provider, ctx: &OutputContext) -> Result<Diagnostics> {
    let (status, diagnostics) = report(provider.device().read(None).await, "status", ctx);

    if let Some(status) = status {
        let features = status
            .features
            .iter()
            .map(|(name, enabled)| format!("{}={}", name, enabled))
            .collect::<Vec<_>>()
            .join(", ");
        let pairs = vec![
            ("Name", status.name.clone()),
            ("Uptime", format!("{:.0}s", status.uptime)),
            (
                "ID",
                status
                    .identifiers
                    .as_ref()
                    .map(|i| format!("{} ({})", i.long, i.short))
                    .unwrap_or_else(|| "-".to_string()),
            ),
            (
                "API version",
                status
                    .versions
                    .as_ref()
                    .map(|v| v.api.clone())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            (
                "App version",
                status
                    .versions
                    .as_ref()
                    .map(|v| v.app.clone())
                    .unwrap_or_else(|| "-".to_string()),
            ),
            ("Features", if features.is_empty() { "-".to_string() } else { features }),
        ];
        ctx.print_kv(&pairs, &status);
    }

    Ok(diagnostics)
}

/// Show the battery charge level
pub async fn battery(provider: &Provider, ctx: &OutputContext) -> Result<Diagnostics> {
    let (battery, diagnostics) = report(provider.battery().read(None).await, "battery", ctx);

    if let Some(battery) = battery {
        ctx.print_kv(&[("Battery", format!("{}{}", battery.value, battery.unit))], &battery);
    }
    Ok(diagnostics)
}

/// List networks seen by the device
pub async fn wifi(provider: &Provider, ctx: &OutputContext) -> Result<Diagnostics> {
    let (scan, diagnostics) = report(provider.wifi().read(None).await, "wifi scan", ctx);

    if let Some(scan) = scan {
        let rows: Vec<WifiRow> = scan
            .networks
            .into_iter()
            .map(|n| WifiRow {
                ssid: n.ssid,
                rssi: n.rssi,
                encrypted: yes_no(n.encrypted),
            })
            .collect();
        ctx.print(&rows);
    }
    Ok(diagnostics)
}

pub async fn health(provider: &Provider, ctx: &OutputContext) -> Result<Diagnostics> {
    let (health, diagnostics) = report(provider.health().read(None).await, "health", ctx);

    if let Some(health) = health {
        ctx.print_kv(&[("Healthy", yes_no(health.healthy))], &health);
    }
    Ok(diagnostics)
}

pub async fn ready(provider: &Provider, ctx: &OutputContext) -> Result<Diagnostics> {
    let (ready, diagnostics) = report(provider.ready().read(None).await, "readiness", ctx);

    if let Some(ready) = ready {
        ctx.print_kv(&[("Ready", yes_no(ready.ready))], &ready);
    }
    Ok(diagnostics)
}

/// Show whether the device refuses new movement
pub async fn lock(provider: &Provider, ctx: &OutputContext) -> Result<Diagnostics> {
    let (lock, diagnostics) =
        report(provider.movement_lock().read(None).await, "movement lock", ctx);

    if let Some(lock) = lock {
        ctx.print_kv(&[("Locked", yes_no(lock.locked))], &lock);
    }
    Ok(diagnostics)
}
