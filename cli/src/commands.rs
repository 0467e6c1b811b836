use std::io::Write;

use edgeline_core::sensitivity::{inset_width_px, nearest_preset, preset_scale, INSET_SCALE_PRESETS};
use edgeline_core::{AppConfigExt, EdgeSnapshot};
use edgeline_overlay::OverlaySnapshot;
use edgeline_overlay::platform::{find_monitor_by_id, get_all_monitors};
use edgeline_types::Edge;

use crate::CliContext;

pub async fn attach(ctx: &CliContext) {
    let state = ctx.overlay.lock().await.attach();
    println!("overlay {}", state.as_str());
}

pub async fn detach(ctx: &CliContext) {
    let mut overlay = ctx.overlay.lock().await;
    overlay.detach();
    println!("overlay {}", overlay.state().as_str());
}

pub async fn set_width(ctx: &CliContext, edge: Edge, width: i32) {
    if !ctx.overlay.lock().await.set_width(edge, width) {
        println!("overlay detached, {edge} width dropped");
    }
}

pub async fn hide(ctx: &CliContext, edge: Edge) {
    let overlay = ctx.overlay.lock().await;
    if overlay.hide(edge) {
        println!(
            "{edge} hides in {}ms unless changed",
            overlay.config().hide_delay_ms
        );
    } else {
        println!("overlay detached, hide dropped");
    }
}

/// Simulate dragging the sensitivity slider for `edge` to `scale`.
pub async fn set_scale(ctx: &CliContext, edge: Edge, scale: f32) -> Result<(), String> {
    if !scale.is_finite() || scale <= 0.0 {
        return Err(format!("error: scale must be positive, got {scale}"));
    }
    let density = ctx.config.read().await.indicator.density;
    let width = inset_width_px(scale, density);

    ctx.set_scale(edge, scale).await;
    tracing::debug!(%edge, scale, width, "Sensitivity changed");
    set_width(ctx, edge, width).await;
    println!("{edge}: scale {scale:.2} -> {width}px");
    Ok(())
}

/// Snap `edge` to slider stop `index`.
pub async fn apply_preset(ctx: &CliContext, edge: Edge, index: usize) -> Result<(), String> {
    let scale = preset_scale(index).ok_or_else(|| {
        format!(
            "error: preset {index} out of range (0..{})",
            INSET_SCALE_PRESETS.len()
        )
    })?;
    set_scale(ctx, edge, scale).await
}

pub async fn list_presets(ctx: &CliContext) {
    let density = ctx.config.read().await.indicator.density;
    let current = [
        nearest_preset(ctx.scale(Edge::Left).await),
        nearest_preset(ctx.scale(Edge::Right).await),
    ];

    for (idx, &scale) in INSET_SCALE_PRESETS.iter().enumerate() {
        let marks: Vec<&str> = Edge::ALL
            .iter()
            .filter(|edge| current[edge.index()] == idx)
            .map(|edge| edge.as_str())
            .collect();
        println!(
            "[{idx}] {scale:.2}  {:>4}px  {}",
            inset_width_px(scale, density),
            marks.join(",")
        );
    }
}

pub async fn show_status(ctx: &CliContext) {
    let overlay = ctx.overlay.lock().await;
    println!("overlay {}", overlay.state().as_str());
    if let Some(snapshot) = overlay.snapshot().await {
        print!("{}", format_snapshot(&snapshot));
    }
}

pub async fn show_config(ctx: &CliContext) {
    let config = ctx.config.read().await;
    match edgeline_core::AppConfig::config_path() {
        Ok(path) => println!("config file: {}", path.display()),
        Err(e) => println!("config file: unavailable ({e})"),
    }
    println!("{:#?}", config.indicator);
}

pub async fn save_config(ctx: &CliContext) -> Result<(), String> {
    ctx.config
        .read()
        .await
        .save()
        .map_err(|e| format!("error: {e}"))?;
    println!("config saved");
    Ok(())
}

/// Re-read the config file. Timing changes apply on the next attach.
pub async fn reload_config(ctx: &CliContext) -> Result<(), String> {
    let config = edgeline_core::AppConfig::try_load().map_err(|e| format!("error: {e}"))?;
    ctx.overlay
        .lock()
        .await
        .set_config(config.indicator.clone());
    *ctx.config.write().await = config;
    println!("config reloaded; reattach to apply timing changes");
    Ok(())
}

pub async fn list_monitors(ctx: &CliContext) {
    let monitors = get_all_monitors();
    if monitors.is_empty() {
        println!("no monitors found");
        return;
    }
    let target = ctx.config.read().await.indicator.target_monitor_id.clone();
    let chosen = find_monitor_by_id(&monitors, target.as_deref()).map(|m| m.id.clone());
    for monitor in &monitors {
        let mark = if chosen.as_deref() == Some(monitor.id.as_str()) {
            "*"
        } else {
            " "
        };
        println!(
            "{mark} {:<10} {}x{}+{}+{}{}",
            monitor.id,
            monitor.width,
            monitor.height,
            monitor.x,
            monitor.y,
            if monitor.is_primary { "  primary" } else { "" }
        );
    }
}

pub fn exit() {
    let _ = writeln!(std::io::stdout(), "quitting...");
    let _ = std::io::stdout().flush();
}

fn format_edge(edge: &EdgeSnapshot) -> String {
    let progress = edge
        .progress
        .map(|p| format!(" {:>3.0}%", p * 100.0))
        .unwrap_or_default();
    let hide = edge
        .hide_at
        .map(|at| format!("  hide@{}ms", at.as_millis()))
        .unwrap_or_default();
    format!(
        "{:<5} {:>7.1}px -> {:>5.1}px  {}{}{}\n",
        edge.edge.as_str(),
        edge.current_width,
        edge.target_width,
        edge.phase.as_str(),
        progress,
        hide
    )
}

pub fn format_snapshot(snapshot: &OverlaySnapshot) -> String {
    let (width, height) = snapshot.surface_size;
    let mut out = format!(
        "surface {width}x{height}, {} frames, t={}ms\n",
        snapshot.frames_rendered,
        snapshot.indicators.taken_at.as_millis()
    );
    out.push_str(&format_edge(&snapshot.indicators.left));
    out.push_str(&format_edge(&snapshot.indicators.right));
    out
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use edgeline_core::{EdgePhase, IndicatorSnapshot};

    use super::*;

    fn edge(edge: Edge, current: f32, target: f32, phase: EdgePhase) -> EdgeSnapshot {
        EdgeSnapshot {
            edge,
            current_width: current,
            target_width: target,
            phase,
            progress: (phase == EdgePhase::Animating).then_some(0.5),
            hide_at: (phase == EdgePhase::HideScheduled).then_some(Duration::from_millis(900)),
        }
    }

    #[test]
    fn snapshot_lists_both_edges() {
        let snapshot = OverlaySnapshot {
            indicators: IndicatorSnapshot {
                taken_at: Duration::from_millis(250),
                left: edge(Edge::Left, 20.0, 40.0, EdgePhase::Animating),
                right: edge(Edge::Right, 48.0, 48.0, EdgePhase::HideScheduled),
            },
            frames_rendered: 12,
            surface_size: (1920, 1080),
        };

        let text = format_snapshot(&snapshot);
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "surface 1920x1080, 12 frames, t=250ms");
        assert!(lines[1].starts_with("left"));
        assert!(lines[1].contains("20.0px"));
        assert!(lines[1].ends_with("animating  50%"));
        assert!(lines[2].contains("hide@900ms"));
    }
}
