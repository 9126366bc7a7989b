use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;

use crate::constants::render_settings::FPS_NOTIFY_INTERVAL_SECS;
use crate::rpc::web_rpc::WebRpcInterface;

#[derive(Component)]
pub struct FpsText;

fn smoothed_fps(diagnostics: &DiagnosticsStore) -> Option<f64> {
    diagnostics
        .get(&FrameTimeDiagnosticsPlugin::FPS)
        .and_then(|fps| fps.smoothed())
}

pub fn fps_notification_due(now: f32, last_sent: f32) -> bool {
    now - last_sent >= FPS_NOTIFY_INTERVAL_SECS
}

pub fn fps_notification_system(
    mut rpc_interface: ResMut<WebRpcInterface>,
    diagnostics: Res<DiagnosticsStore>,
    mut last_send_time: Local<f32>,
    time: Res<Time>,
) {
    let current_time = time.elapsed_secs();
    if !fps_notification_due(current_time, *last_send_time) {
        return;
    }

    if let Some(value) = smoothed_fps(&diagnostics) {
        rpc_interface.send_notification(
            "fps_update",
            serde_json::json!({
                "fps": value as f32
            }),
        );
        *last_send_time = current_time;
    }
}

pub fn fps_text_update_system(
    diagnostics: Res<DiagnosticsStore>,
    mut query: Query<&mut Text, With<FpsText>>,
) {
    let Some(value) = smoothed_fps(&diagnostics) else {
        return;
    };
    for mut text in &mut query {
        text.0 = format!("FPS: {value:.1}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn notifies_twice_a_second() {
        assert!(!fps_notification_due(0.2, 0.0));
        assert!(fps_notification_due(0.5, 0.0));
        assert!(fps_notification_due(1.7, 1.1));
    }

    #[test]
    fn no_notification_without_samples() {
        let mut app = App::new();
        app.add_plugins(MinimalPlugins)
            .init_resource::<DiagnosticsStore>()
            .init_resource::<WebRpcInterface>()
            .add_systems(Update, fps_notification_system);
        app.update();

        assert!(
            app.world()
                .resource::<WebRpcInterface>()
                .pending_notifications()
                .is_empty()
        );
    }
}
