use crate::engine::assets::model_slot::ModelSlot;
use crate::engine::assets::viewer_manifest::ModelSources;
use crate::engine::core::app_state::AppState;
use crate::engine::loading::progress::{FitStatus, LoadingProgress};
use crate::engine::scene::models::ViewerModels;
use crate::tools::visibility_toggle::{ToggleModelVisibility, ToggleSource};
use bevy::diagnostic::{DiagnosticsStore, FrameTimeDiagnosticsPlugin};
use bevy::prelude::*;
use serde::{Deserialize, Serialize};

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::prelude::*;

#[cfg(target_arch = "wasm32")]
use wasm_bindgen::JsValue;

#[cfg(target_arch = "wasm32")]
use web_sys::{MessageEvent, window};

/// JSON-RPC 2.0 request structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcRequest {
    pub jsonrpc: String,
    pub method: String,
    #[serde(default)]
    pub params: serde_json::Value,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 response structure.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcResponse {
    pub jsonrpc: String,
    pub result: Option<serde_json::Value>,
    pub error: Option<RpcError>,
    pub id: Option<serde_json::Value>,
}

/// JSON-RPC 2.0 notification structure for one-way communication.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RpcNotification {
    pub jsonrpc: String,
    pub method: String,
    pub params: serde_json::Value,
}

/// JSON-RPC 2.0 error object.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Queues of outgoing messages to the host page, flushed once per frame.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the host page without expecting a response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    #[cfg(test)]
    pub fn pending_notifications(&self) -> &[RpcNotification] {
        &self.outgoing_notifications
    }

    #[cfg(test)]
    pub fn pending_responses(&self) -> &[RpcResponse] {
        &self.outgoing_responses
    }
}

/// Plugin establishing the host-page communication layer.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_event::<ToggleModelVisibility>()
            .add_systems(
                Update,
                (
                    process_incoming_messages,
                    handle_rpc_messages,
                    send_outgoing_messages,
                )
                    .chain(),
            );

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(mut commands: Commands) {
    use std::sync::Arc;
    use std::sync::Mutex;

    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();
            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    if let Some(window) = window() {
        if let Err(e) =
            window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
        {
            error!("Failed to register message listener: {:?}", e);
        }
    }

    // Ownership passes to JS.
    closure.forget();
    commands.insert_resource(MessageQueue(message_queue));
}

/// Messages received by the JS listener, drained each frame.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Raw message from the host page.
#[derive(Event)]
pub struct IncomingRpcMessage {
    pub content: String,
}

fn process_incoming_messages(
    message_queue: Option<Res<MessageQueue>>,
    mut message_events: EventWriter<IncomingRpcMessage>,
) {
    let Some(queue_res) = message_queue else {
        return;
    };

    let messages = if let Ok(mut queue) = queue_res.0.lock() {
        std::mem::take(&mut *queue)
    } else {
        Vec::new()
    };

    for message_str in messages {
        message_events.write(IncomingRpcMessage {
            content: message_str,
        });
    }
}

/// Per-model entry of `get_viewer_state`.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ModelSnapshot {
    pub model: ModelSlot,
    pub label: String,
    pub locator: String,
    pub attached: bool,
    pub visible: bool,
}

/// Everything the host page can ask about the viewer.
#[derive(Serialize, Debug, Clone, PartialEq)]
pub struct ViewerSnapshot {
    pub state: &'static str,
    pub models: Vec<ModelSnapshot>,
    pub camera_fitted: bool,
    pub failure: Option<String>,
}

impl ViewerSnapshot {
    pub fn capture(
        state: AppState,
        progress: &LoadingProgress,
        models: &ViewerModels,
        sources: &ModelSources,
        visibilities: &Query<&Visibility>,
    ) -> Self {
        let models = ModelSlot::LOAD_ORDER
            .into_iter()
            .map(|slot| {
                let source = sources.get(slot);
                let visible = models
                    .get(slot)
                    .and_then(|entity| visibilities.get(entity).ok())
                    .is_some_and(|visibility| *visibility != Visibility::Hidden);
                ModelSnapshot {
                    model: slot,
                    label: source.label.clone(),
                    locator: source.locator.clone(),
                    attached: progress.is_attached(slot),
                    visible,
                }
            })
            .collect();

        Self {
            state: state.as_str(),
            models,
            camera_fitted: progress.fit_status() == FitStatus::Applied,
            failure: progress.failure().map(ToString::to_string),
        }
    }
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    diagnostics: Option<Res<DiagnosticsStore>>,
    state: Res<State<AppState>>,
    loading_progress: Res<LoadingProgress>,
    models: Res<ViewerModels>,
    sources: Res<ModelSources>,
    visibilities: Query<&Visibility>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut toggle_events: EventWriter<ToggleModelVisibility>,
) {
    for event in events.read() {
        let request = match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("Discarding malformed RPC message: {}", parse_error);
                rpc_interface.send_notification(
                    "debug_message",
                    serde_json::json!({
                        "message": format!("Parse error: {}", parse_error)
                    }),
                );
                continue;
            }
        };
        debug!("Processing RPC method: {}", request.method);

        let snapshot = ViewerSnapshot::capture(
            *state.get(),
            &loading_progress,
            &models,
            &sources,
            &visibilities,
        );
        let mut toggles = Vec::new();
        let response =
            handle_rpc_request(&request, diagnostics.as_deref(), &snapshot, &mut toggles);

        for slot in toggles {
            toggle_events.write(ToggleModelVisibility {
                slot,
                source: ToggleSource::Rpc,
            });
        }
        if let Some(response) = response {
            rpc_interface.queue_response(response);
        }
    }
}

/// Dispatch one request. Toggle requests are pushed onto `toggles` so the
/// caller can forward them through the shared toggle event.
///
/// Notifications (no `id`) still take effect but produce no response.
pub fn handle_rpc_request(
    request: &RpcRequest,
    diagnostics: Option<&DiagnosticsStore>,
    snapshot: &ViewerSnapshot,
    toggles: &mut Vec<ModelSlot>,
) -> Option<RpcResponse> {
    let result = match request.method.as_str() {
        "toggle_model" => handle_toggle_model(&request.params, snapshot, toggles),
        "get_viewer_state" => handle_get_viewer_state(snapshot),
        "get_fps" => handle_get_fps(diagnostics),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            Err(RpcError::method_not_found(&request.method))
        }
    };

    let id = request.id.clone()?;
    match result {
        Ok(result_value) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: Some(result_value),
            error: None,
            id: Some(id),
        }),
        Err(error) => Some(RpcResponse {
            jsonrpc: "2.0".to_string(),
            result: None,
            error: Some(error),
            id: Some(id),
        }),
    }
}

/// Parse `{"model": "..."}` into a toggleable slot.
pub fn parse_toggle_params(params: &serde_json::Value) -> Result<ModelSlot, RpcError> {
    #[derive(Deserialize)]
    struct ToggleModelParams {
        model: String,
    }

    let toggle_params = serde_json::from_value::<ToggleModelParams>(params.clone())
        .map_err(|_| RpcError::invalid_params("Expected 'model' parameter"))?;

    let slot = ModelSlot::from_string(&toggle_params.model)
        .ok_or_else(|| RpcError::invalid_params(&format!("Unknown model: {}", toggle_params.model)))?;

    if !slot.is_toggleable() {
        return Err(RpcError::invalid_params(&format!(
            "The {} model cannot be toggled",
            slot
        )));
    }
    Ok(slot)
}

fn handle_toggle_model(
    params: &serde_json::Value,
    snapshot: &ViewerSnapshot,
    toggles: &mut Vec<ModelSlot>,
) -> Result<serde_json::Value, RpcError> {
    let slot = parse_toggle_params(params)?;
    toggles.push(slot);

    let attached = snapshot
        .models
        .iter()
        .any(|model| model.model == slot && model.attached);
    info!("Toggle requested over RPC: {}", slot);

    Ok(serde_json::json!({
        "success": true,
        "model": slot.as_str(),
        "attached": attached,
    }))
}

fn handle_get_viewer_state(snapshot: &ViewerSnapshot) -> Result<serde_json::Value, RpcError> {
    serde_json::to_value(snapshot).map_err(|e| RpcError::internal_error(&e.to_string()))
}

fn handle_get_fps(diagnostics: Option<&DiagnosticsStore>) -> Result<serde_json::Value, RpcError> {
    let fps = diagnostics
        .and_then(|store| store.get(&FrameTimeDiagnosticsPlugin::FPS))
        .and_then(|fps_diagnostic| fps_diagnostic.smoothed())
        .unwrap_or(0.0) as f32;

    Ok(serde_json::json!({
        "fps": fps
    }))
}

/// Send queued notifications and responses to the host page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

fn send_message_to_parent<T: Serialize>(message: &T) {
    #[cfg(target_arch = "wasm32")]
    {
        match serde_json::to_string(message) {
            Ok(json) => {
                if let Some(window) = window() {
                    if let Some(parent) = window.parent().ok().flatten() {
                        if let Err(e) = parent.post_message(&JsValue::from_str(&json), "*") {
                            error!("Failed to send message to parent: {:?}", e);
                        }
                    } else {
                        warn!("No parent window available for message transmission");
                    }
                } else {
                    error!("Window object not available");
                }
            }
            Err(e) => {
                error!("Failed to serialize message: {}", e);
            }
        }
    }

    #[cfg(not(target_arch = "wasm32"))]
    {
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
    pub fn method_not_found(method: &str) -> Self {
        Self {
            code: -32601,
            message: "Method not found".to_string(),
            data: Some(serde_json::json!({ "method": method })),
        }
    }

    pub fn invalid_params(message: &str) -> Self {
        Self {
            code: -32602,
            message: message.to_string(),
            data: None,
        }
    }

    pub fn internal_error(message: &str) -> Self {
        Self {
            code: -32603,
            message: message.to_string(),
            data: None,
        }
    }
}
