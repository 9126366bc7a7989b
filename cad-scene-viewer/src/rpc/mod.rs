//! JSON-RPC 2.0 communication layer for host page integration.
//!
//! On wasm the viewer runs inside an iframe; the host page drives it and
//! follows its progress through `postMessage`.
//!
//! ```text
//! Host (Parent Window)  <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │ <───────────────── Response (with ID) ─┤
//!        │ <────────── Notification (no ID) ──────┤
//! ```
//!
//! A request without an `id` is treated as a notification: it still takes
//! effect but gets no response.
//!
//! ## Requests
//! - `toggle_model {model}`: show or hide `sensors` / `kids_projections`
//! - `get_viewer_state`: loading stage, per-model attach and visibility, fit status
//! - `get_fps`: current smoothed frame rate
//!
//! ## Notifications
//! - `load_stage_changed`, `model_attached`, `load_failed`
//! - `camera_fitted`, `visibility_changed`
//! - `fps_update`, `debug_message`
//!
//! Systems push notifications with `WebRpcInterface::send_notification()`;
//! the queue is flushed once per frame.
//!
//! ## Error Codes
//! - `-32601`: Method not found
//! - `-32602`: Invalid params
//! - `-32603`: Internal error

/// JSON-RPC 2.0 bidirectional communication system for the host page.
///
/// Handles request-response patterns, notifications, and WASM message listeners.
pub mod web_rpc;
