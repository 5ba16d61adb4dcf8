//! JSON-RPC 2.0 communication layer for the hosting web page.
//!
//! The engine runs inside an iframe; the page drives it and listens to it
//! through `postMessage`, using requests, responses and notifications.
//!
//! ## Message Flow
//!
//! ```text
//! Page (Parent Window)  <──postMessage──>  Bevy (iframe)
//!        │                                        │
//!        ├─ Request (with ID) ──────────────────> │
//!        │                                        ├─ Apply to view state
//!        │ <───────────────── Response (with ID) ─┤
//!        │                                        │
//!        │ <────────── Notification (no ID) ─────┤
//! ```
//!
//! A request without an ID is still executed, it just gets no response.
//!
//! ## Sending Notifications from Bevy
//!
//! ```rust,ignore
//! fn your_system(mut rpc: ResMut<WebRpcInterface>) {
//!     rpc.send_notification("event_name", json!({ "data": "value" }));
//! }
//! ```
//!
//! ## Error Handling
//!
//! - `-32601`: Method not found
//! - `-32602`: Invalid params (including unknown bodies, modes and lenses)
//! - `-32603`: Internal error
//!
//! ## Methods
//!
//! ### View State
//! - `select_body`: `{ body: string | null }`
//! - `set_time_scale`: `{ time_scale: number }`, clamped to [-10, 100]
//! - `set_visual_mode`: `{ mode, enabled }`
//! - `set_missions_visible`: `{ visible }`
//! - `set_audio_enabled`: `{ enabled }`
//! - `set_deep_dive`: `{ active }`, refused without a selection
//! - `set_active_landmark`: `{ landmark: string | null }`, refused without a selection
//! - `set_lens_mode`: `{ lens: "normal" | "thermal" | "xray" | "retro" }`
//! - `set_lab_mode`: `{ enabled }`
//! - `set_ui_focus`: `{ focused }`, suppresses canvas picking while the page owns the pointer
//!
//! ### Actions
//! - `toggle_speech`: start or stop narration of the selected body
//! - `reload_scene`: rebuild the scene, the way out of the crash state
//!
//! ### Queries
//! - `get_view_state`, `get_body_facts`, `get_space_weather`, `get_fps`
//!
//! ## Notifications
//! - `selection_changed`, `hover_changed`, `space_weather`, `speech_state`
//! - `fps_update` every half second
//! - `scene_crashed` with the build error message

/// JSON-RPC 2.0 transport, request handlers and state notifications.
pub mod web_rpc;
