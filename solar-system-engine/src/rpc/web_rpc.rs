use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::engine::audio::speech::{SpeechState, ToggleSpeech};
use crate::engine::bodies::registry::BodyRegistry;
use crate::engine::catalog::body_facts::{BodyFacts, ReferenceFacts};
use crate::engine::core::app_state::{AppState, CrashReport, ReloadScene};
use crate::engine::core::frame::FrameSet;
use crate::engine::feeds::space_weather::SpaceWeather;
use crate::engine::state::view_state::{BodyId, LandmarkId, LensMode, ViewStateStore};
use crate::engine::state::visual_modes::VisualMode;
use crate::engine::systems::fps_tracking::FrameRate;

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

/// JSON-RPC error structure following specification.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct RpcError {
    pub code: i32,
    pub message: String,
    pub data: Option<serde_json::Value>,
}

/// Resource managing bidirectional RPC communication between the page and Bevy.
/// Handles both request-response patterns and notification broadcasting.
#[derive(Resource, Default)]
pub struct WebRpcInterface {
    outgoing_notifications: Vec<RpcNotification>,
    outgoing_responses: Vec<RpcResponse>,
}

impl WebRpcInterface {
    /// Send notification to the page without expecting response.
    pub fn send_notification(&mut self, method: &str, params: serde_json::Value) {
        self.outgoing_notifications.push(RpcNotification {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
        });
    }

    /// Queue response for transmission to the page.
    fn queue_response(&mut self, response: RpcResponse) {
        self.outgoing_responses.push(response);
    }

    /// Methods of the notifications queued so far, oldest first.
    pub fn pending_notifications(&self) -> impl Iterator<Item = &str> {
        self.outgoing_notifications.iter().map(|n| n.method.as_str())
    }
}

/// Plugin establishing WebRPC communication layer for iframe-based deployment.
pub struct WebRpcPlugin;

impl Plugin for WebRpcPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<WebRpcInterface>()
            .add_event::<IncomingRpcMessage>()
            .add_systems(
                Update,
                (process_incoming_messages, handle_rpc_messages)
                    .chain()
                    .in_set(FrameSet::Input),
            )
            .add_systems(
                PostUpdate,
                (publish_state_notifications, send_outgoing_messages).chain(),
            )
            .add_systems(OnEnter(AppState::Crashed), notify_scene_crashed);

        #[cfg(target_arch = "wasm32")]
        app.add_systems(Startup, setup_message_listener);
    }
}

/// Window listener owned by the world; dropping it unregisters it.
#[cfg(target_arch = "wasm32")]
struct MessageListener {
    closure: Closure<dyn FnMut(MessageEvent)>,
}

#[cfg(target_arch = "wasm32")]
impl Drop for MessageListener {
    fn drop(&mut self) {
        if let Some(window) = window() {
            let _ = window.remove_event_listener_with_callback(
                "message",
                self.closure.as_ref().unchecked_ref(),
            );
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn setup_message_listener(world: &mut World) {
    use std::sync::Arc;
    use std::sync::Mutex;

    // Thread-safe message queue for cross-thread communication.
    let message_queue: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));
    let queue_clone = message_queue.clone();

    let closure = Closure::wrap(Box::new(move |event: MessageEvent| {
        // Filter messages to ensure they contain string data.
        if let Ok(data) = event.data().dyn_into::<js_sys::JsString>() {
            let message_str: String = data.into();

            if message_str.contains("jsonrpc") {
                if let Ok(mut queue) = queue_clone.lock() {
                    queue.push(message_str);
                }
            }
        }
    }) as Box<dyn FnMut(MessageEvent)>);

    let Some(window) = window() else {
        error!("Window object not available, RPC disabled");
        return;
    };
    if let Err(e) =
        window.add_event_listener_with_callback("message", closure.as_ref().unchecked_ref())
    {
        error!("Failed to register message listener: {:?}", e);
        return;
    }

    world.insert_non_send_resource(MessageListener { closure });
    world.insert_resource(MessageQueue(message_queue));
}

/// Resource wrapping thread-safe message queue for WASM event handling.
#[derive(Resource)]
struct MessageQueue(std::sync::Arc<std::sync::Mutex<Vec<String>>>);

/// Event representing incoming RPC message from the page.
#[derive(Event)]
struct IncomingRpcMessage {
    content: String,
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

/// Engine actions requested over RPC that are not plain view-state writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RpcAction {
    ToggleSpeech,
    ReloadScene,
}

/// Everything a request handler may read or write.
pub struct RpcContext<'a> {
    pub store: &'a mut ViewStateStore,
    pub registry: &'a BodyRegistry,
    pub facts: &'a ReferenceFacts,
    pub weather: &'a SpaceWeather,
    pub is_speaking: bool,
    pub fps: Option<f32>,
    pub actions: Vec<RpcAction>,
}

fn handle_rpc_messages(
    mut events: EventReader<IncomingRpcMessage>,
    mut rpc_interface: ResMut<WebRpcInterface>,
    mut store: ResMut<ViewStateStore>,
    registry: Res<BodyRegistry>,
    facts: Res<ReferenceFacts>,
    weather: Res<SpaceWeather>,
    speech: Res<SpeechState>,
    frame_rate: Res<FrameRate>,
    mut speech_events: EventWriter<ToggleSpeech>,
    mut reload_events: EventWriter<ReloadScene>,
) {
    for event in events.read() {
        let request = match serde_json::from_str::<RpcRequest>(&event.content) {
            Ok(request) => request,
            Err(parse_error) => {
                warn!("Discarding malformed RPC message: {parse_error}");
                continue;
            }
        };
        debug!("RPC {}", request.method);

        let mut context = RpcContext {
            store: &mut *store,
            registry: &*registry,
            facts: &*facts,
            weather: &*weather,
            is_speaking: speech.is_speaking,
            fps: frame_rate.fps,
            actions: Vec::new(),
        };
        let response = handle_rpc_request(&request, &mut context);

        for action in context.actions {
            match action {
                RpcAction::ToggleSpeech => {
                    speech_events.write(ToggleSpeech);
                }
                RpcAction::ReloadScene => {
                    reload_events.write(ReloadScene);
                }
            }
        }
        if let Some(response) = response {
            rpc_interface.queue_response(response);
        }
    }
}

/// Execute one request. Requests without an ID are notifications: they run
/// but produce no response.
pub fn handle_rpc_request(request: &RpcRequest, ctx: &mut RpcContext) -> Option<RpcResponse> {
    let params = &request.params;
    let result = match request.method.as_str() {
        "select_body" => handle_select_body(params, ctx),
        "set_time_scale" => handle_set_time_scale(params, ctx),
        "set_visual_mode" => handle_set_visual_mode(params, ctx),
        "set_missions_visible" => {
            handle_set_flag(params, "visible", ViewStateStore::set_missions_visible, ctx)
        }
        "set_audio_enabled" => {
            handle_set_flag(params, "enabled", ViewStateStore::set_audio_enabled, ctx)
        }
        "set_lab_mode" => handle_set_flag(params, "enabled", ViewStateStore::set_lab_mode, ctx),
        "set_ui_focus" => handle_set_flag(params, "focused", ViewStateStore::set_ui_focus, ctx),
        "set_deep_dive" => handle_set_deep_dive(params, ctx),
        "set_active_landmark" => handle_set_active_landmark(params, ctx),
        "set_lens_mode" => handle_set_lens_mode(params, ctx),
        "toggle_speech" => {
            ctx.actions.push(RpcAction::ToggleSpeech);
            Ok(serde_json::json!({ "success": true, "was_speaking": ctx.is_speaking }))
        }
        "reload_scene" => {
            ctx.actions.push(RpcAction::ReloadScene);
            Ok(serde_json::json!({ "success": true }))
        }
        "get_view_state" => handle_get_view_state(ctx),
        "get_body_facts" => handle_get_body_facts(params, ctx),
        "get_space_weather" => Ok(ctx.weather.to_json()),
        "get_fps" => Ok(serde_json::json!({ "fps": ctx.fps.unwrap_or(0.0) })),
        _ => {
            warn!("Unknown RPC method: {}", request.method);
            return request.id.clone().map(|id| {
                create_error_response(
                    id,
                    -32601,
                    "Method not found",
                    Some(serde_json::json!({"method": request.method})),
                )
            });
        }
    };

    if let Err(error) = &result {
        warn!("RPC {} rejected: {}", request.method, error.message);
    }
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

fn parse_params<T: for<'de> Deserialize<'de>>(
    params: &serde_json::Value,
    expected: &str,
) -> Result<T, RpcError> {
    serde_json::from_value::<T>(params.clone())
        .map_err(|_| RpcError::invalid_params(&format!("Expected {expected}")))
}

fn handle_select_body(
    params: &serde_json::Value,
    ctx: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct SelectBodyParams {
        body: Option<String>,
    }

    let parsed: SelectBodyParams = parse_params(params, "'body' parameter (string or null)")?;
    let body = parsed.body.map(BodyId::new);
    if let Some(id) = &body {
        if !ctx.registry.contains(id) {
            return Err(RpcError::invalid_params(&format!("Unknown body: {id}")));
        }
    }

    let changed = ctx.store.select_body(body);
    if changed {
        info!("Selection set over RPC: {:?}", ctx.store.state().selected_body);
    }
    Ok(serde_json::json!({
        "success": true,
        "changed": changed,
        "selected_body": ctx.store.state().selected_body
    }))
}

fn handle_set_time_scale(
    params: &serde_json::Value,
    ctx: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct TimeScaleParams {
        time_scale: f32,
    }

    let parsed: TimeScaleParams = parse_params(params, "numeric 'time_scale' parameter")?;
    let applied = ctx.store.set_time_scale(parsed.time_scale);
    Ok(serde_json::json!({ "success": true, "time_scale": applied }))
}

fn handle_set_visual_mode(
    params: &serde_json::Value,
    ctx: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct VisualModeParams {
        mode: String,
        enabled: bool,
    }

    let parsed: VisualModeParams = parse_params(params, "'mode' and 'enabled' parameters")?;
    let mode = VisualMode::from_string(&parsed.mode)
        .ok_or_else(|| RpcError::invalid_params(&format!("Unknown visual mode: {}", parsed.mode)))?;
    ctx.store.set_visual_mode(mode, parsed.enabled);
    Ok(serde_json::json!({
        "success": true,
        "visual_modes": ctx.store.state().visual_modes
    }))
}

/// Shared shape of the boolean setters: `{ "<field>": bool }`.
fn handle_set_flag(
    params: &serde_json::Value,
    field: &str,
    apply: impl FnOnce(&mut ViewStateStore, bool),
    ctx: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    let value = params
        .get(field)
        .and_then(serde_json::Value::as_bool)
        .ok_or_else(|| RpcError::invalid_params(&format!("Expected boolean '{field}' parameter")))?;
    apply(&mut *ctx.store, value);

    let mut result = serde_json::json!({ "success": true });
    result[field] = serde_json::Value::Bool(value);
    Ok(result)
}

fn handle_set_deep_dive(
    params: &serde_json::Value,
    ctx: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct DeepDiveParams {
        active: bool,
    }

    let parsed: DeepDiveParams = parse_params(params, "boolean 'active' parameter")?;
    let accepted = ctx.store.set_deep_dive(parsed.active);
    Ok(serde_json::json!({
        "success": accepted,
        "deep_dive_active": ctx.store.state().deep_dive_active
    }))
}

fn handle_set_active_landmark(
    params: &serde_json::Value,
    ctx: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct LandmarkParams {
        landmark: Option<String>,
    }

    let parsed: LandmarkParams = parse_params(params, "'landmark' parameter (string or null)")?;
    let landmark = parsed.landmark.map(LandmarkId::new);

    // Reject names the loaded facts do not know for the selected body.
    if let (Some(id), Some(selected)) = (&landmark, &ctx.store.state().selected_body) {
        if let Some(body) = ctx.facts.get(selected) {
            if body.landmark(id).is_none() {
                return Err(RpcError::invalid_params(&format!(
                    "{selected} has no landmark {id}"
                )));
            }
        }
    }

    let accepted = ctx.store.set_active_landmark(landmark);
    Ok(serde_json::json!({
        "success": accepted,
        "active_landmark": ctx.store.state().active_landmark
    }))
}

fn handle_set_lens_mode(
    params: &serde_json::Value,
    ctx: &mut RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct LensParams {
        lens: String,
    }

    let parsed: LensParams = parse_params(params, "'lens' parameter")?;
    let lens = LensMode::from_string(&parsed.lens)
        .ok_or_else(|| RpcError::invalid_params(&format!("Unknown lens: {}", parsed.lens)))?;
    ctx.store.set_lens(lens);
    Ok(serde_json::json!({ "success": true, "lens": lens.to_string() }))
}

fn handle_get_view_state(ctx: &RpcContext) -> Result<serde_json::Value, RpcError> {
    let state = serde_json::to_value(ctx.store.state())
        .map_err(|e| RpcError::internal_error(&format!("Could not serialise view state: {e}")))?;
    Ok(serde_json::json!({
        "state": state,
        "revision": ctx.store.revision(),
        "is_speaking": ctx.is_speaking
    }))
}

fn handle_get_body_facts(
    params: &serde_json::Value,
    ctx: &RpcContext,
) -> Result<serde_json::Value, RpcError> {
    #[derive(Deserialize)]
    struct BodyFactsParams {
        body: String,
    }

    let parsed: BodyFactsParams = parse_params(params, "'body' parameter")?;
    let facts = ctx.facts.get(&BodyId::new(parsed.body.as_str()));
    let value = match facts {
        Some(body) => serde_json::to_value(body)
            .map_err(|e| RpcError::internal_error(&format!("Could not serialise facts: {e}")))?,
        None => serde_json::Value::Null,
    };
    Ok(serde_json::json!({ "body": parsed.body, "facts": value }))
}

/// Compact facts payload carried by `selection_changed`.
pub fn facts_summary(body: Option<&BodyFacts>) -> serde_json::Value {
    match body {
        Some(body) => serde_json::json!({
            "classification": body.classification,
            "colour": body.colour,
            "description": body.description,
            "landmarks": body.landmarks.iter().map(|l| l.name.as_str()).collect::<Vec<_>>(),
        }),
        None => serde_json::Value::Null,
    }
}

/// Push selection, hover, weather and speech changes to the page.
fn publish_state_notifications(
    mut rpc_interface: ResMut<WebRpcInterface>,
    store: Res<ViewStateStore>,
    facts: Res<ReferenceFacts>,
    weather: Res<SpaceWeather>,
    speech: Res<SpeechState>,
    mut last_selected: Local<Option<BodyId>>,
    mut last_hovered: Local<Option<BodyId>>,
    mut last_speaking: Local<bool>,
) {
    let state = store.state();

    if *last_selected != state.selected_body {
        last_selected.clone_from(&state.selected_body);
        let summary = state
            .selected_body
            .as_ref()
            .map_or(serde_json::Value::Null, |id| facts_summary(facts.get(id)));
        rpc_interface.send_notification(
            "selection_changed",
            serde_json::json!({
                "body": state.selected_body,
                "facts": summary
            }),
        );
    }

    if *last_hovered != state.hovered_body {
        last_hovered.clone_from(&state.hovered_body);
        rpc_interface.send_notification(
            "hover_changed",
            serde_json::json!({ "body": state.hovered_body }),
        );
    }

    if weather.is_changed() {
        rpc_interface.send_notification("space_weather", weather.to_json());
    }

    if *last_speaking != speech.is_speaking {
        *last_speaking = speech.is_speaking;
        rpc_interface.send_notification(
            "speech_state",
            serde_json::json!({ "is_speaking": speech.is_speaking }),
        );
    }
}

fn notify_scene_crashed(report: Res<CrashReport>, mut rpc_interface: ResMut<WebRpcInterface>) {
    rpc_interface.send_notification(
        "scene_crashed",
        serde_json::json!({ "message": report.message }),
    );
}

/// Create standardized error response with optional data payload.
fn create_error_response(
    id: serde_json::Value,
    code: i32,
    message: &str,
    data: Option<serde_json::Value>,
) -> RpcResponse {
    RpcResponse {
        jsonrpc: "2.0".to_string(),
        result: None,
        error: Some(RpcError {
            code,
            message: message.to_string(),
            data,
        }),
        id: Some(id),
    }
}

/// Send queued notifications and responses to the page.
fn send_outgoing_messages(mut rpc_interface: ResMut<WebRpcInterface>) {
    if rpc_interface.outgoing_notifications.is_empty() && rpc_interface.outgoing_responses.is_empty()
    {
        return;
    }

    // Send notifications first.
    for notification in rpc_interface.outgoing_notifications.drain(..) {
        send_message_to_parent(&notification);
    }

    // Send responses second to maintain order.
    for response in rpc_interface.outgoing_responses.drain(..) {
        send_message_to_parent(&response);
    }
}

/// Send serialized message to parent window (the page UI).
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
        // No-op for non-WASM targets.
        let _ = message;
    }
}

/// Standard RPC error codes and constructors.
impl RpcError {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::bodies::registry::{TrackedBody, TrackedKind};
    use crate::engine::catalog::body_facts::{BodyFactsLibrary, Landmark};

    fn registry() -> BodyRegistry {
        let mut registry = BodyRegistry::default();
        for (name, kind) in [("Sun", TrackedKind::Star), ("Mars", TrackedKind::Planet)] {
            registry.insert(
                BodyId::new(name),
                TrackedBody {
                    entity: Entity::from_raw(registry.len() as u32 + 1),
                    radius: 3.0,
                    gravity_mass: 6.0,
                    kind,
                },
            );
        }
        registry
    }

    fn facts() -> ReferenceFacts {
        ReferenceFacts::from_library(BodyFactsLibrary {
            bodies: vec![BodyFacts {
                name: "Mars".to_string(),
                classification: "Terrestrial Planet".to_string(),
                colour: "#E27B58".to_string(),
                description: "The red planet.".to_string(),
                history: String::new(),
                significance: String::new(),
                stats: Vec::new(),
                composition: Vec::new(),
                mechanics: Vec::new(),
                habitability: None,
                landmarks: vec![Landmark {
                    name: "Olympus Mons".to_string(),
                    description: String::new(),
                    coords: [0.0, 3.0, 0.0],
                }],
            }],
        })
    }

    fn request(method: &str, params: serde_json::Value) -> RpcRequest {
        RpcRequest {
            jsonrpc: "2.0".to_string(),
            method: method.to_string(),
            params,
            id: Some(serde_json::json!(1)),
        }
    }

    struct Fixture {
        store: ViewStateStore,
        registry: BodyRegistry,
        facts: ReferenceFacts,
        weather: SpaceWeather,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                store: ViewStateStore::default(),
                registry: registry(),
                facts: facts(),
                weather: SpaceWeather::NoData,
            }
        }

        fn call(&mut self, method: &str, params: serde_json::Value) -> (RpcResponse, Vec<RpcAction>) {
            let mut ctx = RpcContext {
                store: &mut self.store,
                registry: &self.registry,
                facts: &self.facts,
                weather: &self.weather,
                is_speaking: false,
                fps: Some(60.0),
                actions: Vec::new(),
            };
            let response = handle_rpc_request(&request(method, params), &mut ctx).unwrap();
            (response, ctx.actions)
        }
    }

    #[test]
    fn test_select_known_and_unknown_body() {
        let mut fixture = Fixture::new();
        let (response, _) = fixture.call("select_body", serde_json::json!({ "body": "Mars" }));
        assert!(response.error.is_none());
        assert_eq!(fixture.store.state().selected_body, Some(BodyId::new("Mars")));

        let (response, _) = fixture.call("select_body", serde_json::json!({ "body": "Vulcan" }));
        assert_eq!(response.error.unwrap().code, -32602);
        assert_eq!(fixture.store.state().selected_body, Some(BodyId::new("Mars")));

        fixture.call("select_body", serde_json::json!({ "body": null }));
        assert_eq!(fixture.store.state().selected_body, None);
    }

    #[test]
    fn test_time_scale_is_clamped() {
        let mut fixture = Fixture::new();
        let (response, _) = fixture.call("set_time_scale", serde_json::json!({ "time_scale": 500 }));
        assert_eq!(response.result.unwrap()["time_scale"], 100.0);

        let (response, _) = fixture.call("set_time_scale", serde_json::json!({ "time_scale": "fast" }));
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[test]
    fn test_visual_mode_and_flags() {
        let mut fixture = Fixture::new();
        fixture.call(
            "set_visual_mode",
            serde_json::json!({ "mode": "gravity", "enabled": true }),
        );
        assert!(fixture.store.state().mode(VisualMode::Gravity));

        let (response, _) = fixture.call(
            "set_visual_mode",
            serde_json::json!({ "mode": "wormhole", "enabled": true }),
        );
        assert!(response.error.is_some());

        fixture.call("set_missions_visible", serde_json::json!({ "visible": true }));
        fixture.call("set_ui_focus", serde_json::json!({ "focused": true }));
        assert!(fixture.store.state().missions_visible);
        assert!(fixture.store.state().ui_focus);

        let (response, _) = fixture.call("set_lab_mode", serde_json::json!({}));
        assert_eq!(response.error.unwrap().code, -32602);
    }

    #[test]
    fn test_landmark_requires_selection_and_known_name() {
        let mut fixture = Fixture::new();
        let (response, _) = fixture.call(
            "set_active_landmark",
            serde_json::json!({ "landmark": "Olympus Mons" }),
        );
        assert_eq!(response.result.unwrap()["success"], false);

        fixture.call("select_body", serde_json::json!({ "body": "Mars" }));
        let (response, _) = fixture.call(
            "set_active_landmark",
            serde_json::json!({ "landmark": "Gale Crater" }),
        );
        assert!(response.error.is_some());

        fixture.call(
            "set_active_landmark",
            serde_json::json!({ "landmark": "Olympus Mons" }),
        );
        assert_eq!(
            fixture.store.state().active_landmark,
            Some(LandmarkId::new("Olympus Mons"))
        );
    }

    #[test]
    fn test_actions_are_reported() {
        let mut fixture = Fixture::new();
        let (_, actions) = fixture.call("toggle_speech", serde_json::Value::Null);
        assert_eq!(actions, vec![RpcAction::ToggleSpeech]);
        let (_, actions) = fixture.call("reload_scene", serde_json::Value::Null);
        assert_eq!(actions, vec![RpcAction::ReloadScene]);
    }

    #[test]
    fn test_reads() {
        let mut fixture = Fixture::new();
        let (response, _) = fixture.call("get_view_state", serde_json::Value::Null);
        let result = response.result.unwrap();
        assert_eq!(result["state"]["time_scale"], 1.0);
        assert_eq!(result["state"]["lens"], "normal");

        let (response, _) = fixture.call("get_body_facts", serde_json::json!({ "body": "Pluto" }));
        assert!(response.result.unwrap()["facts"].is_null());

        let (response, _) = fixture.call("get_space_weather", serde_json::Value::Null);
        assert_eq!(response.result.unwrap()["status"], "no_data");

        let (response, _) = fixture.call("get_fps", serde_json::Value::Null);
        assert_eq!(response.result.unwrap()["fps"], 60.0);
    }

    #[test]
    fn test_unknown_method_and_notifications() {
        let mut fixture = Fixture::new();
        let (response, _) = fixture.call("warp_drive", serde_json::Value::Null);
        assert_eq!(response.error.unwrap().code, -32601);

        let mut notification = request("set_missions_visible", serde_json::json!({ "visible": true }));
        notification.id = None;
        let mut ctx = RpcContext {
            store: &mut fixture.store,
            registry: &fixture.registry,
            facts: &fixture.facts,
            weather: &fixture.weather,
            is_speaking: false,
            fps: None,
            actions: Vec::new(),
        };
        assert!(handle_rpc_request(&notification, &mut ctx).is_none());
        assert!(fixture.store.state().missions_visible);
    }

    #[test]
    fn test_request_without_params_parses() {
        let request: RpcRequest =
            serde_json::from_str(r#"{"jsonrpc":"2.0","method":"get_fps","id":7}"#).unwrap();
        assert!(request.params.is_null());
    }
}
