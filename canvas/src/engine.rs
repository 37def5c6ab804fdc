use frames::{Color, FillEvent};
use tracing::{debug, info};
use wasm_bindgen::{Clamped, JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, ImageData, WebSocket};

use crate::consts::{DEFAULT_HEIGHT, DEFAULT_WIDTH};
use crate::export::{ExportError, encode_png};
use crate::fill::flood_fill;
use crate::history::{HistoryStore, Undo};
use crate::input::{Button, DrawingState, Key, Mode, Modifiers, Point};
use crate::stroke::StrokeRenderer;
use crate::surface::{Pixel, RasterSurface};
use crate::sync::{Applied, NetworkChannel, SyncProtocol};

#[cfg(test)]
#[path = "engine_test.rs"]
mod engine_test;

/// Actions returned from input handlers for the host to process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// The surface changed and should be presented.
    RenderNeeded,
    /// An undo found no earlier state; the canvas is blank.
    HistoryExhausted,
}

/// Construction-time engine settings.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    pub width: u32,
    pub height: u32,
    pub background: Color,
    /// Treat the pointer leaving the canvas as the end of the stroke.
    pub end_stroke_on_leave: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self { width: DEFAULT_WIDTH, height: DEFAULT_HEIGHT, background: Color::WHITE, end_stroke_on_leave: false }
    }
}

/// Engine state that does not depend on the canvas element.
///
/// Separated from `Engine` so it can be tested without WASM/browser dependencies.
pub struct EngineCore {
    pub surface: RasterSurface,
    pub history: HistoryStore,
    pub state: DrawingState,
    pub stroke: StrokeRenderer,
    pub sync: SyncProtocol,
    pub end_stroke_on_leave: bool,
}

impl Default for EngineCore {
    fn default() -> Self {
        Self::with_config(EngineConfig::default())
    }
}

impl EngineCore {
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self::with_config(EngineConfig { width, height, ..EngineConfig::default() })
    }

    #[must_use]
    pub fn with_config(config: EngineConfig) -> Self {
        let state = DrawingState { background: config.background, ..DrawingState::default() };
        Self {
            surface: RasterSurface::new(config.width, config.height, Pixel::from(config.background)),
            history: HistoryStore::new(),
            state,
            stroke: StrokeRenderer::new(),
            sync: SyncProtocol::new(),
            end_stroke_on_leave: config.end_stroke_on_leave,
        }
    }

    fn background(&self) -> Pixel {
        Pixel::from(self.state.background)
    }

    // --- Controls ---

    pub fn set_mode(&mut self, mode: Mode) {
        self.state.set_mode(mode);
    }

    pub fn set_color(&mut self, color: Color) {
        self.state.set_color(color);
    }

    pub fn set_width(&mut self, width: f64) {
        self.state.set_width(width);
    }

    // --- Pointer input ---

    /// Primary press: flood fill in fill mode, otherwise start a stroke and
    /// paint its first dot.
    pub fn on_pointer_down(&mut self, pt: Point, button: Button, net: &mut dyn NetworkChannel) -> Vec<Action> {
        if button != Button::Primary {
            return vec![];
        }
        if self.state.mode == Mode::Fill {
            return self.fill_at(pt, net);
        }
        self.stroke.begin_stroke(pt);
        self.extend(pt, net)
    }

    pub fn on_pointer_move(&mut self, pt: Point, net: &mut dyn NetworkChannel) -> Vec<Action> {
        if !self.stroke.is_active() {
            return vec![];
        }
        self.extend(pt, net)
    }

    /// Release ends the stroke and commits exactly one snapshot for it.
    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        if self.stroke.end_stroke() {
            self.history.commit(&self.surface);
        }
        vec![]
    }

    /// Leaving the canvas keeps the stroke alive unless configured otherwise.
    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        if self.end_stroke_on_leave {
            return self.on_pointer_up();
        }
        vec![]
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        if key.is_undo(modifiers) {
            return self.undo();
        }
        vec![]
    }

    fn extend(&mut self, pt: Point, net: &mut dyn NetworkChannel) -> Vec<Action> {
        let event = self.stroke.extend_stroke(&mut self.surface, pt, &self.state);
        self.sync.emit_draw(net, event);
        vec![Action::RenderNeeded]
    }

    // --- Fill / history ---

    /// Flood fill at `pt`. A fill that changes nothing neither commits nor emits.
    pub fn fill_at(&mut self, pt: Point, net: &mut dyn NetworkChannel) -> Vec<Action> {
        let (px, py) = pt.pixel();
        let Some((x, y)) = self.surface.address(px, py) else {
            return vec![];
        };
        let color = self.state.stroke_color();
        match flood_fill(&mut self.surface, x, y, Pixel::from(color)) {
            Ok(outcome) if outcome.changed() => {
                self.history.commit(&self.surface);
                self.sync.emit_fill(net, FillEvent { x: f64::from(x), y: f64::from(y), color });
                vec![Action::RenderNeeded]
            }
            Ok(_) | Err(_) => vec![],
        }
    }

    pub fn undo(&mut self) -> Vec<Action> {
        let background = self.background();
        match self.history.undo(&mut self.surface, background) {
            Undo::Restored => vec![Action::RenderNeeded],
            Undo::Exhausted => {
                debug!("undo: history exhausted");
                vec![Action::RenderNeeded, Action::HistoryExhausted]
            }
        }
    }

    /// Blank the canvas and drop all history. Local only; peers are not told.
    pub fn clear(&mut self) -> Vec<Action> {
        let background = self.background();
        self.surface.clear(background);
        self.history.clear();
        vec![Action::RenderNeeded]
    }

    /// Reallocate at new dimensions and repaint from the latest snapshot.
    pub fn resize(&mut self, width: u32, height: u32) -> Vec<Action> {
        let background = self.background();
        self.surface.resize(width, height, background);
        if let Some(snapshot) = self.history.latest() {
            debug!(from_width = snapshot.width(), from_height = snapshot.height(), "resize: restoring latest snapshot");
            self.surface.restore(snapshot, background);
        }
        info!(width, height, "canvas resized");
        vec![Action::RenderNeeded]
    }

    // --- Network input ---

    /// Apply one inbound relay message.
    pub fn apply_remote_text(&mut self, text: &str) -> Vec<Action> {
        match self.sync.on_remote_text(&mut self.surface, &mut self.history, text) {
            Applied::Dropped => vec![],
            Applied::Drawn | Applied::Filled(_) => vec![Action::RenderNeeded],
        }
    }

    // --- Export ---

    /// Encode the current surface as PNG.
    ///
    /// # Errors
    ///
    /// See [`encode_png`].
    pub fn export_png(&self) -> Result<Vec<u8>, ExportError> {
        encode_png(&self.surface)
    }
}

/// Sends envelopes over the browser WebSocket, if one is attached.
struct SocketChannel<'a>(Option<&'a WebSocket>);

impl NetworkChannel for SocketChannel<'_> {
    fn send(&mut self, envelope: frames::Envelope) {
        let Some(socket) = self.0 else {
            return;
        };
        if let Err(e) = socket.send_with_str(&frames::encode_envelope(&envelope)) {
            tracing::warn!(error = ?e, event = %envelope.event, "socket send failed");
        }
    }
}

/// The full canvas engine. Wraps `EngineCore` and owns the browser canvas element.
pub struct Engine {
    canvas: HtmlCanvasElement,
    ctx: CanvasRenderingContext2d,
    socket: Option<WebSocket>,
    pub core: EngineCore,
}

impl Engine {
    /// Create an engine sized to the canvas element's backing store.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the element has no 2D context.
    pub fn new(canvas: HtmlCanvasElement) -> Result<Self, JsValue> {
        let ctx = canvas
            .get_context("2d")?
            .ok_or_else(|| JsValue::from_str("2d context unavailable"))?
            .dyn_into::<CanvasRenderingContext2d>()?;
        let core = EngineCore::new(canvas.width(), canvas.height());
        Ok(Self { canvas, ctx, socket: None, core })
    }

    /// Attach the relay socket used for outbound events.
    pub fn connect(&mut self, socket: WebSocket) {
        self.socket = Some(socket);
    }

    // --- Delegated input ---

    pub fn on_pointer_down(&mut self, pt: Point, button: Button) -> Vec<Action> {
        let mut net = SocketChannel(self.socket.as_ref());
        self.core.on_pointer_down(pt, button, &mut net)
    }

    pub fn on_pointer_move(&mut self, pt: Point) -> Vec<Action> {
        let mut net = SocketChannel(self.socket.as_ref());
        self.core.on_pointer_move(pt, &mut net)
    }

    pub fn on_pointer_up(&mut self) -> Vec<Action> {
        self.core.on_pointer_up()
    }

    pub fn on_pointer_leave(&mut self) -> Vec<Action> {
        self.core.on_pointer_leave()
    }

    pub fn on_key_down(&mut self, key: &Key, modifiers: Modifiers) -> Vec<Action> {
        self.core.on_key_down(key, modifiers)
    }

    pub fn on_socket_message(&mut self, text: &str) -> Vec<Action> {
        self.core.apply_remote_text(text)
    }

    // --- Viewport ---

    /// Resize the backing store and the surface together.
    pub fn set_size(&mut self, width: u32, height: u32) -> Vec<Action> {
        self.canvas.set_width(width);
        self.canvas.set_height(height);
        self.core.resize(width, height)
    }

    // --- Render / export ---

    /// Blit the surface onto the canvas.
    ///
    /// # Errors
    ///
    /// Returns `Err` if `ImageData` cannot be built or drawn.
    pub fn render(&self) -> Result<(), JsValue> {
        let surface = &self.core.surface;
        let data = ImageData::new_with_u8_clamped_array_and_sh(Clamped(surface.as_rgba()), surface.width(), surface.height())?;
        self.ctx.put_image_data(&data, 0.0, 0.0)
    }

    /// The canvas contents as a `data:image/png` URL for download.
    ///
    /// # Errors
    ///
    /// Returns `Err` if the browser refuses to serialize the canvas.
    pub fn export_data_url(&self) -> Result<String, JsValue> {
        self.canvas.to_data_url()
    }
}
