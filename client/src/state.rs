use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

use scribepad_shared::session::DrawingSession;
use scribepad_shared::ClientConfig;

pub struct State {
    pub canvas: HtmlCanvasElement,
    pub ctx: CanvasRenderingContext2d,
    pub config: ClientConfig,
    pub session: DrawingSession,
    /// Pointer that owns the open stroke; other pointers are ignored.
    pub active_pointer: Option<i32>,
    pub expanded: bool,
    pub board_width: f64,
    pub board_height: f64,
}

impl State {
    pub fn new(
        canvas: HtmlCanvasElement,
        ctx: CanvasRenderingContext2d,
        config: ClientConfig,
    ) -> Self {
        Self {
            canvas,
            ctx,
            config,
            session: DrawingSession::new(),
            active_pointer: None,
            expanded: false,
            board_width: 0.0,
            board_height: 0.0,
        }
    }
}
