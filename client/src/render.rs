use web_sys::CanvasRenderingContext2d;

use scribepad_shared::capture::{replay, PathOp};
use scribepad_shared::SurfaceConfig;

use crate::state::State;

pub fn apply_path_op(ctx: &CanvasRenderingContext2d, op: PathOp) {
    match op {
        PathOp::Begin { at } => {
            ctx.begin_path();
            ctx.move_to(at.x, at.y);
        }
        PathOp::Quad { control, end } => {
            ctx.quadratic_curve_to(control.x, control.y, end.x, end.y);
            ctx.stroke();
        }
        PathOp::End => ctx.close_path(),
    }
}

pub fn prepare_context(ctx: &CanvasRenderingContext2d, surface: &SurfaceConfig) {
    ctx.set_line_cap("round");
    ctx.set_line_join("round");
    ctx.set_stroke_style_str(&surface.stroke_color);
    ctx.set_line_width(surface.line_width);
}

pub fn clear_surface(state: &State) {
    let ctx = &state.ctx;
    ctx.clear_rect(0.0, 0.0, state.board_width, state.board_height);
    ctx.set_fill_style_str(&state.config.surface.background);
    ctx.fill_rect(0.0, 0.0, state.board_width, state.board_height);
}

/// Wipes the pixels and paints the committed strokes again.
pub fn redraw(state: &State) {
    clear_surface(state);
    for stroke in state.session.capture.strokes() {
        for op in replay(stroke) {
            apply_path_op(&state.ctx, op);
        }
    }
}
