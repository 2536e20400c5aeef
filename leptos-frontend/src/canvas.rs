use route_planner::{Room, RoomKind};
use wasm_bindgen::JsCast;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement};

/// Draw the rooms of one floor in floor-pixel coordinates.
///
/// The canvas sits inside the pan/zoom layer, so no scaling happens here.
pub fn render_floor(canvas: &HtmlCanvasElement, rooms: &[Room], selected_id: Option<&str>) {
    let Some(context) = context_2d(canvas) else {
        return;
    };

    let width = canvas.width() as f64;
    let height = canvas.height() as f64;

    context.clear_rect(0.0, 0.0, width, height);
    context.set_fill_style(&"#fefce8".into());
    context.fill_rect(0.0, 0.0, width, height);

    if rooms.is_empty() {
        context.set_fill_style(&"#999".into());
        context.set_font("20px sans-serif");
        let _ = context.fill_text("No rooms on this floor", 200.0, height / 2.0);
        return;
    }

    for room in rooms {
        let selected = selected_id == Some(room.id.as_str());
        let (fill, stroke) = room_colors(room.kind, selected);

        context.set_fill_style(&fill.into());
        context.set_global_alpha(0.8);
        context.fill_rect(room.x, room.y, room.width, room.height);
        context.set_global_alpha(1.0);

        context.set_stroke_style(&stroke.into());
        context.set_line_width(2.0);
        context.stroke_rect(room.x, room.y, room.width, room.height);
    }

    // Labels on top of every room
    context.set_fill_style(&"#1f2937".into());
    context.set_font("10px sans-serif");
    context.set_text_align("center");
    context.set_text_baseline("middle");

    for room in rooms {
        let center = room.center();
        let _ = context.fill_text_with_max_width(&room.name, center.x, center.y, room.width - 4.0);
    }
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
    canvas
        .get_context("2d")
        .ok()
        .flatten()?
        .dyn_into::<CanvasRenderingContext2d>()
        .ok()
}

/// Fill and border colour for a room
fn room_colors(kind: RoomKind, selected: bool) -> (&'static str, &'static str) {
    if selected {
        return ("#fed7aa", "#fb923c");
    }

    match kind {
        RoomKind::Room => ("#bfdbfe", "#60a5fa"),
        RoomKind::Stairs => ("#e5e7eb", "#9ca3af"),
        RoomKind::Elevator => ("#d1d5db", "#6b7280"),
    }
}
