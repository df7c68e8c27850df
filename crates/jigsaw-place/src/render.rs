//! Debug rendering of the assembled board.

use crate::placer::Placement;
use jigsaw_core::SideSlot;
use std::fmt::Write;

const CANVAS_WIDTH: u32 = 5000;
const CANVAS_HEIGHT: u32 = 4000;
const MARGIN: u32 = 10;
const SIDE_COLORS: [&str; 4] = ["cc0000", "999900", "00aa99", "3300bb"];
const INCENTER_COLOR: &str = "bb4400";

fn fmt_f64(value: f64) -> String {
    format!("{:.3}", value)
}

/// Render every placed side as an SVG polyline.
///
/// Sides are colored by placed slot. Sides on the board outline are drawn
/// thicker and dashed. One dot marks each piece's incenter. Coordinates are
/// multiplied by `scale`.
pub fn render_board_svg(placement: &Placement, scale: f64) -> String {
    let mut svg = String::new();
    svg.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>"#);
    let _ = write!(
        svg,
        r#"<svg width="{w}" height="{h}" viewBox="-{m} -{m} {vw} {vh}" xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink">"#,
        w = CANVAS_WIDTH,
        h = CANVAS_HEIGHT,
        m = MARGIN,
        vw = CANVAS_WIDTH + 2 * MARGIN,
        vh = CANVAS_HEIGHT + 2 * MARGIN,
    );

    for piece in &placement.pieces {
        for slot in SideSlot::ALL {
            let on_outline = match slot {
                SideSlot::Top => piece.y == 0,
                SideSlot::Right => piece.x + 1 == placement.width,
                SideSlot::Bottom => piece.y + 1 == placement.height,
                SideSlot::Left => piece.x == 0,
            };
            let points = piece
                .side(slot)
                .iter()
                .map(|p| format!("{},{}", fmt_f64(p.x * scale), fmt_f64(p.y * scale)))
                .collect::<Vec<_>>()
                .join(" ");
            let (stroke_width, dash) = if on_outline {
                ("1.5", r#" stroke-dasharray="9,3""#)
            } else {
                ("1.0", "")
            };
            let _ = write!(
                svg,
                r#"<polyline points="{points}" style="fill:none; stroke:#{color}; stroke-width:{stroke_width}"{dash} />"#,
                color = SIDE_COLORS[slot.index()],
            );
        }
        let _ = write!(
            svg,
            r#"<circle cx="{}" cy="{}" r="1.0" style="fill:#{INCENTER_COLOR}; stroke-width:0" />"#,
            fmt_f64(piece.incenter.x * scale),
            fmt_f64(piece.incenter.y * scale),
        );
    }
    svg.push_str("</svg>");
    svg
}
