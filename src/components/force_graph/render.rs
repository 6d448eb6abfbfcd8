use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::LargeNetworkState;

/// Node and link sizes are screen pixels, so they are divided by the zoom.
pub fn render(state: &LargeNetworkState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("white");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_links(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn draw_links(state: &LargeNetworkState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let positions = state.positions();
	let (dash, gap) = (8.0 / k, 4.0 / k);
	if state.flowing {
		let _ = ctx.set_line_dash(&js_sys::Array::of2(
			&JsValue::from_f64(dash),
			&JsValue::from_f64(gap),
		));
		ctx.set_line_dash_offset(-(state.flow_time * 30.0 / k) % (dash + gap));
	}

	for link in state.links() {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&link.source), positions.get(&link.target))
		else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = dx.hypot(dy);
		if dist < 0.001 {
			continue;
		}
		let width = state.edge_size(link) / k;
		let arrow_size = (width * 2.0).max(4.0 / k);
		let (ux, uy) = (dx / dist, dy / dist);

		ctx.set_stroke_style_str(&link.color);
		ctx.set_line_width(width);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2 - ux * arrow_size, y2 - uy * arrow_size);
		ctx.stroke();

		let (back_x, back_y) = (x2 - ux * arrow_size, y2 - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.set_fill_style_str(&link.color);
		ctx.begin_path();
		ctx.move_to(x2, y2);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
	}
	let _ = ctx.set_line_dash(&js_sys::Array::new());
}

/// Crossings first so centroids stay on top.
fn draw_nodes(state: &LargeNetworkState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	for centroids in [false, true] {
		state.graph.visit_nodes(|node| {
			let info = &node.data.user_data;
			if info.centroid != centroids {
				return;
			}
			let (x, y) = (node.x() as f64, node.y() as f64);
			ctx.begin_path();
			let _ = ctx.arc(x, y, state.node_size(info) / k, 0.0, 2.0 * PI);
			ctx.set_fill_style_str(&info.color);
			ctx.fill();
		});
	}
}
