use std::cell::RefCell;
use std::rc::Rc;
use std::sync::Arc;

use leptos::html::Div;
use leptos::prelude::*;
use web_sys::{MouseEvent, WheelEvent};

use super::scene::{LinkVisual, MARKER_HEIGHT, MARKER_WIDTH, NodeVisual, SmallNetworkScene};
use crate::components::viewport::{DragState, PanState, ViewTransform, ZoomBounds};
use crate::config::ViewConfig;
use crate::legend::LegendBoard;
use crate::model::{GraphDataset, ResultsDataset};
use crate::renderer::{NetworkRenderer, apply_view};
use crate::view_state::ViewState;

/// Pointer position relative to the drawing area.
fn pointer(container: NodeRef<Div>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let rect = container.get_untracked()?.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

/// SVG drawing of a small network with draggable nodes, pan and zoom.
#[component]
pub fn SvgNetwork(
	/// The network.
	graph: Arc<GraphDataset>,
	/// Simulation results, if the run has any.
	results: Option<Arc<ResultsDataset>>,
	/// Tunables.
	config: ViewConfig,
	/// Selection to draw.
	view: RwSignal<ViewState>,
	/// Receives the legends of each draw.
	legends: RwSignal<LegendBoard>,
) -> impl IntoView {
	let container = NodeRef::<Div>::new();
	let scene = Rc::new(RefCell::new(SmallNetworkScene::new(graph, results, config)));
	let nodes = RwSignal::new(Vec::<NodeVisual>::new());
	let links = RwSignal::new(Vec::<LinkVisual>::new());
	let transform = RwSignal::new(ViewTransform::default());
	let zoom = StoredValue::new(ZoomBounds::default());
	let drag = StoredValue::new(DragState::default());
	let pan = StoredValue::new(PanState::default());

	let scene_fit = scene.clone();
	Effect::new(move |_| {
		let Some(div) = container.get() else {
			return;
		};
		let rect = div.get_bounding_client_rect();
		let fit = scene_fit.borrow().fit(rect.width(), rect.height());
		transform.set(fit.transform);
		zoom.set_value(fit.bounds);
	});

	let scene_draw = scene.clone();
	Effect::new(move |previous: Option<ViewState>| {
		let next = view.get();
		let mut scene = scene_draw.borrow_mut();
		let redraw = apply_view(&mut *scene, previous.as_ref(), &next);
		if !redraw.is_empty() {
			nodes.set(scene.nodes().to_vec());
			links.set(scene.links().to_vec());
			legends.set(scene.legends().clone());
		}
		next
	});

	let on_mousedown = move |ev: MouseEvent| {
		if let Some((x, y)) = pointer(container, &ev) {
			pan.update_value(|pan| pan.begin(x, y, &transform.get_untracked()));
		}
	};

	let scene_move = scene.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = pointer(container, &ev) else {
			return;
		};
		let current = transform.get_untracked();
		if let Some((index, cx, cy)) = drag.get_value().target(x, y, &current) {
			if let Some(moved) = scene_move.borrow_mut().move_node(index, cx, cy) {
				let moved = moved.clone();
				nodes.update(|nodes| {
					if let Some(node) = nodes.iter_mut().find(|node| node.index == index) {
						*node = moved;
					}
				});
			}
		} else if pan.get_value().active {
			transform.update(|t| pan.get_value().update(x, y, t));
		}
	};

	let release = move || {
		drag.set_value(DragState::default());
		pan.update_value(|pan| pan.active = false);
	};

	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some((x, y)) = pointer(container, &ev) {
			let factor = if ev.delta_y() > 0.0 { 0.9 } else { 1.1 };
			transform.update(|t| t.zoom_at(x, y, factor, zoom.get_value()));
		}
	};

	let node_view = move |node: NodeVisual| {
		let NodeVisual {
			index,
			cx,
			cy,
			radius,
			fill,
			title,
			..
		} = node;
		let on_grab = move |ev: MouseEvent| {
			if ev.button() != 0 {
				return;
			}
			ev.stop_propagation();
			if let Some((x, y)) = pointer(container, &ev) {
				drag.set_value(DragState::begin(index, x, y, cx, cy));
			}
		};
		view! {
			<circle cx=cx cy=cy r=radius fill=fill style="cursor: move;" on:mousedown=on_grab>
				<title>{title}</title>
			</circle>
		}
	};

	view! {
		<div node_ref=container class="network-container" style="width: 100%; height: 100%;">
			<svg
				width="100%"
				height="100%"
				style="display: block; cursor: grab;"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=move |_| release()
				on:mouseleave=move |_| release()
				on:wheel=on_wheel
			>
				<defs>
					{move || links.get().into_iter().map(marker).collect_view()}
				</defs>
				<g transform=move || transform.get().to_svg()>
					<g class="links">
						{move || links.get().into_iter().map(line).collect_view()}
					</g>
					<g class="nodes">
						{move || nodes.get().into_iter().map(node_view).collect_view()}
					</g>
				</g>
			</svg>
		</div>
	}
}

fn marker(link: LinkVisual) -> impl IntoView {
	view! {
		<marker
			id=link.marker_id
			viewBox="0 -5 10 10"
			refX=link.marker_ref_x
			refY="0"
			markerWidth=MARKER_WIDTH
			markerHeight=MARKER_HEIGHT
			orient="auto"
		>
			<path d="M0,-5L10,0L0,5" fill=link.color />
		</marker>
	}
}

fn line(link: LinkVisual) -> impl IntoView {
	view! {
		<line
			x1=link.x1
			y1=link.y1
			x2=link.x2
			y2=link.y2
			stroke=link.color
			stroke-width=link.stroke_width
			marker-end=format!("url(#{})", link.marker_id)
		>
			<title>{link.title}</title>
		</line>
	}
}
