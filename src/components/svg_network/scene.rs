use std::sync::Arc;

use crate::components::viewport::{Fit, fit_to_viewport};
use crate::config::ViewConfig;
use crate::encoding::{LinkPaint, ZonePaint, link_label, node_label};
use crate::legend::{LegendBoard, LegendDimension};
use crate::model::{EdgeGeometry, GraphDataset, Range, ResultsDataset};
use crate::renderer::NetworkRenderer;
use crate::view_state::ViewState;

/// The arrow marker sits at `norm / (MARKER_DIVISOR * network_size)`.
const MARKER_DIVISOR: f64 = 1.67;

/// Arrowhead box, in stroke widths: narrow along the link, taller across it.
pub(crate) const MARKER_WIDTH: f64 = 2.0;
pub(crate) const MARKER_HEIGHT: f64 = 3.0;

/// Drawn circle of a node, in screen orientation (y pointing down).
#[derive(Clone, Debug, PartialEq)]
pub struct NodeVisual {
	/// Index into the dataset's nodes.
	pub index: usize,
	/// Whether the node is a centroid.
	pub centroid: bool,
	/// Center x.
	pub cx: f64,
	/// Center y, flipped.
	pub cy: f64,
	/// Circle radius.
	pub radius: f64,
	/// Fill color.
	pub fill: String,
	/// Tooltip.
	pub title: String,
}

/// Drawn line of a link.
#[derive(Clone, Debug, PartialEq)]
pub struct LinkVisual {
	/// Index into the dataset's edges.
	pub index: usize,
	/// Id of the link's arrow marker.
	pub marker_id: String,
	/// Start x.
	pub x1: f64,
	/// Start y, flipped.
	pub y1: f64,
	/// End x.
	pub x2: f64,
	/// End y, flipped.
	pub y2: f64,
	/// Line width.
	pub stroke_width: f64,
	/// Stroke and arrow color.
	pub color: String,
	/// Arrow position along the line.
	pub marker_ref_x: f64,
	/// Tooltip.
	pub title: String,
	geometry: EdgeGeometry,
	lanes: f64,
}

/// Exact-geometry scene of a small network.
pub struct SmallNetworkScene {
	graph: Arc<GraphDataset>,
	results: Option<Arc<ResultsDataset>>,
	config: ViewConfig,
	network_size: f64,
	nodes: Vec<NodeVisual>,
	links: Vec<LinkVisual>,
	legends: LegendBoard,
}

impl SmallNetworkScene {
	/// Links without a drawable geometry are left out. Centroids come first
	/// so crossings are drawn on top of them.
	pub fn new(
		graph: Arc<GraphDataset>,
		results: Option<Arc<ResultsDataset>>,
		config: ViewConfig,
	) -> Self {
		let mut nodes: Vec<NodeVisual> = graph
			.nodes
			.iter()
			.enumerate()
			.map(|(index, node)| NodeVisual {
				index,
				centroid: node.is_centroid(),
				cx: node.x,
				cy: -node.y,
				radius: 0.0,
				fill: if node.is_centroid() {
					config.zone_color.clone()
				} else {
					config.crossing_color.clone()
				},
				title: node_label(node),
			})
			.collect();
		nodes.sort_by_key(|node| !node.centroid);

		let links = graph
			.edges
			.iter()
			.enumerate()
			.filter_map(|(index, edge)| {
				graph.edge_geometry(edge).map(|geometry| LinkVisual {
					index,
					marker_id: format!("marker_{}", edge.id),
					x1: geometry.x1,
					y1: -geometry.y1,
					x2: geometry.x2,
					y2: -geometry.y2,
					stroke_width: 0.0,
					color: config.link_color.clone(),
					marker_ref_x: 0.0,
					title: String::new(),
					geometry,
					lanes: edge.lanes.value,
				})
			})
			.collect();

		Self {
			graph,
			results,
			config,
			network_size: 0.0,
			nodes,
			links,
			legends: LegendBoard::default(),
		}
	}

	/// Circles, in drawing order.
	pub fn nodes(&self) -> &[NodeVisual] {
		&self.nodes
	}

	/// Lines, in drawing order.
	pub fn links(&self) -> &[LinkVisual] {
		&self.links
	}

	/// Base unit of every size, in world units.
	pub fn network_size(&self) -> f64 {
		self.network_size
	}

	/// Initial transform for a viewport, with the y axis flipped.
	pub fn fit(&self, width: f64, height: f64) -> Fit {
		let (x, y) = self.graph.bounds();
		fit_to_viewport(x, Range::new(-y.max, -y.min), width, height)
	}

	/// Move one node; links and other nodes stay where they are.
	pub fn move_node(&mut self, index: usize, cx: f64, cy: f64) -> Option<&NodeVisual> {
		let node = self.nodes.iter_mut().find(|node| node.index == index)?;
		node.cx = cx;
		node.cy = cy;
		Some(node)
	}

	fn crossing_radius(&self) -> f64 {
		self.config.crossing_factor() * self.network_size
	}
}

impl NetworkRenderer for SmallNetworkScene {
	fn set_size(&mut self, view: &ViewState) {
		self.network_size = self.graph.min_link_norm() * view.size_multiplier / 40.0;
		let size = self.network_size;
		let crossing_radius = self.crossing_radius();
		// Endpoints shift by half a crossing radius along the link vector.
		let offset = crossing_radius / 2.0;
		let max_lanes = self.config.max_lanes;

		for link in &mut self.links {
			let g = link.geometry;
			link.stroke_width = size * link.lanes.min(max_lanes);
			link.x1 = g.x1 + offset * g.dx;
			link.x2 = g.x2 + offset * g.dx;
			link.y1 = -(g.y1 - offset * g.dy);
			link.y2 = -(g.y2 - offset * g.dy);
			let ref_x = g.norm / (MARKER_DIVISOR * size);
			link.marker_ref_x = if ref_x.is_finite() { ref_x } else { 0.0 };
		}
		for node in self.nodes.iter_mut().filter(|node| !node.centroid) {
			node.radius = crossing_radius;
		}
		self.draw_zones(view);
	}

	fn draw_zones(&mut self, view: &ViewState) {
		let paint = ZonePaint::new(view.zone, &self.graph, &self.config);
		let crossing_radius = self.crossing_radius();
		for node in self.nodes.iter_mut().filter(|node| node.centroid) {
			let Some(metrics) = self.graph.nodes[node.index].metrics() else {
				continue;
			};
			node.fill = paint.color(metrics);
			node.radius = match paint.ratio(metrics) {
				Some(ratio) => (1.0 + 2.0 * ratio) * crossing_radius,
				None => 2.0 * crossing_radius,
			};
		}
		self.legends.replace(LegendDimension::Zones, paint.legend);
	}

	fn draw_links(&mut self, view: &ViewState) {
		let paint = LinkPaint::new(
			view.link,
			view.population,
			view.period,
			&self.graph,
			self.results.as_deref(),
			&self.config,
		);
		for link in &mut self.links {
			let edge = &self.graph.edges[link.index];
			link.color = paint.color(edge);
			link.title = link_label(edge, &paint);
		}
		self.legends.replace(LegendDimension::Links, paint.legend);
	}

	fn legends(&self) -> &LegendBoard {
		&self.legends
	}

	fn supports_sub_population(&self) -> bool {
		true
	}
}

#[cfg(test)]
mod tests {
	use std::collections::HashMap;

	use super::*;
	use crate::attribute::{FlowMetric, LinkAttribute, SubPopulation, ZoneAttribute};
	use crate::model::{ColorScale, FlowSeries, Schedule};
	use crate::renderer::apply_view;

	const NETWORK: &str = r#"{
		"stats": {
			"departures": {"min": 0, "max": 100},
			"arrivals": {"min": 0, "max": 0},
			"lanes": {"min": 1, "max": 6},
			"x": {"min": 0, "max": 100},
			"y": {"min": 0, "max": 50},
			"norm": {"min": 40, "max": 100}
		},
		"colorscales": {
			"departures": ["d0", "d1", "d2", "d3"],
			"lanes": ["l0", "l1"]
		},
		"graph": {
			"nodes": [
				{"id": 1, "x": 0, "y": 0, "name": "Z1", "centroid": "true",
				 "departures": {"values": 50, "colors": "dep-50"},
				 "arrivals": {"values": 0, "colors": "arr-0"}},
				{"id": 2, "x": 100, "y": 0, "name": "C2", "centroid": "false"},
				{"id": 3, "x": 100, "y": 50, "name": "C3", "centroid": "false"}
			],
			"edges": [
				{"id": 10, "source": 1, "target": 2, "name": "a",
				 "x1": 0, "y1": 0, "x2": 100, "y2": 0, "dx": 0, "dy": 1, "norm": 100,
				 "lanes": {"values": 2, "colors": "lanes-2"}},
				{"id": 11, "source": 2, "target": 3, "name": "b",
				 "lanes": {"values": 6, "colors": "lanes-6"}},
				{"id": 12, "source": 3, "target": 3, "name": "loop"}
			]
		}
	}"#;

	fn scene_with(results: Option<ResultsDataset>) -> SmallNetworkScene {
		let graph = GraphDataset::from_json(NETWORK).unwrap();
		SmallNetworkScene::new(Arc::new(graph), results.map(Arc::new), ViewConfig::default())
	}

	fn results() -> ResultsDataset {
		let series = |color: &str| {
			FlowSeries::new(
				Range::new(0.0, 30.0),
				HashMap::from([
					("10".to_string(), vec![format!("{color}0"), format!("{color}1")]),
					("11".to_string(), vec![format!("{color}0"), format!("{color}1")]),
				]),
				HashMap::new(),
			)
		};
		ResultsDataset::new(
			ColorScale::new(vec!["r0".into(), "r1".into()]),
			Schedule::new(0.0, 10.0, 2),
			HashMap::from([
				((FlowMetric::InFlow, SubPopulation::H), series("h")),
				((FlowMetric::InFlow, SubPopulation::S), series("s")),
			]),
		)
	}

	fn link<'a>(scene: &'a SmallNetworkScene, id: &str) -> &'a LinkVisual {
		scene
			.links()
			.iter()
			.find(|link| link.marker_id == format!("marker_{id}"))
			.unwrap()
	}

	fn node<'a>(scene: &'a SmallNetworkScene, index: usize) -> &'a NodeVisual {
		scene.nodes().iter().find(|node| node.index == index).unwrap()
	}

	#[test]
	fn sizes_follow_the_shortest_link() {
		let mut scene = scene_with(None);
		apply_view(&mut scene, None, &ViewState::default());
		// 40 * 1 / 40
		assert_eq!(scene.network_size(), 1.0);

		let a = link(&scene, "10");
		assert_eq!(a.stroke_width, 2.0);
		assert_eq!(a.marker_ref_x, 100.0 / 1.67);
		// offset by half a crossing radius (2.5) along (dx, dy) = (0, 1)
		assert_eq!((a.x1, a.y1, a.x2, a.y2), (0.0, 2.5, 100.0, 2.5));

		// lanes beyond four are drawn as four
		assert_eq!(link(&scene, "11").stroke_width, 4.0);
		assert_eq!(node(&scene, 1).radius, 5.0);
		assert_eq!(node(&scene, 0).radius, 10.0);
	}

	#[test]
	fn zero_length_links_are_not_drawn() {
		let scene = scene_with(None);
		assert_eq!(scene.links().len(), 2);
		assert!(scene.links().iter().all(|link| link.marker_id != "marker_12"));
	}

	#[test]
	fn doubling_the_multiplier_doubles_sizes() {
		let mut scene = scene_with(None);
		let view = ViewState {
			zone: ZoneAttribute::Departures,
			..ViewState::default()
		};
		scene.set_size(&view);
		let widths: Vec<f64> = scene.links().iter().map(|l| l.stroke_width).collect();
		let radii: Vec<f64> = scene.nodes().iter().map(|n| n.radius).collect();

		scene.set_size(&ViewState {
			size_multiplier: 2.0,
			..view
		});
		for (link, width) in scene.links().iter().zip(&widths) {
			assert_eq!(link.stroke_width, 2.0 * width);
		}
		for (node, radius) in scene.nodes().iter().zip(&radii) {
			assert_eq!(node.radius, 2.0 * radius);
		}
	}

	#[test]
	fn centroid_radius_scales_with_the_selected_value() {
		let mut scene = scene_with(None);
		let view = ViewState {
			zone: ZoneAttribute::Departures,
			..ViewState::default()
		};
		apply_view(&mut scene, None, &view);
		let centroid = node(&scene, 0);
		// (1 + 2 * 50/100) * 5 * 1
		assert_eq!(centroid.radius, 10.0);
		assert_eq!(centroid.fill, "dep-50");

		// the arrivals maximum is zero: radius falls back to the base size
		let arrivals = ViewState {
			zone: ZoneAttribute::Arrivals,
			..view
		};
		apply_view(&mut scene, Some(&view), &arrivals);
		assert_eq!(node(&scene, 0).radius, 5.0);
		assert!(node(&scene, 0).radius.is_finite());
	}

	#[test]
	fn none_and_back_restores_the_same_visuals() {
		let mut scene = scene_with(None);
		let lanes = ViewState {
			zone: ZoneAttribute::Departures,
			link: LinkAttribute::Lanes,
			..ViewState::default()
		};
		apply_view(&mut scene, None, &lanes);
		let (nodes, links) = (scene.nodes().to_vec(), scene.links().to_vec());
		let legends = scene.legends().clone();

		let none = ViewState {
			zone: ZoneAttribute::None,
			link: LinkAttribute::None,
			..lanes
		};
		apply_view(&mut scene, Some(&lanes), &none);
		assert_eq!(link(&scene, "10").color, ViewConfig::default().link_color);
		assert_eq!(node(&scene, 0).fill, ViewConfig::default().zone_color);
		assert_eq!(scene.legends().count(), 0);

		apply_view(&mut scene, Some(&none), &lanes);
		assert_eq!(scene.nodes(), nodes.as_slice());
		assert_eq!(scene.links(), links.as_slice());
		assert_eq!(scene.legends(), &legends);
	}

	#[test]
	fn repeated_draws_keep_one_legend_per_dimension() {
		let mut scene = scene_with(None);
		let view = ViewState {
			zone: ZoneAttribute::Departures,
			link: LinkAttribute::Lanes,
			..ViewState::default()
		};
		for _ in 0..5 {
			scene.draw_zones(&view);
			scene.draw_links(&view);
		}
		assert_eq!(scene.legends().count(), 2);
		let zones = scene.legends().get(LegendDimension::Zones).unwrap();
		assert_eq!(zones.colorscale.len(), 4);
		assert_eq!(zones.domain, Range::new(0.0, 100.0));
		let links = scene.legends().get(LegendDimension::Links).unwrap();
		assert_eq!(links.domain, Range::new(1.0, 6.0));
	}

	#[test]
	fn time_varying_colors_follow_period_and_population() {
		let mut scene = scene_with(Some(results()));
		let view = ViewState {
			link: LinkAttribute::Flow(FlowMetric::InFlow),
			..ViewState::default()
		};
		apply_view(&mut scene, None, &view);
		assert_eq!(link(&scene, "10").color, "h0");

		let later = ViewState { period: 1, ..view };
		apply_view(&mut scene, Some(&view), &later);
		assert_eq!(link(&scene, "10").color, "h1");

		let other = ViewState {
			population: SubPopulation::S,
			..later
		};
		apply_view(&mut scene, Some(&later), &other);
		assert_eq!(link(&scene, "11").color, "s1");
		let legend = scene.legends().get(LegendDimension::Links).unwrap();
		assert_eq!(legend.domain, Range::new(0.0, 30.0));
		assert_eq!(legend.colorscale.len(), 2);
	}

	#[test]
	fn dragging_moves_only_the_dragged_node() {
		let mut scene = scene_with(None);
		apply_view(&mut scene, None, &ViewState::default());
		let before = scene.nodes().to_vec();
		let links = scene.links().to_vec();

		scene.move_node(2, 80.0, -20.0).unwrap();

		let moved = node(&scene, 2);
		assert_eq!((moved.cx, moved.cy), (80.0, -20.0));
		for (after, before) in scene.nodes().iter().zip(&before) {
			if after.index != 2 {
				assert_eq!(after, before);
			}
		}
		assert_eq!(scene.links(), links.as_slice());
		assert!(scene.move_node(99, 0.0, 0.0).is_none());
	}

	#[test]
	fn fit_flips_the_y_axis() {
		let scene = scene_with(None);
		let fit = scene.fit(400.0, 400.0);
		assert_eq!(fit.min_zoom, 4.0);
		let (sx, sy) = fit.transform.world_to_screen(50.0, -25.0);
		assert!((sx - 200.0).abs() < 1e-9 && (sy - 200.0).abs() < 1e-9);
	}

	#[test]
	fn arrowheads_are_narrower_than_tall() {
		assert_eq!((MARKER_WIDTH, MARKER_HEIGHT), (2.0, 3.0));
		assert!(MARKER_WIDTH < MARKER_HEIGHT);
	}
}
