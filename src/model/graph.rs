use std::collections::HashMap;

use log::{info, warn};
use serde::Deserialize;

use super::{ColorScale, de_flag, de_id};
use crate::error::LoadError;

/// A precomputed attribute value together with its color code.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct Measure {
	/// Raw value.
	#[serde(rename = "values", default)]
	pub value: f64,
	/// Precomputed color of the value.
	#[serde(rename = "colors", default)]
	pub color: String,
}

/// Volume-delay function of a link, shown as its "type".
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct LinkType {
	/// Function name, shown in tooltips.
	#[serde(default)]
	pub name: String,
	/// Precomputed color of the type.
	#[serde(rename = "colors", default)]
	pub color: String,
}

/// Trip totals of a centroid.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CentroidMetrics {
	/// Trips leaving the centroid.
	pub departures: Measure,
	/// Trips reaching the centroid.
	pub arrivals: Measure,
	/// Mean of departures and arrivals.
	pub averages: Measure,
}

/// What a node stands for.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
	/// Pass-through intersection.
	Crossing,
	/// Origin or destination of trips.
	Centroid(CentroidMetrics),
}

/// A network node at payload coordinates.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	/// Payload id, as a string.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Horizontal coordinate.
	pub x: f64,
	/// Vertical coordinate, as the payload stores it.
	pub y: f64,
	/// Centroid or crossing.
	pub kind: NodeKind,
}

impl Node {
	/// Whether the node is a centroid.
	pub fn is_centroid(&self) -> bool {
		matches!(self.kind, NodeKind::Centroid(_))
	}

	/// Trip totals, for centroids.
	pub fn metrics(&self) -> Option<&CentroidMetrics> {
		match &self.kind {
			NodeKind::Centroid(metrics) => Some(metrics),
			NodeKind::Crossing => None,
		}
	}
}

/// Straight-line geometry of a link.
///
/// `(dx, dy)` is the unit vector of the link with its components swapped, the
/// convention the payload producer uses for endpoint offsets.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct EdgeGeometry {
	/// Source x.
	pub x1: f64,
	/// Source y.
	pub y1: f64,
	/// Target x.
	pub x2: f64,
	/// Target y.
	pub y2: f64,
	/// Unit vector y component.
	pub dx: f64,
	/// Unit vector x component.
	pub dy: f64,
	/// Link length.
	pub norm: f64,
}

impl EdgeGeometry {
	/// Derive the geometry of a link between two points. Zero-length links
	/// have none.
	pub fn between(x1: f64, y1: f64, x2: f64, y2: f64) -> Option<Self> {
		let (ux, uy) = (x2 - x1, y2 - y1);
		let norm = ux.hypot(uy);
		if !(norm > 0.0) {
			return None;
		}
		Some(Self {
			x1,
			y1,
			x2,
			y2,
			dx: uy / norm,
			dy: ux / norm,
			norm,
		})
	}
}

/// A directed link between two nodes.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	/// Payload id; keys the results series.
	pub id: String,
	/// Display name.
	pub name: String,
	/// Id of the source node.
	pub source: String,
	/// Id of the target node.
	pub target: String,
	/// Geometry stored in the payload, if complete.
	pub geometry: Option<EdgeGeometry>,
	/// Number of lanes.
	pub lanes: Measure,
	/// Link length.
	pub length: Measure,
	/// Free-flow speed.
	pub speed: Measure,
	/// Capacity.
	pub capacity: Measure,
	/// Volume-delay function.
	pub link_type: LinkType,
}

/// Dataset-wide range of an attribute. Averages in the payload are ignored.
#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq)]
pub struct Range {
	/// Smallest value.
	pub min: f64,
	/// Largest value.
	pub max: f64,
}

impl Range {
	/// Range from `min` to `max`.
	pub fn new(min: f64, max: f64) -> Self {
		Self { min, max }
	}

	/// `max - min`.
	pub fn span(&self) -> f64 {
		self.max - self.min
	}
}

/// Link types present in the network.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
pub struct TypeStats {
	/// Number of distinct types; the type legend spans `[0, nb]`.
	#[serde(default)]
	pub nb: usize,
}

/// Ranges of every attribute over the network.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct Statistics {
	/// Centroid departures.
	pub departures: Range,
	/// Centroid arrivals.
	pub arrivals: Range,
	/// Centroid averages.
	pub averages: Range,
	/// Link lanes.
	pub lanes: Range,
	/// Link lengths.
	pub length: Range,
	/// Link speeds.
	pub speed: Range,
	/// Link capacities.
	pub capacity: Range,
	/// Link types.
	#[serde(rename = "type")]
	pub link_type: TypeStats,
	/// Node x, unflipped.
	pub x: Option<Range>,
	/// Node y, unflipped.
	pub y: Option<Range>,
	/// Link lengths in coordinate units.
	pub norm: Option<Range>,
}

/// Legend palette of every static attribute.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct ColorScales {
	/// Centroid departures.
	pub departures: ColorScale,
	/// Centroid arrivals.
	pub arrivals: ColorScale,
	/// Centroid averages.
	pub averages: ColorScale,
	/// Link lanes.
	pub lanes: ColorScale,
	/// Link lengths.
	pub length: ColorScale,
	/// Link speeds.
	pub speed: ColorScale,
	/// Link capacities.
	pub capacity: ColorScale,
	/// Link types.
	#[serde(rename = "type")]
	pub link_type: ColorScale,
}

#[derive(Deserialize)]
struct NodeRecord {
	#[serde(deserialize_with = "de_id")]
	id: String,
	#[serde(default)]
	name: Option<String>,
	x: f64,
	y: f64,
	#[serde(default, deserialize_with = "de_flag")]
	centroid: bool,
	#[serde(default)]
	departures: Measure,
	#[serde(default)]
	arrivals: Measure,
	#[serde(default)]
	averages: Measure,
}

impl From<NodeRecord> for Node {
	fn from(record: NodeRecord) -> Self {
		let kind = if record.centroid {
			NodeKind::Centroid(CentroidMetrics {
				departures: record.departures,
				arrivals: record.arrivals,
				averages: record.averages,
			})
		} else {
			NodeKind::Crossing
		};
		Self {
			id: record.id,
			name: record.name.unwrap_or_default(),
			x: record.x,
			y: record.y,
			kind,
		}
	}
}

#[derive(Deserialize)]
struct EdgeRecord {
	#[serde(deserialize_with = "de_id")]
	id: String,
	#[serde(default)]
	name: Option<String>,
	#[serde(deserialize_with = "de_id")]
	source: String,
	#[serde(deserialize_with = "de_id")]
	target: String,
	x1: Option<f64>,
	y1: Option<f64>,
	x2: Option<f64>,
	y2: Option<f64>,
	dx: Option<f64>,
	dy: Option<f64>,
	norm: Option<f64>,
	#[serde(default)]
	lanes: Measure,
	#[serde(default)]
	length: Measure,
	#[serde(default)]
	speed: Measure,
	#[serde(default)]
	capacity: Measure,
	#[serde(rename = "type", default)]
	link_type: LinkType,
}

impl From<EdgeRecord> for Edge {
	fn from(record: EdgeRecord) -> Self {
		let geometry = match (
			record.x1, record.y1, record.x2, record.y2, record.dx, record.dy, record.norm,
		) {
			(Some(x1), Some(y1), Some(x2), Some(y2), Some(dx), Some(dy), Some(norm)) => {
				Some(EdgeGeometry {
					x1,
					y1,
					x2,
					y2,
					dx,
					dy,
					norm,
				})
			}
			_ => None,
		};
		Self {
			id: record.id,
			name: record.name.unwrap_or_default(),
			source: record.source,
			target: record.target,
			geometry,
			lanes: record.lanes,
			length: record.length,
			speed: record.speed,
			capacity: record.capacity,
			link_type: record.link_type,
		}
	}
}

#[derive(Default, Deserialize)]
struct GraphSection {
	#[serde(default)]
	nodes: Vec<NodeRecord>,
	#[serde(default)]
	edges: Vec<EdgeRecord>,
}

#[derive(Deserialize)]
struct Payload {
	#[serde(default)]
	graph: Option<GraphSection>,
	#[serde(default)]
	nodes: Vec<NodeRecord>,
	#[serde(default)]
	edges: Vec<EdgeRecord>,
	#[serde(default)]
	stats: Statistics,
	#[serde(default)]
	colorscales: ColorScales,
}

/// The static network: nodes, links, statistics and color scales.
#[derive(Clone, Debug)]
pub struct GraphDataset {
	/// Nodes in payload order.
	pub nodes: Vec<Node>,
	/// Links whose endpoints both exist.
	pub edges: Vec<Edge>,
	/// Attribute ranges.
	pub stats: Statistics,
	/// Attribute palettes.
	pub colorscales: ColorScales,
	node_index: HashMap<String, usize>,
}

impl GraphDataset {
	/// Parse the graph payload. Nodes and links may sit under `graph` or at the
	/// top level.
	pub fn from_json(text: &str) -> Result<Self, LoadError> {
		let payload: Payload = serde_json::from_str(text).map_err(LoadError::parse("network"))?;
		let section = payload.graph.unwrap_or_default();
		let nodes = section
			.nodes
			.into_iter()
			.chain(payload.nodes)
			.map(Node::from)
			.collect();
		let edges = section
			.edges
			.into_iter()
			.chain(payload.edges)
			.map(Edge::from)
			.collect();
		let dataset = Self::new(nodes, edges, payload.stats, payload.colorscales)?;
		info!(
			"loaded network: {} nodes, {} links",
			dataset.nodes.len(),
			dataset.edges.len()
		);
		Ok(dataset)
	}

	/// Links whose endpoints are unknown are dropped.
	pub fn new(
		nodes: Vec<Node>,
		edges: Vec<Edge>,
		stats: Statistics,
		colorscales: ColorScales,
	) -> Result<Self, LoadError> {
		if nodes.is_empty() {
			return Err(LoadError::EmptyGraph);
		}
		let node_index: HashMap<String, usize> = nodes
			.iter()
			.enumerate()
			.map(|(idx, node)| (node.id.clone(), idx))
			.collect();
		let edges = edges
			.into_iter()
			.filter(|edge| {
				let known = node_index.contains_key(&edge.source)
					&& node_index.contains_key(&edge.target);
				if !known {
					warn!(
						"dropping link {}: unknown endpoint {} -> {}",
						edge.id, edge.source, edge.target
					);
				}
				known
			})
			.collect();
		Ok(Self {
			nodes,
			edges,
			stats,
			colorscales,
			node_index,
		})
	}

	/// Index of the node with `id`.
	pub fn node_position(&self, id: &str) -> Option<usize> {
		self.node_index.get(id).copied()
	}

	/// The node with `id`.
	pub fn node(&self, id: &str) -> Option<&Node> {
		self.node_position(id).map(|idx| &self.nodes[idx])
	}

	/// Stored geometry, or geometry derived from the endpoint coordinates.
	pub fn edge_geometry(&self, edge: &Edge) -> Option<EdgeGeometry> {
		if edge.geometry.is_some() {
			return edge.geometry;
		}
		let (from, to) = (self.node(&edge.source)?, self.node(&edge.target)?);
		EdgeGeometry::between(from.x, from.y, to.x, to.y)
	}

	/// Length of the shortest drawable link; base unit of the SVG sizes.
	pub fn min_link_norm(&self) -> f64 {
		if let Some(norm) = self.stats.norm {
			if norm.min > 0.0 && norm.min.is_finite() {
				return norm.min;
			}
		}
		self.edges
			.iter()
			.filter_map(|edge| self.edge_geometry(edge))
			.map(|geometry| geometry.norm)
			.filter(|norm| *norm > 0.0 && norm.is_finite())
			.fold(None, |acc: Option<f64>, norm| Some(acc.map_or(norm, |m| m.min(norm))))
			.unwrap_or(1.0)
	}

	/// Coordinate ranges, from the statistics when present.
	pub fn bounds(&self) -> (Range, Range) {
		let (x, y) = self.node_bounds();
		(self.stats.x.unwrap_or(x), self.stats.y.unwrap_or(y))
	}

	/// Coordinate ranges of the nodes as stored. Large payloads carry node y
	/// already flipped while their `stats.y` is not, so they are fitted with
	/// these.
	pub fn node_bounds(&self) -> (Range, Range) {
		let computed = |coord: fn(&Node) -> f64| {
			let (min, max) = self
				.nodes
				.iter()
				.map(coord)
				.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
					(lo.min(v), hi.max(v))
				});
			Range::new(min, max)
		};
		(computed(|node| node.x), computed(|node| node.y))
	}
}
