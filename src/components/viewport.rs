//! Pan and zoom state shared by both renderers.

use crate::model::Range;

/// Screen = world * k + (x, y).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewTransform {
	/// Horizontal offset, in pixels.
	pub x: f64,
	/// Vertical offset, in pixels.
	pub y: f64,
	/// Scale.
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

impl ViewTransform {
	/// Inverse of [`Self::world_to_screen`].
	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.k, (sy - self.y) / self.k)
	}

	/// Screen position of a world point.
	pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
		(wx * self.k + self.x, wy * self.k + self.y)
	}

	/// SVG `transform` attribute value.
	pub fn to_svg(&self) -> String {
		format!("translate({},{}) scale({})", self.x, self.y, self.k)
	}

	/// Scale by `factor` around the screen point `(sx, sy)`.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, factor: f64, bounds: ZoomBounds) {
		let new_k = bounds.clamp(self.k * factor);
		let ratio = new_k / self.k;
		self.x = sx - (sx - self.x) * ratio;
		self.y = sy - (sy - self.y) * ratio;
		self.k = new_k;
	}
}

/// Allowed range of the scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomBounds {
	/// Smallest scale.
	pub min: f64,
	/// Largest scale.
	pub max: f64,
}

impl Default for ZoomBounds {
	fn default() -> Self {
		Self {
			min: 0.0,
			max: f64::INFINITY,
		}
	}
}

impl ZoomBounds {
	/// `k` limited to the bounds.
	pub fn clamp(&self, k: f64) -> f64 {
		k.max(self.min).min(self.max)
	}
}

/// Initial view of a world-space box and the zoom limits that go with it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Fit {
	/// Initial transform.
	pub transform: ViewTransform,
	/// Zoom limits.
	pub bounds: ZoomBounds,
	/// Smallest zoom showing the whole box.
	pub min_zoom: f64,
}

fn ratio(viewport: f64, extent: f64) -> Option<f64> {
	let ratio = viewport / extent;
	(extent > 0.0 && ratio.is_finite()).then_some(ratio)
}

/// Center the box in a `width` x `height` viewport at `min_zoom / 1.1`, with
/// zoom allowed down to `min_zoom / 2`. A flat box is fitted on its other
/// axis.
pub fn fit_to_viewport(x: Range, y: Range, width: f64, height: f64) -> Fit {
	let min_zoom = match (ratio(width, x.span()), ratio(height, y.span())) {
		(Some(zx), Some(zy)) => zx.min(zy),
		(Some(zoom), None) | (None, Some(zoom)) => zoom,
		(None, None) => 1.0,
	};
	let k = min_zoom / 1.1;
	let (cx, cy) = ((x.min + x.max) / 2.0, (y.min + y.max) / 2.0);
	Fit {
		transform: ViewTransform {
			x: width / 2.0 - cx * k,
			y: height / 2.0 - cy * k,
			k,
		},
		bounds: ZoomBounds {
			min: min_zoom / 2.0,
			max: f64::INFINITY,
		},
		min_zoom,
	}
}

/// A background drag moving the whole view.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PanState {
	/// Whether a pan is under way.
	pub active: bool,
	/// Pointer x at the start.
	pub start_x: f64,
	/// Pointer y at the start.
	pub start_y: f64,
	/// Transform x at the start.
	pub transform_start_x: f64,
	/// Transform y at the start.
	pub transform_start_y: f64,
}

impl PanState {
	/// Start panning from a pointer at `(x, y)`.
	pub fn begin(&mut self, x: f64, y: f64, transform: &ViewTransform) {
		*self = Self {
			active: true,
			start_x: x,
			start_y: y,
			transform_start_x: transform.x,
			transform_start_y: transform.y,
		};
	}

	/// Move `transform` along with the pointer while panning.
	pub fn update(&self, x: f64, y: f64, transform: &mut ViewTransform) {
		if self.active {
			transform.x = self.transform_start_x + (x - self.start_x);
			transform.y = self.transform_start_y + (y - self.start_y);
		}
	}
}

/// A node being dragged: where the pointer and the node started.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct DragState {
	/// Dragged node, if any.
	pub node: Option<usize>,
	/// Pointer x at the start.
	pub start_x: f64,
	/// Pointer y at the start.
	pub start_y: f64,
	/// Node x at the start.
	pub node_start_x: f64,
	/// Node y at the start.
	pub node_start_y: f64,
}

impl DragState {
	/// Start dragging `node`, which sits at `(node_x, node_y)`.
	pub fn begin(node: usize, x: f64, y: f64, node_x: f64, node_y: f64) -> Self {
		Self {
			node: Some(node),
			start_x: x,
			start_y: y,
			node_start_x: node_x,
			node_start_y: node_y,
		}
	}

	/// Position of the dragged node for a pointer at `(x, y)`.
	pub fn target(&self, x: f64, y: f64, transform: &ViewTransform) -> Option<(usize, f64, f64)> {
		self.node.map(|node| {
			(
				node,
				self.node_start_x + (x - self.start_x) / transform.k,
				self.node_start_y + (y - self.start_y) / transform.k,
			)
		})
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn fit_centers_the_graph_with_margin() {
		let fit = fit_to_viewport(Range::new(0.0, 100.0), Range::new(-50.0, 0.0), 800.0, 200.0);
		assert_eq!(fit.min_zoom, 4.0);
		assert_eq!(fit.transform.k, 4.0 / 1.1);
		assert_eq!(fit.bounds.min, 2.0);
		let (sx, sy) = fit.transform.world_to_screen(50.0, -25.0);
		assert!((sx - 400.0).abs() < 1e-9);
		assert!((sy - 100.0).abs() < 1e-9);
	}

	#[test]
	fn flat_graph_fits_on_the_other_axis() {
		let fit = fit_to_viewport(Range::new(0.0, 10.0), Range::new(3.0, 3.0), 100.0, 100.0);
		assert_eq!(fit.min_zoom, 10.0);
		let point = fit_to_viewport(Range::new(1.0, 1.0), Range::new(1.0, 1.0), 100.0, 100.0);
		assert_eq!(point.min_zoom, 1.0);
	}

	#[test]
	fn zoom_respects_the_lower_bound_and_keeps_the_anchor() {
		let bounds = ZoomBounds { min: 0.5, max: f64::INFINITY };
		let mut transform = ViewTransform::default();
		transform.zoom_at(100.0, 100.0, 0.1, bounds);
		assert_eq!(transform.k, 0.5);
		let (wx, wy) = transform.screen_to_world(100.0, 100.0);
		assert!((wx - 100.0).abs() < 1e-9 && (wy - 100.0).abs() < 1e-9);
		transform.zoom_at(0.0, 0.0, 1000.0, bounds);
		assert_eq!(transform.k, 500.0);
	}

	#[test]
	fn pan_and_drag_follow_the_pointer() {
		let mut transform = ViewTransform { x: 10.0, y: 20.0, k: 2.0 };
		let mut pan = PanState::default();
		pan.update(50.0, 50.0, &mut transform);
		assert_eq!((transform.x, transform.y), (10.0, 20.0));
		pan.begin(0.0, 0.0, &transform);
		pan.update(5.0, -5.0, &mut transform);
		assert_eq!((transform.x, transform.y), (15.0, 15.0));

		let drag = DragState::begin(3, 0.0, 0.0, 1.0, 1.0);
		assert_eq!(drag.target(4.0, 2.0, &transform), Some((3, 3.0, 2.0)));
		assert_eq!(DragState::default().target(4.0, 2.0, &transform), None);
	}
}
