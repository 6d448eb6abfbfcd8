//! Legend layout: color bars plus a linear axis for the active attribute.

use crate::config::ViewConfig;
use crate::model::{ColorScale, Range};

/// Bars drawn left of the axis are this much narrower than the legend.
const AXIS_GUTTER: f64 = 50.0;

/// What a legend shows: a palette over a numeric domain.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendSpec {
	/// One bar per color, lowest bucket first.
	pub colorscale: ColorScale,
	/// Values at the bottom and top of the axis.
	pub domain: Range,
}

/// The two legends of the page.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum LegendDimension {
	/// Centroid coloring.
	Zones,
	/// Link coloring.
	Links,
}

impl LegendDimension {
	/// Id of the element wrapping label and drawing.
	pub fn container_id(self) -> &'static str {
		match self {
			Self::Zones => "legend-zones-container",
			Self::Links => "legend-links-container",
		}
	}

	/// Id of the legend's `<svg>`.
	pub fn svg_id(self) -> &'static str {
		match self {
			Self::Zones => "legend-zones-svg",
			Self::Links => "legend-links-svg",
		}
	}

	/// Id of the group holding bars and axis.
	pub fn group_id(self) -> &'static str {
		match self {
			Self::Zones => "centroidLegendSvg",
			Self::Links => "linkLegendSvg",
		}
	}

	/// Id of the legend title.
	pub fn label_id(self) -> &'static str {
		match self {
			Self::Zones => "zoneLabel",
			Self::Links => "linkLabel",
		}
	}
}

/// Holds at most one legend per dimension; drawing replaces the previous one.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct LegendBoard {
	zones: Option<LegendSpec>,
	links: Option<LegendSpec>,
}

impl LegendBoard {
	/// Set or clear the legend of `dimension`.
	pub fn replace(&mut self, dimension: LegendDimension, legend: Option<LegendSpec>) {
		*self.slot(dimension) = legend;
	}

	/// Legend currently shown for `dimension`.
	pub fn get(&self, dimension: LegendDimension) -> Option<&LegendSpec> {
		match dimension {
			LegendDimension::Zones => self.zones.as_ref(),
			LegendDimension::Links => self.links.as_ref(),
		}
	}

	/// CSS `display` of a legend's label: hidden while it has no legend.
	pub fn label_display(&self, dimension: LegendDimension) -> &'static str {
		if self.get(dimension).is_some() {
			"block"
		} else {
			"none"
		}
	}

	/// Number of legends currently shown.
	pub fn count(&self) -> usize {
		usize::from(self.zones.is_some()) + usize::from(self.links.is_some())
	}

	fn slot(&mut self, dimension: LegendDimension) -> &mut Option<LegendSpec> {
		match dimension {
			LegendDimension::Zones => &mut self.zones,
			LegendDimension::Links => &mut self.links,
		}
	}
}

/// One color bucket.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendBar {
	/// Top edge, in legend pixels.
	pub y: f64,
	/// Bar height.
	pub height: f64,
	/// Fill.
	pub color: String,
}

/// Axis tick, `y` relative to the top of the axis.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisTick {
	/// Offset from the top of the axis.
	pub y: f64,
	/// Domain value at the tick.
	pub value: f64,
	/// Formatted value.
	pub label: String,
}

/// A legend placed in its container, ready to draw.
#[derive(Clone, Debug, PartialEq)]
pub struct LegendLayout {
	/// Space above the axis.
	pub margin: f64,
	/// Width of the color bars.
	pub bar_width: f64,
	/// Axis length; the axis starts at `(bar_width, margin)`.
	pub length: f64,
	/// Color bars, highest bucket on top.
	pub bars: Vec<LegendBar>,
	/// Axis ticks, top to bottom.
	pub ticks: Vec<AxisTick>,
}

impl LegendSpec {
	/// Fit the legend to a container `container_height` pixels tall. Bucket 0
	/// sits at the bottom, `max` at the top of the axis.
	pub fn layout(&self, container_height: f64, config: &ViewConfig) -> LegendLayout {
		let margin = config.legend_margin;
		let length = (container_height - 2.0 * margin).max(0.0);
		let count = self.colorscale.len();
		let step = if count > 0 { length / count as f64 } else { 0.0 };
		let bars = self
			.colorscale
			.colors()
			.iter()
			.enumerate()
			.map(|(i, color)| LegendBar {
				y: margin + step * (count - i - 1) as f64,
				height: step,
				color: color.clone(),
			})
			.collect();

		let Range { min, max } = self.domain;
		let decimals = tick_increment(min, max, config.legend_ticks)
			.map(tick_precision)
			.unwrap_or(0);
		let ticks = ticks(min, max, config.legend_ticks)
			.into_iter()
			.map(|value| AxisTick {
				y: axis_position(value, min, max, length),
				value,
				label: format_tick(value, decimals),
			})
			.collect();

		LegendLayout {
			margin,
			bar_width: (config.legend_width - AXIS_GUTTER).max(0.0),
			length,
			bars,
			ticks,
		}
	}
}

/// Map `value` from `[min, max]` onto `[length, 0]`.
fn axis_position(value: f64, min: f64, max: f64, length: f64) -> f64 {
	let span = max - min;
	if span == 0.0 || !span.is_finite() {
		return length / 2.0;
	}
	length - (value - min) / span * length
}

/// Step between "nice" ticks, `1`, `2` or `5` times a power of ten.
fn tick_increment(start: f64, stop: f64, count: usize) -> Option<f64> {
	let (start, stop) = if start <= stop { (start, stop) } else { (stop, start) };
	let step = (stop - start) / count.max(1) as f64;
	if !(step > 0.0) || !step.is_finite() {
		return None;
	}
	let power = step.log10().floor();
	let error = step / 10f64.powf(power);
	let factor = if error >= 50f64.sqrt() {
		10.0
	} else if error >= 10f64.sqrt() {
		5.0
	} else if error >= 2f64.sqrt() {
		2.0
	} else {
		1.0
	};
	Some(10f64.powf(power) * factor)
}

/// Ticks covering `[start, stop]`, about `count` of them.
pub fn ticks(start: f64, stop: f64, count: usize) -> Vec<f64> {
	if !start.is_finite() || !stop.is_finite() || count == 0 {
		return Vec::new();
	}
	if start == stop {
		return vec![start];
	}
	let reverse = stop < start;
	let (lo, hi) = if reverse { (stop, start) } else { (start, stop) };
	let Some(increment) = tick_increment(lo, hi, count) else {
		return Vec::new();
	};

	// Work on integer multiples so decimal steps stay exact.
	let power = increment.log10().floor();
	let mut values: Vec<f64> = if power < 0.0 {
		let inverse = (1.0 / increment).round();
		let (mut first, mut last) = ((lo * inverse).round(), (hi * inverse).round());
		if first / inverse < lo {
			first += 1.0;
		}
		if last / inverse > hi {
			last -= 1.0;
		}
		integer_range(first, last)
			.map(|i| i / inverse)
			.collect()
	} else {
		let (mut first, mut last) = ((lo / increment).round(), (hi / increment).round());
		if first * increment < lo {
			first += 1.0;
		}
		if last * increment > hi {
			last -= 1.0;
		}
		integer_range(first, last)
			.map(|i| i * increment)
			.collect()
	};
	if reverse {
		values.reverse();
	}
	values
}

fn integer_range(first: f64, last: f64) -> impl Iterator<Item = f64> {
	let steps = if last >= first {
		(last - first) as usize + 1
	} else {
		0
	};
	(0..steps).map(move |i| first + i as f64)
}

/// Decimals needed to tell ticks `increment` apart.
fn tick_precision(increment: f64) -> usize {
	let exponent = increment.abs().log10().floor();
	if exponent < 0.0 {
		(-exponent) as usize
	} else {
		0
	}
}

/// Fixed-point label with thousands separators, e.g. `12,500` or `0.25`.
pub fn format_tick(value: f64, decimals: usize) -> String {
	let text = format!("{:.*}", decimals, value.abs());
	let (integer, fraction) = match text.split_once('.') {
		Some((integer, fraction)) => (integer, Some(fraction)),
		None => (text.as_str(), None),
	};
	let mut grouped = String::with_capacity(integer.len() + integer.len() / 3);
	for (i, digit) in integer.chars().enumerate() {
		if i > 0 && (integer.len() - i) % 3 == 0 {
			grouped.push(',');
		}
		grouped.push(digit);
	}
	let negative = value < 0.0 && text.chars().any(|c| c.is_ascii_digit() && c != '0');
	let mut label = String::new();
	if negative {
		label.push('-');
	}
	label.push_str(&grouped);
	if let Some(fraction) = fraction {
		label.push('.');
		label.push_str(fraction);
	}
	label
}
