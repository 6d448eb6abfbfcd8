//! Immutable input data: the network graph and the optional simulation results.

mod graph;
mod results;
mod schedule;

use std::collections::BTreeMap;

use serde::{Deserialize, Deserializer};

pub use graph::{
	CentroidMetrics, ColorScales, Edge, EdgeGeometry, GraphDataset, LinkType, Measure, Node,
	NodeKind, Range, Statistics, TypeStats,
};
pub use results::{FlowSeries, ResultsDataset};
pub use schedule::Schedule;

/// Ordered palette: bucket index to color.
#[derive(Clone, Debug, Default, Deserialize, PartialEq)]
#[serde(from = "Indexed<String>")]
pub struct ColorScale(Vec<String>);

impl ColorScale {
	/// Palette from colors in bucket order.
	pub fn new(colors: Vec<String>) -> Self {
		Self(colors)
	}

	/// Number of buckets.
	pub fn len(&self) -> usize {
		self.0.len()
	}

	/// Whether the palette has no colors.
	pub fn is_empty(&self) -> bool {
		self.0.is_empty()
	}

	/// Colors in bucket order.
	pub fn colors(&self) -> &[String] {
		&self.0
	}
}

impl From<Indexed<String>> for ColorScale {
	fn from(value: Indexed<String>) -> Self {
		Self(value.into_vec())
	}
}

/// A collection serialized either as a JSON array or as an object keyed by
/// the decimal index (`{"0": .., "1": ..}`).
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum Indexed<T> {
	List(Vec<T>),
	Keyed(BTreeMap<String, T>),
}

impl<T> Indexed<T> {
	/// Keys that are not indices are dropped; the rest are ordered numerically.
	pub(crate) fn into_vec(self) -> Vec<T> {
		match self {
			Self::List(items) => items,
			Self::Keyed(map) => {
				let mut entries: Vec<(usize, T)> = map
					.into_iter()
					.filter_map(|(key, item)| key.parse().ok().map(|idx| (idx, item)))
					.collect();
				entries.sort_by_key(|(idx, _)| *idx);
				entries.into_iter().map(|(_, item)| item).collect()
			}
		}
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawId {
	Int(i64),
	Float(f64),
	Text(String),
}

/// Element ids arrive as numbers or strings; keep them as strings so they can
/// key the results maps directly.
pub(crate) fn de_id<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
	Ok(match RawId::deserialize(deserializer)? {
		RawId::Int(id) => id.to_string(),
		RawId::Float(id) => id.to_string(),
		RawId::Text(id) => id,
	})
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawFlag {
	Bool(bool),
	Text(String),
}

pub(crate) fn de_flag<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
	Ok(match RawFlag::deserialize(deserializer)? {
		RawFlag::Bool(flag) => flag,
		RawFlag::Text(text) => text.eq_ignore_ascii_case("true"),
	})
}
