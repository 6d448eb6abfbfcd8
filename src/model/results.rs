use std::collections::HashMap;

use log::{info, warn};
use serde::Deserialize;

use super::{ColorScale, Indexed, Range, Schedule};
use crate::attribute::{FlowMetric, SubPopulation, series_name};
use crate::error::LoadError;

/// One results series: per link id, one color and one value per period.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlowSeries {
	/// Range of the values; the legend domain.
	pub stats: Range,
	colors: HashMap<String, Vec<String>>,
	values: HashMap<String, Vec<f64>>,
}

impl FlowSeries {
	/// Series from per-link colors and values, indexed by period.
	pub fn new(
		stats: Range,
		colors: HashMap<String, Vec<String>>,
		values: HashMap<String, Vec<f64>>,
	) -> Self {
		Self {
			stats,
			colors,
			values,
		}
	}

	/// Color of a link at `period`.
	pub fn color(&self, link_id: &str, period: usize) -> Option<&str> {
		self.colors
			.get(link_id)
			.and_then(|colors| colors.get(period))
			.map(String::as_str)
	}

	/// Value of a link at `period`.
	pub fn value(&self, link_id: &str, period: usize) -> Option<f64> {
		self.values
			.get(link_id)
			.and_then(|values| values.get(period))
			.copied()
	}

	/// Longest per-link color sequence.
	fn recorded_periods(&self) -> usize {
		self.colors.values().map(Vec::len).max().unwrap_or(0)
	}
}

#[derive(Deserialize)]
struct RawSeries {
	#[serde(default)]
	colors: HashMap<String, Indexed<String>>,
	#[serde(default)]
	values: HashMap<String, Indexed<f64>>,
}

#[derive(Deserialize)]
struct RawResults {
	#[serde(default)]
	colorscale: ColorScale,
	#[serde(default)]
	stats: HashMap<String, Range>,
	#[serde(flatten)]
	series: HashMap<String, serde_json::Value>,
}

/// Per-period simulation results for every link.
#[derive(Clone, Debug, PartialEq)]
pub struct ResultsDataset {
	/// Palette shared by every series.
	pub colorscale: ColorScale,
	/// When each period starts.
	pub schedule: Schedule,
	series: HashMap<(FlowMetric, SubPopulation), FlowSeries>,
}

impl ResultsDataset {
	/// Results from already parsed series.
	pub fn new(
		colorscale: ColorScale,
		schedule: Schedule,
		series: HashMap<(FlowMetric, SubPopulation), FlowSeries>,
	) -> Self {
		Self {
			colorscale,
			schedule,
			series,
		}
	}

	/// Parse the results payload and its scheduling parameters. Series the
	/// payload lacks are simply absent.
	pub fn from_json(results: &str, parameters: &str) -> Result<Self, LoadError> {
		let mut schedule: Schedule =
			serde_json::from_str(parameters).map_err(LoadError::parse("parameters"))?;
		let mut raw: RawResults =
			serde_json::from_str(results).map_err(LoadError::parse("results"))?;

		let mut series = HashMap::new();
		for metric in FlowMetric::ALL {
			for population in SubPopulation::ALL {
				let name = series_name(metric, population);
				let Some(value) = raw.series.remove(&name) else {
					continue;
				};
				let parsed: RawSeries =
					serde_json::from_value(value).map_err(LoadError::parse("results series"))?;
				let stats = raw.stats.get(&name).copied().unwrap_or_else(|| {
					warn!("results series {name} has no statistics");
					Range::default()
				});
				series.insert(
					(metric, population),
					FlowSeries::new(
						stats,
						parsed
							.colors
							.into_iter()
							.map(|(link, colors)| (link, colors.into_vec()))
							.collect(),
						parsed
							.values
							.into_iter()
							.map(|(link, values)| (link, values.into_vec()))
							.collect(),
					),
				);
			}
		}

		if schedule.periods == 0 {
			schedule.periods = series
				.values()
				.map(FlowSeries::recorded_periods)
				.max()
				.unwrap_or(0);
		}
		info!(
			"loaded results: {} series, {} periods",
			series.len(),
			schedule.periods
		);
		Ok(Self::new(raw.colorscale, schedule, series))
	}

	/// The series of `metric` for `population`, if recorded.
	pub fn series(&self, metric: FlowMetric, population: SubPopulation) -> Option<&FlowSeries> {
		self.series.get(&(metric, population))
	}

	/// Number of periods the slider can show.
	pub fn period_count(&self) -> usize {
		self.schedule.periods
	}
}
