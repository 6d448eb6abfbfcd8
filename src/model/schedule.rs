use serde::{Deserialize, Deserializer};

const MINUTES_PER_DAY: i64 = 24 * 60;

/// Recording schedule of a simulation run. Times are in minutes; a stop time
/// in the payload is ignored, `periods` already bounds the run.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Schedule {
	/// Offset of the first period.
	#[serde(default)]
	pub start_time: f64,
	/// Length of one period.
	pub interval_time: f64,
	/// Number of recorded periods.
	#[serde(default, deserialize_with = "de_periods")]
	pub periods: usize,
	/// Wall-clock time of a zero offset. Defaults to 6:00 AM.
	#[serde(default = "default_clock_origin")]
	pub clock_origin: f64,
}

fn default_clock_origin() -> f64 {
	360.0
}

/// `periods` is written as a float by the producer; truncate it.
fn de_periods<'de, D: Deserializer<'de>>(deserializer: D) -> Result<usize, D::Error> {
	let periods = f64::deserialize(deserializer)?;
	Ok(if periods.is_finite() && periods > 0.0 {
		periods as usize
	} else {
		0
	})
}

impl Schedule {
	/// Schedule starting at the default 6:00 AM origin.
	pub fn new(start_time: f64, interval_time: f64, periods: usize) -> Self {
		Self {
			start_time,
			interval_time,
			periods,
			clock_origin: default_clock_origin(),
		}
	}

	/// Highest valid period index.
	pub fn last_period(&self) -> usize {
		self.periods.saturating_sub(1)
	}

	/// Minutes after midnight at the start of `period`.
	pub fn clock_minutes(&self, period: usize) -> i64 {
		(self.clock_origin + self.start_time + period as f64 * self.interval_time).round() as i64
	}

	/// Slider label of `period`, e.g. "6:10 AM".
	pub fn label(&self, period: usize) -> String {
		format_clock(self.clock_minutes(period))
	}
}

/// Format minutes after midnight on a 12-hour clock, wrapping across days.
pub fn format_clock(minutes: i64) -> String {
	let minutes = minutes.rem_euclid(MINUTES_PER_DAY);
	let (hour, minute) = (minutes / 60, minutes % 60);
	let suffix = if hour < 12 { "AM" } else { "PM" };
	let hour = match hour % 12 {
		0 => 12,
		h => h,
	};
	format!("{hour}:{minute:02} {suffix}")
}
