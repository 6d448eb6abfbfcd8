//! Errors raised while loading the embedded payloads.

use thiserror::Error;

/// Failure to load one of the JSON documents the host page embeds.
#[derive(Debug, Error)]
pub enum LoadError {
	/// No element with this id exists in the document.
	#[error("missing payload element #{0}")]
	MissingElement(&'static str),

	/// The element exists but its text is not a valid payload.
	#[error("failed to parse {what}: {source}")]
	Parse {
		/// Which payload was being parsed.
		what: &'static str,
		/// Underlying JSON error.
		#[source]
		source: serde_json::Error,
	},

	/// The graph payload holds no nodes.
	#[error("the network has no nodes")]
	EmptyGraph,
}

impl LoadError {
	pub(crate) fn parse(what: &'static str) -> impl FnOnce(serde_json::Error) -> Self {
		move |source| Self::Parse { what, source }
	}
}
