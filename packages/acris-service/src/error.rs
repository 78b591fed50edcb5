use acris_domain::{Dataset, FilterError};

pub type Result<T, E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
	#[error("Invalid request: {message}")]
	InvalidRequest { message: String },
	#[error("{pipeline} search requires {}.", .fields.join(", "))]
	MissingCriteria { pipeline: &'static str, fields: Vec<String> },
	#[error("{dataset}: {message}")]
	NotFound { dataset: Dataset, message: String },
	#[error("{message}")]
	NoResults { message: String },
	#[error("{dataset}: upstream request failed: {message}")]
	Upstream { dataset: Dataset, message: String },
	#[error("Unknown document class: {class}.")]
	UnknownDocumentClass { class: String },
	#[error("{} dataset fetches failed.", .failures.len())]
	Incomplete { failures: Vec<Error> },
	#[error("Search was cancelled.")]
	Cancelled,
	#[error("Search exceeded its {deadline_ms} ms deadline.")]
	DeadlineExceeded { deadline_ms: u64 },
}
impl Error {
	/// Validation failures are the only errors reported to callers as rejected requests.
	pub fn is_validation(&self) -> bool {
		matches!(self, Self::InvalidRequest { .. } | Self::MissingCriteria { .. })
	}

	/// One message per underlying failure.
	pub fn messages(&self) -> Vec<String> {
		match self {
			Self::Incomplete { failures } => failures.iter().flat_map(Self::messages).collect(),
			other => vec![other.to_string()],
		}
	}
}

impl From<FilterError> for Error {
	fn from(err: FilterError) -> Self {
		Self::InvalidRequest { message: err.to_string() }
	}
}
