use serde::{Serialize, Serializer};

use crate::{Error, Result, assemble::CompositeResult};

/// What a pipeline reports to its caller. There is no partial success.
#[derive(Debug, Clone, PartialEq)]
pub enum PipelineOutcome {
	Found { results: Vec<CompositeResult> },
	NotFound { errors: Vec<String> },
}
impl PipelineOutcome {
	/// Folds a pipeline result into an outcome. Validation errors stay errors so the caller can
	/// reject the request; every other failure becomes `found: false`.
	pub fn from_result(result: Result<Vec<CompositeResult>>) -> Result<Self> {
		match result {
			Ok(results) => Ok(Self::Found { results }),
			Err(err) if err.is_validation() => Err(err),
			Err(err) => Ok(Self::not_found(&err)),
		}
	}

	pub fn not_found(err: &Error) -> Self {
		Self::NotFound { errors: err.messages() }
	}

	pub fn is_found(&self) -> bool {
		matches!(self, Self::Found { .. })
	}

	pub fn results(&self) -> &[CompositeResult] {
		match self {
			Self::Found { results } => results,
			Self::NotFound { .. } => &[],
		}
	}

	pub fn errors(&self) -> &[String] {
		match self {
			Self::Found { .. } => &[],
			Self::NotFound { errors } => errors,
		}
	}
}

impl Serialize for PipelineOutcome {
	fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
	where
		S: Serializer,
	{
		#[derive(Serialize)]
		#[serde(untagged)]
		enum Body<'a> {
			Found { found: bool, results: &'a [CompositeResult] },
			NotFound { found: bool, errors: &'a [String] },
		}

		let body = match self {
			Self::Found { results } => Body::Found { found: true, results },
			Self::NotFound { errors } => Body::NotFound { found: false, errors },
		};

		body.serialize(serializer)
	}
}
