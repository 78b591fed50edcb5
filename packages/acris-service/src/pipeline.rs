//! One pipeline per access pattern.
//!
//! Every pipeline follows the same shape: validate and build dataset filters without touching
//! the network, resolve an initial id set from one dataset, narrow it through zero or more
//! other datasets, then assemble full records for whatever ids survive. Any stage that comes up
//! empty or fails ends the run with a `found: false` outcome.

pub mod document_id;
pub mod document_type;
pub mod parcel;
pub mod party;
pub mod reel_page;
pub mod transaction;

pub use document_id::DocumentIdRequest;
pub use document_type::DocumentTypeRequest;
pub use parcel::ParcelRequest;
pub use party::PartyRequest;
pub use reel_page::ReelPageRequest;
pub use transaction::TransactionRequest;

use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::Instrument;
use uuid::Uuid;

use acris_domain::Criterion;

use crate::{AcrisService, CompositeResult, Error, Fetcher, PipelineOutcome, Result};

impl AcrisService {
	/// Runs `stages` under the configured deadline inside a span tagged with a fresh search id.
	pub(crate) async fn run_pipeline<F, Fut>(
		&self,
		pipeline: &'static str,
		cancel: CancellationToken,
		stages: F,
	) -> Result<PipelineOutcome>
	where
		F: FnOnce(Fetcher) -> Fut,
		Fut: Future<Output = Result<Vec<CompositeResult>>>,
	{
		let search_id = Uuid::new_v4();
		let span = tracing::info_span!("pipeline", pipeline, %search_id);
		let deadline_ms = self.cfg.search.deadline_ms;
		let run = tokio::time::timeout(
			Duration::from_millis(deadline_ms),
			stages(self.fetcher(cancel.clone())),
		);
		let result = async {
			let result = match run.await {
				// Every branch abandoned by the token reports its own cancellation; keep one.
				Ok(Err(err)) if cancel.is_cancelled() && !err.is_validation() =>
					Err(Error::Cancelled),
				Ok(result) => result,
				Err(_) => {
					cancel.cancel();

					Err(Error::DeadlineExceeded { deadline_ms })
				},
			};

			match &result {
				Ok(results) => tracing::info!(results = results.len(), "Pipeline completed."),
				Err(err) => tracing::warn!(error = %err, "Pipeline stopped."),
			}

			result
		}
		.instrument(span)
		.await;

		PipelineOutcome::from_result(result)
	}
}

/// Collects the labels of required criteria that are absent or blank.
#[derive(Default)]
pub(crate) struct Required {
	missing: Vec<String>,
}
impl Required {
	pub(crate) fn criterion(mut self, label: &str, value: &Option<Criterion>) -> Self {
		if !value.as_ref().is_some_and(|value| !value.is_blank()) {
			self.missing.push(label.to_string());
		}

		self
	}

	pub(crate) fn text(mut self, label: &str, value: &Option<String>) -> Self {
		if !value.as_deref().is_some_and(|value| !value.trim().is_empty()) {
			self.missing.push(label.to_string());
		}

		self
	}

	pub(crate) fn check(self, pipeline: &'static str) -> Result<()> {
		if self.missing.is_empty() {
			Ok(())
		} else {
			Err(Error::MissingCriteria { pipeline, fields: self.missing })
		}
	}
}
