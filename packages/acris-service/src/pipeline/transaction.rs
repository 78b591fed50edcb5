use futures::future;
use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use acris_domain::{Dataset, SoqlFilter, filter::document_id_prefix, record_document_id};

use crate::{AcrisService, Error, PipelineOutcome, Result, assemble::group, ids::IdSet};

/// Search by transaction number, matched as a document id prefix.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TransactionRequest {
	#[serde(default)]
	pub transaction_number: Option<String>,
}

impl AcrisService {
	/// Queries every dataset independently and unions the hits by document id. Nothing is
	/// narrowed; a dataset without matches contributes nothing.
	pub async fn search_transaction(&self, req: TransactionRequest) -> Result<PipelineOutcome> {
		self.search_transaction_with_cancel(req, CancellationToken::new()).await
	}

	pub async fn search_transaction_with_cancel(
		&self,
		req: TransactionRequest,
		cancel: CancellationToken,
	) -> Result<PipelineOutcome> {
		let Some(number) = req
			.transaction_number
			.map(|number| number.trim().to_string())
			.filter(|number| !number.is_empty())
		else {
			return Err(Error::MissingCriteria {
				pipeline: "Transaction",
				fields: vec!["transaction_number".to_string()],
			});
		};
		let filter = SoqlFilter::default().and(document_id_prefix(&number));

		self.run_pipeline("transaction", cancel, |fetcher| async move {
			let settled = future::join_all(
				Dataset::ALL.map(|dataset| fetcher.fetch_records(dataset, &filter)),
			)
			.await;
			let mut fetched = Vec::with_capacity(Dataset::ALL.len());
			let mut failures = Vec::new();

			for (dataset, result) in Dataset::ALL.into_iter().zip(settled) {
				match result {
					Ok(rows) => fetched.push((dataset, rows)),
					Err(Error::NotFound { .. }) => {},
					Err(err) => {
						tracing::warn!(
							dataset = dataset.as_str(),
							error = %err,
							"Dataset fetch failed."
						);

						failures.push(err);
					},
				}
			}

			if !failures.is_empty() {
				return Err(Error::Incomplete { failures });
			}

			let ids: IdSet = fetched
				.iter()
				.flat_map(|(_, rows)| rows.iter().filter_map(record_document_id))
				.collect();

			if ids.is_empty() {
				return Err(Error::NoResults {
					message: format!("No records found for transaction number {number}."),
				});
			}

			Ok(group(&ids.into_vec(), fetched))
		})
		.await
	}
}
