use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use acris_domain::{Criterion, DatasetFilter, DocumentId, MasterCriteria, Scalar};

use crate::{AcrisService, Error, PipelineOutcome, Result, assemble::assemble, ids::IdSet};

/// Direct lookup by document id, or by CRFN resolved through Master.
///
/// Either field accepts a single value, a list, or a comma separated string.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentIdRequest {
	#[serde(default)]
	pub document_id: Option<Criterion>,
	#[serde(default)]
	pub crfn: Option<Criterion>,
}

enum Lookup {
	DocumentIds(Vec<DocumentId>),
	Crfn(DatasetFilter),
}

impl AcrisService {
	pub async fn search_document_id(&self, req: DocumentIdRequest) -> Result<PipelineOutcome> {
		self.search_document_id_with_cancel(req, CancellationToken::new()).await
	}

	pub async fn search_document_id_with_cancel(
		&self,
		req: DocumentIdRequest,
		cancel: CancellationToken,
	) -> Result<PipelineOutcome> {
		let lookup = match (&req.document_id, &req.crfn) {
			(Some(ids), None) => Lookup::DocumentIds(split_values("document_id", ids)?),
			(None, Some(crfns)) => {
				let crfns = split_values("crfn", crfns)?;
				let master =
					MasterCriteria { crfn: Some(Criterion::many(crfns)), ..Default::default() };

				Lookup::Crfn(DatasetFilter::build(&master)?)
			},
			_ =>
				return Err(Error::InvalidRequest {
					message: "Document id search requires exactly one of document_id or crfn."
						.to_string(),
				}),
		};
		let record_batch = self.cfg.search.record_batch_size;

		self.run_pipeline("document_id", cancel, |fetcher| async move {
			let ids = match lookup {
				Lookup::DocumentIds(ids) => ids,
				Lookup::Crfn(master) => fetcher.fetch_ids(master.dataset, &master.filter).await?,
			};
			let results: Vec<_> = assemble(&fetcher, &ids, record_batch)
				.await?
				.into_iter()
				.filter(|result| !result.is_empty())
				.collect();

			if results.is_empty() {
				return Err(Error::NoResults {
					message: "No records found for the requested documents.".to_string(),
				});
			}

			Ok(results)
		})
		.await
	}
}

/// Flattens a criterion into trimmed, deduplicated values, splitting text on commas.
fn split_values(field: &str, criterion: &Criterion) -> Result<Vec<String>> {
	let mut values = IdSet::default();

	for value in criterion.values() {
		let parts = match value {
			Scalar::Text(text) => text.split(',').map(|part| part.trim().to_string()).collect(),
			Scalar::Number(number) => vec![number.to_string()],
		};

		for part in parts {
			if part.is_empty() {
				return Err(Error::InvalidRequest {
					message: format!("{field} must not contain blank values."),
				});
			}

			values.insert(part);
		}
	}

	if values.is_empty() {
		return Err(Error::InvalidRequest {
			message: format!("{field} must contain at least one value."),
		});
	}

	Ok(values.into_vec())
}
