use acris_domain::{DatasetFilter, DocumentId, batches, filter::document_ids_in};

use crate::{Error, Result, fetch::Fetcher, ids::IdSet};

/// Narrows `candidates` to the ids that also have rows in `target` under its filter.
///
/// Candidates are looked up `batch_size` at a time and the hits merged into one deduplicated
/// set, so the result is always a subset of the input. Batches run one after another; a batch
/// with no hits is not an error, only an empty overall result is.
pub async fn cross_reference(
	fetcher: &Fetcher,
	target: &DatasetFilter,
	candidates: &[DocumentId],
	batch_size: usize,
) -> Result<Vec<DocumentId>> {
	let dataset = target.dataset;

	if candidates.is_empty() {
		return Err(Error::InvalidRequest {
			message: format!("Cross-referencing {dataset} requires at least one candidate id."),
		});
	}

	let mut resolved = IdSet::default();

	for (index, batch) in batches(candidates, batch_size).into_iter().enumerate() {
		let filter = target.filter.clone().and(document_ids_in(batch));

		match fetcher.fetch_ids(dataset, &filter).await {
			Ok(ids) => resolved.extend(ids),
			Err(Error::NotFound { .. }) => {},
			Err(err) => return Err(err),
		}

		tracing::debug!(
			dataset = dataset.as_str(),
			batch = index,
			batch_len = batch.len(),
			resolved = resolved.len(),
			"Cross-referenced batch."
		);
	}

	if resolved.is_empty() {
		return Err(Error::NotFound {
			dataset,
			message: "None of the candidate documents matched the search criteria.".to_string(),
		});
	}

	Ok(resolved.into_vec())
}
