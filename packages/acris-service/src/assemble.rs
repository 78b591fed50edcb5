use std::collections::HashMap;

use futures::future;
use serde::{Deserialize, Serialize};

use acris_domain::{
	Dataset, DatasetRecord, DocumentId, SoqlFilter, batches, filter::document_ids_in,
	record_document_id,
};

use crate::{Error, Result, fetch::Fetcher, ids::IdSet};

/// Every row held for one document, grouped by dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompositeResult {
	pub document_id: DocumentId,
	#[serde(rename = "masterRecords")]
	pub master_records: Vec<DatasetRecord>,
	#[serde(rename = "partiesRecords")]
	pub parties_records: Vec<DatasetRecord>,
	#[serde(rename = "legalsRecords")]
	pub legals_records: Vec<DatasetRecord>,
	#[serde(rename = "referencesRecords")]
	pub references_records: Vec<DatasetRecord>,
	#[serde(rename = "remarksRecords")]
	pub remarks_records: Vec<DatasetRecord>,
}
impl CompositeResult {
	pub fn new(document_id: DocumentId) -> Self {
		Self {
			document_id,
			master_records: Vec::new(),
			parties_records: Vec::new(),
			legals_records: Vec::new(),
			references_records: Vec::new(),
			remarks_records: Vec::new(),
		}
	}

	pub fn records(&self, dataset: Dataset) -> &[DatasetRecord] {
		match dataset {
			Dataset::Master => &self.master_records,
			Dataset::Parties => &self.parties_records,
			Dataset::Legals => &self.legals_records,
			Dataset::References => &self.references_records,
			Dataset::Remarks => &self.remarks_records,
		}
	}

	pub fn is_empty(&self) -> bool {
		Dataset::ALL.iter().all(|dataset| self.records(*dataset).is_empty())
	}

	fn records_mut(&mut self, dataset: Dataset) -> &mut Vec<DatasetRecord> {
		match dataset {
			Dataset::Master => &mut self.master_records,
			Dataset::Parties => &mut self.parties_records,
			Dataset::Legals => &mut self.legals_records,
			Dataset::References => &mut self.references_records,
			Dataset::Remarks => &mut self.remarks_records,
		}
	}
}

/// Fetches full rows for `ids` from all five datasets at once and groups them per id.
///
/// The five fetches settle independently. If any of them fails the whole assembly fails with
/// one error per failed dataset; a dataset with no rows for an id simply leaves that id's array
/// empty.
pub async fn assemble(
	fetcher: &Fetcher,
	ids: &[DocumentId],
	batch_size: usize,
) -> Result<Vec<CompositeResult>> {
	let ids = ids.iter().cloned().collect::<IdSet>().into_vec();

	if ids.is_empty() {
		return Err(Error::InvalidRequest {
			message: "Record assembly requires at least one document id.".to_string(),
		});
	}

	let settled = future::join_all(
		Dataset::ALL.map(|dataset| fetch_by_ids(fetcher, dataset, &ids, batch_size)),
	)
	.await;
	let mut fetched = Vec::with_capacity(Dataset::ALL.len());
	let mut failures = Vec::new();

	for (dataset, result) in Dataset::ALL.into_iter().zip(settled) {
		match result {
			Ok(rows) => fetched.push((dataset, rows)),
			Err(err) => {
				tracing::warn!(dataset = dataset.as_str(), error = %err, "Dataset fetch failed.");

				failures.push(err);
			},
		}
	}

	if !failures.is_empty() {
		return Err(Error::Incomplete { failures });
	}

	Ok(group(&ids, fetched))
}

/// One result per id in `ids` order; rows whose id is not in `ids` are dropped.
pub fn group(
	ids: &[DocumentId],
	fetched: Vec<(Dataset, Vec<DatasetRecord>)>,
) -> Vec<CompositeResult> {
	let mut results: Vec<CompositeResult> = ids.iter().cloned().map(CompositeResult::new).collect();
	let positions: HashMap<DocumentId, usize> =
		ids.iter().enumerate().map(|(position, id)| (id.clone(), position)).collect();

	for (dataset, rows) in fetched {
		for row in rows {
			let Some(position) = record_document_id(&row).and_then(|id| positions.get(&id).copied())
			else {
				continue;
			};

			results[position].records_mut(dataset).push(row);
		}
	}

	results
}

async fn fetch_by_ids(
	fetcher: &Fetcher,
	dataset: Dataset,
	ids: &[DocumentId],
	batch_size: usize,
) -> Result<Vec<DatasetRecord>> {
	let mut rows = Vec::new();

	for batch in batches(ids, batch_size) {
		let filter = SoqlFilter::default().and(document_ids_in(batch));

		match fetcher.fetch_records(dataset, &filter).await {
			Ok(page) => rows.extend(page),
			Err(Error::NotFound { .. }) => {},
			Err(err) => return Err(err),
		}
	}

	Ok(rows)
}
