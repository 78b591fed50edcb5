mod soql;

use std::{
	collections::{HashMap, HashSet},
	sync::Mutex,
};

use serde_json::Value;

use acris_domain::{Dataset, DatasetRecord};
use acris_providers::{BoxFuture, DatasetSource, Error, PageQuery, Result};

pub use soql::Predicate;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
	pub dataset: Dataset,
	pub query: PageQuery,
}

/// In-memory stand-in for the Socrata endpoints.
///
/// Rows are filtered with the same SoQL subset the filter builder emits, paged by
/// `$limit`/`$offset`, and every page request is recorded for later assertions. Datasets can be
/// told to fail with a status error or to never answer.
#[derive(Default)]
pub struct FakeDatasets {
	rows: HashMap<Dataset, Vec<DatasetRecord>>,
	failures: HashMap<Dataset, String>,
	stalled: HashSet<Dataset>,
	requests: Mutex<Vec<RecordedRequest>>,
}
impl FakeDatasets {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn with_rows<I>(mut self, dataset: Dataset, rows: I) -> Self
	where
		I: IntoIterator<Item = Value>,
	{
		self.rows.entry(dataset).or_default().extend(rows.into_iter().map(record));

		self
	}

	/// Adds `count` rows to `dataset` with ids produced by `id_for(index)`.
	pub fn with_generated_rows<F>(self, dataset: Dataset, count: usize, id_for: F) -> Self
	where
		F: Fn(usize) -> String,
	{
		let rows = (0..count).map(|index| {
			serde_json::json!({ "document_id": id_for(index), "row": index.to_string() })
		});

		self.with_rows(dataset, rows.collect::<Vec<_>>())
	}

	pub fn failing(mut self, dataset: Dataset, message: &str) -> Self {
		self.failures.insert(dataset, message.to_string());

		self
	}

	pub fn stalled(mut self, dataset: Dataset) -> Self {
		self.stalled.insert(dataset);

		self
	}

	pub fn requests(&self) -> Vec<RecordedRequest> {
		self.requests.lock().unwrap_or_else(|err| err.into_inner()).clone()
	}

	pub fn requests_for(&self, dataset: Dataset) -> Vec<RecordedRequest> {
		self.requests().into_iter().filter(|request| request.dataset == dataset).collect()
	}

	fn page(&self, dataset: Dataset, query: &PageQuery) -> Result<Vec<DatasetRecord>> {
		if let Some(message) = self.failures.get(&dataset) {
			return Err(Error::Status { status: 503, message: message.clone() });
		}

		let predicates = match query.filter.as_deref() {
			Some(filter) => soql::parse_filter(filter)
				.map_err(|message| Error::Status { status: 400, message })?,
			None => Vec::new(),
		};
		let matching: Vec<&DatasetRecord> = self
			.rows
			.get(&dataset)
			.map(|rows| {
				rows.iter().filter(|row| predicates.iter().all(|p| p.matches(row))).collect()
			})
			.unwrap_or_default();

		if let Some(select) = query.select.as_deref()
			&& select.starts_with("count(")
		{
			return Ok(vec![record(serde_json::json!({ "count": matching.len().to_string() }))]);
		}

		Ok(matching
			.into_iter()
			.skip(query.offset)
			.take(query.limit)
			.map(|row| project(row, query.select.as_deref()))
			.collect())
	}
}

impl DatasetSource for FakeDatasets {
	fn fetch_page<'a>(
		&'a self,
		dataset: Dataset,
		query: &'a PageQuery,
	) -> BoxFuture<'a, Result<Vec<DatasetRecord>>> {
		self.requests
			.lock()
			.unwrap_or_else(|err| err.into_inner())
			.push(RecordedRequest { dataset, query: query.clone() });

		if self.stalled.contains(&dataset) {
			return Box::pin(std::future::pending());
		}

		let page = self.page(dataset, query);

		Box::pin(async move { page })
	}
}

/// Converts a JSON object literal into a row.
pub fn record(value: Value) -> DatasetRecord {
	match value {
		Value::Object(map) => map,
		other => panic!("Test rows must be JSON objects, got {other}."),
	}
}

fn project(row: &DatasetRecord, select: Option<&str>) -> DatasetRecord {
	let Some(select) = select else {
		return row.clone();
	};

	select
		.split(',')
		.map(str::trim)
		.filter_map(|column| row.get(column).map(|value| (column.to_string(), value.clone())))
		.collect()
}
