use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use acris_domain::{
	DOCUMENT_ID_FIELD, Dataset, DatasetRecord, DocumentId, SoqlFilter, record_document_id,
};
use acris_providers::{DatasetSource, PageQuery};

use crate::{Error, Result, ids::IdSet};

const PAGE_ORDER: &str = ":id";
const COUNT_SELECT: &str = "count(*) as count";

/// Paginated reader over one dataset endpoint at a time.
///
/// Every page request races the pipeline's cancellation token, so cancelling abandons whatever
/// requests are still in flight.
#[derive(Clone)]
pub struct Fetcher {
	source: Arc<dyn DatasetSource>,
	page_size: usize,
	cancel: CancellationToken,
}
impl Fetcher {
	pub fn new(
		source: Arc<dyn DatasetSource>,
		page_size: usize,
		cancel: CancellationToken,
	) -> Self {
		Self { source, page_size: page_size.max(1), cancel }
	}

	/// Every full row matching `filter`, across all pages.
	pub async fn fetch_records(
		&self,
		dataset: Dataset,
		filter: &SoqlFilter,
	) -> Result<Vec<DatasetRecord>> {
		self.paginate(dataset, filter, None).await
	}

	/// Distinct document ids matching `filter`, in first-seen order.
	pub async fn fetch_ids(
		&self,
		dataset: Dataset,
		filter: &SoqlFilter,
	) -> Result<Vec<DocumentId>> {
		let rows = self.paginate(dataset, filter, Some(DOCUMENT_ID_FIELD)).await?;
		let ids: IdSet = rows.iter().filter_map(record_document_id).collect();

		Ok(ids.into_vec())
	}

	pub async fn fetch_count(&self, dataset: Dataset, filter: &SoqlFilter) -> Result<u64> {
		let query = PageQuery {
			filter: filter.expression(),
			select: Some(COUNT_SELECT.to_string()),
			order: None,
			limit: 1,
			offset: 0,
		};
		let rows = self.page(dataset, &query).await?;
		let count = rows.first().and_then(|row| row.get("count")).and_then(|value| match value {
			serde_json::Value::String(text) => text.parse().ok(),
			serde_json::Value::Number(number) => number.as_u64(),
			_ => None,
		});

		count.ok_or_else(|| Error::Upstream {
			dataset,
			message: "Count response is missing a numeric count.".to_string(),
		})
	}

	/// Requests pages of `page_size` rows at increasing offsets until a short page arrives. A
	/// dataset whose size is an exact multiple of the page size costs one extra empty request.
	async fn paginate(
		&self,
		dataset: Dataset,
		filter: &SoqlFilter,
		select: Option<&str>,
	) -> Result<Vec<DatasetRecord>> {
		let expression = filter.expression();
		let mut rows = Vec::new();
		let mut offset = 0;

		loop {
			let query = PageQuery {
				filter: expression.clone(),
				select: select.map(str::to_string),
				order: Some(PAGE_ORDER.to_string()),
				limit: self.page_size,
				offset,
			};
			let page = self.page(dataset, &query).await?;
			let fetched = page.len();

			rows.extend(page);

			tracing::debug!(dataset = dataset.as_str(), offset, fetched, "Fetched page.");

			if fetched < self.page_size {
				break;
			}

			offset += fetched;
		}

		if rows.is_empty() {
			return Err(Error::NotFound {
				dataset,
				message: "No records matched the search criteria.".to_string(),
			});
		}

		Ok(rows)
	}

	async fn page(&self, dataset: Dataset, query: &PageQuery) -> Result<Vec<DatasetRecord>> {
		tokio::select! {
			biased;

			_ = self.cancel.cancelled() => Err(Error::Cancelled),
			page = self.source.fetch_page(dataset, query) => page.map_err(|err| Error::Upstream {
				dataset,
				message: err.to_string(),
			}),
		}
	}
}
