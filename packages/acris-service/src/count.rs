use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use acris_domain::{AnyCriteria, Dataset, DatasetFilter};

use crate::{AcrisService, Error, Result};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountResponse {
	pub dataset: Dataset,
	pub count: u64,
}

impl AcrisService {
	/// Number of rows in one dataset matching `criteria`, without fetching them.
	pub async fn count(&self, criteria: AnyCriteria) -> Result<CountResponse> {
		self.count_with_cancel(criteria, CancellationToken::new()).await
	}

	pub async fn count_with_cancel(
		&self,
		criteria: AnyCriteria,
		cancel: CancellationToken,
	) -> Result<CountResponse> {
		let target = DatasetFilter::from_any(&criteria)?;
		let deadline_ms = self.cfg.search.deadline_ms;
		let fetcher = self.fetcher(cancel.clone());
		let count = match tokio::time::timeout(
			Duration::from_millis(deadline_ms),
			fetcher.fetch_count(target.dataset, &target.filter),
		)
		.await
		{
			Ok(count) => count?,
			Err(_) => {
				cancel.cancel();

				return Err(Error::DeadlineExceeded { deadline_ms });
			},
		};

		tracing::info!(dataset = target.dataset.as_str(), count, "Counted rows.");

		Ok(CountResponse { dataset: target.dataset, count })
	}
}
