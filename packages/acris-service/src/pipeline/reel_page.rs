use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use acris_domain::{DatasetFilter, LegalsCriteria, MasterCriteria};

use crate::{
	AcrisService, PipelineOutcome, Result, assemble::assemble, crossref::cross_reference,
	pipeline::Required,
};

/// Search by microfilm reel year, number and page within a borough.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ReelPageRequest {
	#[serde(default)]
	pub master: MasterCriteria,
	#[serde(default)]
	pub legals: LegalsCriteria,
}

impl AcrisService {
	pub async fn search_reel_page(&self, req: ReelPageRequest) -> Result<PipelineOutcome> {
		self.search_reel_page_with_cancel(req, CancellationToken::new()).await
	}

	pub async fn search_reel_page_with_cancel(
		&self,
		req: ReelPageRequest,
		cancel: CancellationToken,
	) -> Result<PipelineOutcome> {
		Required::default()
			.criterion("master.reel_yr", &req.master.reel_yr)
			.criterion("master.reel_nbr", &req.master.reel_nbr)
			.criterion("master.reel_pg", &req.master.reel_pg)
			.criterion("legals.borough", &req.legals.borough)
			.check("Reel/page")?;

		let master = DatasetFilter::build(&req.master)?;
		let legals = DatasetFilter::build(&req.legals)?;
		let crossref_batch = self.cfg.search.crossref_batch_size;
		let record_batch = self.cfg.search.record_batch_size;

		self.run_pipeline("reel_page", cancel, |fetcher| async move {
			let ids = fetcher.fetch_ids(master.dataset, &master.filter).await?;
			let ids = cross_reference(&fetcher, &legals, &ids, crossref_batch).await?;

			assemble(&fetcher, &ids, record_batch).await
		})
		.await
	}
}
