use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use acris_domain::{DatasetFilter, LegalsCriteria, MasterCriteria, PartiesCriteria};

use crate::{
	AcrisService, PipelineOutcome, Result, assemble::assemble, crossref::cross_reference,
	pipeline::Required,
};

/// Search by party name, optionally constrained by document and property details.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PartyRequest {
	#[serde(default)]
	pub master: MasterCriteria,
	#[serde(default)]
	pub parties: PartiesCriteria,
	#[serde(default)]
	pub legals: LegalsCriteria,
}

impl AcrisService {
	pub async fn search_party(&self, req: PartyRequest) -> Result<PipelineOutcome> {
		self.search_party_with_cancel(req, CancellationToken::new()).await
	}

	pub async fn search_party_with_cancel(
		&self,
		req: PartyRequest,
		cancel: CancellationToken,
	) -> Result<PipelineOutcome> {
		Required::default().text("parties.name", &req.parties.name).check("Party")?;

		let master = DatasetFilter::build(&req.master)?;
		let parties = DatasetFilter::build(&req.parties)?;
		let legals = DatasetFilter::build(&req.legals)?;
		let crossref_batch = self.cfg.search.crossref_batch_size;
		let record_batch = self.cfg.search.record_batch_size;

		self.run_pipeline("party", cancel, |fetcher| async move {
			let ids = fetcher.fetch_ids(master.dataset, &master.filter).await?;
			let ids = cross_reference(&fetcher, &parties, &ids, crossref_batch).await?;
			let ids = cross_reference(&fetcher, &legals, &ids, crossref_batch).await?;

			assemble(&fetcher, &ids, record_batch).await
		})
		.await
	}
}
