use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use acris_domain::{DatasetFilter, LegalsCriteria, MasterCriteria};

use crate::{
	AcrisService, PipelineOutcome, Result, assemble::assemble, crossref::cross_reference,
	pipeline::Required,
};

/// Search by borough/block/lot or by street address.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParcelRequest {
	#[serde(default)]
	pub master: MasterCriteria,
	#[serde(default)]
	pub legals: LegalsCriteria,
}

impl AcrisService {
	pub async fn search_parcel(&self, req: ParcelRequest) -> Result<PipelineOutcome> {
		self.search_parcel_with_cancel(req, CancellationToken::new()).await
	}

	pub async fn search_parcel_with_cancel(
		&self,
		req: ParcelRequest,
		cancel: CancellationToken,
	) -> Result<PipelineOutcome> {
		validate(&req.legals)?;

		let legals = DatasetFilter::build(&req.legals)?;
		let master = DatasetFilter::build(&req.master)?;
		let crossref_batch = self.cfg.search.crossref_batch_size;
		let record_batch = self.cfg.search.record_batch_size;

		self.run_pipeline("parcel", cancel, |fetcher| async move {
			let ids = fetcher.fetch_ids(legals.dataset, &legals.filter).await?;
			let ids = cross_reference(&fetcher, &master, &ids, crossref_batch).await?;

			assemble(&fetcher, &ids, record_batch).await
		})
		.await
	}
}

fn validate(legals: &LegalsCriteria) -> Result<()> {
	let required = Required::default().criterion("legals.borough", &legals.borough);
	let by_address = legals.street_number.is_some() || legals.street_name.is_some();
	let required = if by_address {
		required
			.criterion("legals.street_number", &legals.street_number)
			.text("legals.street_name", &legals.street_name)
	} else {
		required.criterion("legals.block", &legals.block).criterion("legals.lot", &legals.lot)
	};

	required.check("Parcel")
}
