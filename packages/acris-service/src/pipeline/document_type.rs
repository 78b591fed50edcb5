use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use acris_domain::{Criterion, DatasetFilter, LegalsCriteria, MasterCriteria};

use crate::{
	AcrisService, Error, PipelineOutcome, Result, assemble::assemble, crossref::cross_reference,
};

/// Search by document type code, or by a named class of document types.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentTypeRequest {
	#[serde(default)]
	pub document_class: Option<String>,
	#[serde(default)]
	pub master: MasterCriteria,
	#[serde(default)]
	pub legals: LegalsCriteria,
}

impl AcrisService {
	pub async fn search_document_type(&self, req: DocumentTypeRequest) -> Result<PipelineOutcome> {
		self.search_document_type_with_cancel(req, CancellationToken::new()).await
	}

	pub async fn search_document_type_with_cancel(
		&self,
		req: DocumentTypeRequest,
		cancel: CancellationToken,
	) -> Result<PipelineOutcome> {
		let DocumentTypeRequest { document_class, master, legals } = req;
		let class = document_class
			.map(|class| class.trim().to_string())
			.filter(|class| !class.is_empty());
		let has_doc_type = master.doc_type.as_ref().is_some_and(|doc_type| !doc_type.is_blank());

		match (&class, has_doc_type) {
			(None, false) =>
				return Err(Error::MissingCriteria {
					pipeline: "Document type",
					fields: vec!["master.doc_type or document_class".to_string()],
				}),
			(Some(_), true) =>
				return Err(Error::InvalidRequest {
					message: "Give either master.doc_type or document_class, not both.".to_string(),
				}),
			_ => {},
		}

		// Rejects malformed criteria before the class lookup goes anywhere.
		let master_filter = DatasetFilter::build(&master)?;
		let legals = DatasetFilter::build(&legals)?;
		let classes = Arc::clone(&self.classes);
		let crossref_batch = self.cfg.search.crossref_batch_size;
		let record_batch = self.cfg.search.record_batch_size;

		self.run_pipeline("document_type", cancel, |fetcher| async move {
			let master_filter = match class {
				Some(class) => {
					let types = classes.document_types(&class).await?;

					tracing::debug!(%class, types = types.len(), "Expanded document class.");

					let master =
						MasterCriteria { doc_type: Some(Criterion::many(types)), ..master };

					DatasetFilter::build(&master)?
				},
				None => master_filter,
			};

			let ids = fetcher.fetch_ids(master_filter.dataset, &master_filter.filter).await?;
			let ids = cross_reference(&fetcher, &legals, &ids, crossref_batch).await?;

			assemble(&fetcher, &ids, record_batch).await
		})
		.await
	}
}
