pub mod assemble;
pub mod count;
pub mod crossref;
pub mod fetch;
pub mod ids;
pub mod outcome;
pub mod pipeline;

mod error;

pub use acris_providers::BoxFuture;
pub use assemble::CompositeResult;
pub use count::CountResponse;
pub use error::{Error, Result};
pub use fetch::Fetcher;
pub use outcome::PipelineOutcome;
pub use pipeline::{
	DocumentIdRequest, DocumentTypeRequest, ParcelRequest, PartyRequest, ReelPageRequest,
	TransactionRequest,
};
pub use tokio_util::sync::CancellationToken;

use std::{collections::BTreeMap, sync::Arc};

use acris_config::Config;
use acris_providers::{DatasetSource, SocrataSource};

/// Expands a document class into its member document type codes.
pub trait DocumentClassLookup
where
	Self: Send + Sync,
{
	fn document_types<'a>(&'a self, class: &'a str) -> BoxFuture<'a, Result<Vec<String>>>;
}

/// Document classes read from the `[document_classes]` config table. Names match
/// case-insensitively.
pub struct ConfigDocumentClasses {
	classes: BTreeMap<String, Vec<String>>,
}
impl ConfigDocumentClasses {
	pub fn new(classes: BTreeMap<String, Vec<String>>) -> Self {
		Self { classes }
	}

	fn lookup(&self, class: &str) -> Result<Vec<String>> {
		let class = class.trim();

		self.classes
			.iter()
			.find(|(name, _)| name.eq_ignore_ascii_case(class))
			.map(|(_, types)| types.clone())
			.ok_or_else(|| Error::UnknownDocumentClass { class: class.to_string() })
	}
}

impl DocumentClassLookup for ConfigDocumentClasses {
	fn document_types<'a>(&'a self, class: &'a str) -> BoxFuture<'a, Result<Vec<String>>> {
		let types = self.lookup(class);

		Box::pin(async move { types })
	}
}

pub struct AcrisService {
	pub cfg: Config,
	pub source: Arc<dyn DatasetSource>,
	pub classes: Arc<dyn DocumentClassLookup>,
}
impl AcrisService {
	pub fn new(cfg: Config) -> acris_providers::Result<Self> {
		let source = Arc::new(SocrataSource::new(&cfg.socrata)?);
		let classes = Arc::new(ConfigDocumentClasses::new(cfg.document_classes.clone()));

		Ok(Self { cfg, source, classes })
	}

	pub fn with_source(cfg: Config, source: Arc<dyn DatasetSource>) -> Self {
		let classes = Arc::new(ConfigDocumentClasses::new(cfg.document_classes.clone()));

		Self { cfg, source, classes }
	}

	pub fn with_collaborators(
		cfg: Config,
		source: Arc<dyn DatasetSource>,
		classes: Arc<dyn DocumentClassLookup>,
	) -> Self {
		Self { cfg, source, classes }
	}

	pub(crate) fn fetcher(&self, cancel: CancellationToken) -> Fetcher {
		Fetcher::new(self.source.clone(), self.cfg.socrata.page_size, cancel)
	}
}
