pub mod batch;
pub mod criteria;
pub mod dataset;
pub mod filter;

pub use batch::batches;
pub use criteria::{
	AnyCriteria, Criterion, DatasetCriteria, DateCriterion, Field, FieldValue, LegalsCriteria,
	MasterCriteria, PartiesCriteria, ReferencesCriteria, RemarksCriteria, Scalar,
};
pub use dataset::{DOCUMENT_ID_FIELD, Dataset, DatasetRecord, DocumentId, record_document_id};
pub use filter::{DatasetFilter, FilterError, SoqlFilter, build_fields, build_filter};

/// Rows requested per page from a dataset endpoint.
pub const PAGE_SIZE: usize = 1_000;
/// Identifiers per full-record fetch.
pub const RECORD_BATCH_SIZE: usize = 75;
/// Identifiers per cross-reference lookup.
pub const CROSSREF_BATCH_SIZE: usize = 500;
