use std::collections::BTreeMap;

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
	pub service: Service,
	pub socrata: Socrata,
	pub search: Search,
	/// Document class name to its member document type codes.
	#[serde(default)]
	pub document_classes: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Service {
	pub http_bind: String,
	pub log_level: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Socrata {
	pub api_base: String,
	/// Optional. Sent as `X-App-Token`; blank values are treated as absent.
	pub app_token: Option<String>,
	pub timeout_ms: u64,
	#[serde(default = "default_page_size")]
	pub page_size: usize,
	pub datasets: Datasets,
}

/// Socrata resource identifiers of the five ACRIS tables.
#[derive(Debug, Clone, Deserialize)]
pub struct Datasets {
	pub master: String,
	pub parties: String,
	pub legals: String,
	pub references: String,
	pub remarks: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Search {
	#[serde(default = "default_record_batch_size")]
	pub record_batch_size: usize,
	#[serde(default = "default_crossref_batch_size")]
	pub crossref_batch_size: usize,
	pub deadline_ms: u64,
}

fn default_page_size() -> usize {
	1_000
}

fn default_record_batch_size() -> usize {
	75
}

fn default_crossref_batch_size() -> usize {
	500
}
