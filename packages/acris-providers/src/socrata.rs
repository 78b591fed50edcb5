use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use acris_config::Socrata;
use acris_domain::{Dataset, DatasetRecord};

use crate::{BoxFuture, DatasetSource, Error, PageQuery, Result};

/// Socrata Open Data API client for the ACRIS tables.
pub struct SocrataSource {
	client: Client,
	api_base: String,
	datasets: acris_config::Datasets,
}
impl SocrataSource {
	pub fn new(cfg: &Socrata) -> Result<Self> {
		if cfg.api_base.trim().is_empty() {
			return Err(Error::InvalidConfig {
				message: "Socrata api_base must be non-empty.".to_string(),
			});
		}

		let client = Client::builder()
			.timeout(Duration::from_millis(cfg.timeout_ms))
			.default_headers(crate::app_token_headers(cfg.app_token.as_deref())?)
			.build()?;

		Ok(Self {
			client,
			api_base: cfg.api_base.trim_end_matches('/').to_string(),
			datasets: cfg.datasets.clone(),
		})
	}

	pub fn resource_url(&self, dataset: Dataset) -> String {
		let id = match dataset {
			Dataset::Master => &self.datasets.master,
			Dataset::Parties => &self.datasets.parties,
			Dataset::Legals => &self.datasets.legals,
			Dataset::References => &self.datasets.references,
			Dataset::Remarks => &self.datasets.remarks,
		};

		format!("{}/resource/{id}.json", self.api_base)
	}

	async fn get_page(&self, dataset: Dataset, query: &PageQuery) -> Result<Vec<DatasetRecord>> {
		let url = self.resource_url(dataset);
		let res = self.client.get(&url).query(&query_params(query)).send().await?;
		let status = res.status();
		let bytes = res.bytes().await?;

		if !status.is_success() {
			return Err(Error::Status {
				status: status.as_u16(),
				message: error_message(&bytes),
			});
		}

		let rows = parse_rows(serde_json::from_slice(&bytes)?)?;

		tracing::debug!(
			dataset = dataset.as_str(),
			offset = query.offset,
			rows = rows.len(),
			"Fetched Socrata page."
		);

		Ok(rows)
	}
}

impl DatasetSource for SocrataSource {
	fn fetch_page<'a>(
		&'a self,
		dataset: Dataset,
		query: &'a PageQuery,
	) -> BoxFuture<'a, Result<Vec<DatasetRecord>>> {
		Box::pin(self.get_page(dataset, query))
	}
}

pub fn query_params(query: &PageQuery) -> Vec<(&'static str, String)> {
	let mut params = Vec::with_capacity(5);

	if let Some(select) = query.select.as_ref() {
		params.push(("$select", select.clone()));
	}
	if let Some(filter) = query.filter.as_ref() {
		params.push(("$where", filter.clone()));
	}
	if let Some(order) = query.order.as_ref() {
		params.push(("$order", order.clone()));
	}

	params.push(("$limit", query.limit.to_string()));
	params.push(("$offset", query.offset.to_string()));

	params
}

fn parse_rows(json: Value) -> Result<Vec<DatasetRecord>> {
	let Value::Array(items) = json else {
		return Err(Error::InvalidResponse {
			message: "Socrata response must be a JSON array.".to_string(),
		});
	};

	items
		.into_iter()
		.map(|item| match item {
			Value::Object(row) => Ok(row),
			_ => Err(Error::InvalidResponse {
				message: "Socrata rows must be JSON objects.".to_string(),
			}),
		})
		.collect()
}

/// Socrata errors carry a JSON `message`; anything else is passed through as text.
fn error_message(bytes: &[u8]) -> String {
	serde_json::from_slice::<Value>(bytes)
		.ok()
		.and_then(|json| json.get("message").and_then(Value::as_str).map(str::to_string))
		.unwrap_or_else(|| String::from_utf8_lossy(bytes).trim().to_string())
}
