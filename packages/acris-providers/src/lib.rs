pub mod error;
pub mod socrata;

pub use error::{Error, Result};
pub use socrata::SocrataSource;

use std::{future::Future, pin::Pin};

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};

use acris_domain::{Dataset, DatasetRecord};

pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

pub const APP_TOKEN_HEADER: &str = "x-app-token";

/// One bounded page request against a dataset endpoint.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageQuery {
	/// `$where` expression; `None` scans the whole dataset.
	pub filter: Option<String>,
	/// `$select` projection; `None` returns full rows.
	pub select: Option<String>,
	/// `$order`; paged scans order by `:id` so offsets stay stable between pages.
	pub order: Option<String>,
	pub limit: usize,
	pub offset: usize,
}

/// Remote store of the five ACRIS datasets, one page per call.
pub trait DatasetSource
where
	Self: Send + Sync,
{
	fn fetch_page<'a>(
		&'a self,
		dataset: Dataset,
		query: &'a PageQuery,
	) -> BoxFuture<'a, Result<Vec<DatasetRecord>>>;
}

pub fn app_token_headers(app_token: Option<&str>) -> Result<HeaderMap> {
	let mut headers = HeaderMap::new();

	if let Some(token) = app_token {
		headers.insert(HeaderName::from_static(APP_TOKEN_HEADER), HeaderValue::from_str(token)?);
	}

	Ok(headers)
}
