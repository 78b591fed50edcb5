mod error;
mod types;

pub use error::{Error, Result};
pub use types::{Config, Datasets, Search, Service, Socrata};

use std::{fs, path::Path};

pub fn load(path: &Path) -> Result<Config> {
	let raw = fs::read_to_string(path)
		.map_err(|err| Error::ReadConfig { path: path.to_path_buf(), source: err })?;

	let mut cfg: Config = toml::from_str(&raw)
		.map_err(|err| Error::ParseConfig { path: path.to_path_buf(), source: err })?;

	normalize(&mut cfg);

	validate(&cfg)?;

	Ok(cfg)
}

pub fn validate(cfg: &Config) -> Result<()> {
	if cfg.service.http_bind.trim().is_empty() {
		return Err(Error::Validation {
			message: "service.http_bind must be non-empty.".to_string(),
		});
	}

	let api_base = cfg.socrata.api_base.trim();

	if !(api_base.starts_with("http://") || api_base.starts_with("https://")) {
		return Err(Error::Validation {
			message: "socrata.api_base must be an http:// or https:// URL.".to_string(),
		});
	}
	if cfg.socrata.timeout_ms == 0 {
		return Err(Error::Validation {
			message: "socrata.timeout_ms must be greater than zero.".to_string(),
		});
	}
	if cfg.socrata.page_size == 0 {
		return Err(Error::Validation {
			message: "socrata.page_size must be greater than zero.".to_string(),
		});
	}

	let datasets = &cfg.socrata.datasets;

	for (label, id) in [
		("master", &datasets.master),
		("parties", &datasets.parties),
		("legals", &datasets.legals),
		("references", &datasets.references),
		("remarks", &datasets.remarks),
	] {
		if id.trim().is_empty() {
			return Err(Error::Validation {
				message: format!("socrata.datasets.{label} must be non-empty."),
			});
		}
	}

	for (label, value) in [
		("search.record_batch_size", cfg.search.record_batch_size as u64),
		("search.crossref_batch_size", cfg.search.crossref_batch_size as u64),
		("search.deadline_ms", cfg.search.deadline_ms),
	] {
		if value == 0 {
			return Err(Error::Validation {
				message: format!("{label} must be greater than zero."),
			});
		}
	}

	for (class, types) in &cfg.document_classes {
		if types.is_empty() || types.iter().any(|code| code.trim().is_empty()) {
			return Err(Error::Validation {
				message: format!(
					"document_classes.{class} must list at least one non-empty document type."
				),
			});
		}
	}

	Ok(())
}

fn normalize(cfg: &mut Config) {
	cfg.socrata.api_base = cfg.socrata.api_base.trim().trim_end_matches('/').to_string();

	if cfg.socrata.app_token.as_deref().map(|token| token.trim().is_empty()).unwrap_or(false) {
		cfg.socrata.app_token = None;
	}
}
