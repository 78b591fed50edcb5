use std::sync::Arc;

use acris_service::AcrisService;

#[derive(Clone)]
pub struct AppState {
	pub service: Arc<AcrisService>,
}
impl AppState {
	pub fn new(config: acris_config::Config) -> color_eyre::Result<Self> {
		let service = AcrisService::new(config)?;

		Ok(Self::with_service(service))
	}

	pub fn with_service(service: AcrisService) -> Self {
		Self { service: Arc::new(service) }
	}
}
