use std::sync::Arc;

use serde_json::json;

use acris_domain::Dataset;
use acris_service::{Error, TransactionRequest};
use acris_testkit::FakeDatasets;

fn request(number: &str) -> TransactionRequest {
	TransactionRequest { transaction_number: Some(number.to_string()) }
}

#[tokio::test]
async fn unions_hits_from_every_dataset() {
	let fake = Arc::new(
		FakeDatasets::new()
			.with_rows(Dataset::Master, [json!({ "document_id": "2021011200001001" })])
			.with_rows(
				Dataset::Parties,
				[
					json!({ "document_id": "2021011200001001", "name": "SMITH JOHN" }),
					json!({ "document_id": "2021011200001002", "name": "DOE JANE" }),
				],
			)
			.with_rows(Dataset::Remarks, [json!({ "document_id": "2099000000000001" })]),
	);
	let service = super::build_service(&fake);
	let outcome = service
		.search_transaction(request("202101120000"))
		.await
		.expect("Expected a valid request.");
	let ids: Vec<&str> =
		outcome.results().iter().map(|result| result.document_id.as_str()).collect();

	assert!(outcome.is_found(), "Unexpected errors: {:?}", outcome.errors());
	assert_eq!(ids, vec!["2021011200001001", "2021011200001002"]);
	assert_eq!(outcome.results()[0].master_records.len(), 1);
	assert!(outcome.results()[1].master_records.is_empty());

	// One independent query per dataset, no narrowing.
	for dataset in Dataset::ALL {
		let requests = fake.requests_for(dataset);

		assert_eq!(requests.len(), 1);
		assert_eq!(
			requests[0].query.filter.as_deref(),
			Some("starts_with(document_id, '202101120000')")
		);
	}
}

#[tokio::test]
async fn no_hits_anywhere_is_not_found() {
	let fake = Arc::new(FakeDatasets::new());
	let service = super::build_service(&fake);
	let outcome =
		service.search_transaction(request("1")).await.expect("Expected a valid request.");

	assert!(!outcome.is_found());
	assert_eq!(outcome.errors().len(), 1);
}

#[tokio::test]
async fn upstream_failures_fail_the_union() {
	let fake = Arc::new(
		FakeDatasets::new()
			.with_rows(Dataset::Master, [json!({ "document_id": "1" })])
			.failing(Dataset::References, "Service unavailable."),
	);
	let service = super::build_service(&fake);
	let outcome =
		service.search_transaction(request("1")).await.expect("Expected a valid request.");

	assert!(!outcome.is_found());
	assert_eq!(outcome.errors().len(), 1);
	assert!(outcome.errors()[0].starts_with("References: "));
}

#[tokio::test]
async fn blank_number_is_rejected() {
	let fake = Arc::new(FakeDatasets::new());
	let service = super::build_service(&fake);
	let err =
		service.search_transaction(request(" ")).await.expect_err("Expected a validation error.");

	assert!(matches!(err, Error::MissingCriteria { .. }));
	assert!(fake.requests().is_empty());
}
