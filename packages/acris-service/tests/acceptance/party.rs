use std::sync::Arc;

use serde_json::json;

use acris_domain::{Criterion, Dataset, MasterCriteria, PartiesCriteria};
use acris_service::{Error, PartyRequest};
use acris_testkit::FakeDatasets;

fn smith_request() -> PartyRequest {
	PartyRequest {
		master: MasterCriteria { doc_type: Some(Criterion::one("DEED")), ..Default::default() },
		parties: PartiesCriteria { name: Some("SMITH".to_string()), ..Default::default() },
		..Default::default()
	}
}

#[tokio::test]
async fn empty_master_stage_short_circuits() {
	let fake = Arc::new(
		FakeDatasets::new()
			.with_rows(Dataset::Master, [json!({ "document_id": "A", "doc_type": "MTGE" })])
			.with_rows(Dataset::Parties, [json!({ "document_id": "A", "name": "SMITH JOHN" })]),
	);
	let service = super::build_service(&fake);
	let outcome = service.search_party(smith_request()).await.expect("Expected a valid request.");

	assert!(!outcome.is_found());
	assert_eq!(outcome.errors().len(), 1);
	assert!(outcome.errors()[0].starts_with("Master: "));
	assert!(fake.requests_for(Dataset::Parties).is_empty());
	assert!(fake.requests_for(Dataset::Legals).is_empty());

	let body = serde_json::to_value(&outcome).expect("Expected the outcome to serialize.");

	assert_eq!(body, json!({ "found": false, "errors": outcome.errors() }));
}

#[tokio::test]
async fn narrows_through_parties_then_legals() {
	let fake = Arc::new(
		FakeDatasets::new()
			.with_rows(
				Dataset::Master,
				[
					json!({ "document_id": "A", "doc_type": "DEED" }),
					json!({ "document_id": "B", "doc_type": "DEED" }),
					json!({ "document_id": "C", "doc_type": "DEED" }),
				],
			)
			.with_rows(
				Dataset::Parties,
				[
					json!({ "document_id": "A", "name": "SMITH JOHN" }),
					json!({ "document_id": "B", "name": "SMITHERS ANN" }),
					json!({ "document_id": "C", "name": "DOE JANE" }),
				],
			)
			.with_rows(
				Dataset::Legals,
				[
					json!({ "document_id": "B", "borough": "1" }),
					json!({ "document_id": "C", "borough": "1" }),
				],
			),
	);
	let service = super::build_service(&fake);
	let outcome = service.search_party(smith_request()).await.expect("Expected a valid request.");
	let stages: Vec<Dataset> =
		fake.requests().iter().take(3).map(|request| request.dataset).collect();

	assert!(outcome.is_found(), "Unexpected errors: {:?}", outcome.errors());
	assert_eq!(outcome.results().len(), 1);
	assert_eq!(outcome.results()[0].document_id, "B");
	assert_eq!(stages, vec![Dataset::Master, Dataset::Parties, Dataset::Legals]);
}

#[tokio::test]
async fn upstream_failure_in_a_narrowing_stage_halts_the_pipeline() {
	let fake = Arc::new(
		FakeDatasets::new()
			.with_rows(Dataset::Master, [json!({ "document_id": "A", "doc_type": "DEED" })])
			.with_rows(Dataset::Legals, [json!({ "document_id": "A", "borough": "1" })])
			.failing(Dataset::Parties, "Service unavailable."),
	);
	let service = super::build_service(&fake);
	let outcome = service.search_party(smith_request()).await.expect("Expected a valid request.");

	assert!(!outcome.is_found());
	assert_eq!(
		outcome.errors(),
		["Parties: upstream request failed: HTTP 503: Service unavailable.".to_string()]
	);
	assert!(fake.requests_for(Dataset::Legals).is_empty());

	// Master saw only the id resolution; assembly never started.
	assert_eq!(fake.requests_for(Dataset::Master).len(), 1);
	assert_eq!(fake.requests_for(Dataset::Parties).len(), 1);
	assert!(fake.requests_for(Dataset::References).is_empty());
	assert!(fake.requests_for(Dataset::Remarks).is_empty());
}

#[tokio::test]
async fn name_is_required() {
	let fake = Arc::new(FakeDatasets::new());
	let service = super::build_service(&fake);
	let request = PartyRequest {
		parties: PartiesCriteria { name: Some("  ".to_string()), ..Default::default() },
		..Default::default()
	};
	let err = service.search_party(request).await.expect_err("Expected a validation error.");

	assert!(matches!(err, Error::MissingCriteria { pipeline: "Party", .. }));
	assert_eq!(err.to_string(), "Party search requires parties.name.");
	assert!(fake.requests().is_empty());
}
