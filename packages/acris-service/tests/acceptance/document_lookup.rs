use std::sync::Arc;

use serde_json::json;

use acris_domain::{Criterion, Dataset, MasterCriteria};
use acris_service::{DocumentIdRequest, DocumentTypeRequest, Error, ReelPageRequest};
use acris_testkit::FakeDatasets;

fn master_and_legals() -> FakeDatasets {
	FakeDatasets::new()
		.with_rows(
			Dataset::Master,
			[
				json!({
					"document_id": "A",
					"doc_type": "DEED",
					"crfn": "2021000001",
					"reel_yr": "1990",
					"reel_nbr": "12",
					"reel_pg": "7"
				}),
				json!({ "document_id": "B", "doc_type": "DEEDO", "crfn": "2021000002" }),
				json!({ "document_id": "C", "doc_type": "MTGE", "crfn": "2021000003" }),
			],
		)
		.with_rows(
			Dataset::Legals,
			[
				json!({ "document_id": "A", "borough": "1" }),
				json!({ "document_id": "B", "borough": "1" }),
				json!({ "document_id": "C", "borough": "1" }),
			],
		)
}

#[tokio::test]
async fn document_class_expands_to_member_types() {
	let fake = Arc::new(master_and_legals());
	let service = super::build_service(&fake);
	let request = DocumentTypeRequest {
		document_class: Some("deeds_and_other_conveyances".to_string()),
		..Default::default()
	};
	let outcome = service.search_document_type(request).await.expect("Expected a valid request.");
	let ids: Vec<&str> =
		outcome.results().iter().map(|result| result.document_id.as_str()).collect();

	assert!(outcome.is_found(), "Unexpected errors: {:?}", outcome.errors());
	assert_eq!(ids, vec!["A", "B"]);
	assert_eq!(
		fake.requests_for(Dataset::Master)[0].query.filter.as_deref(),
		Some("doc_type in ('DEED', 'DEEDO')")
	);
}

#[tokio::test]
async fn unknown_document_class_is_not_found() {
	let fake = Arc::new(master_and_legals());
	let service = super::build_service(&fake);
	let request =
		DocumentTypeRequest { document_class: Some("NOPE".to_string()), ..Default::default() };
	let outcome = service.search_document_type(request).await.expect("Expected a valid request.");

	assert!(!outcome.is_found());
	assert_eq!(outcome.errors(), ["Unknown document class: NOPE.".to_string()]);
	assert!(fake.requests().is_empty());
}

#[tokio::test]
async fn doc_type_and_class_are_mutually_exclusive() {
	let fake = Arc::new(master_and_legals());
	let service = super::build_service(&fake);
	let request = DocumentTypeRequest {
		document_class: Some("DEEDS_AND_OTHER_CONVEYANCES".to_string()),
		master: MasterCriteria { doc_type: Some(Criterion::one("DEED")), ..Default::default() },
		..Default::default()
	};
	let err =
		service.search_document_type(request).await.expect_err("Expected a validation error.");

	assert!(matches!(err, Error::InvalidRequest { .. }));
}

#[tokio::test]
async fn reel_page_requires_every_reel_field() {
	let fake = Arc::new(master_and_legals());
	let service = super::build_service(&fake);
	let request = ReelPageRequest {
		master: MasterCriteria { reel_yr: Some(Criterion::one("1990")), ..Default::default() },
		..Default::default()
	};
	let err = service.search_reel_page(request).await.expect_err("Expected a validation error.");

	match err {
		Error::MissingCriteria { fields, .. } => assert_eq!(
			fields,
			vec![
				"master.reel_nbr".to_string(),
				"master.reel_pg".to_string(),
				"legals.borough".to_string()
			]
		),
		other => panic!("Unexpected error: {other}"),
	}
}

#[tokio::test]
async fn reel_page_resolves_master_then_legals() {
	let fake = Arc::new(master_and_legals());
	let service = super::build_service(&fake);
	let mut request = ReelPageRequest::default();

	request.master.reel_yr = Some(Criterion::one("1990"));
	request.master.reel_nbr = Some(Criterion::one("12"));
	request.master.reel_pg = Some(Criterion::one("7"));
	request.legals.borough = Some(Criterion::one("1"));

	let outcome = service.search_reel_page(request).await.expect("Expected a valid request.");

	assert!(outcome.is_found(), "Unexpected errors: {:?}", outcome.errors());
	assert_eq!(outcome.results()[0].document_id, "A");
}

#[tokio::test]
async fn document_ids_are_looked_up_directly() {
	let fake = Arc::new(master_and_legals());
	let service = super::build_service(&fake);
	let request = DocumentIdRequest { document_id: Some(Criterion::one("C, A")), crfn: None };
	let outcome = service.search_document_id(request).await.expect("Expected a valid request.");
	let ids: Vec<&str> =
		outcome.results().iter().map(|result| result.document_id.as_str()).collect();

	assert_eq!(ids, vec!["C", "A"]);
	// No resolution stage, straight to assembly.
	assert_eq!(fake.requests_for(Dataset::Master).len(), 1);
}

#[tokio::test]
async fn crfn_resolves_through_master() {
	let fake = Arc::new(master_and_legals());
	let service = super::build_service(&fake);
	let request = DocumentIdRequest {
		document_id: None,
		crfn: Some(Criterion::many(["2021000002", "2021000003"])),
	};
	let outcome = service.search_document_id(request).await.expect("Expected a valid request.");
	let ids: Vec<&str> =
		outcome.results().iter().map(|result| result.document_id.as_str()).collect();

	assert_eq!(ids, vec!["B", "C"]);
}

#[tokio::test]
async fn unknown_document_ids_are_not_found() {
	let fake = Arc::new(master_and_legals());
	let service = super::build_service(&fake);
	let request = DocumentIdRequest { document_id: Some(Criterion::one("ZZZ")), crfn: None };
	let outcome = service.search_document_id(request).await.expect("Expected a valid request.");

	assert!(!outcome.is_found());
}

#[tokio::test]
async fn document_id_and_crfn_are_mutually_exclusive() {
	let fake = Arc::new(master_and_legals());
	let service = super::build_service(&fake);

	for request in [
		DocumentIdRequest::default(),
		DocumentIdRequest {
			document_id: Some(Criterion::one("A")),
			crfn: Some(Criterion::one("2021000001")),
		},
		DocumentIdRequest { document_id: Some(Criterion::one("A,,B")), crfn: None },
	] {
		let err =
			service.search_document_id(request).await.expect_err("Expected a validation error.");

		assert!(err.is_validation());
	}

	assert!(fake.requests().is_empty());
}
