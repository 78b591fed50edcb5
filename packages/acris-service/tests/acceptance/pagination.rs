use std::sync::Arc;

use acris_domain::{Dataset, SoqlFilter};
use acris_service::{CancellationToken, Error, Fetcher};
use acris_testkit::FakeDatasets;

fn fetcher(fake: &Arc<FakeDatasets>) -> Fetcher {
	Fetcher::new(fake.clone(), 1_000, CancellationToken::new())
}

#[tokio::test]
async fn exact_multiple_of_page_size_costs_one_extra_request() {
	let fake = Arc::new(FakeDatasets::new().with_generated_rows(Dataset::Master, 2_000, |i| {
		format!("DOC{i:05}")
	}));
	let rows = fetcher(&fake)
		.fetch_records(Dataset::Master, &SoqlFilter::default())
		.await
		.expect("Expected records to be fetched.");
	let offsets: Vec<usize> =
		fake.requests_for(Dataset::Master).iter().map(|request| request.query.offset).collect();

	assert_eq!(rows.len(), 2_000);
	assert_eq!(offsets, vec![0, 1_000, 2_000]);
}

#[tokio::test]
async fn short_page_ends_pagination() {
	let fake = Arc::new(FakeDatasets::new().with_generated_rows(Dataset::Parties, 1_500, |i| {
		format!("DOC{i:05}")
	}));
	let rows = fetcher(&fake)
		.fetch_records(Dataset::Parties, &SoqlFilter::default())
		.await
		.expect("Expected records to be fetched.");
	let requests = fake.requests_for(Dataset::Parties);

	assert_eq!(rows.len(), 1_500);
	assert_eq!(requests.len(), 2);
	assert!(requests.iter().all(|request| request.query.limit == 1_000));
	assert!(requests.iter().all(|request| request.query.order.as_deref() == Some(":id")));
}

#[tokio::test]
async fn empty_dataset_is_not_found() {
	let fake = Arc::new(FakeDatasets::new());
	let err = fetcher(&fake)
		.fetch_records(Dataset::Remarks, &SoqlFilter::default())
		.await
		.expect_err("Expected an empty dataset to be reported.");

	assert!(matches!(err, Error::NotFound { dataset: Dataset::Remarks, .. }));
	assert_eq!(fake.requests_for(Dataset::Remarks).len(), 1);
}

#[tokio::test]
async fn id_projection_deduplicates_in_first_seen_order() {
	let fake = Arc::new(FakeDatasets::new().with_rows(
		Dataset::Parties,
		[
			serde_json::json!({ "document_id": "B", "name": "ONE" }),
			serde_json::json!({ "document_id": "A", "name": "TWO" }),
			serde_json::json!({ "document_id": "B", "name": "THREE" }),
		],
	));
	let ids = fetcher(&fake)
		.fetch_ids(Dataset::Parties, &SoqlFilter::default())
		.await
		.expect("Expected ids to be fetched.");
	let requests = fake.requests_for(Dataset::Parties);

	assert_eq!(ids, vec!["B".to_string(), "A".to_string()]);
	assert_eq!(requests[0].query.select.as_deref(), Some("document_id"));
}

#[tokio::test]
async fn upstream_failure_names_the_dataset() {
	let fake = Arc::new(FakeDatasets::new().failing(Dataset::Legals, "Service unavailable."));
	let err = fetcher(&fake)
		.fetch_records(Dataset::Legals, &SoqlFilter::default())
		.await
		.expect_err("Expected the upstream failure to surface.");

	assert!(matches!(err, Error::Upstream { dataset: Dataset::Legals, .. }));
	assert!(err.to_string().starts_with("Legals: "));
	assert!(err.to_string().contains("Service unavailable."));
}
