use std::{collections::HashSet, sync::Arc};

use acris_domain::{Dataset, DatasetFilter, PartiesCriteria, SoqlFilter};
use acris_service::{CancellationToken, Error, Fetcher, crossref::cross_reference};
use acris_testkit::FakeDatasets;

fn candidates(count: usize) -> Vec<String> {
	(0..count).map(|i| format!("DOC{i:05}")).collect()
}

fn parties_filter() -> DatasetFilter {
	DatasetFilter { dataset: Dataset::Parties, filter: SoqlFilter::default() }
}

#[tokio::test]
async fn batches_candidates_and_keeps_only_hits() {
	// Hits only in the first two batches, some repeated.
	let fake = Arc::new(
		FakeDatasets::new()
			.with_generated_rows(Dataset::Parties, 900, |i| format!("DOC{:05}", i % 900))
			.with_generated_rows(Dataset::Parties, 100, |i| format!("DOC{i:05}")),
	);
	let fetcher = Fetcher::new(fake.clone(), 1_000, CancellationToken::new());
	let input = candidates(1_200);
	let resolved = cross_reference(&fetcher, &parties_filter(), &input, 500)
		.await
		.expect("Expected candidates to resolve.");
	let requests = fake.requests_for(Dataset::Parties);
	let batch_sizes: Vec<usize> = requests
		.iter()
		.map(|request| {
			request
				.query
				.filter
				.as_deref()
				.map(|filter| filter.matches('\'').count() / 2)
				.unwrap_or(0)
		})
		.collect();
	let input_set: HashSet<&String> = input.iter().collect();
	let unique: HashSet<&String> = resolved.iter().collect();

	assert_eq!(batch_sizes, vec![500, 500, 200]);
	assert_eq!(resolved.len(), 900);
	assert_eq!(unique.len(), resolved.len());
	assert!(resolved.iter().all(|id| input_set.contains(id)));
}

#[tokio::test]
async fn target_filter_is_conjoined_with_the_batch() {
	let fake = Arc::new(FakeDatasets::new().with_rows(
		Dataset::Parties,
		[
			serde_json::json!({ "document_id": "A", "name": "SMITH JOHN" }),
			serde_json::json!({ "document_id": "B", "name": "DOE JANE" }),
		],
	));
	let fetcher = Fetcher::new(fake.clone(), 1_000, CancellationToken::new());
	let target = DatasetFilter::build(&PartiesCriteria {
		name: Some("SMITH".to_string()),
		..Default::default()
	})
	.expect("Expected a valid filter.");
	let resolved = cross_reference(&fetcher, &target, &["A".to_string(), "B".to_string()], 500)
		.await
		.expect("Expected a match.");
	let filter = fake.requests_for(Dataset::Parties)[0].query.filter.clone();

	assert_eq!(resolved, vec!["A".to_string()]);
	assert_eq!(filter.as_deref(), Some("name like '%SMITH%' AND document_id in ('A', 'B')"));
}

#[tokio::test]
async fn no_hits_in_any_batch_is_not_found() {
	let fake = Arc::new(FakeDatasets::new());
	let fetcher = Fetcher::new(fake.clone(), 1_000, CancellationToken::new());
	let err = cross_reference(&fetcher, &parties_filter(), &candidates(3), 500)
		.await
		.expect_err("Expected an empty resolution to fail.");

	assert!(matches!(err, Error::NotFound { dataset: Dataset::Parties, .. }));
}

#[tokio::test]
async fn empty_candidate_set_is_rejected_without_requests() {
	let fake = Arc::new(FakeDatasets::new());
	let fetcher = Fetcher::new(fake.clone(), 1_000, CancellationToken::new());
	let err = cross_reference(&fetcher, &parties_filter(), &[], 500)
		.await
		.expect_err("Expected empty candidates to be rejected.");

	assert!(err.is_validation());
	assert!(fake.requests().is_empty());
}
