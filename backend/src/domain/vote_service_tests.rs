//! Tests for the vote service.

use std::sync::Arc;

use mockall::predicate::eq;
use rstest::rstest;

use super::*;
use crate::domain::ports::{
    FixtureSubpagePolicyRepository, MockEntityCatalogRepository, MockSubpagePolicyRepository,
    MockVoteLedgerRepository,
};
use crate::domain::{ErrorCode, UserId};

type TestService =
    VoteService<MockSubpagePolicyRepository, MockEntityCatalogRepository, MockVoteLedgerRepository>;

fn entity(entity_id: i64, path: Option<&str>, upvotes: u64, downvotes: u64) -> VotableEntity {
    VotableEntity {
        entity_id,
        domain_id: 1,
        path: path.map(str::to_owned),
        upvotes,
        downvotes,
        voting_allowed: true,
        allow_subpage_voting: path.is_some(),
    }
}

fn policy(allowed: bool) -> MockSubpagePolicyRepository {
    let mut policy = MockSubpagePolicyRepository::new();
    policy
        .expect_is_subpage_voting_allowed()
        .returning(move |_| Ok(allowed));
    policy
}

fn make_service(
    policy: MockSubpagePolicyRepository,
    catalog: MockEntityCatalogRepository,
    ledger: MockVoteLedgerRepository,
) -> TestService {
    VoteService::new(Arc::new(policy), Arc::new(catalog), Arc::new(ledger))
}

fn request(direction: &str, url: &str) -> CastVoteRequest {
    CastVoteRequest {
        user_id: UserId::new(42).expect("valid user id"),
        url: url.to_owned(),
        direction: direction.to_owned(),
    }
}

fn details_code(error: &Error) -> Option<&str> {
    error
        .details()
        .and_then(|details| details.get("code"))
        .and_then(|code| code.as_str())
}

#[tokio::test]
async fn tally_rolls_subpage_up_to_domain_when_policy_disallows() {
    let mut catalog = MockEntityCatalogRepository::new();
    catalog
        .expect_get_or_create_entity()
        .withf(|host, path, allowed| {
            host == "example.com" && path.as_deref() == Some("a") && !*allowed
        })
        .times(1)
        .return_once(|_, _, _| Ok(entity(9, None, 4, 2)));

    let service = make_service(policy(false), catalog, MockVoteLedgerRepository::new());
    let snapshot = service
        .tally("https://www.example.com/a/b")
        .await
        .expect("tally succeeds");

    assert_eq!(snapshot.domain, "example.com");
    assert_eq!(snapshot.path.as_deref(), Some("a"));
    assert_eq!((snapshot.upvotes, snapshot.downvotes), (4, 2));
}

#[tokio::test]
async fn tally_passes_subpage_flag_through() {
    let mut catalog = MockEntityCatalogRepository::new();
    catalog
        .expect_get_or_create_entity()
        .withf(|_, path, allowed| path.as_deref() == Some("@username") && *allowed)
        .times(1)
        .return_once(|_, _, _| Ok(entity(3, Some("@username"), 0, 0)));

    let service = make_service(policy(true), catalog, MockVoteLedgerRepository::new());
    let snapshot = service
        .tally("https://youtube.com/@username/videos")
        .await
        .expect("tally succeeds");

    assert_eq!(snapshot.path.as_deref(), Some("@username"));
}

#[rstest]
#[case("http://example.com", "unsupported_scheme")]
#[case("example.com", "unsupported_scheme")]
#[case("https://co.uk/a", "unresolvable_domain")]
#[tokio::test]
async fn tally_rejects_unsupported_urls_without_storage_access(
    #[case] url: &str,
    #[case] code: &str,
) {
    let service = make_service(
        MockSubpagePolicyRepository::new(),
        MockEntityCatalogRepository::new(),
        MockVoteLedgerRepository::new(),
    );

    let error = service.tally(url).await.expect_err("url rejected");
    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(error.message(), "Domain not supported.");
    assert_eq!(details_code(&error), Some(code));
}

#[tokio::test]
async fn tally_maps_policy_connection_failure_to_service_unavailable() {
    let mut policy = MockSubpagePolicyRepository::new();
    policy
        .expect_is_subpage_voting_allowed()
        .return_once(|_| Err(SubpagePolicyRepositoryError::connection("refused")));

    let service = make_service(
        policy,
        MockEntityCatalogRepository::new(),
        MockVoteLedgerRepository::new(),
    );
    let error = service
        .tally("https://example.com")
        .await
        .expect_err("storage down");
    assert_eq!(error.code(), ErrorCode::ServiceUnavailable);
}

#[tokio::test]
async fn tally_maps_catalog_query_failure_to_internal() {
    let mut catalog = MockEntityCatalogRepository::new();
    catalog
        .expect_get_or_create_entity()
        .return_once(|_, _, _| Err(EntityCatalogRepositoryError::query("syntax")));

    let service = make_service(policy(false), catalog, MockVoteLedgerRepository::new());
    let error = service
        .tally("https://example.com")
        .await
        .expect_err("query failed");
    assert_eq!(error.code(), ErrorCode::InternalError);
}

#[rstest]
#[case("up", VoteDirection::Up)]
#[case("down", VoteDirection::Down)]
#[tokio::test]
async fn cast_vote_records_direction_against_resolved_entity(
    #[case] raw: &str,
    #[case] direction: VoteDirection,
) {
    let mut catalog = MockEntityCatalogRepository::new();
    catalog
        .expect_get_or_create_entity()
        .times(1)
        .return_once(|_, _, _| Ok(entity(11, None, 0, 0)));
    let mut ledger = MockVoteLedgerRepository::new();
    ledger
        .expect_apply_vote()
        .with(
            eq(UserId::new(42).expect("valid user id")),
            eq(11_i64),
            eq(direction),
        )
        .times(1)
        .return_once(|_, _, _| {
            Ok(LedgerOutcome::Recorded(Tally {
                upvotes: 1,
                downvotes: 0,
            }))
        });

    let service = make_service(policy(false), catalog, ledger);
    let outcome = service
        .cast_vote(request(raw, "https://news.example/world"))
        .await
        .expect("vote recorded");

    assert_eq!(outcome.label(), "recorded");
    assert_eq!(
        outcome.snapshot(),
        &TallySnapshot::new(
            "news.example",
            Some("world".to_owned()),
            Tally {
                upvotes: 1,
                downvotes: 0
            }
        )
    );
}

#[tokio::test]
async fn cast_vote_reports_duplicate_with_unchanged_counters() {
    let mut catalog = MockEntityCatalogRepository::new();
    catalog
        .expect_get_or_create_entity()
        .return_once(|_, _, _| Ok(entity(11, None, 1, 0)));
    let mut ledger = MockVoteLedgerRepository::new();
    ledger.expect_apply_vote().return_once(|_, _, _| {
        Ok(LedgerOutcome::Duplicate(Tally {
            upvotes: 1,
            downvotes: 0,
        }))
    });

    let service = make_service(policy(false), catalog, ledger);
    let outcome = service
        .cast_vote(request("up", "https://news.example/world"))
        .await
        .expect("duplicate is not an error");

    assert!(outcome.is_duplicate());
    assert_eq!(outcome.snapshot().upvotes, 1);
}

#[rstest]
#[case("sideways")]
#[case("UP")]
#[case("")]
#[tokio::test]
async fn cast_vote_rejects_invalid_direction_before_resolution(#[case] direction: &str) {
    let service = make_service(
        MockSubpagePolicyRepository::new(),
        MockEntityCatalogRepository::new(),
        MockVoteLedgerRepository::new(),
    );

    let error = service
        .cast_vote(request(direction, "ftp://example.com"))
        .await
        .expect_err("direction rejected");
    assert_eq!(error.code(), ErrorCode::NotFound);
    assert_eq!(details_code(&error), Some("invalid_direction"));
}

#[tokio::test]
async fn cast_vote_rejects_unsupported_scheme() {
    let service = make_service(
        MockSubpagePolicyRepository::new(),
        MockEntityCatalogRepository::new(),
        MockVoteLedgerRepository::new(),
    );

    let error = service
        .cast_vote(request("up", "http://example.com"))
        .await
        .expect_err("scheme rejected");
    assert_eq!(error.message(), "Domain not supported.");
    assert_eq!(details_code(&error), Some("unsupported_scheme"));
}

#[rstest]
#[case(VoteLedgerRepositoryError::connection("down"), ErrorCode::ServiceUnavailable)]
#[case(VoteLedgerRepositoryError::query("boom"), ErrorCode::InternalError)]
#[case(VoteLedgerRepositoryError::entity_missing(11_i64), ErrorCode::InternalError)]
#[case(VoteLedgerRepositoryError::voting_closed(11_i64), ErrorCode::Forbidden)]
#[tokio::test]
async fn cast_vote_maps_ledger_errors(
    #[case] ledger_error: VoteLedgerRepositoryError,
    #[case] expected: ErrorCode,
) {
    let mut catalog = MockEntityCatalogRepository::new();
    catalog
        .expect_get_or_create_entity()
        .return_once(|_, _, _| Ok(entity(11, None, 0, 0)));
    let mut ledger = MockVoteLedgerRepository::new();
    ledger
        .expect_apply_vote()
        .return_once(move |_, _, _| Err(ledger_error));

    let service = make_service(policy(false), catalog, ledger);
    let error = service
        .cast_vote(request("down", "https://example.com"))
        .await
        .expect_err("ledger failed");
    assert_eq!(error.code(), expected);
}

#[tokio::test]
async fn fixture_policy_composes_with_mocks() {
    let mut catalog = MockEntityCatalogRepository::new();
    catalog
        .expect_get_or_create_entity()
        .withf(|_, path, allowed| path.is_none() && !*allowed)
        .return_once(|_, _, _| Ok(entity(1, None, 0, 0)));
    let service = VoteService::new(
        Arc::new(FixtureSubpagePolicyRepository),
        Arc::new(catalog),
        Arc::new(MockVoteLedgerRepository::new()),
    );

    let snapshot = service
        .tally("https://example.com/")
        .await
        .expect("tally succeeds");
    assert_eq!(snapshot, TallySnapshot::empty("example.com", None));
}
