//! Ledger invariants exercised through the service over the in-memory store.

use factcheck::domain::ports::{CastVoteRequest, TallyQuery, VoteCommand};
use factcheck::domain::{UserId, VoteOutcome};
use factcheck::test_support::InMemoryVoteStore;
use futures::future::join_all;
use rstest::rstest;

fn request(user: i64, url: &str, direction: &str) -> CastVoteRequest {
    CastVoteRequest {
        user_id: UserId::new(user).expect("valid user id"),
        url: url.to_owned(),
        direction: direction.to_owned(),
    }
}

#[rstest]
#[case(1)]
#[case(25)]
#[tokio::test]
async fn concurrent_distinct_voters_are_all_counted(#[case] voters: i64) {
    let store = InMemoryVoteStore::new();
    let service = store.service();
    let url = "https://news.example/world";

    let outcomes = join_all(
        (1..=voters).map(|user| service.cast_vote(request(user, url, "up"))),
    )
    .await;

    assert!(outcomes.iter().all(|outcome| matches!(outcome, Ok(VoteOutcome::Recorded(_)))));
    let tally = service.tally(url).await.expect("tally");
    assert_eq!(tally.upvotes, u64::try_from(voters).expect("positive"));
    assert_eq!(store.votes().len(), usize::try_from(voters).expect("positive"));
}

#[tokio::test]
async fn repeated_votes_by_one_user_count_once() {
    let store = InMemoryVoteStore::new();
    let service = store.service();
    let url = "https://news.example/";

    let outcomes = join_all((0..10).map(|i| {
        let direction = if i % 2 == 0 { "up" } else { "down" };
        service.cast_vote(request(7, url, direction))
    }))
    .await;

    let recorded = outcomes
        .iter()
        .filter(|outcome| matches!(outcome, Ok(VoteOutcome::Recorded(_))))
        .count();
    assert_eq!(recorded, 1);
    let tally = service.tally(url).await.expect("tally");
    assert_eq!(tally.upvotes + tally.downvotes, 1);
}

#[tokio::test]
async fn counters_match_recorded_votes() {
    let store = InMemoryVoteStore::new();
    let service = store.service();
    let url = "https://mixed.example/";

    for (user, direction) in [(1, "up"), (2, "down"), (3, "up"), (1, "down"), (4, "down")] {
        service
            .cast_vote(request(user, url, direction))
            .await
            .expect("vote accepted");
    }

    let votes = store.votes();
    let ups = votes.iter().filter(|vote| vote.vote_value).count();
    let downs = votes.len() - ups;
    let tally = service.tally(url).await.expect("tally");
    assert_eq!((tally.upvotes, tally.downvotes), (2, 2));
    assert_eq!((ups, downs), (2, 2));
}

#[tokio::test]
async fn tally_lazily_creates_one_entity_per_domain() {
    let store = InMemoryVoteStore::new();
    let service = store.service();

    for url in [
        "https://a.example/x",
        "https://www.a.example/y",
        "https://b.example",
        "https://A.EXAMPLE/",
    ] {
        service.tally(url).await.expect("tally");
    }

    assert_eq!(store.entities().len(), 2);
    assert!(store.votes().is_empty());
}
