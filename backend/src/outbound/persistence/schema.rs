//! Diesel table definitions for the vote ledger schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registrable domains seen by the service.
    domains (id) {
        id -> Int8,
        /// Lower-cased registrable domain; unique.
        name -> Text,
    }
}

diesel::table! {
    /// Countable units: one row per domain, plus one per first-level path for
    /// domains with subpage voting enabled.
    ///
    /// `(domain_id, path)` is unique with `NULL` paths treated as equal
    /// (enforced by two partial unique indexes).
    votable_domains (entity_id) {
        entity_id -> Int8,
        domain_id -> Int8,
        path -> Nullable<Text>,
        upvotes -> Int8,
        downvotes -> Int8,
        voting_allowed -> Bool,
        allow_subpage_voting -> Bool,
    }
}

diesel::table! {
    /// One row per `(user_id, entity_id)`; `vote_value` is `true` for up.
    user_votes (user_id, entity_id) {
        user_id -> Int8,
        entity_id -> Int8,
        vote_value -> Bool,
    }
}

diesel::joinable!(votable_domains -> domains (domain_id));
diesel::joinable!(user_votes -> votable_domains (entity_id));

diesel::allow_tables_to_appear_in_same_query!(domains, votable_domains, user_votes);
