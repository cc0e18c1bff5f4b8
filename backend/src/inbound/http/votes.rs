//! Vote tally HTTP handlers.
//!
//! ```text
//! GET /get-votes?url=https://news.example/world
//! GET /vote/up?url=https://news.example/world
//! ```
//!
//! Both respond with the positional array `[domain, path, upvotes, downvotes]`.

use actix_web::http::header;
use actix_web::{HttpResponse, get, web};
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;

use crate::domain::ports::CastVoteRequest;
use crate::domain::{Error, TallySnapshot};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, TallySnapshotSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

/// Response header tagging whether a vote was recorded or ignored.
pub const VOTE_OUTCOME_HEADER: &str = "Vote-Outcome";

/// Query string carrying the target URL.
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct UrlQuery {
    /// Absolute `https://` URL to look up.
    #[param(example = "https://news.example/world")]
    pub url: Option<String>,
}

impl UrlQuery {
    fn require_url(self) -> Result<String, Error> {
        self.url
            .filter(|url| !url.is_empty())
            .ok_or_else(|| Error::invalid_request("URL parameter is missing"))
    }
}

/// Current tally for a URL.
#[utoipa::path(
    get,
    path = "/get-votes",
    params(UrlQuery),
    responses(
        (status = 200, description = "Tally for the resolved entity", body = TallySnapshotSchema),
        (status = 400, description = "URL parameter is missing", body = ErrorSchema),
        (status = 404, description = "Domain not supported", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["votes"],
    security([]),
    operation_id = "getVotes"
)]
#[get("/get-votes")]
pub async fn get_votes(
    state: web::Data<HttpState>,
    query: web::Query<UrlQuery>,
) -> ApiResult<web::Json<TallySnapshot>> {
    let url = query.into_inner().require_url()?;
    let snapshot = state.tally.tally(&url).await?;
    Ok(web::Json(snapshot))
}

/// Cast an up or down vote on a URL.
///
/// Repeat votes by the same user are not errors: the unchanged tally is
/// returned with `Vote-Outcome: duplicate`.
#[utoipa::path(
    get,
    path = "/vote/{direction}",
    params(
        ("direction" = String, Path, description = "Either `up` or `down`"),
        UrlQuery
    ),
    responses(
        (
            status = 200,
            description = "Tally after the vote",
            headers(("Vote-Outcome" = String, description = "`recorded` or `duplicate`")),
            body = TallySnapshotSchema
        ),
        (status = 302, description = "Not signed in; redirect to login"),
        (status = 400, description = "URL parameter is missing", body = ErrorSchema),
        (status = 403, description = "Voting is closed", body = ErrorSchema),
        (status = 404, description = "Unknown direction or unsupported domain", body = ErrorSchema),
        (status = 503, description = "Storage unavailable", body = ErrorSchema)
    ),
    tags = ["votes"],
    operation_id = "castVote"
)]
#[get("/vote/{direction}")]
pub async fn vote(
    state: web::Data<HttpState>,
    session: SessionContext,
    direction: web::Path<String>,
    query: web::Query<UrlQuery>,
) -> ApiResult<HttpResponse> {
    let Some(user_id) = session.user_id() else {
        debug!("anonymous vote redirected to login");
        return Ok(HttpResponse::Found()
            .insert_header((header::LOCATION, state.login_url.as_str()))
            .finish());
    };

    let url = query.into_inner().require_url()?;
    let outcome = state
        .votes
        .cast_vote(CastVoteRequest {
            user_id,
            url,
            direction: direction.into_inner(),
        })
        .await?;

    Ok(HttpResponse::Ok()
        .insert_header((VOTE_OUTCOME_HEADER, outcome.label()))
        .json(outcome.snapshot()))
}
