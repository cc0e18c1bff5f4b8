//! Server construction and middleware wiring.

mod config;

pub use config::ServerConfig;

use std::sync::Arc;

use actix_session::{
    SessionMiddleware,
    config::{CookieContentSecurity, PersistentSession},
    storage::CookieSessionStore,
};
use actix_web::cookie::{Key, SameSite};
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
use tracing::info;

use factcheck::Trace;
#[cfg(debug_assertions)]
use factcheck::doc::ApiDoc;
use factcheck::domain::VoteService;
use factcheck::domain::ports::{FixtureTallyQuery, FixtureVoteCommand};
use factcheck::inbound::http::health::{HealthState, live, ready};
use factcheck::inbound::http::state::HttpState;
use factcheck::inbound::http::votes::{get_votes, vote};
use factcheck::outbound::persistence::{
    DieselEntityCatalogRepository, DieselSubpagePolicyRepository, DieselVoteLedgerRepository,
};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

/// Wire the vote ports: Diesel-backed when a pool is configured, fixtures
/// otherwise.
fn build_http_state(config: &ServerConfig) -> HttpState {
    let state = match &config.db_pool {
        Some(pool) => {
            let service = Arc::new(VoteService::new(
                Arc::new(DieselSubpagePolicyRepository::new(pool.clone())),
                Arc::new(DieselEntityCatalogRepository::new(pool.clone())),
                Arc::new(DieselVoteLedgerRepository::new(pool.clone())),
            ));
            HttpState::new(service.clone(), service)
        }
        None => {
            info!("no database pool configured; serving fixture tallies");
            HttpState::new(Arc::new(FixtureTallyQuery), Arc::new(FixtureVoteCommand))
        }
    };
    state.with_login_url(config.login_url.clone())
}

#[derive(Clone)]
struct AppDependencies {
    health_state: web::Data<HealthState>,
    http_state: web::Data<HttpState>,
    key: Key,
    cookie_secure: bool,
    same_site: SameSite,
}

fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        key,
        cookie_secure,
        same_site,
    } = deps;

    let session = SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .cookie_same_site(same_site)
        .session_lifecycle(
            PersistentSession::default().session_ttl(actix_web::cookie::time::Duration::hours(2)),
        )
        .build();

    let votes = web::scope("")
        .wrap(session)
        .service(get_votes)
        .service(vote);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .wrap(Trace)
        .service(ready)
        .service(live);

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app.service(votes)
}

/// Construct the Actix server and mark it ready once bound.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = web::Data::new(build_http_state(&config));
    let ServerConfig {
        key,
        cookie_secure,
        same_site,
        bind_addr,
        login_url: _,
        db_pool: _,
    } = config;

    let server = HttpServer::new(move || {
        build_app(AppDependencies {
            health_state: server_health_state.clone(),
            http_state: http_state.clone(),
            key: key.clone(),
            cookie_secure,
            same_site,
        })
    })
    .bind(bind_addr)?
    .run();

    health_state.mark_ready();
    info!(%bind_addr, "vote API listening");
    Ok(server)
}
