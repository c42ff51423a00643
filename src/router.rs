use axum::{
    Router,
    routing::{delete, get, post, put},
};

use crate::api::ListingsClient;
use crate::auth::TokenIssuer;
use crate::config::Config;
use crate::db::{BoardStore, SqlitePool, UserStore, VolunteerStore};
use crate::handlers;
use crate::middleware::log::log_failures;

/// Everything a request handler needs, constructed once at startup and
/// cloned per request. The pool is the only shared mutable resource; the
/// stores borrow from it per operation.
#[derive(Clone)]
pub struct SproutState {
    pub users: UserStore,
    pub board: BoardStore,
    pub volunteers: VolunteerStore,
    pub sessions: TokenIssuer,
    pub listings: ListingsClient,
}

impl SproutState {
    pub fn new(cfg: &Config, pool: SqlitePool) -> Self {
        Self {
            users: UserStore::new(pool.clone()),
            board: BoardStore::new(pool.clone()),
            volunteers: VolunteerStore::new(pool),
            sessions: TokenIssuer::new(&cfg.jwt_secret, cfg.token_ttl_secs),
            listings: ListingsClient::new(
                reqwest::Client::new(),
                cfg.volunteer_api_base.clone(),
                &cfg.volunteer_api_key,
            ),
        }
    }
}

pub fn sprout_router(state: SproutState) -> Router {
    Router::new()
        .route("/", get(handlers::home))
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/user/profile", get(handlers::user::profile))
        .route("/user/password", put(handlers::user::change_password))
        .route("/user/delete", delete(handlers::user::delete_account))
        .route(
            "/posts",
            get(handlers::board::list_posts).post(handlers::board::create_post),
        )
        .route(
            "/posts/{id}",
            get(handlers::board::get_post)
                .put(handlers::board::update_post)
                .delete(handlers::board::delete_post),
        )
        .route("/posts/{id}/comment", post(handlers::board::create_comment))
        .route(
            "/posts/{id}/comment/{cid}",
            put(handlers::board::update_comment).delete(handlers::board::delete_comment),
        )
        .route("/volunteer/{program_id}", get(handlers::volunteer::fetch_program))
        .layer(axum::middleware::from_fn(log_failures))
        .with_state(state)
}
