use std::sync::Arc;
use std::time::Duration;

use auth::Authenticator;
use axum::body::Body;
use axum::http::Request;
use axum::http::Response;
use axum::middleware;
use axum::routing::delete;
use axum::routing::get;
use axum::routing::patch;
use axum::routing::post;
use axum::routing::put;
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::Span;

use super::handlers::chirps;
use super::handlers::create_user::create_user;
use super::handlers::delete_user::delete_user;
use super::handlers::follows;
use super::handlers::friends;
use super::handlers::get_user::get_user;
use super::handlers::health::health;
use super::handlers::login::login;
use super::handlers::polka_webhook::polka_webhook;
use super::handlers::tokens;
use super::handlers::update_user::update_user;
use super::middleware::authenticate as auth_middleware;
use crate::config::Config;
use crate::domain::chirp::ports::ChirpRepository;
use crate::domain::chirp::ports::ChirpServicePort;
use crate::domain::chirp::service::ChirpService;
use crate::domain::relationship::ports::FollowRepository;
use crate::domain::relationship::ports::FriendshipRepository;
use crate::domain::relationship::ports::RelationshipServicePort;
use crate::domain::relationship::service::RelationshipService;
use crate::domain::session::ports::RefreshTokenRepository;
use crate::domain::session::ports::SessionServicePort;
use crate::domain::session::service::SessionService;
use crate::domain::user::ports::UserRepository;
use crate::domain::user::ports::UserServicePort;
use crate::domain::user::service::UserService;

/// Storage adapters backing the services, one per table.
///
/// The in-memory backend passes the same store for every field.
pub struct Repositories<UR, RR, CR, FR, SR> {
    pub users: Arc<UR>,
    pub refresh_tokens: Arc<RR>,
    pub chirps: Arc<CR>,
    pub follows: Arc<FR>,
    pub friendships: Arc<SR>,
}

#[derive(Clone)]
pub struct AppState {
    pub user_service: Arc<dyn UserServicePort>,
    pub session_service: Arc<dyn SessionServicePort>,
    pub chirp_service: Arc<dyn ChirpServicePort>,
    pub relationship_service: Arc<dyn RelationshipServicePort>,
    pub authenticator: Arc<Authenticator>,
    pub membership_api_key: Arc<str>,
}

impl AppState {
    /// Wire every service over the given repositories.
    pub fn new<UR, RR, CR, FR, SR>(
        repositories: Repositories<UR, RR, CR, FR, SR>,
        config: &Config,
    ) -> Self
    where
        UR: UserRepository,
        RR: RefreshTokenRepository,
        CR: ChirpRepository,
        FR: FollowRepository,
        SR: FriendshipRepository,
    {
        let authenticator = Arc::new(config.authenticator());

        let user_service = UserService::new(
            Arc::clone(&repositories.users),
            Arc::clone(&authenticator),
        );
        let session_service = SessionService::new(
            Arc::clone(&repositories.users),
            repositories.refresh_tokens,
            Arc::clone(&authenticator),
            config.session_policy(),
        );
        let chirp_service = ChirpService::new(
            Arc::clone(&repositories.chirps),
            Arc::clone(&repositories.users),
        );
        let relationship_service = RelationshipService::new(
            repositories.follows,
            repositories.friendships,
            repositories.chirps,
            repositories.users,
        );

        Self {
            user_service: Arc::new(user_service),
            session_service: Arc::new(session_service),
            chirp_service: Arc::new(chirp_service),
            relationship_service: Arc::new(relationship_service),
            authenticator,
            membership_api_key: Arc::from(config.membership.api_key.as_str()),
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let public_routes = Router::new()
        .route("/api/healthz", get(health))
        .route("/api/users", post(create_user))
        .route("/api/users/:user_id", get(get_user))
        .route("/api/users/:user_id/chirps", get(chirps::list_user_chirps))
        .route("/api/login", post(login))
        // Refresh tokens are checked by the session service, not the access token gate.
        .route("/api/refresh", post(tokens::refresh))
        .route("/api/revoke", post(tokens::revoke))
        .route("/api/chirps", get(chirps::list_chirps))
        .route("/api/chirps/:chirp_id", get(chirps::get_chirp))
        .route("/api/polka/webhooks", post(polka_webhook));

    let protected_routes = Router::new()
        .route("/api/users", put(update_user))
        .route("/api/users/:user_id", delete(delete_user))
        .route("/api/chirps", post(chirps::create_chirp))
        .route("/api/chirps/:chirp_id", patch(chirps::update_chirp))
        .route("/api/chirps/:chirp_id", delete(chirps::delete_chirp))
        .route("/api/me/chirps", get(chirps::list_my_chirps))
        .route("/api/follows", post(follows::follow))
        .route("/api/follows/:user_id", delete(follows::unfollow))
        .route("/api/followers", get(follows::followers))
        .route("/api/following", get(follows::following))
        .route("/api/feed", get(follows::feed))
        .route("/api/friends", get(friends::list_friends))
        .route("/api/friends/request", post(friends::send_request))
        .route("/api/friends/requests", get(friends::list_received_requests))
        .route("/api/friends/sent", get(friends::list_sent_requests))
        .route("/api/friends/:user_id", delete(friends::remove_friend))
        .route("/api/friends/:user_id/accept", post(friends::accept_request))
        .route("/api/friends/:user_id/reject", post(friends::reject_request))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    // Headers are left out of the span: they carry credentials.
    let trace_layer = TraceLayer::new_for_http()
        .make_span_with(|request: &Request<Body>| {
            tracing::info_span!(
                "http_request",
                method = %request.method(),
                uri = %request.uri(),
                version = ?request.version(),
            )
        })
        .on_request(|request: &Request<Body>, _span: &Span| {
            tracing::info!(
                method = %request.method(),
                uri = %request.uri(),
                "Request started"
            );
        })
        .on_response(
            |response: &Response<Body>, latency: Duration, _span: &Span| {
                tracing::info!(
                    status = response.status().as_u16(),
                    latency_ms = latency.as_millis(),
                    "Request completed"
                );
            },
        );

    Router::new()
        .merge(public_routes)
        .merge(protected_routes)
        .layer(trace_layer)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
