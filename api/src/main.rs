//! Threadline API Server
//!
//! Data layer of a community forum: communities and their members, pages,
//! rules and flairs, posts with threaded comments, moderation reports and
//! user profiles. Uses hexagonal (ports & adapters) architecture for clean
//! separation of concerns.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Json, Router,
};
use sea_orm::{Database, DatabaseConnection};
use serde::Serialize;
use tower_governor::governor::GovernorConfigBuilder;
use tower_governor::key_extractor::PeerIpKeyExtractor;
use tower_governor::GovernorLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod adapters;
mod app;
mod auth;
mod config;
mod domain;
mod entity;
mod error;
mod handlers;

#[cfg(test)]
mod test_utils;


use adapters::{
    PostgresCommentRepository, PostgresCommunityContentRepository, PostgresCommunityRepository,
    PostgresPostRepository, PostgresProfileRepository, PostgresReportRepository,
};
use app::{
    CommentService, CommunityContentService, CommunityService, PostService, ProfileService,
    ReportService,
};
use config::Config;
use domain::entities::{PostId, UserId};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub community_service: Arc<CommunityService<PostgresCommunityRepository>>,
    pub content_service: Arc<CommunityContentService<PostgresCommunityContentRepository>>,
    pub post_service: Arc<
        PostService<
            PostgresPostRepository,
            PostgresCommunityRepository,
            PostgresCommunityContentRepository,
        >,
    >,
    pub comment_service: Arc<
        CommentService<
            PostgresCommentRepository,
            PostgresPostRepository,
            PostgresCommunityRepository,
        >,
    >,
    pub post_report_service: Arc<ReportService<PostId, PostgresReportRepository>>,
    pub user_report_service: Arc<ReportService<UserId, PostgresReportRepository>>,
    pub profile_service: Arc<ProfileService<PostgresProfileRepository>>,
    pub config: Config,
}

impl AppState {
    /// Wire repositories and services over one database connection
    pub fn new(db: DatabaseConnection, config: Config) -> Self {
        let community_repo = Arc::new(PostgresCommunityRepository::new(db.clone()));
        let content_repo = Arc::new(PostgresCommunityContentRepository::new(db.clone()));
        let post_repo = Arc::new(PostgresPostRepository::new(db.clone()));
        let comment_repo = Arc::new(PostgresCommentRepository::new(db.clone()));
        let report_repo = Arc::new(PostgresReportRepository::new(db.clone()));
        let profile_repo = Arc::new(PostgresProfileRepository::new(db));

        Self {
            community_service: Arc::new(CommunityService::new(community_repo.clone())),
            content_service: Arc::new(CommunityContentService::new(content_repo.clone())),
            post_service: Arc::new(PostService::new(
                post_repo.clone(),
                community_repo.clone(),
                content_repo,
                config.archive_after_days,
            )),
            comment_service: Arc::new(CommentService::new(
                comment_repo,
                post_repo,
                community_repo,
            )),
            post_report_service: Arc::new(ReportService::new(report_repo.clone())),
            user_report_service: Arc::new(ReportService::new(report_repo)),
            profile_service: Arc::new(ProfileService::new(profile_repo)),
            config,
        }
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Routes under `/admin`, all behind the admin key
fn admin_routes(state: AppState) -> Router<AppState> {
    Router::new()
        // Membership
        .route(
            "/communities/:id/members",
            get(handlers::get_roster).post(handlers::add_member),
        )
        .route(
            "/communities/:id/members/:user_id",
            patch(handlers::update_member).delete(handlers::remove_member),
        )
        .route("/communities/:id/join", post(handlers::join_community))
        .route(
            "/communities/:id/invites",
            get(handlers::list_invites).post(handlers::create_invite),
        )
        .route("/invites/:id/accept", post(handlers::accept_invite))
        .route("/invites/:id", delete(handlers::decline_invite))
        .route("/communities/:id/requests", get(handlers::list_requests))
        .route("/requests/:id/approve", post(handlers::approve_request))
        .route("/requests/:id", delete(handlers::reject_request))
        // Pages, rules and flairs
        .route(
            "/communities/:id/pages",
            get(handlers::list_pages).post(handlers::create_page),
        )
        .route(
            "/pages/:id",
            patch(handlers::update_page).delete(handlers::delete_page),
        )
        .route(
            "/communities/:id/rules",
            get(handlers::list_rules).post(handlers::create_rule),
        )
        .route(
            "/rules/:id",
            patch(handlers::update_rule).delete(handlers::delete_rule),
        )
        .route(
            "/communities/:id/flairs",
            get(handlers::list_flairs).post(handlers::create_flair),
        )
        .route(
            "/flairs/:id",
            patch(handlers::update_flair).delete(handlers::delete_flair),
        )
        // Posts
        .route(
            "/communities/:id/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        .route(
            "/communities/:id/archive",
            post(handlers::archive_stale_posts),
        )
        .route(
            "/posts/:id",
            get(handlers::get_post)
                .patch(handlers::update_post)
                .delete(handlers::delete_post),
        )
        .route("/posts/:id/status", put(handlers::set_post_status))
        .route("/posts/:id/flair", put(handlers::set_post_flair))
        .route(
            "/posts/:id/relations/:relation/:user_id",
            put(handlers::relate_post).delete(handlers::unrelate_post),
        )
        // Comments
        .route(
            "/posts/:id/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .route("/posts/:id/thread", get(handlers::get_thread))
        .route(
            "/comments/:id",
            get(handlers::get_comment)
                .patch(handlers::update_comment)
                .delete(handlers::delete_comment),
        )
        .route("/comments/:id/raw", get(handlers::get_comment_raw))
        .route("/comments/:id/removed", put(handlers::set_comment_removed))
        .route("/comments/:id/nesting", put(handlers::set_comment_nesting))
        .route(
            "/comments/:id/relations/:relation/:user_id",
            put(handlers::relate_comment).delete(handlers::unrelate_comment),
        )
        // Reports
        .route(
            "/reports/posts",
            get(handlers::list_post_reports).post(handlers::create_post_report),
        )
        .route("/reports/posts/:id", get(handlers::get_post_report))
        .route(
            "/reports/posts/:id/status",
            put(handlers::set_post_report_status),
        )
        .route(
            "/reports/users",
            get(handlers::list_user_reports).post(handlers::create_user_report),
        )
        .route("/reports/users/:id", get(handlers::get_user_report))
        .route(
            "/reports/users/:id/status",
            put(handlers::set_user_report_status),
        )
        // Profiles
        .route(
            "/profiles/:user_id",
            get(handlers::get_profile).patch(handlers::update_profile),
        )
        .route(
            "/profiles/:user_id/followers/:follower_id",
            put(handlers::follow_profile).delete(handlers::unfollow_profile),
        )
        .route(
            "/profiles/:user_id/communities/:list/:name",
            put(handlers::add_profile_community).delete(handlers::remove_profile_community),
        )
        .route(
            "/profiles/:user_id/deletion",
            put(handlers::set_profile_deletion),
        )
        .route(
            "/profiles/:user_id/ban",
            put(handlers::ban_profile).delete(handlers::lift_profile_ban),
        )
        .layer(middleware::from_fn_with_state(
            state,
            auth::admin_auth_middleware,
        ))
}

/// Build the full router
pub fn router(state: AppState) -> anyhow::Result<Router> {
    // Community writes: 2 req/sec sustained, burst of 5, keyed on the peer IP
    let governor_config = Arc::new(
        GovernorConfigBuilder::default()
            .key_extractor(PeerIpKeyExtractor)
            .per_second(2)
            .burst_size(5)
            .finish()
            .context("Failed to build governor config")?,
    );

    let rate_limited_routes = Router::new()
        .route("/communities", post(handlers::create_community))
        .route(
            "/communities/:id",
            patch(handlers::update_community)
                .delete(handlers::delete_community),
        )
        .layer(GovernorLayer {
            config: governor_config,
        });

    let app = Router::new()
        // Health check (no auth)
        .route("/health", get(health))
        // Public reads
        .route("/communities", get(handlers::list_communities))
        .route("/communities/:id", get(handlers::get_community))
        .merge(rate_limited_routes)
        .nest("/admin", admin_routes(state.clone()))
        // Middleware
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
        .with_state(state);

    Ok(app)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,threadline_api=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Threadline API...");

    // Load configuration
    let config = Config::from_env()?;
    if !config.admin_enabled() {
        tracing::warn!("ADMIN_API_KEY not set, admin routes will reject every request");
    }

    // Connect to PostgreSQL
    tracing::info!("Connecting to database...");
    let db = Database::connect(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connected");

    let port = config.port;
    let app = router(AppState::new(db, config))?;

    // Start server
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .context("Failed to bind listener")?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    .context("Server error")?;

    Ok(())
}
