use crate::{
    api::{admin, dashboard, leave_request},
    auth::{handlers, middleware::auth_middleware},
    config::Config,
};
use actix_governor::{
    Governor, GovernorConfigBuilder, PeerIpKeyExtractor, governor::middleware::NoOpMiddleware,
};
use actix_web::{middleware::from_fn, web};
use anyhow::{Context, Result};
use std::sync::Arc;

type Limiter = Arc<Governor<PeerIpKeyExtractor, NoOpMiddleware>>;

/// Per-IP limiters, built once so every worker shares the same buckets.
#[derive(Clone)]
pub struct RateLimiters {
    login: Limiter,
    protected: Limiter,
}

impl RateLimiters {
    pub fn from_config(config: &Config) -> Result<Self> {
        // Helper to build per-route limiter
        fn build_limiter(requests_per_min: u32) -> Result<Limiter> {
            let per_ms = 60_000 / u64::from(requests_per_min.max(1));
            let cfg = GovernorConfigBuilder::default()
                .milliseconds_per_request(per_ms.max(1))
                .burst_size(requests_per_min.max(1))
                .key_extractor(PeerIpKeyExtractor)
                .finish()
                .context("invalid rate limiter settings")?;
            Ok(Arc::new(Governor::new(&cfg)))
        }

        Ok(Self {
            login: build_limiter(config.rate_login_per_min)?,
            protected: build_limiter(config.rate_protected_per_min)?,
        })
    }
}

pub fn configure(cfg: &mut web::ServiceConfig, config: &Config, limiters: &RateLimiters) {
    // Public routes
    cfg.service(web::resource("/").route(web::get().to(handlers::home)))
        .service(
            web::resource("/login")
                .route(web::get().to(handlers::login_page))
                .route(
                    web::post()
                        .to(handlers::login)
                        .wrap(limiters.login.clone()),
                ),
        );

    if config.allow_initialize_db {
        tracing::warn!("/initialize_db is enabled; anyone can wipe the database");
        cfg.service(web::resource("/initialize_db").route(web::get().to(admin::initialize_db)));
    }

    // Protected routes: session gate inside, rate limiting outside
    cfg.service(
        web::resource("/logout")
            .wrap(from_fn(auth_middleware))
            .wrap(limiters.protected.clone())
            .route(web::get().to(handlers::logout)),
    )
    .service(
        web::resource("/employee_dashboard")
            .wrap(from_fn(auth_middleware))
            .wrap(limiters.protected.clone())
            .route(web::get().to(dashboard::employee_dashboard)),
    )
    .service(
        web::resource("/apply_leave")
            .wrap(from_fn(auth_middleware))
            .wrap(limiters.protected.clone())
            .route(web::get().to(leave_request::apply_leave_form))
            .route(web::post().to(leave_request::apply_leave)),
    )
    .service(
        web::resource("/my_requests")
            .wrap(from_fn(auth_middleware))
            .wrap(limiters.protected.clone())
            .route(web::get().to(leave_request::my_requests)),
    )
    .service(
        web::resource("/manager_dashboard")
            .wrap(from_fn(auth_middleware))
            .wrap(limiters.protected.clone())
            .route(web::get().to(dashboard::manager_dashboard)),
    )
    // /approve/{request_id}
    .service(
        web::resource("/approve/{request_id}")
            .wrap(from_fn(auth_middleware))
            .wrap(limiters.protected.clone())
            .route(web::get().to(leave_request::approve_leave)),
    )
    // /reject/{request_id}
    .service(
        web::resource("/reject/{request_id}")
            .wrap(from_fn(auth_middleware))
            .wrap(limiters.protected.clone())
            .route(web::get().to(leave_request::reject_leave)),
    )
    .service(
        web::resource("/admin_dashboard")
            .wrap(from_fn(auth_middleware))
            .wrap(limiters.protected.clone())
            .route(web::get().to(dashboard::admin_dashboard)),
    );
}

// LOGIN
//  └─ session cookie (signed JWT, jti stored in `sessions`)

// PROTECTED REQUEST
//  └─ auth_middleware: cookie → jti active? → employee loaded → AuthUser
//       └─ handler: AuthUser::authorize(Action) → 403 or proceed

// LOGOUT
//  └─ sessions.revoked = 1, cookie removed
