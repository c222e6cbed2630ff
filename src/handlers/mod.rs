// HTTP request handlers for the login backend
pub mod auth;

// Re-export the main handler functions
pub use auth::{auth_status, auth_test, demo_login, health, logout, me, oauth_login};

use actix_web::web;

/// Wire the HTTP surface. `/auth/demo` registers before `/auth/{provider}`
/// so the fixed route wins.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/auth/demo", web::post().to(demo_login))
        .route("/auth/status", web::get().to(auth_status))
        .route("/auth/test", web::get().to(auth_test))
        .route("/auth/logout", web::post().to(logout))
        .route("/auth/me", web::get().to(me))
        .route("/auth/{provider}", web::post().to(oauth_login))
        .route("/health", web::get().to(health));
}
