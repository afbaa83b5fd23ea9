//! HTTP handlers and route configuration.

mod auth;
mod comments;
mod health;
mod posts;

use actix_web::{HttpResponse, http::header, web};

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .route("/health", web::get().to(health::health_check))
            // Auth routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login))
                    .route("/me", web::get().to(auth::me)),
            )
            // Posts
            .route("/posts", web::get().to(posts::list_posts))
            .route("/posts", web::post().to(posts::create_post))
            .route("/drafts", web::get().to(posts::list_drafts))
            .route("/posts/{id}", web::get().to(posts::post_detail))
            .route("/posts/{id}", web::put().to(posts::update_post))
            .route("/posts/{id}", web::delete().to(posts::delete_post))
            .route("/posts/{id}/publish", web::post().to(posts::publish_post))
            // Comments
            .route("/posts/{id}/comments", web::get().to(comments::comment_form))
            .route("/posts/{id}/comments", web::post().to(comments::add_comment))
            .route(
                "/comments/{id}/approve",
                web::post().to(comments::approve_comment),
            )
            .route(
                "/comments/{id}/remove",
                web::post().to(comments::remove_comment),
            ),
    );
}

/// Redirect-after-action response: `303 See Other` at the given location.
pub(crate) fn see_other(location: String) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Location of a post's detail view, the target of most redirects.
pub(crate) fn post_detail_path(id: uuid::Uuid) -> String {
    format!("/api/posts/{id}")
}
