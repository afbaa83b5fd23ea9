//! Comment handlers: the public submission form and the moderation actions.
//!
//! Submission is open to anyone; approve and remove require a login. All
//! successful actions redirect to the parent post's detail view.

use actix_web::{HttpResponse, web};
use uuid::Uuid;

use inkwell_core::domain::Comment;
use inkwell_core::ports::{BaseRepository, CommentRepository};
use inkwell_shared::dto::{CommentForm, CommentFormView};
use inkwell_shared::validate::validate_comment_input;

use super::{post_detail_path, see_other};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

async fn require_post(state: &AppState, id: Uuid) -> AppResult<()> {
    state
        .posts
        .find_by_id(id)
        .await?
        .map(|_| ())
        .ok_or_else(|| AppError::NotFound(format!("Post with id {} not found", id)))
}

fn comment_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Comment with id {} not found", id))
}

/// GET /api/posts/{id}/comments - a blank submission form for the post.
pub async fn comment_form(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    require_post(&state, post_id).await?;

    Ok(HttpResponse::Ok().json(CommentFormView::blank(post_id)))
}

/// POST /api/posts/{id}/comments - submit a comment.
///
/// Valid input creates an unapproved comment and redirects to the post's
/// detail view; invalid input re-renders the form with the submitted values
/// and the field errors.
pub async fn add_comment(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
    body: web::Json<CommentForm>,
) -> AppResult<HttpResponse> {
    let post_id = path.into_inner();
    require_post(&state, post_id).await?;

    let form = body.into_inner();
    match validate_comment_input(&form) {
        Ok(valid) => {
            let comment = Comment::new(post_id, valid.author, valid.content);
            state.comments.save(comment).await?;

            tracing::info!(%post_id, "Comment submitted");
            Ok(see_other(post_detail_path(post_id)))
        }
        Err(errors) => Ok(HttpResponse::UnprocessableEntity().json(CommentFormView {
            post_id,
            values: form,
            errors,
        })),
    }
}

/// POST /api/comments/{id}/approve - mark the comment as fit for display and
/// redirect to the parent post.
pub async fn approve_comment(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let mut comment = state
        .comments
        .find_by_id(id)
        .await?
        .ok_or_else(|| comment_not_found(id))?;

    comment.approve();
    let saved = state.comments.save(comment).await?;

    tracing::info!(comment_id = %id, "Comment approved");
    Ok(see_other(post_detail_path(saved.post_id)))
}

/// POST /api/comments/{id}/remove - delete the comment and redirect to the
/// parent post.
pub async fn remove_comment(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let comment = state
        .comments
        .find_by_id(id)
        .await?
        .ok_or_else(|| comment_not_found(id))?;

    let post_id = comment.post_id;
    state.comments.delete(id).await?;

    tracing::info!(comment_id = %id, "Comment removed");
    Ok(see_other(post_detail_path(post_id)))
}
