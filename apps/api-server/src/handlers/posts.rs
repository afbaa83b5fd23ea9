//! Post handlers: public listing and detail, the draft list, create, update,
//! delete, and the publish action.
//!
//! Mutations follow the redirect-after-action contract: `303 See Other` to
//! the affected post's detail view, or to the listing after a delete.

use actix_web::{HttpResponse, web};
use chrono::Utc;
use uuid::Uuid;

use inkwell_core::domain::{Comment, Post};
use inkwell_core::ports::{BaseRepository, CommentRepository, PostRepository};
use inkwell_shared::dto::{CommentView, PostDetailView, PostForm, PostView};
use inkwell_shared::response::ApiResponse;
use inkwell_shared::validate::validate_post_input;

use super::{post_detail_path, see_other};
use crate::middleware::auth::Identity;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn post_view(post: Post) -> PostView {
    PostView {
        id: post.id,
        author_id: post.author_id,
        title: post.title,
        content: post.content,
        created_at: post.created_at,
        published_at: post.published_at,
    }
}

fn comment_view(comment: Comment) -> CommentView {
    CommentView {
        id: comment.id,
        post_id: comment.post_id,
        author: comment.author,
        content: comment.content,
        created_at: comment.created_at,
        approved: comment.approved,
    }
}

fn post_not_found(id: Uuid) -> AppError {
    AppError::NotFound(format!("Post with id {} not found", id))
}

/// GET /api/posts - published posts, newest publication first.
pub async fn list_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let posts = state.posts.list_published(Utc::now()).await?;
    let views: Vec<PostView> = posts.into_iter().map(post_view).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(views)))
}

/// GET /api/posts/{id} - a single post with its comment thread.
pub async fn post_detail(
    state: web::Data<AppState>,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| post_not_found(id))?;
    let comments = state.comments.find_by_post(id).await?;

    let view = PostDetailView {
        post: post_view(post),
        comments: comments.into_iter().map(comment_view).collect(),
    };

    Ok(HttpResponse::Ok().json(ApiResponse::ok(view)))
}

/// GET /api/drafts - unpublished posts, oldest creation first.
pub async fn list_drafts(
    state: web::Data<AppState>,
    _identity: Identity,
) -> AppResult<HttpResponse> {
    let drafts = state.posts.list_drafts().await?;
    let views: Vec<PostView> = drafts.into_iter().map(post_view).collect();

    Ok(HttpResponse::Ok().json(ApiResponse::ok(views)))
}

/// POST /api/posts - create a draft, redirect to its detail view.
pub async fn create_post(
    state: web::Data<AppState>,
    identity: Identity,
    body: web::Json<PostForm>,
) -> AppResult<HttpResponse> {
    let valid = validate_post_input(&body).map_err(AppError::Validation)?;

    let post = Post::new(identity.user_id, valid.title, valid.content);
    let saved = state.posts.save(post).await?;

    tracing::info!(post_id = %saved.id, "Post created");
    Ok(see_other(post_detail_path(saved.id)))
}

/// PUT /api/posts/{id} - update title and content, redirect to detail.
pub async fn update_post(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
    body: web::Json<PostForm>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let mut post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| post_not_found(id))?;

    let valid = validate_post_input(&body).map_err(AppError::Validation)?;
    post.title = valid.title;
    post.content = valid.content;

    let saved = state.posts.save(post).await?;
    Ok(see_other(post_detail_path(saved.id)))
}

/// DELETE /api/posts/{id} - delete the post and its comments, redirect to
/// the listing.
pub async fn delete_post(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| post_not_found(id))?;

    // The comment thread goes with the post.
    state.comments.delete_by_post(id).await?;
    state.posts.delete(id).await?;

    tracing::info!(post_id = %id, "Post deleted");
    Ok(see_other("/api/posts".to_string()))
}

/// POST /api/posts/{id}/publish - stamp the post with the current time and
/// redirect to its detail view.
pub async fn publish_post(
    state: web::Data<AppState>,
    _identity: Identity,
    path: web::Path<Uuid>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner();

    let mut post = state
        .posts
        .find_by_id(id)
        .await?
        .ok_or_else(|| post_not_found(id))?;

    post.publish();
    let saved = state.posts.save(post).await?;

    tracing::info!(post_id = %saved.id, "Post published");
    Ok(see_other(post_detail_path(saved.id)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{
        App,
        http::{StatusCode, header},
        test,
    };
    use chrono::TimeDelta;
    use inkwell_core::ports::TokenService;

    const LOGIN_PATH: &str = "/api/auth/login";

    fn bearer(state: &AppState) -> (header::HeaderName, String) {
        let token = state
            .tokens
            .generate_token(Uuid::new_v4(), "author@example.com")
            .unwrap();
        (header::AUTHORIZATION, format!("Bearer {token}"))
    }

    fn location(resp: &actix_web::dev::ServiceResponse) -> String {
        resp.headers()
            .get(header::LOCATION)
            .expect("redirect must carry a Location header")
            .to_str()
            .unwrap()
            .to_string()
    }

    macro_rules! test_app {
        ($state:expr) => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new($state.clone()))
                    .configure(crate::handlers::configure_routes),
            )
            .await
        };
    }

    fn published_post(offset_minutes: i64) -> Post {
        let mut post = Post::new(Uuid::new_v4(), "Title".into(), "Body".into());
        post.published_at = Some(Utc::now() + TimeDelta::minutes(offset_minutes));
        post
    }

    #[actix_web::test]
    async fn public_list_hides_drafts_and_future_posts_newest_first() {
        let state = AppState::in_memory(LOGIN_PATH);
        let older = published_post(-120);
        let newer = published_post(-10);
        state.posts.save(older.clone()).await.unwrap();
        state.posts.save(newer.clone()).await.unwrap();
        state.posts.save(published_post(60)).await.unwrap();
        state
            .posts
            .save(Post::new(Uuid::new_v4(), "Draft".into(), "Body".into()))
            .await
            .unwrap();

        let app = test_app!(state);
        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/posts").to_request())
            .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: ApiResponse<Vec<PostView>> = test::read_body_json(resp).await;
        let ids: Vec<Uuid> = body.data.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![newer.id, older.id]);
    }

    #[actix_web::test]
    async fn detail_of_missing_post_is_404() {
        let state = AppState::in_memory(LOGIN_PATH);
        let app = test_app!(state);

        let uri = format!("/api/posts/{}", Uuid::new_v4());
        let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn detail_includes_the_comment_thread() {
        let state = AppState::in_memory(LOGIN_PATH);
        let post = published_post(-5);
        state.posts.save(post.clone()).await.unwrap();
        state
            .comments
            .save(Comment::new(post.id, "ada".into(), "First!".into()))
            .await
            .unwrap();

        let app = test_app!(state);
        let uri = format!("/api/posts/{}", post.id);
        let resp = test::call_service(&app, test::TestRequest::get().uri(&uri).to_request()).await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: ApiResponse<PostDetailView> = test::read_body_json(resp).await;
        let detail = body.data.unwrap();
        assert_eq!(detail.post.id, post.id);
        assert_eq!(detail.comments.len(), 1);
        assert!(!detail.comments[0].approved);
    }

    #[actix_web::test]
    async fn create_redirects_to_the_new_post_detail() {
        let state = AppState::in_memory(LOGIN_PATH);
        let app = test_app!(state);

        let (name, value) = bearer(&state);
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/posts")
                .insert_header((name, value))
                .set_json(PostForm {
                    title: "Hello".into(),
                    content: "World".into(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        let location = location(&resp);
        let id: Uuid = location.rsplit('/').next().unwrap().parse().unwrap();
        assert_eq!(location, format!("/api/posts/{id}"));

        let saved = state.posts.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(saved.title, "Hello");
        assert!(saved.is_draft());
    }

    #[actix_web::test]
    async fn create_without_login_redirects_and_persists_nothing() {
        let state = AppState::in_memory(LOGIN_PATH);
        let app = test_app!(state);

        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/posts")
                .set_json(PostForm {
                    title: "Hello".into(),
                    content: "World".into(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), LOGIN_PATH);
        assert!(state.posts.list_drafts().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn create_with_blank_title_fails_validation() {
        let state = AppState::in_memory(LOGIN_PATH);
        let app = test_app!(state);

        let (name, value) = bearer(&state);
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri("/api/posts")
                .insert_header((name, value))
                .set_json(PostForm {
                    title: "   ".into(),
                    content: "World".into(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert!(state.posts.list_drafts().await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn update_changes_fields_and_redirects_to_detail() {
        let state = AppState::in_memory(LOGIN_PATH);
        let post = Post::new(Uuid::new_v4(), "Old title".into(), "Old body".into());
        state.posts.save(post.clone()).await.unwrap();

        let app = test_app!(state);
        let (name, value) = bearer(&state);
        let uri = format!("/api/posts/{}", post.id);
        let resp = test::call_service(
            &app,
            test::TestRequest::put()
                .uri(&uri)
                .insert_header((name, value))
                .set_json(PostForm {
                    title: "New title".into(),
                    content: "New body".into(),
                })
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), uri);

        let saved = state.posts.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(saved.title, "New title");
        assert_eq!(saved.content, "New body");
    }

    #[actix_web::test]
    async fn delete_removes_post_and_comment_thread() {
        let state = AppState::in_memory(LOGIN_PATH);
        let post = published_post(-5);
        state.posts.save(post.clone()).await.unwrap();
        state
            .comments
            .save(Comment::new(post.id, "ada".into(), "Bye".into()))
            .await
            .unwrap();

        let app = test_app!(state);
        let (name, value) = bearer(&state);
        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/posts/{}", post.id))
                .insert_header((name, value))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), "/api/posts");
        assert!(state.posts.find_by_id(post.id).await.unwrap().is_none());
        assert!(state.comments.find_by_post(post.id).await.unwrap().is_empty());
    }

    #[actix_web::test]
    async fn unauthenticated_delete_redirects_to_login_and_keeps_the_post() {
        let state = AppState::in_memory(LOGIN_PATH);
        let post = published_post(-5);
        state.posts.save(post.clone()).await.unwrap();

        let app = test_app!(state);
        let resp = test::call_service(
            &app,
            test::TestRequest::delete()
                .uri(&format!("/api/posts/{}", post.id))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), LOGIN_PATH);

        let kept = state.posts.find_by_id(post.id).await.unwrap().unwrap();
        assert_eq!(kept.title, post.title);
    }

    #[actix_web::test]
    async fn draft_list_requires_login_and_is_oldest_first() {
        let state = AppState::in_memory(LOGIN_PATH);

        let mut first = Post::new(Uuid::new_v4(), "First".into(), "Body".into());
        first.created_at = Utc::now() - TimeDelta::hours(2);
        let second = Post::new(Uuid::new_v4(), "Second".into(), "Body".into());
        state.posts.save(second.clone()).await.unwrap();
        state.posts.save(first.clone()).await.unwrap();
        state.posts.save(published_post(-5)).await.unwrap();

        let app = test_app!(state);

        let resp =
            test::call_service(&app, test::TestRequest::get().uri("/api/drafts").to_request())
                .await;
        assert_eq!(resp.status(), StatusCode::FOUND);
        assert_eq!(location(&resp), LOGIN_PATH);

        let (name, value) = bearer(&state);
        let resp = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/api/drafts")
                .insert_header((name, value))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::OK);
        let body: ApiResponse<Vec<PostView>> = test::read_body_json(resp).await;
        let ids: Vec<Uuid> = body.data.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids, vec![first.id, second.id]);
    }

    #[actix_web::test]
    async fn publish_stamps_the_draft_and_puts_it_on_top_of_the_list() {
        let state = AppState::in_memory(LOGIN_PATH);
        state.posts.save(published_post(-60)).await.unwrap();
        let draft = Post::new(Uuid::new_v4(), "Fresh".into(), "Body".into());
        state.posts.save(draft.clone()).await.unwrap();

        let app = test_app!(state);
        let (name, value) = bearer(&state);
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/posts/{}/publish", draft.id))
                .insert_header((name, value))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::SEE_OTHER);
        assert_eq!(location(&resp), format!("/api/posts/{}", draft.id));

        let saved = state.posts.find_by_id(draft.id).await.unwrap().unwrap();
        assert!(saved.published_at.unwrap() <= Utc::now());

        let resp = test::call_service(&app, test::TestRequest::get().uri("/api/posts").to_request())
            .await;
        let body: ApiResponse<Vec<PostView>> = test::read_body_json(resp).await;
        let ids: Vec<Uuid> = body.data.unwrap().iter().map(|p| p.id).collect();
        assert_eq!(ids.iter().filter(|id| **id == draft.id).count(), 1);
        assert_eq!(ids[0], draft.id);
    }

    #[actix_web::test]
    async fn publish_of_missing_post_is_404() {
        let state = AppState::in_memory(LOGIN_PATH);
        let app = test_app!(state);

        let (name, value) = bearer(&state);
        let resp = test::call_service(
            &app,
            test::TestRequest::post()
                .uri(&format!("/api/posts/{}/publish", Uuid::new_v4()))
                .insert_header((name, value))
                .to_request(),
        )
        .await;

        assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    }
}
