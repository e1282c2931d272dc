use actix_web::{delete, get, patch, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{CreateQuizRequest, PaginationParams, UpdateQuizRequest},
    models::dto::response::Page,
};

#[post("/api/quizzes")]
pub async fn create_quiz(
    state: web::Data<AppState>,
    request: web::Json<CreateQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .create_quiz(&auth.0, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(quiz))
}

#[get("/api/quizzes")]
pub async fn list_quizzes(
    state: web::Data<AppState>,
    query: web::Query<PaginationParams>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let pagination = query.into_inner();
    let (items, total) = state.quiz_service.list_quizzes(&auth.0, &pagination).await?;
    Ok(HttpResponse::Ok().json(Page::new(
        items,
        total,
        pagination.offset(),
        pagination.limit(),
    )))
}

#[get("/api/quizzes/{id}")]
pub async fn get_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.get_quiz(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[patch("/api/quizzes/{id}")]
pub async fn update_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state
        .quiz_service
        .update_quiz(&auth.0, &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[delete("/api/quizzes/{id}")]
pub async fn delete_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    state.quiz_service.delete_quiz(&auth.0, &id).await?;
    Ok(HttpResponse::NoContent().finish())
}

#[post("/api/quizzes/{id}/publish")]
pub async fn publish_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.publish_quiz(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[post("/api/quizzes/{id}/unpublish")]
pub async fn unpublish_quiz(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.unpublish_quiz(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(quiz))
}

#[get("/api/classes/{id}/quizzes")]
pub async fn list_class_quizzes(
    state: web::Data<AppState>,
    id: web::Path<String>,
    query: web::Query<PaginationParams>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let pagination = query.into_inner();
    let (items, total) = state
        .quiz_service
        .list_available_quizzes(&auth.0, &id, &pagination)
        .await?;
    Ok(HttpResponse::Ok().json(Page::new(
        items,
        total,
        pagination.offset(),
        pagination.limit(),
    )))
}

#[get("/api/quizzes/{id}/questions")]
pub async fn quiz_for_taking(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let view = state.quiz_service.quiz_for_taking(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(view))
}
