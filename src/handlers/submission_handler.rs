use actix_web::{get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{GradeAttemptRequest, PaginationParams, RecordAnswerRequest},
    models::dto::response::Page,
};

#[post("/api/quizzes/{quiz_id}/attempts")]
pub async fn start_attempt(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let submission = state
        .submission_service
        .start_attempt(&auth.0, &quiz_id)
        .await?;
    Ok(HttpResponse::Created().json(submission))
}

#[get("/api/quizzes/{quiz_id}/attempts")]
pub async fn list_attempts(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    query: web::Query<PaginationParams>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let pagination = query.into_inner();
    let (items, total) = state
        .submission_service
        .list_attempts(&auth.0, &quiz_id, &pagination)
        .await?;
    Ok(HttpResponse::Ok().json(Page::new(
        items,
        total,
        pagination.offset(),
        pagination.limit(),
    )))
}

#[get("/api/attempts/{id}")]
pub async fn get_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let submission = state.submission_service.get_attempt(&auth.0, &id).await?;
    Ok(HttpResponse::Ok().json(submission))
}

#[put("/api/attempts/{id}/answers/{question_id}")]
pub async fn record_answer(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    request: web::Json<RecordAnswerRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (submission_id, question_id) = path.into_inner();
    let submission = state
        .submission_service
        .record_answer(&auth.0, &submission_id, &question_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(submission))
}

#[post("/api/attempts/{id}/complete")]
pub async fn complete_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let submission = state
        .submission_service
        .complete_attempt(&auth.0, &id)
        .await?;
    Ok(HttpResponse::Ok().json(submission))
}

#[post("/api/attempts/{id}/grade")]
pub async fn grade_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<GradeAttemptRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let submission = state
        .submission_service
        .grade_attempt(&auth.0, &id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(submission))
}

#[get("/api/attempts/{id}/review")]
pub async fn review_attempt(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let review = state
        .submission_service
        .review_attempt(&auth.0, &id)
        .await?;
    Ok(HttpResponse::Ok().json(review))
}
