use actix_web::{delete, patch, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::request::{
        CreateQuestionRequest, ReorderQuestionsRequest, UpdateQuestionRequest,
    },
};

#[post("/api/quizzes/{quiz_id}/questions")]
pub async fn add_question(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    request: web::Json<CreateQuestionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let question = state
        .quiz_service
        .add_question(&auth.0, &quiz_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(question))
}

#[patch("/api/quizzes/{quiz_id}/questions/{question_id}")]
pub async fn update_question(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    request: web::Json<UpdateQuestionRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (quiz_id, question_id) = path.into_inner();
    let question = state
        .quiz_service
        .update_question(&auth.0, &quiz_id, &question_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(question))
}

#[delete("/api/quizzes/{quiz_id}/questions/{question_id}")]
pub async fn delete_question(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let (quiz_id, question_id) = path.into_inner();
    state
        .quiz_service
        .delete_question(&auth.0, &quiz_id, &question_id)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

#[put("/api/quizzes/{quiz_id}/questions/order")]
pub async fn reorder_questions(
    state: web::Data<AppState>,
    quiz_id: web::Path<String>,
    request: web::Json<ReorderQuestionsRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let questions = state
        .quiz_service
        .reorder_questions(&auth.0, &quiz_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(questions))
}
