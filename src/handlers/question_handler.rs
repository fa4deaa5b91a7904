use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{
            BulkAnswerUpdateRequest, CreateQuestionRequest, UpdateAnswerRequest,
            UpdateQuestionRequest,
        },
        response::ApiResponse,
    },
};

#[get("/quiz/questions")]
pub async fn list_questions(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let questions = state.quiz_service.list_questions().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Questions retrieved", questions)))
}

#[post("/quiz/questions")]
pub async fn create_question(
    state: web::Data<AppState>,
    request: web::Json<CreateQuestionRequest>,
) -> Result<HttpResponse, AppError> {
    let question = state
        .quiz_service
        .create_question(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok("Question created", question)))
}

#[get("/quiz/questions/{id}")]
pub async fn get_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let question = state.quiz_service.get_question(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Question retrieved", question)))
}

#[put("/quiz/questions/{id}")]
pub async fn update_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateQuestionRequest>,
) -> Result<HttpResponse, AppError> {
    let question = state
        .quiz_service
        .update_question(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Question updated", question)))
}

#[delete("/quiz/questions/{id}")]
pub async fn delete_question(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.quiz_service.delete_question(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Question deleted")))
}

#[get("/quiz/questions/{id}/answers")]
pub async fn list_answers(
    state: web::Data<AppState>,
    question_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let answers = state.quiz_service.list_answers(&question_id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Answers retrieved", answers)))
}

#[put("/quiz/questions/{id}/answers")]
pub async fn bulk_update_answers(
    state: web::Data<AppState>,
    question_id: web::Path<String>,
    request: web::Json<BulkAnswerUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    let answers = state
        .quiz_service
        .bulk_update_answers(&question_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Answers updated", answers)))
}

#[put("/quiz/answers/{id}")]
pub async fn update_answer(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateAnswerRequest>,
) -> Result<HttpResponse, AppError> {
    let answer = state
        .quiz_service
        .update_answer(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Answer updated", answer)))
}

#[delete("/quiz/answers/{id}")]
pub async fn delete_answer(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.quiz_service.delete_answer(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Answer deleted")))
}
