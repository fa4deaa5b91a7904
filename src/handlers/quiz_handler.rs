use actix_web::{get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::{SubmitQuizRequest, UpdateQuizRequest},
        response::ApiResponse,
    },
};

// Student routes.

#[get("/quiz")]
pub async fn get_quiz(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.student_view(&auth.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Quiz retrieved", quiz)))
}

#[post("/quiz")]
pub async fn submit_quiz(
    state: web::Data<AppState>,
    request: web::Json<SubmitQuizRequest>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let result = state
        .quiz_attempt_service
        .submit(&auth.0, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok("Quiz submitted", result)))
}

#[get("/quiz/result")]
pub async fn my_results(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let attempts = state
        .quiz_attempt_service
        .history_for_student(&auth.0)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Quiz results retrieved", attempts)))
}

// Teacher routes, mounted under /admin.

#[get("/quiz")]
pub async fn admin_get_quiz(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.admin_view().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Quiz retrieved", quiz)))
}

#[put("/quiz")]
pub async fn update_quiz(
    state: web::Data<AppState>,
    request: web::Json<UpdateQuizRequest>,
) -> Result<HttpResponse, AppError> {
    let quiz = state.quiz_service.update_quiz(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Quiz updated", quiz)))
}

#[get("/quiz/result")]
pub async fn all_results(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let attempts = state.quiz_attempt_service.history_all().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Quiz results retrieved", attempts)))
}
