use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState, auth::AuthenticatedUser, errors::AppError,
    models::dto::response::ApiResponse,
};

#[post("/sub-materials/{id}/progress")]
pub async fn complete_sub_material(
    state: web::Data<AppState>,
    sub_material_id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let progress = state
        .progress_service
        .mark_complete(&auth.0, &sub_material_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Progress recorded", progress)))
}

#[get("/progress")]
pub async fn progress_summary(
    state: web::Data<AppState>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let summary = state.progress_service.summary(&auth.0).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Progress retrieved", summary)))
}
