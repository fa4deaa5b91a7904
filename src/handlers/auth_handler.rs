use actix_web::{post, web, HttpResponse};

use crate::{app_state::AppState, errors::AppError, models::dto::request::LoginRequest};

#[post("/login")]
pub async fn login(
    state: web::Data<AppState>,
    request: web::Json<LoginRequest>,
) -> Result<HttpResponse, AppError> {
    let response = state.auth_service.login(request.into_inner()).await?;
    Ok(HttpResponse::Ok().json(response))
}
