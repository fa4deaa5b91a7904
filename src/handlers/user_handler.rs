use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    errors::AppError,
    models::dto::{
        request::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        response::ApiResponse,
    },
};

#[get("/users")]
pub async fn list_users(
    state: web::Data<AppState>,
    query: web::Query<UserListQuery>,
) -> Result<HttpResponse, AppError> {
    let users = state.user_service.list_users(query.into_inner().role).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Users retrieved", users)))
}

#[post("/users")]
pub async fn create_user(
    state: web::Data<AppState>,
    request: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.create_user(request.into_inner()).await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok("User created", user)))
}

#[get("/users/{id}")]
pub async fn get_user(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let user = state.user_service.get_user(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("User retrieved", user)))
}

#[put("/users/{id}")]
pub async fn update_user(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let user = state
        .user_service
        .update_user(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("User updated", user)))
}

#[delete("/users/{id}")]
pub async fn delete_user(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.user_service.deactivate_user(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("User deactivated")))
}
