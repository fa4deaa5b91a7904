use actix_web::{delete, get, post, put, web, HttpResponse};

use crate::{
    app_state::AppState,
    auth::AuthenticatedUser,
    errors::AppError,
    models::dto::{
        request::{
            CreateMaterialRequest, CreateSubMaterialRequest, UpdateMaterialRequest,
            UpdateSubMaterialRequest,
        },
        response::ApiResponse,
    },
};

// Teacher routes, mounted under /admin.

#[get("/materials")]
pub async fn list_materials(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let materials = state.material_service.list_materials().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Materials retrieved", materials)))
}

#[post("/materials")]
pub async fn create_material(
    state: web::Data<AppState>,
    request: web::Json<CreateMaterialRequest>,
) -> Result<HttpResponse, AppError> {
    let material = state
        .material_service
        .create_material(request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok("Material created", material)))
}

#[get("/materials/{id}")]
pub async fn get_material(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let material = state.material_service.get_material(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Material retrieved", material)))
}

#[put("/materials/{id}")]
pub async fn update_material(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateMaterialRequest>,
) -> Result<HttpResponse, AppError> {
    let material = state
        .material_service
        .update_material(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Material updated", material)))
}

#[delete("/materials/{id}")]
pub async fn delete_material(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.material_service.delete_material(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Material deleted")))
}

#[get("/materials/{id}/sub-materials")]
pub async fn list_sub_materials(
    state: web::Data<AppState>,
    material_id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let sub_materials = state
        .sub_material_service
        .list_by_material(&material_id)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Sub-materials retrieved", sub_materials)))
}

#[post("/materials/{id}/sub-materials")]
pub async fn create_sub_material(
    state: web::Data<AppState>,
    material_id: web::Path<String>,
    request: web::Json<CreateSubMaterialRequest>,
) -> Result<HttpResponse, AppError> {
    let sub_material = state
        .sub_material_service
        .create_sub_material(&material_id, request.into_inner())
        .await?;
    Ok(HttpResponse::Created().json(ApiResponse::ok("Sub-material created", sub_material)))
}

#[get("/sub-materials/{id}")]
pub async fn get_sub_material(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let sub_material = state.sub_material_service.get_sub_material(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Sub-material retrieved", sub_material)))
}

#[put("/sub-materials/{id}")]
pub async fn update_sub_material(
    state: web::Data<AppState>,
    id: web::Path<String>,
    request: web::Json<UpdateSubMaterialRequest>,
) -> Result<HttpResponse, AppError> {
    let sub_material = state
        .sub_material_service
        .update_sub_material(&id, request.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Sub-material updated", sub_material)))
}

#[delete("/sub-materials/{id}")]
pub async fn delete_sub_material(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    state.sub_material_service.delete_sub_material(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::message("Sub-material deleted")))
}

// Student routes.

#[get("/materials")]
pub async fn student_list_materials(state: web::Data<AppState>) -> Result<HttpResponse, AppError> {
    let materials = state.material_service.list_materials().await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Materials retrieved", materials)))
}

#[get("/materials/{id}")]
pub async fn student_get_material(
    state: web::Data<AppState>,
    id: web::Path<String>,
    auth: AuthenticatedUser,
) -> Result<HttpResponse, AppError> {
    let material = state
        .material_service
        .get_material_for_student(&id, &auth.0)
        .await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Material retrieved", material)))
}

#[get("/sub-materials/{id}")]
pub async fn student_get_sub_material(
    state: web::Data<AppState>,
    id: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let sub_material = state.sub_material_service.get_sub_material(&id).await?;
    Ok(HttpResponse::Ok().json(ApiResponse::ok("Sub-material retrieved", sub_material)))
}
