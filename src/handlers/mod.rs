pub mod auth_handler;
pub mod health_handler;
pub mod material_handler;
pub mod progress_handler;
pub mod question_handler;
pub mod quiz_handler;
pub mod user_handler;

use actix_web::web;

use crate::{
    auth::AuthMiddleware, errors::AppError, models::domain::Role,
    services::upload_service::MAX_UPLOAD_BYTES,
};

/// Room for a full-size image after base64 (4/3 growth) plus the other fields.
pub const MAX_JSON_BODY_BYTES: usize = MAX_UPLOAD_BYTES * 2;

/// Registers every route. Public routes go first; the student scope has an
/// empty prefix and must come last.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .limit(MAX_JSON_BODY_BYTES)
            .error_handler(|err, _req| {
                AppError::ValidationError(format!("Invalid request body: {}", err)).into()
            }),
    )
    .app_data(web::PathConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid path: {}", err)).into()
    }))
    .app_data(web::QueryConfig::default().error_handler(|err, _req| {
        AppError::ValidationError(format!("Invalid query: {}", err)).into()
    }))
    .service(auth_handler::login)
    .service(health_handler::health_check)
    .service(health_handler::liveness)
    .service(health_handler::readiness)
    .service(
        web::scope("/admin")
            .wrap(AuthMiddleware::allow(&[Role::Teacher]))
            .service(user_handler::list_users)
            .service(user_handler::create_user)
            .service(user_handler::get_user)
            .service(user_handler::update_user)
            .service(user_handler::delete_user)
            .service(material_handler::list_materials)
            .service(material_handler::create_material)
            .service(material_handler::get_material)
            .service(material_handler::update_material)
            .service(material_handler::delete_material)
            .service(material_handler::list_sub_materials)
            .service(material_handler::create_sub_material)
            .service(material_handler::get_sub_material)
            .service(material_handler::update_sub_material)
            .service(material_handler::delete_sub_material)
            .service(quiz_handler::admin_get_quiz)
            .service(quiz_handler::update_quiz)
            .service(quiz_handler::all_results)
            .service(question_handler::list_questions)
            .service(question_handler::create_question)
            .service(question_handler::get_question)
            .service(question_handler::update_question)
            .service(question_handler::delete_question)
            .service(question_handler::list_answers)
            .service(question_handler::bulk_update_answers)
            .service(question_handler::update_answer)
            .service(question_handler::delete_answer),
    )
    .service(
        web::scope("")
            .wrap(AuthMiddleware::allow(&[Role::Student]))
            .service(material_handler::student_list_materials)
            .service(material_handler::student_get_material)
            .service(material_handler::student_get_sub_material)
            .service(progress_handler::complete_sub_material)
            .service(progress_handler::progress_summary)
            .service(quiz_handler::get_quiz)
            .service(quiz_handler::submit_quiz)
            .service(quiz_handler::my_results),
    );
}
