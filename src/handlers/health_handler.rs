use actix_web::{get, web, HttpResponse};

use crate::app_state::AppState;

#[get("/health")]
pub async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

#[get("/health/live")]
pub async fn liveness() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "alive" }))
}

/// Ready once the database answers a ping.
#[get("/health/ready")]
pub async fn readiness(state: web::Data<AppState>) -> HttpResponse {
    let Some(db) = &state.db else {
        return HttpResponse::Ok().json(serde_json::json!({ "status": "ready" }));
    };

    match db.health_check().await {
        Ok(()) => HttpResponse::Ok().json(serde_json::json!({
            "status": "ready",
            "database": "connected",
        })),
        Err(e) => {
            log::error!("Readiness check failed: {}", e);
            HttpResponse::ServiceUnavailable().json(serde_json::json!({
                "status": "not_ready",
                "database": "disconnected",
            }))
        }
    }
}
