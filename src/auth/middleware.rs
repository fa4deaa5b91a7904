use std::{
    future::{ready, Ready},
    rc::Rc,
};

use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    web, Error, FromRequest, HttpMessage, HttpRequest,
};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use futures::future::LocalBoxFuture;

use crate::{
    app_state::AppState,
    auth::{require_role, Principal},
    errors::AppError,
    models::domain::Role,
};

/// Verifies the bearer token and checks the caller's role against an allow list.
/// A missing or invalid token, or one for a deactivated account, is 401; a role
/// outside the list is 403.
pub struct AuthMiddleware {
    allowed: Rc<Vec<Role>>,
}

impl AuthMiddleware {
    pub fn allow(roles: &[Role]) -> Self {
        Self {
            allowed: Rc::new(roles.to_vec()),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for AuthMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = AuthMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(AuthMiddlewareService {
            service: Rc::new(service),
            allowed: Rc::clone(&self.allowed),
        }))
    }
}

pub struct AuthMiddlewareService<S> {
    service: Rc<S>,
    allowed: Rc<Vec<Role>>,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let allowed = Rc::clone(&self.allowed);

        Box::pin(async move {
            let mut req = req;

            match authorize(&mut req, &allowed).await {
                Ok(principal) => {
                    req.extensions_mut().insert(principal);
                    let res = service.call(req).await?;
                    Ok(res.map_into_left_body())
                }
                Err(err) => Ok(req.error_response(err).map_into_right_body()),
            }
        })
    }
}

async fn authorize(req: &mut ServiceRequest, allowed: &[Role]) -> Result<Principal, AppError> {
    let state = req
        .app_data::<web::Data<AppState>>()
        .cloned()
        .ok_or_else(|| AppError::InternalError("Application state not configured".to_string()))?;

    let credentials = req
        .extract::<BearerAuth>()
        .await
        .map_err(|_| AppError::Unauthorized("Missing or malformed bearer token".to_string()))?;

    let claims = state.jwt_service.validate_token(credentials.token()).map_err(|e| {
        log::debug!("Rejected bearer token: {}", e);
        AppError::Unauthorized("Invalid or expired token".to_string())
    })?;

    let principal = Principal::from(claims);
    // Tokens outlive deactivation; the account is checked on every request.
    if !state.user_service.is_active(&principal.id).await? {
        return Err(AppError::Unauthorized("Account is no longer active".to_string()));
    }
    require_role(&principal, allowed)?;
    Ok(principal)
}

/// Extractor for the authenticated caller in handlers.
pub struct AuthenticatedUser(pub Principal);

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut actix_web::dev::Payload) -> Self::Future {
        let principal = req
            .extensions()
            .get::<Principal>()
            .cloned()
            .ok_or_else(|| AppError::Unauthorized("Not authenticated".to_string()));

        ready(principal.map(AuthenticatedUser))
    }
}
