use std::rc::Rc;

use actix_web::body::EitherBody;
use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse};
use actix_web::{web, Error, HttpMessage, ResponseError};
use futures_util::future::LocalBoxFuture;

use crate::core::{AppError, AppState};
use crate::domain::auth::{AuthMode, AuthenticatedUser};

pub struct AuthMiddlewareService<S> {
    pub service: Rc<S>,
    pub mode: AuthMode,
}

impl<S, B> Service<ServiceRequest> for AuthMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, actix_web::Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();
        let mode = self.mode;

        Box::pin(async move {
            let outcome = match req.app_data::<web::Data<AppState>>() {
                Some(state) => state.sessions.authenticate(req.request(), mode),
                None => Err(AppError::InternalError(
                    "AppState가 등록되지 않았습니다".to_string(),
                )),
            };

            match outcome {
                Ok(Some(user_id)) => {
                    log::debug!("인증 성공: 사용자 ID {}", user_id);
                    req.extensions_mut().insert(AuthenticatedUser { user_id });
                }
                Ok(None) => {
                    log::debug!("선택적 인증: 세션 없음, 요청 진행");
                }
                Err(err) => {
                    let response = err.error_response();
                    let (req, _) = req.into_parts();
                    return Ok(ServiceResponse::new(req, response).map_into_right_body());
                }
            }

            // 다음 서비스로 요청 전달
            let res = service.call(req).await?;
            Ok(res.map_into_left_body())
        })
    }
}
