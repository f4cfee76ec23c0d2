use actix_web::{
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures_util::future::{ready, Ready};
use sa_token_core::{token::TokenValue, SaTokenContext};
use sa_token_plugin_actix_web::SaTokenState;
use std::future::Future;
use std::pin::Pin;
use std::rc::Rc;
use std::sync::Arc;

use super::auth_checker::AuthChecker;
use crate::error::AppError;

/// Sa-Token 鉴权中间件
///
/// 提取并校验 token, 把 login_id 写入请求扩展和任务上下文,
/// 需要鉴权但 token 缺失/无效时直接拦截
#[derive(Clone)]
pub struct SaTokenMiddleware {
    pub state: SaTokenState,
    pub auth_checker: Arc<dyn AuthChecker>,
}

impl SaTokenMiddleware {
    pub fn new(state: SaTokenState, auth_checker: Arc<dyn AuthChecker>) -> Self {
        Self {
            state,
            auth_checker,
        }
    }

    pub fn builder() -> SaTokenMiddlewareBuilder {
        SaTokenMiddlewareBuilder::new()
    }
}

/// SaTokenMiddleware 构建器
pub struct SaTokenMiddlewareBuilder {
    state: Option<SaTokenState>,
    auth_checker: Option<Arc<dyn AuthChecker>>,
}

impl SaTokenMiddlewareBuilder {
    pub fn new() -> Self {
        Self {
            state: None,
            auth_checker: None,
        }
    }

    pub fn state(mut self, state: SaTokenState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn auth_checker(mut self, auth_checker: Arc<dyn AuthChecker>) -> Self {
        self.auth_checker = Some(auth_checker);
        self
    }

    /// # Panics
    /// `state` 或 `auth_checker` 未设置时 panic
    pub fn build(self) -> SaTokenMiddleware {
        SaTokenMiddleware {
            state: self.state.expect("SaTokenMiddlewareBuilder: state is required"),
            auth_checker: self
                .auth_checker
                .expect("SaTokenMiddlewareBuilder: auth_checker is required"),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for SaTokenMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = SaTokenMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SaTokenMiddlewareService {
            service: Rc::new(service),
            state: self.state.clone(),
            auth_checker: self.auth_checker.clone(),
        }))
    }
}

pub struct SaTokenMiddlewareService<S> {
    service: Rc<S>,
    state: SaTokenState,
    auth_checker: Arc<dyn AuthChecker>,
}

impl<S, B> Service<ServiceRequest> for SaTokenMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let state = self.state.clone();
        let auth_checker = self.auth_checker.clone();

        Box::pin(async move {
            let mut ctx = SaTokenContext::new();

            let need_auth = auth_checker.check_auth_required(&req);
            let token_str_opt = extract_token_from_request(&req, &state);

            if token_str_opt.is_none() {
                if need_auth {
                    log::warn!("⚠️  [Auth] 未提供 Token: {}", req.path());
                    return Err(AppError::auth("error.token_missing").into());
                }
                // 匿名路径直接放行
                SaTokenContext::set_current(ctx);
                let result = service.call(req).await;
                SaTokenContext::clear();
                return result;
            }

            let token = TokenValue::new(token_str_opt.unwrap());
            let token_valid = state.manager.is_valid(&token).await;
            if !token_valid && need_auth {
                log::warn!("⚠️  [Auth] Token 无效或已过期: {}", req.path());
                return Err(AppError::auth("error.token_invalid").into());
            }

            if token_valid {
                req.extensions_mut().insert(token.clone());

                if let Ok(token_info) = state.manager.get_token_info(&token).await {
                    let login_id = token_info.login_id.clone();
                    if !auth_checker.valid_login_id(login_id.as_str()) {
                        log::warn!("⚠️  [Auth] Login_id 无效: {}", &login_id);
                        return Err(AppError::auth("error.token_invalid").into());
                    }
                    req.extensions_mut().insert(login_id.clone());

                    ctx.token = Some(token.clone());
                    ctx.token_info = Some(Arc::new(token_info));
                    ctx.login_id = Some(login_id);
                }
            }

            SaTokenContext::set_current(ctx);
            let result = service.call(req).await;
            SaTokenContext::clear();

            result
        })
    }
}

/// 从请求提取 token: Header 优先, 其次 Query 参数
fn extract_token_from_request(req: &ServiceRequest, state: &SaTokenState) -> Option<String> {
    let token_name = &state.manager.config.token_name;

    if let Some(header) = req.headers().get(token_name.as_str()) {
        if let Ok(value) = header.to_str() {
            return Some(strip_bearer(value));
        }
    }

    req.query_string().split('&').find_map(|pair| {
        let mut parts = pair.split('=');
        match (parts.next(), parts.next()) {
            (Some(key), Some(value)) if key == token_name.as_str() => Some(value.to_string()),
            _ => None,
        }
    })
}

fn strip_bearer(token: &str) -> String {
    token
        .strip_prefix("Bearer ")
        .unwrap_or(token)
        .to_string()
}
