use actix_web::{get, post, web, Responder};
use chrono::Utc;
use common::enums::status::{WithdrawalAction, WithdrawalStatus};
use common::error::AppError;
use common::response::R;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::handle::current_player;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct WithdrawalReq {
    pub amount: Decimal,
}

#[derive(Debug, Deserialize)]
pub struct AdminListReq {
    pub tenant_id: i64,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct AdminProcessReq {
    pub withdrawal_id: i64,
    /// approve / process / complete / reject
    pub action: String,
    pub gateway_reference: Option<String>,
    pub rejection_reason: Option<String>,
}

/// POST /api/withdrawal/request
#[post("/api/withdrawal/request")]
pub async fn request(
    req: web::Json<WithdrawalReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let player = current_player(&state).await?;
    let withdrawal = state
        .withdrawal_service
        .request(
            player.id.unwrap_or_default(),
            player.tenant_id,
            req.amount,
            Utc::now(),
        )
        .await?;
    R::success(withdrawal)
}

/// GET /api/withdrawal/list
#[get("/api/withdrawal/list")]
pub async fn list_mine(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let player = current_player(&state).await?;
    let rows = state
        .withdrawal_service
        .list_for_player(player.id.unwrap_or_default())
        .await?;
    R::success(rows)
}

/// GET /api/admin/withdrawal/list
#[get("/api/admin/withdrawal/list")]
pub async fn admin_list(
    query: web::Query<AdminListReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let status = match query.status.as_deref() {
        Some(code) => Some(
            WithdrawalStatus::from_code(code)
                .ok_or_else(|| AppError::validation(format!("未知提现状态: {}", code)))?,
        ),
        None => None,
    };
    let rows = state
        .withdrawal_service
        .list_for_tenant(query.tenant_id, status)
        .await?;
    R::success(rows)
}

/// POST /api/admin/withdrawal/process
#[post("/api/admin/withdrawal/process")]
pub async fn admin_process(
    req: web::Json<AdminProcessReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let req = req.into_inner();
    let action = WithdrawalAction::from_code(&req.action)
        .ok_or_else(|| AppError::validation(format!("未知提现操作: {}", req.action)))?;
    let withdrawal = state
        .withdrawal_service
        .admin_process(
            req.withdrawal_id,
            action,
            req.gateway_reference,
            req.rejection_reason,
            Utc::now(),
        )
        .await?;
    R::success(withdrawal)
}
