use actix_web::{get, post, web, Responder};
use chrono::{DateTime, Utc};
use common::error::AppError;
use common::response::R;
use common::utils::time_util;
use orm::entities::AppBonus;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::handle::current_player;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ActivateBonusReq {
    pub bonus_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct BonusUsageReq {
    pub usage_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateCampaignReq {
    pub tenant_id: i64,
    pub bonus_name: String,
    pub bonus_type: Option<String>,
    pub bonus_amount: Decimal,
    pub wagering_multiplier: Decimal,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_to: Option<DateTime<Utc>>,
}

/// GET /api/bonus/available
#[get("/api/bonus/available")]
pub async fn available(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let player = current_player(&state).await?;
    let list = state
        .bonus_service
        .available_bonuses(player.id.unwrap_or_default(), player.tenant_id, Utc::now())
        .await?;
    R::success(list)
}

/// GET /api/bonus/mine
#[get("/api/bonus/mine")]
pub async fn mine(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let player = current_player(&state).await?;
    let list = state
        .bonus_service
        .list_usages(player.id.unwrap_or_default())
        .await?;
    R::success(list)
}

/// POST /api/bonus/activate
#[post("/api/bonus/activate")]
pub async fn activate(
    req: web::Json<ActivateBonusReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let player = current_player(&state).await?;
    let usage = state
        .bonus_service
        .activate(player.id.unwrap_or_default(), req.bonus_id, Utc::now())
        .await?;
    R::success(usage)
}

/// POST /api/bonus/claim
#[post("/api/bonus/claim")]
pub async fn claim(
    req: web::Json<BonusUsageReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let player = current_player(&state).await?;
    let usage = state
        .bonus_service
        .claim(player.id.unwrap_or_default(), req.usage_id, Utc::now())
        .await?;
    R::success(usage)
}

/// POST /api/bonus/cancel
#[post("/api/bonus/cancel")]
pub async fn cancel(
    req: web::Json<BonusUsageReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let player = current_player(&state).await?;
    let usage = state
        .bonus_service
        .cancel(player.id.unwrap_or_default(), req.usage_id, Utc::now())
        .await?;
    R::success(usage)
}

/// POST /api/admin/bonus/create
#[post("/api/admin/bonus/create")]
pub async fn admin_create(
    req: web::Json<CreateCampaignReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let req = req.into_inner();
    let bonus = AppBonus {
        id: None,
        tenant_id: req.tenant_id,
        bonus_name: req.bonus_name,
        bonus_type: req.bonus_type,
        bonus_amount: req.bonus_amount,
        wagering_multiplier: req.wagering_multiplier,
        valid_from: req.valid_from.map(time_util::to_db_time),
        valid_to: req.valid_to.map(time_util::to_db_time),
        is_active: Some(true),
    };
    let created = state.bonus_service.create_campaign(bonus).await?;
    R::success(created)
}

/// POST /api/admin/bonus/cleanup-expired
#[post("/api/admin/bonus/cleanup-expired")]
pub async fn admin_cleanup_expired(
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let cleaned = state.bonus_service.cleanup_expired(Utc::now()).await?;
    R::success(cleaned)
}
