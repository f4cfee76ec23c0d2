use actix_web::{get, post, web, Responder};
use chrono::{NaiveDate, Utc};
use common::error::AppError;
use common::response::R;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::handle::current_player;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SetLimitsReq {
    pub daily_bet_limit: Option<Decimal>,
    pub monthly_bet_limit: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct SelfExcludeReq {
    pub until: NaiveDate,
}

/// GET /api/responsible/limits
#[get("/api/responsible/limits")]
pub async fn get_limits(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let player = current_player(&state).await?;
    let limits = state
        .responsible_service
        .get_limits(player.id.unwrap_or_default())
        .await?;
    R::success(limits)
}

/// POST /api/responsible/limits
#[post("/api/responsible/limits")]
pub async fn set_limits(
    req: web::Json<SetLimitsReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let player = current_player(&state).await?;
    let limits = state
        .responsible_service
        .set_limits(
            player.id.unwrap_or_default(),
            req.daily_bet_limit,
            req.monthly_bet_limit,
            Utc::now(),
        )
        .await?;
    R::success(limits)
}

/// POST /api/responsible/self-exclude
#[post("/api/responsible/self-exclude")]
pub async fn self_exclude(
    req: web::Json<SelfExcludeReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let player = current_player(&state).await?;
    let limits = state
        .responsible_service
        .self_exclude(player.id.unwrap_or_default(), req.until, Utc::now())
        .await?;
    R::success(limits)
}

/// GET /api/responsible/usage
#[get("/api/responsible/usage")]
pub async fn usage(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let player = current_player(&state).await?;
    let usage = state
        .responsible_service
        .get_limits_usage(player.id.unwrap_or_default(), Utc::now())
        .await?;
    R::success(usage)
}
