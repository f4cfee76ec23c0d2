use actix_web::{get, post, web, Responder};
use chrono::{DateTime, Utc};
use common::error::AppError;
use common::response::R;
use common::utils::time_util;
use orm::entities::AppRaffleJackpot;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::handle::current_player;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct JoinReq {
    pub jackpot_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct CreateJackpotReq {
    pub tenant_id: i64,
    pub currency_id: i64,
    pub name: String,
    pub description: Option<String>,
    /// MANUAL / TIME_BASED / THRESHOLD
    pub jackpot_type: String,
    pub seed_amount: Decimal,
    pub entry_fee: Decimal,
    pub draw_at: Option<DateTime<Utc>>,
    pub target_amount: Option<Decimal>,
}

#[derive(Debug, Deserialize)]
pub struct AdminJackpotReq {
    pub tenant_id: i64,
    pub jackpot_id: i64,
}

#[derive(Debug, Deserialize)]
pub struct AdminListReq {
    pub tenant_id: i64,
}

/// GET /api/raffle/list
#[get("/api/raffle/list")]
pub async fn list_active(state: web::Data<AppState>) -> Result<impl Responder, AppError> {
    let player = current_player(&state).await?;
    let views = state
        .raffle_service
        .list_jackpots(player.tenant_id, true)
        .await?;
    R::success(views)
}

/// POST /api/raffle/join
#[post("/api/raffle/join")]
pub async fn join(
    req: web::Json<JoinReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let player = current_player(&state).await?;
    let entry = state
        .raffle_service
        .join(
            player.id.unwrap_or_default(),
            player.tenant_id,
            req.jackpot_id,
            Utc::now(),
        )
        .await?;
    R::success(entry)
}

/// POST /api/admin/raffle/create
#[post("/api/admin/raffle/create")]
pub async fn admin_create(
    req: web::Json<CreateJackpotReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let req = req.into_inner();
    let jackpot = AppRaffleJackpot {
        id: None,
        tenant_id: req.tenant_id,
        currency_id: req.currency_id,
        name: req.name,
        description: req.description,
        jackpot_type: req.jackpot_type,
        seed_amount: req.seed_amount,
        current_amount: Decimal::ZERO,
        entry_fee: req.entry_fee,
        draw_at: req.draw_at.map(time_util::to_db_time),
        target_amount: req.target_amount,
        status: String::new(),
        winner_id: None,
        won_amount: None,
        drawn_at: None,
        created_at: None,
    };
    let created = state.raffle_service.create_jackpot(jackpot, Utc::now()).await?;
    R::success(created)
}

/// POST /api/admin/raffle/draw
#[post("/api/admin/raffle/draw")]
pub async fn admin_draw(
    req: web::Json<AdminJackpotReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let jackpot = state
        .raffle_service
        .draw(req.tenant_id, req.jackpot_id, Utc::now())
        .await?;
    R::success(jackpot)
}

/// POST /api/admin/raffle/cancel
#[post("/api/admin/raffle/cancel")]
pub async fn admin_cancel(
    req: web::Json<AdminJackpotReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let jackpot = state
        .raffle_service
        .cancel(req.tenant_id, req.jackpot_id, Utc::now())
        .await?;
    R::success(jackpot)
}

/// GET /api/admin/raffle/list
#[get("/api/admin/raffle/list")]
pub async fn admin_list(
    query: web::Query<AdminListReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let views = state
        .raffle_service
        .list_jackpots(query.tenant_id, false)
        .await?;
    R::success(views)
}
