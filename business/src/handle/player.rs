use actix_web::{post, web, Responder};
use chrono::Utc;
use common::error::AppError;
use common::response::R;
use serde::Deserialize;

use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct CreatePlayerReq {
    pub tenant_id: i64,
    pub currency_id: i64,
    pub player_name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeactivateWalletReq {
    pub wallet_id: i64,
}

/// POST /api/admin/player/create
#[post("/api/admin/player/create")]
pub async fn admin_create_player(
    req: web::Json<CreatePlayerReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let req = req.into_inner();
    let player = state
        .registration_service
        .create_player(req.tenant_id, req.currency_id, req.player_name, Utc::now())
        .await?;
    R::success(player)
}

/// POST /api/admin/wallet/deactivate
#[post("/api/admin/wallet/deactivate")]
pub async fn admin_deactivate_wallet(
    req: web::Json<DeactivateWalletReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    state
        .registration_service
        .deactivate_wallet(req.wallet_id)
        .await?;
    R::ok()
}
