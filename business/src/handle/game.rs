use actix_web::{post, web, Responder};
use chrono::Utc;
use common::error::AppError;
use common::response::R;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::handle::current_player;
use crate::service::games::GameKind;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct PlayReq {
    pub amount: Decimal,
    /// 押注项: 硬币 HEAD/TAIL, 骰子 EVEN/ODD
    pub choice: String,
}

/// POST /api/game/coin-toss/play
#[post("/api/game/coin-toss/play")]
pub async fn play_coin_toss(
    req: web::Json<PlayReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    play(GameKind::CoinToss, req.into_inner(), &state).await
}

/// POST /api/game/dice/play
#[post("/api/game/dice/play")]
pub async fn play_dice(
    req: web::Json<PlayReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    play(GameKind::Dice, req.into_inner(), &state).await
}

async fn play(
    game: GameKind,
    req: PlayReq,
    state: &AppState,
) -> Result<impl Responder, AppError> {
    let player = current_player(state).await?;
    let outcome = state
        .bet_service
        .play(
            player.id.unwrap_or_default(),
            player.tenant_id,
            game,
            req.amount,
            &req.choice,
            Utc::now(),
        )
        .await?;
    R::success(outcome)
}
