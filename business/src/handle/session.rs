use actix_web::{post, web, HttpRequest, Responder};
use chrono::Utc;
use common::error::AppError;
use common::response::R;
use serde::Deserialize;

use crate::handle::current_player;
use crate::service::games::GameKind;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct StartSessionReq {
    pub game: String,
    pub device_info: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EndSessionReq {
    pub session_id: i64,
}

/// POST /api/session/start
#[post("/api/session/start")]
pub async fn start_session(
    http_req: HttpRequest,
    req: web::Json<StartSessionReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let player = current_player(&state).await?;
    let game = GameKind::from_code(&req.game)
        .ok_or_else(|| AppError::validation(format!("未知游戏: {}", req.game)))?;
    let ip = http_req
        .connection_info()
        .realip_remote_addr()
        .map(|s| s.to_string());

    let session = state
        .session_service
        .start_session(
            player.id.unwrap_or_default(),
            player.tenant_id,
            game,
            ip,
            req.device_info.clone(),
            Utc::now(),
        )
        .await?;
    R::success(session)
}

/// POST /api/session/end
#[post("/api/session/end")]
pub async fn end_session(
    req: web::Json<EndSessionReq>,
    state: web::Data<AppState>,
) -> Result<impl Responder, AppError> {
    let player = current_player(&state).await?;
    let session = state
        .session_service
        .end_session(player.id.unwrap_or_default(), req.session_id, Utc::now())
        .await?;
    R::success(session)
}
