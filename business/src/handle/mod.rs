pub mod bonus;
pub mod common;
pub mod game;
pub mod player;
pub mod raffle;
pub mod responsible;
pub mod session;
pub mod wallet;
pub mod withdrawal;

use common::error::AppError;
use orm::entities::AppPlayer;
use sa_token_plugin_actix_web::StpUtil;

use crate::state::AppState;

/// 解析当前登录玩家 (sa-token 登录态 + 玩家行提供租户上下文)
pub async fn current_player(state: &AppState) -> Result<AppPlayer, AppError> {
    let user_id = StpUtil::get_login_id_as_long()
        .await
        .map_err(|_| AppError::auth("lost-login"))?;
    AppPlayer::select_by_id(state.rb.as_ref(), user_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("玩家不存在: {}", user_id)))
}
