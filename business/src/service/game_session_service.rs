use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::enums::status::SessionStatus;
use common::error::AppError;
use common::utils::time_util;
use orm::entities::{AppGame, AppGameSession, AppPlayer, AppTenantGame};
use rbatis::RBatis;

use crate::service::games::GameKind;

/// 游戏会话服务
pub struct GameSessionService {
    rb: Arc<RBatis>,
}

impl GameSessionService {
    pub fn new(rb: Arc<RBatis>) -> Self {
        Self { rb }
    }

    /// 开始会话, 幂等: 已有进行中的会话直接返回
    ///
    /// 玩家行加锁串行化, 防止并发创建出两个 active 会话
    pub async fn start_session(
        &self,
        player_id: i64,
        tenant_id: i64,
        game: GameKind,
        ip_address: Option<String>,
        device_info: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<AppGameSession, AppError> {
        let tx = self.rb.acquire_begin().await?;
        let mut tx = tx.defer_async(|mut tx| async move {
            if !tx.done {
                let _ = tx.rollback().await;
                log::warn!("会话创建事务回滚");
            }
        });

        AppPlayer::select_by_id_for_update(&tx, player_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("玩家不存在: {}", player_id)))?;

        let game_row = AppGame::select_by_code(&tx, game.code())
            .await?
            .filter(|g| g.is_active.unwrap_or(false))
            .ok_or(AppError::GameNotEnabled)?;
        let game_id = game_row.id.unwrap_or_default();
        AppTenantGame::select_by_tenant_game(&tx, tenant_id, game_id)
            .await?
            .filter(|tg| tg.is_enabled.unwrap_or(false))
            .ok_or(AppError::GameNotEnabled)?;

        if let Some(existing) =
            AppGameSession::select_active(&tx, player_id, tenant_id, game_id).await?
        {
            tx.commit().await?;
            return Ok(existing);
        }

        let mut session = AppGameSession {
            id: None,
            player_id,
            tenant_id,
            game_id,
            status: SessionStatus::Active.code().to_string(),
            started_at: Some(time_util::to_db_time(now)),
            ended_at: None,
            ip_address,
            device_info,
        };
        let res = AppGameSession::insert(&tx, &session).await?;
        session.id = res.last_insert_id.as_i64();

        tx.commit().await?;
        log::info!(
            "🕹️  玩家 {} 开始 {} 会话 {:?}",
            player_id,
            game.code(),
            session.id
        );
        Ok(session)
    }

    /// 结束会话, 幂等: 已结束的会话原样返回
    pub async fn end_session(
        &self,
        player_id: i64,
        session_id: i64,
        now: DateTime<Utc>,
    ) -> Result<AppGameSession, AppError> {
        let mut session = AppGameSession::select_by_id(self.rb.as_ref(), session_id)
            .await?
            .filter(|s| s.player_id == player_id)
            .ok_or_else(|| AppError::not_found(format!("会话不存在: {}", session_id)))?;

        if session.status == SessionStatus::Completed.code() {
            return Ok(session);
        }

        session.status = SessionStatus::Completed.code().to_string();
        session.ended_at = Some(time_util::to_db_time(now));
        AppGameSession::update_by_map(
            self.rb.as_ref(),
            &session,
            rbs::value! { "id": session.id },
        )
        .await?;
        Ok(session)
    }
}
