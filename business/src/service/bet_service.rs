use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::constants::FAIR_ODDS_PAYOUT_MULTIPLIER;
use common::enums::status::BetStatus;
use common::enums::TransactionCode;
use common::error::AppError;
use common::services::ledger_service::{LedgerRef, LedgerService, MovementReq};
use common::utils::time_util;
use common::WalletKind;
use orm::entities::{AppBet, AppGame, AppGameRound, AppGameSession, AppTenantGame};
use rbatis::executor::Executor;
use rbatis::RBatis;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::service::bonus_service::BonusService;
use crate::service::games::{self, DrawResult, GameKind};
use crate::service::responsible_gaming_service::ResponsibleGamingService;

/// 结算结果
#[derive(Debug, Clone, Serialize)]
pub struct BetOutcome {
    pub bet_id: i64,
    pub round_id: i64,
    pub round_number: i64,
    pub outcome: String,
    pub win: bool,
    pub bet_amount: Decimal,
    pub win_amount: Decimal,
    pub balance: Decimal,
}

/// 有效限额: 租户覆盖优先, 否则游戏全局
pub fn effective_bounds(game: &AppGame, tenant_game: &AppTenantGame) -> (Decimal, Decimal) {
    (
        tenant_game.min_bet_override.unwrap_or(game.min_bet),
        tenant_game.max_bet_override.unwrap_or(game.max_bet),
    )
}

pub fn validate_stake(stake: Decimal, min: Decimal, max: Decimal) -> Result<(), AppError> {
    if stake < min || stake > max {
        return Err(AppError::BetOutOfBounds(format!(
            "{} 不在 [{}, {}] 内",
            stake, min, max
        )));
    }
    Ok(())
}

/// 中奖派彩: 恒定 2 倍本金, 不可配置
pub fn payout(stake: Decimal) -> Decimal {
    stake * Decimal::from(FAIR_ODDS_PAYOUT_MULTIPLIER)
}

/// 回合前置检查: 先有会话, 再校验限额
pub fn validate_round_context(
    session: Option<AppGameSession>,
    stake: Decimal,
    min: Decimal,
    max: Decimal,
) -> Result<AppGameSession, AppError> {
    let session = session.ok_or(AppError::NoActiveSession)?;
    validate_stake(stake, min, max)?;
    Ok(session)
}

/// 投注结算引擎
///
/// 所有游戏共用一条全有或全无的结算管线, 整个回合在一个数据库事务内完成
pub struct BetService {
    rb: Arc<RBatis>,
    guard: Arc<ResponsibleGamingService>,
    bonus: Arc<BonusService>,
}

impl BetService {
    pub fn new(
        rb: Arc<RBatis>,
        guard: Arc<ResponsibleGamingService>,
        bonus: Arc<BonusService>,
    ) -> Self {
        Self { rb, guard, bonus }
    }

    /// 对外入口: 解析押注项, 均匀开奖, 进入结算
    pub async fn play(
        &self,
        player_id: i64,
        tenant_id: i64,
        game: GameKind,
        stake: Decimal,
        choice: &str,
        now: DateTime<Utc>,
    ) -> Result<BetOutcome, AppError> {
        let draw = games::resolve(game, choice, &mut rand::thread_rng())?;
        self.settle(player_id, tenant_id, game, stake, draw, now)
            .await
    }

    /// 结算管线 (开奖结果由调用方传入)
    pub async fn settle(
        &self,
        player_id: i64,
        tenant_id: i64,
        game: GameKind,
        stake: Decimal,
        draw: DrawResult,
        now: DateTime<Utc>,
    ) -> Result<BetOutcome, AppError> {
        if stake <= Decimal::ZERO {
            return Err(AppError::validation("投注金额必须大于 0"));
        }

        let tx = self.rb.acquire_begin().await?;
        let mut tx = tx.defer_async(|mut tx| async move {
            if !tx.done {
                let _ = tx.rollback().await;
                log::warn!("投注结算事务回滚");
            }
        });

        // 游戏与租户开通
        let game_row = AppGame::select_by_code(&tx, game.code())
            .await?
            .filter(|g| g.is_active.unwrap_or(false))
            .ok_or(AppError::GameNotEnabled)?;
        let game_id = game_row.id.unwrap_or_default();
        let tenant_game = AppTenantGame::select_by_tenant_game(&tx, tenant_id, game_id)
            .await?
            .filter(|tg| tg.is_enabled.unwrap_or(false))
            .ok_or(AppError::GameNotEnabled)?;

        // 前置检查顺序固定: 会话 -> 限额 -> 守卫, 拒绝时零副作用
        let (min, max) = effective_bounds(&game_row, &tenant_game);
        let session = validate_round_context(
            AppGameSession::select_active(&tx, player_id, tenant_id, game_id).await?,
            stake,
            min,
            max,
        )?;
        let session_id = session.id.unwrap_or_default();

        self.guard.enforce_bet_allowed(player_id, stake, now).await?;

        // 现金钱包加锁
        let mut wallet =
            LedgerService::lock_wallet_by_kind(&tx, player_id, tenant_id, WalletKind::Cash).await?;
        if wallet.balance < stake {
            return Err(AppError::InsufficientFunds);
        }

        let db_now = time_util::to_db_time(now);

        // 开回合: 回合号在会话内单调递增
        let v = Executor::query(
            &tx,
            "select count(1) from app_game_round where session_id = ?",
            vec![rbs::value!(session_id)],
        )
        .await?;
        let round_count: i64 = rbatis::decode(v)?;
        let mut round = AppGameRound {
            id: None,
            session_id,
            round_number: round_count + 1,
            outcome: None,
            started_at: Some(db_now.clone()),
            ended_at: None,
        };
        let res = AppGameRound::insert(&tx, &round).await?;
        round.id = res.last_insert_id.as_i64();
        let round_id = round.id.unwrap_or_default();

        // 注单
        let mut bet = AppBet {
            id: None,
            round_id,
            wallet_id: wallet.id.unwrap_or_default(),
            bet_currency_id: wallet.currency_id,
            bet_amount: stake,
            win_amount: None,
            bet_status: BetStatus::Placed.code().to_string(),
            placed_at: Some(db_now.clone()),
            settled_at: None,
        };
        let res = AppBet::insert(&tx, &bet).await?;
        bet.id = res.last_insert_id.as_i64();
        let bet_id = bet.id.unwrap_or_default();

        // 账变: 投注扣款, 中奖另记一笔派彩
        LedgerService::apply_movement(
            &tx,
            &mut wallet,
            MovementReq::new(TransactionCode::Bet, -stake, LedgerRef::Bet(bet_id))
                .remark(format!("{} 第 {} 回合", game.code(), round.round_number)),
            &db_now,
        )
        .await?;

        let win_amount = if draw.win { payout(stake) } else { Decimal::ZERO };
        if draw.win {
            LedgerService::apply_movement(
                &tx,
                &mut wallet,
                MovementReq::new(TransactionCode::Win, win_amount, LedgerRef::Bet(bet_id))
                    .remark(format!("{} 派彩", game.code())),
                &db_now,
            )
            .await?;
        }

        // 流水进度
        self.bonus
            .update_wagering_progress(&tx, player_id, stake, now)
            .await?;

        // 封盘: 回合与注单终态
        round.outcome = Some(draw.outcome.clone());
        round.ended_at = Some(db_now.clone());
        AppGameRound::update_by_map(&tx, &round, rbs::value! { "id": round.id }).await?;

        bet.win_amount = Some(win_amount);
        bet.bet_status = BetStatus::Settled.code().to_string();
        bet.settled_at = Some(db_now);
        AppBet::update_by_map(&tx, &bet, rbs::value! { "id": bet.id }).await?;

        tx.commit().await?;

        log::info!(
            "🎲 玩家 {} {} 回合 {} 结算: {} 注 {} {}",
            player_id,
            game.code(),
            round.round_number,
            draw.outcome,
            stake,
            if draw.win { "中奖" } else { "未中" }
        );

        Ok(BetOutcome {
            bet_id,
            round_id,
            round_number: round.round_number,
            outcome: draw.outcome,
            win: draw.win,
            bet_amount: stake,
            win_amount,
            balance: wallet.balance,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn game(min: &str, max: &str) -> AppGame {
        AppGame {
            id: Some(1),
            game_code: "COIN_TOSS".into(),
            game_name: None,
            min_bet: dec(min),
            max_bet: dec(max),
            is_active: Some(true),
        }
    }

    fn tenant_game(min: Option<&str>, max: Option<&str>) -> AppTenantGame {
        AppTenantGame {
            id: Some(1),
            tenant_id: 1,
            game_id: 1,
            is_enabled: Some(true),
            min_bet_override: min.map(dec),
            max_bet_override: max.map(dec),
        }
    }

    #[test]
    fn tenant_override_takes_precedence() {
        let g = game("1", "100");
        assert_eq!(effective_bounds(&g, &tenant_game(None, None)), (dec("1"), dec("100")));
        assert_eq!(
            effective_bounds(&g, &tenant_game(Some("5"), None)),
            (dec("5"), dec("100"))
        );
        assert_eq!(
            effective_bounds(&g, &tenant_game(Some("5"), Some("50"))),
            (dec("5"), dec("50"))
        );
    }

    #[test]
    fn stake_bounds_are_inclusive() {
        assert!(validate_stake(dec("1"), dec("1"), dec("100")).is_ok());
        assert!(validate_stake(dec("100"), dec("1"), dec("100")).is_ok());
        assert!(matches!(
            validate_stake(dec("0.99"), dec("1"), dec("100")),
            Err(AppError::BetOutOfBounds(_))
        ));
        assert!(matches!(
            validate_stake(dec("100.01"), dec("1"), dec("100")),
            Err(AppError::BetOutOfBounds(_))
        ));
    }

    #[test]
    fn payout_is_exactly_double() {
        assert_eq!(payout(dec("40")), dec("80"));
        assert_eq!(payout(dec("0.50")), dec("1.00"));
    }

    fn session() -> AppGameSession {
        AppGameSession {
            id: Some(7),
            player_id: 9,
            tenant_id: 1,
            game_id: 1,
            status: "active".into(),
            started_at: None,
            ended_at: None,
            ip_address: None,
            device_info: None,
        }
    }

    #[test]
    fn missing_session_wins_over_bounds() {
        // 无会话时必须报 NoActiveSession, 哪怕注额同时越界
        assert!(matches!(
            validate_round_context(None, dec("999"), dec("1"), dec("100")),
            Err(AppError::NoActiveSession)
        ));
        // 有会话才轮到限额检查
        assert!(matches!(
            validate_round_context(Some(session()), dec("999"), dec("1"), dec("100")),
            Err(AppError::BetOutOfBounds(_))
        ));
        let s = validate_round_context(Some(session()), dec("50"), dec("1"), dec("100")).unwrap();
        assert_eq!(s.id, Some(7));
    }

    #[test]
    fn scenario_loss_and_win_amounts() {
        // 100 余额押 40: 输局只有一笔 -40, 终值 60; 赢局 -40 后 +80, 终值 140
        let start = dec("100");
        let stake = dec("40");

        let after_loss = start - stake;
        assert_eq!(after_loss, dec("60"));

        let after_win = start - stake + payout(stake);
        assert_eq!(after_win, dec("140"));
    }
}
