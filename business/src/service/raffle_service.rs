use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::enums::status::{JackpotStatus, JackpotType};
use common::enums::TransactionCode;
use common::error::AppError;
use common::services::ledger_service::{LedgerRef, LedgerService, MovementReq};
use common::utils::time_util;
use orm::entities::{AppRaffleEntry, AppRaffleJackpot};
use rand::Rng;
use rbatis::executor::Executor;
use rbatis::RBatis;
use rust_decimal::Decimal;
use serde::Serialize;

use crate::service::notification_service::NotificationService;

/// 带参与人数的奖池视图
#[derive(Debug, Clone, Serialize)]
pub struct JackpotView {
    #[serde(flatten)]
    pub jackpot: AppRaffleJackpot,
    pub participant_count: i64,
}

fn jackpot_type_of(jackpot: &AppRaffleJackpot) -> Result<JackpotType, AppError> {
    JackpotType::from_code(&jackpot.jackpot_type)
        .ok_or_else(|| AppError::internal(format!("奖池类型非法: {}", jackpot.jackpot_type)))
}

/// 入场准入: 活动中, 且 (到时型) 未到开奖时刻 / (达标型) 未达标
pub fn join_allowed(jackpot: &AppRaffleJackpot, now: DateTime<Utc>) -> Result<(), AppError> {
    if jackpot.status != JackpotStatus::Active.code() {
        return Err(AppError::JackpotNotActive);
    }
    match jackpot_type_of(jackpot)? {
        JackpotType::Manual => Ok(()),
        JackpotType::TimeBased => match &jackpot.draw_at {
            Some(at) if now < time_util::from_db_time(at) => Ok(()),
            _ => Err(AppError::JackpotNotActive),
        },
        JackpotType::Threshold => match jackpot.target_amount {
            Some(target) if jackpot.current_amount < target => Ok(()),
            _ => Err(AppError::JackpotNotActive),
        },
    }
}

/// 开奖准入: 入场条件的镜像
pub fn draw_ready(jackpot: &AppRaffleJackpot, now: DateTime<Utc>) -> Result<(), AppError> {
    if jackpot.status != JackpotStatus::Active.code() {
        return Err(AppError::JackpotNotActive);
    }
    match jackpot_type_of(jackpot)? {
        JackpotType::Manual => Ok(()),
        JackpotType::TimeBased => match &jackpot.draw_at {
            Some(at) if now >= time_util::from_db_time(at) => Ok(()),
            _ => Err(AppError::JackpotNotActive),
        },
        JackpotType::Threshold => match jackpot.target_amount {
            Some(target) if jackpot.current_amount >= target => Ok(()),
            _ => Err(AppError::JackpotNotActive),
        },
    }
}

/// 在进程内均匀抽取中奖入场记录
pub fn pick_winner<'a, R: Rng>(
    entries: &'a [AppRaffleEntry],
    rng: &mut R,
) -> Option<&'a AppRaffleEntry> {
    if entries.is_empty() {
        return None;
    }
    Some(&entries[rng.gen_range(0..entries.len())])
}

/// 抽奖奖池引擎
pub struct RaffleService {
    rb: Arc<RBatis>,
    notifier: Arc<NotificationService>,
}

impl RaffleService {
    pub fn new(rb: Arc<RBatis>, notifier: Arc<NotificationService>) -> Self {
        Self { rb, notifier }
    }

    /// 创建奖池 (后台), 池初值为种子金额
    pub async fn create_jackpot(
        &self,
        mut jackpot: AppRaffleJackpot,
        now: DateTime<Utc>,
    ) -> Result<AppRaffleJackpot, AppError> {
        let kind = jackpot_type_of(&jackpot)?;
        if jackpot.entry_fee <= Decimal::ZERO {
            return Err(AppError::validation("入场费必须大于 0"));
        }
        if kind == JackpotType::TimeBased && jackpot.draw_at.is_none() {
            return Err(AppError::validation("到时型奖池必须设置开奖时间"));
        }
        if kind == JackpotType::Threshold && jackpot.target_amount.is_none() {
            return Err(AppError::validation("达标型奖池必须设置目标金额"));
        }

        jackpot.current_amount = jackpot.seed_amount;
        jackpot.status = JackpotStatus::Active.code().to_string();
        jackpot.winner_id = None;
        jackpot.won_amount = None;
        jackpot.drawn_at = None;
        jackpot.created_at = Some(time_util::to_db_time(now));

        let res = AppRaffleJackpot::insert(self.rb.as_ref(), &jackpot).await?;
        jackpot.id = res.last_insert_id.as_i64();
        Ok(jackpot)
    }

    /// 玩家入场
    pub async fn join(
        &self,
        player_id: i64,
        tenant_id: i64,
        jackpot_id: i64,
        now: DateTime<Utc>,
    ) -> Result<AppRaffleEntry, AppError> {
        let tx = self.rb.acquire_begin().await?;
        let mut tx = tx.defer_async(|mut tx| async move {
            if !tx.done {
                let _ = tx.rollback().await;
                log::warn!("抽奖入场事务回滚");
            }
        });

        // 先锁奖池, 再锁钱包
        let mut jackpot = AppRaffleJackpot::select_by_id_for_update(&tx, jackpot_id)
            .await?
            .filter(|j| j.tenant_id == tenant_id)
            .ok_or_else(|| AppError::not_found(format!("奖池不存在: {}", jackpot_id)))?;
        join_allowed(&jackpot, now)?;

        if AppRaffleEntry::select_by_jackpot_player(&tx, jackpot_id, player_id)
            .await?
            .is_some()
        {
            return Err(AppError::DuplicateEntry);
        }

        let mut wallet =
            LedgerService::lock_cash_wallet_by_currency(&tx, player_id, jackpot.currency_id)
                .await?;
        if wallet.balance < jackpot.entry_fee {
            return Err(AppError::InsufficientFunds);
        }

        let db_now = time_util::to_db_time(now);
        let mut entry = AppRaffleEntry {
            id: None,
            jackpot_id,
            player_id,
            wallet_id: wallet.id.unwrap_or_default(),
            amount_paid: jackpot.entry_fee,
            created_at: Some(db_now.clone()),
        };
        let res = AppRaffleEntry::insert(&tx, &entry).await?;
        entry.id = res.last_insert_id.as_i64();

        LedgerService::apply_movement(
            &tx,
            &mut wallet,
            MovementReq::new(
                TransactionCode::JackpotEntry,
                -jackpot.entry_fee,
                LedgerRef::RaffleEntry(entry.id.unwrap_or_default()),
            )
            .remark(format!("入场: {}", jackpot.name)),
            &db_now,
        )
        .await?;

        jackpot.current_amount += jackpot.entry_fee;
        AppRaffleJackpot::update_by_map(&tx, &jackpot, rbs::value! { "id": jackpot.id }).await?;

        tx.commit().await?;
        log::info!("🎟️  玩家 {} 加入奖池 {} (池 {})", player_id, jackpot_id, jackpot.current_amount);
        Ok(entry)
    }

    /// 开奖: 全池派给均匀抽中的一名入场者
    pub async fn draw(
        &self,
        tenant_id: i64,
        jackpot_id: i64,
        now: DateTime<Utc>,
    ) -> Result<AppRaffleJackpot, AppError> {
        let winner_and_pool = {
            let tx = self.rb.acquire_begin().await?;
            let mut tx = tx.defer_async(|mut tx| async move {
                if !tx.done {
                    let _ = tx.rollback().await;
                    log::warn!("开奖事务回滚");
                }
            });

            let mut jackpot = AppRaffleJackpot::select_by_id_for_update(&tx, jackpot_id)
                .await?
                .filter(|j| j.tenant_id == tenant_id)
                .ok_or_else(|| AppError::not_found(format!("奖池不存在: {}", jackpot_id)))?;
            draw_ready(&jackpot, now)?;

            let entries = AppRaffleEntry::select_by_jackpot(&tx, jackpot_id).await?;
            let db_now = time_util::to_db_time(now);

            if entries.is_empty() {
                // 无人参与: 奖池作废
                jackpot.status = JackpotStatus::Cancelled.code().to_string();
                AppRaffleJackpot::update_by_map(&tx, &jackpot, rbs::value! { "id": jackpot.id })
                    .await?;
                tx.commit().await?;
                return Err(AppError::NoParticipants);
            }

            let winner = pick_winner(&entries, &mut rand::thread_rng())
                .cloned()
                .ok_or(AppError::NoParticipants)?;
            let pool = jackpot.current_amount;

            let mut wallet = LedgerService::lock_cash_wallet_by_currency(
                &tx,
                winner.player_id,
                jackpot.currency_id,
            )
            .await?;
            LedgerService::apply_movement(
                &tx,
                &mut wallet,
                MovementReq::new(
                    TransactionCode::JackpotWin,
                    pool,
                    LedgerRef::RaffleJackpot(jackpot_id),
                )
                .remark(format!("中奖: {}", jackpot.name)),
                &db_now,
            )
            .await?;

            jackpot.status = JackpotStatus::Completed.code().to_string();
            jackpot.winner_id = Some(winner.player_id);
            jackpot.won_amount = Some(pool);
            jackpot.drawn_at = Some(db_now);
            AppRaffleJackpot::update_by_map(&tx, &jackpot, rbs::value! { "id": jackpot.id })
                .await?;

            tx.commit().await?;
            log::info!(
                "🎉 奖池 {} 开奖: 玩家 {} 赢得 {}",
                jackpot_id,
                winner.player_id,
                pool
            );
            (jackpot, winner, entries)
        };

        let (jackpot, winner, entries) = winner_and_pool;

        // 提交后通知中奖者与其他参与者
        self.notifier
            .notify(
                winner.player_id,
                "恭喜中奖",
                format!(
                    "您在奖池「{}」中赢得 {}",
                    jackpot.name,
                    jackpot.won_amount.unwrap_or_default()
                ),
                Some("raffle".into()),
            )
            .await;
        for entry in entries.iter().filter(|e| e.player_id != winner.player_id) {
            self.notifier
                .notify(
                    entry.player_id,
                    "开奖结果",
                    format!("奖池「{}」已开奖, 感谢参与", jackpot.name),
                    Some("raffle".into()),
                )
                .await;
        }

        Ok(jackpot)
    }

    /// 取消奖池: 逐笔按原额退还入场费
    pub async fn cancel(
        &self,
        tenant_id: i64,
        jackpot_id: i64,
        now: DateTime<Utc>,
    ) -> Result<AppRaffleJackpot, AppError> {
        let tx = self.rb.acquire_begin().await?;
        let mut tx = tx.defer_async(|mut tx| async move {
            if !tx.done {
                let _ = tx.rollback().await;
                log::warn!("奖池取消事务回滚");
            }
        });

        let mut jackpot = AppRaffleJackpot::select_by_id_for_update(&tx, jackpot_id)
            .await?
            .filter(|j| j.tenant_id == tenant_id)
            .ok_or_else(|| AppError::not_found(format!("奖池不存在: {}", jackpot_id)))?;
        if jackpot.status != JackpotStatus::Active.code() {
            return Err(AppError::JackpotNotActive);
        }

        let entries = AppRaffleEntry::select_by_jackpot(&tx, jackpot_id).await?;
        let db_now = time_util::to_db_time(now);

        for entry in &entries {
            let mut wallet = LedgerService::lock_wallet(&tx, entry.wallet_id).await?;
            LedgerService::apply_movement(
                &tx,
                &mut wallet,
                MovementReq::new(
                    TransactionCode::JackpotRefund,
                    entry.amount_paid,
                    LedgerRef::RaffleEntry(entry.id.unwrap_or_default()),
                )
                .remark(format!("奖池取消退款: {}", jackpot.name)),
                &db_now,
            )
            .await?;
        }

        jackpot.status = JackpotStatus::Cancelled.code().to_string();
        AppRaffleJackpot::update_by_map(&tx, &jackpot, rbs::value! { "id": jackpot.id }).await?;

        tx.commit().await?;
        log::info!("🛑 奖池 {} 已取消, 退款 {} 笔", jackpot_id, entries.len());
        Ok(jackpot)
    }

    /// 奖池列表 (带参与人数); active_only 控制玩家侧/后台侧视图
    pub async fn list_jackpots(
        &self,
        tenant_id: i64,
        active_only: bool,
    ) -> Result<Vec<JackpotView>, AppError> {
        let jackpots = if active_only {
            AppRaffleJackpot::select_active_by_tenant(self.rb.as_ref(), tenant_id).await?
        } else {
            AppRaffleJackpot::select_by_tenant(self.rb.as_ref(), tenant_id).await?
        };

        let mut views = Vec::with_capacity(jackpots.len());
        for jackpot in jackpots {
            let v = Executor::query(
                self.rb.as_ref(),
                "select count(1) from app_raffle_entry where jackpot_id = ?",
                vec![rbs::value!(jackpot.id)],
            )
            .await?;
            let participant_count: i64 = rbatis::decode(v)?;
            views.push(JackpotView {
                jackpot,
                participant_count,
            });
        }
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn jackpot(kind: JackpotType) -> AppRaffleJackpot {
        AppRaffleJackpot {
            id: Some(1),
            tenant_id: 1,
            currency_id: 1,
            name: "weekly".into(),
            description: None,
            jackpot_type: kind.code().to_string(),
            seed_amount: dec("100"),
            current_amount: dec("100"),
            entry_fee: dec("10"),
            draw_at: None,
            target_amount: None,
            status: JackpotStatus::Active.code().to_string(),
            winner_id: None,
            won_amount: None,
            drawn_at: None,
            created_at: None,
        }
    }

    fn entry(id: i64, player_id: i64) -> AppRaffleEntry {
        AppRaffleEntry {
            id: Some(id),
            jackpot_id: 1,
            player_id,
            wallet_id: player_id * 10,
            amount_paid: dec("10"),
            created_at: None,
        }
    }

    #[test]
    fn manual_jackpot_joins_and_draws_any_time() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let j = jackpot(JackpotType::Manual);
        assert!(join_allowed(&j, now).is_ok());
        assert!(draw_ready(&j, now).is_ok());
    }

    #[test]
    fn time_based_readiness_mirrors_join() {
        let draw_at = Utc.with_ymd_and_hms(2025, 6, 1, 12, 0, 0).unwrap();
        let mut j = jackpot(JackpotType::TimeBased);
        j.draw_at = Some(time_util::to_db_time(draw_at));

        let before = draw_at - chrono::Duration::hours(1);
        let after = draw_at + chrono::Duration::hours(1);
        assert!(join_allowed(&j, before).is_ok());
        assert!(draw_ready(&j, before).is_err());
        assert!(join_allowed(&j, after).is_err());
        assert!(draw_ready(&j, after).is_ok());
        // 临界点: 到点即可开奖, 不可再入场
        assert!(join_allowed(&j, draw_at).is_err());
        assert!(draw_ready(&j, draw_at).is_ok());
    }

    #[test]
    fn threshold_readiness_mirrors_join() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let mut j = jackpot(JackpotType::Threshold);
        j.target_amount = Some(dec("150"));

        j.current_amount = dec("140");
        assert!(join_allowed(&j, now).is_ok());
        assert!(draw_ready(&j, now).is_err());

        j.current_amount = dec("150");
        assert!(join_allowed(&j, now).is_err());
        assert!(draw_ready(&j, now).is_ok());
    }

    #[test]
    fn inactive_jackpot_rejects_everything() {
        let now = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let mut j = jackpot(JackpotType::Manual);
        j.status = JackpotStatus::Cancelled.code().to_string();
        assert!(matches!(join_allowed(&j, now), Err(AppError::JackpotNotActive)));
        assert!(matches!(draw_ready(&j, now), Err(AppError::JackpotNotActive)));
    }

    #[test]
    fn winner_pick_is_roughly_uniform() {
        let entries: Vec<AppRaffleEntry> = (1..=5).map(|i| entry(i, i)).collect();
        let mut rng = StdRng::seed_from_u64(99);
        let mut counts = [0u32; 5];
        let n = 50_000;
        for _ in 0..n {
            let w = pick_winner(&entries, &mut rng).unwrap();
            counts[(w.player_id - 1) as usize] += 1;
        }
        // 每人期望 1 万次, 容忍 ±6%
        for c in counts {
            assert!((9_400..=10_600).contains(&c), "counts = {:?}", counts);
        }
    }

    #[test]
    fn empty_entries_have_no_winner() {
        let mut rng = StdRng::seed_from_u64(1);
        assert!(pick_winner(&[], &mut rng).is_none());
    }

    #[test]
    fn pool_accounting_sums_seed_and_fees() {
        // 种子 100, 三人各交 10, 池应为 130, 全额派给中奖者
        let mut j = jackpot(JackpotType::Manual);
        for _ in 0..3 {
            j.current_amount += j.entry_fee;
        }
        assert_eq!(j.current_amount, dec("130"));
    }
}
