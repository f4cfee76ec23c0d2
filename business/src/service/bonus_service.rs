use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::enums::status::BonusStatus;
use common::enums::TransactionCode;
use common::error::AppError;
use common::services::ledger_service::{AppWallet, LedgerRef, LedgerService, MovementReq};
use common::utils::time_util;
use common::WalletKind;
use orm::entities::{AppBonus, AppBonusUsage};
use rbatis::executor::RBatisTxExecutorGuard;
use rbatis::RBatis;
use rust_decimal::Decimal;

/// 活动有效期判断 (闭区间)
pub fn campaign_window_contains(bonus: &AppBonus, now: DateTime<Utc>) -> bool {
    let after_start = bonus
        .valid_from
        .as_ref()
        .map_or(true, |from| time_util::from_db_time(from) <= now);
    let before_end = bonus
        .valid_to
        .as_ref()
        .map_or(true, |to| now <= time_util::from_db_time(to));
    after_start && before_end
}

/// 累加流水后的新进度与状态
pub fn progress_after_stake(
    completed: Decimal,
    stake: Decimal,
    required: Decimal,
) -> (Decimal, BonusStatus) {
    let new_completed = completed + stake;
    if new_completed >= required {
        (new_completed, BonusStatus::Claimable)
    } else {
        (new_completed, BonusStatus::Active)
    }
}

/// 领取资格检查
pub fn ensure_claimable(status: &str) -> Result<(), AppError> {
    if status != BonusStatus::Claimable.code() {
        return Err(AppError::validation("奖金任务未达到可领取状态"));
    }
    Ok(())
}

/// 任务是否已过有效期
pub fn is_force_expired(usage: &AppBonusUsage, now: DateTime<Utc>) -> bool {
    usage
        .expired_at
        .as_ref()
        .map_or(false, |at| now > time_util::from_db_time(at))
}

/// 奖金流水任务服务
pub struct BonusService {
    rb: Arc<RBatis>,
}

impl BonusService {
    pub fn new(rb: Arc<RBatis>) -> Self {
        Self { rb }
    }

    /// 激活奖金活动
    ///
    /// 同一玩家最多一个进行中的任务; 激活即通过账本向奖金钱包入账
    pub async fn activate(
        &self,
        player_id: i64,
        bonus_id: i64,
        now: DateTime<Utc>,
    ) -> Result<AppBonusUsage, AppError> {
        let tx = self.rb.acquire_begin().await?;
        let mut tx = tx.defer_async(|mut tx| async move {
            if !tx.done {
                let _ = tx.rollback().await;
                log::warn!("奖金激活事务回滚");
            }
        });

        // 唯一性守卫, 加锁防并发双开
        if AppBonusUsage::select_open_by_player_for_update(&tx, player_id)
            .await?
            .is_some()
        {
            return Err(AppError::BonusAlreadyActive);
        }

        let bonus = AppBonus::select_by_id(&tx, bonus_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("奖金活动不存在: {}", bonus_id)))?;
        if !bonus.is_active.unwrap_or(false) || !campaign_window_contains(&bonus, now) {
            return Err(AppError::BonusExpiredOffer);
        }

        let mut wallet =
            LedgerService::lock_wallet_by_kind(&tx, player_id, bonus.tenant_id, WalletKind::Bonus)
                .await?;

        let db_now = time_util::to_db_time(now);
        let mut usage = AppBonusUsage {
            id: None,
            bonus_id,
            player_id,
            wallet_id: wallet.id.unwrap_or_default(),
            bonus_amount: bonus.bonus_amount,
            wagering_required: bonus.bonus_amount * bonus.wagering_multiplier,
            wagering_completed: Decimal::ZERO,
            status: BonusStatus::Active.code().to_string(),
            granted_at: Some(db_now.clone()),
            completed_at: None,
            expired_at: bonus.valid_to.clone(),
        };
        let res = AppBonusUsage::insert(&tx, &usage).await?;
        usage.id = res.last_insert_id.as_i64();

        let usage_id = usage.id.unwrap_or_default();
        LedgerService::apply_movement(
            &tx,
            &mut wallet,
            MovementReq::new(
                TransactionCode::BonusConversion,
                bonus.bonus_amount,
                LedgerRef::BonusUsage(usage_id),
            )
            .remark(format!("发放: {}", bonus.bonus_name)),
            &db_now,
        )
        .await?;

        tx.commit().await?;
        log::info!(
            "🎁 玩家 {} 激活奖金活动 {} (流水要求 {})",
            player_id,
            bonus_id,
            usage.wagering_required
        );
        Ok(usage)
    }

    /// 投注结算时推进流水进度 (由结算管线在其事务内调用)
    ///
    /// 过期检查先行: 任务已过期则先回收奖金并返回, 本次投注不计进度
    pub async fn update_wagering_progress(
        &self,
        tx: &RBatisTxExecutorGuard,
        player_id: i64,
        stake: Decimal,
        now: DateTime<Utc>,
    ) -> Result<(), AppError> {
        let Some(mut usage) = AppBonusUsage::select_active_by_player_for_update(tx, player_id).await?
        else {
            return Ok(());
        };

        let db_now = time_util::to_db_time(now);

        if is_force_expired(&usage, now) {
            self.reverse_grant(tx, &mut usage, BonusStatus::Expired, &db_now)
                .await?;
            log::info!("⏰ 玩家 {} 的奖金任务 {:?} 已过期回收", player_id, usage.id);
            return Ok(());
        }

        let (completed, status) =
            progress_after_stake(usage.wagering_completed, stake, usage.wagering_required);
        usage.wagering_completed = completed;
        usage.status = status.code().to_string();
        AppBonusUsage::update_by_map(tx, &usage, rbs::value! { "id": usage.id }).await?;
        Ok(())
    }

    /// 领取已达标的奖金: 奖金钱包转出, 现金钱包转入, 同一事务两笔账变
    pub async fn claim(
        &self,
        player_id: i64,
        usage_id: i64,
        now: DateTime<Utc>,
    ) -> Result<AppBonusUsage, AppError> {
        let tx = self.rb.acquire_begin().await?;
        let mut tx = tx.defer_async(|mut tx| async move {
            if !tx.done {
                let _ = tx.rollback().await;
                log::warn!("奖金领取事务回滚");
            }
        });

        // 预读任务与奖金钱包 (不加锁), 确定租户后按锁序加锁
        let preview = AppBonusUsage::select_by_id(&tx, usage_id)
            .await?
            .filter(|u| u.player_id == player_id)
            .ok_or_else(|| AppError::not_found(format!("奖金任务不存在: {}", usage_id)))?;
        ensure_claimable(&preview.status)?;
        let tenant_id = AppWallet::select_by_id(&tx, preview.wallet_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("钱包不存在: {}", preview.wallet_id)))?
            .tenant_id;

        // 锁序与结算管线一致: 现金钱包 -> 任务行 -> 奖金钱包
        let mut cash_wallet =
            LedgerService::lock_wallet_by_kind(&tx, player_id, tenant_id, WalletKind::Cash).await?;
        let mut usage = AppBonusUsage::select_by_id_for_update(&tx, usage_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("奖金任务不存在: {}", usage_id)))?;
        // 锁下复核, 避免预读与加锁之间状态被并发结算改掉
        ensure_claimable(&usage.status)?;
        let mut bonus_wallet = LedgerService::lock_wallet(&tx, usage.wallet_id).await?;

        let db_now = time_util::to_db_time(now);
        LedgerService::apply_movement(
            &tx,
            &mut bonus_wallet,
            MovementReq::new(
                TransactionCode::BonusConversion,
                -usage.bonus_amount,
                LedgerRef::BonusUsage(usage_id),
            )
            .remark("领取转出"),
            &db_now,
        )
        .await?;

        LedgerService::apply_movement(
            &tx,
            &mut cash_wallet,
            MovementReq::new(
                TransactionCode::BonusConversion,
                usage.bonus_amount,
                LedgerRef::BonusUsage(usage_id),
            )
            .remark("领取转入"),
            &db_now,
        )
        .await?;

        usage.status = BonusStatus::Completed.code().to_string();
        usage.completed_at = Some(db_now);
        AppBonusUsage::update_by_map(&tx, &usage, rbs::value! { "id": usage.id }).await?;

        tx.commit().await?;
        log::info!("💰 玩家 {} 领取奖金 {} 完成", player_id, usage.bonus_amount);
        Ok(usage)
    }

    /// 取消进行中的奖金任务, 回收奖金, 无现金转换
    pub async fn cancel(
        &self,
        player_id: i64,
        usage_id: i64,
        now: DateTime<Utc>,
    ) -> Result<AppBonusUsage, AppError> {
        let tx = self.rb.acquire_begin().await?;
        let mut tx = tx.defer_async(|mut tx| async move {
            if !tx.done {
                let _ = tx.rollback().await;
                log::warn!("奖金取消事务回滚");
            }
        });

        let mut usage = AppBonusUsage::select_by_id_for_update(&tx, usage_id)
            .await?
            .filter(|u| u.player_id == player_id)
            .ok_or_else(|| AppError::not_found(format!("奖金任务不存在: {}", usage_id)))?;
        let status = BonusStatus::from_code(&usage.status);
        if !status.map_or(false, |s| s.is_open()) {
            return Err(AppError::validation("奖金任务已终结, 无法取消"));
        }

        let db_now = time_util::to_db_time(now);
        self.reverse_grant(&tx, &mut usage, BonusStatus::Cancelled, &db_now)
            .await?;

        tx.commit().await?;
        Ok(usage)
    }

    /// 回收奖金并终结任务 (过期/取消共用)
    async fn reverse_grant(
        &self,
        tx: &RBatisTxExecutorGuard,
        usage: &mut AppBonusUsage,
        final_status: BonusStatus,
        db_now: &rbatis::rbdc::datetime::DateTime,
    ) -> Result<(), AppError> {
        let mut wallet = LedgerService::lock_wallet(tx, usage.wallet_id).await?;
        LedgerService::apply_movement(
            tx,
            &mut wallet,
            MovementReq::new(
                TransactionCode::BonusConversion,
                -usage.bonus_amount,
                LedgerRef::BonusUsage(usage.id.unwrap_or_default()),
            )
            .remark(format!("回收: {}", final_status.code())),
            db_now,
        )
        .await?;

        usage.status = final_status.code().to_string();
        if final_status == BonusStatus::Expired {
            usage.expired_at = Some(db_now.clone());
        }
        AppBonusUsage::update_by_map(tx, usage, rbs::value! { "id": usage.id }).await?;
        Ok(())
    }

    /// 玩家可参加的活动: 进行中, 在有效期内, 且还没领过
    pub async fn available_bonuses(
        &self,
        player_id: i64,
        tenant_id: i64,
        now: DateTime<Utc>,
    ) -> Result<Vec<AppBonus>, AppError> {
        let campaigns = AppBonus::select_active_by_tenant(self.rb.as_ref(), tenant_id).await?;
        let mut available = Vec::new();
        for bonus in campaigns {
            if !campaign_window_contains(&bonus, now) {
                continue;
            }
            let Some(bonus_id) = bonus.id else { continue };
            let taken =
                AppBonusUsage::select_by_player_bonus(self.rb.as_ref(), player_id, bonus_id)
                    .await?
                    .is_some();
            if !taken {
                available.push(bonus);
            }
        }
        Ok(available)
    }

    /// 玩家的任务列表
    pub async fn list_usages(&self, player_id: i64) -> Result<Vec<AppBonusUsage>, AppError> {
        Ok(AppBonusUsage::select_by_player(self.rb.as_ref(), player_id).await?)
    }

    /// 创建活动 (后台)
    pub async fn create_campaign(&self, mut bonus: AppBonus) -> Result<AppBonus, AppError> {
        if bonus.bonus_amount <= Decimal::ZERO {
            return Err(AppError::validation("奖金金额必须大于 0"));
        }
        if bonus.wagering_multiplier < Decimal::ZERO {
            return Err(AppError::validation("流水倍数不能为负"));
        }
        let res = AppBonus::insert(self.rb.as_ref(), &bonus).await?;
        bonus.id = res.last_insert_id.as_i64();
        Ok(bonus)
    }

    /// 惰性清理: 回收所有已过期但仍标记为 active 的任务
    pub async fn cleanup_expired(&self, now: DateTime<Utc>) -> Result<u64, AppError> {
        let db_now = time_util::to_db_time(now);
        let stale =
            AppBonusUsage::select_active_expired_before(self.rb.as_ref(), db_now.clone()).await?;
        let mut cleaned = 0u64;
        for usage in stale {
            let tx = self.rb.acquire_begin().await?;
            let mut tx = tx.defer_async(|mut tx| async move {
                if !tx.done {
                    let _ = tx.rollback().await;
                }
            });
            // 重新加锁确认, 避免与结算路径的过期处理撞车
            let Some(mut current) =
                AppBonusUsage::select_by_id_for_update(&tx, usage.id.unwrap_or_default()).await?
            else {
                continue;
            };
            if current.status != BonusStatus::Active.code() {
                continue;
            }
            self.reverse_grant(&tx, &mut current, BonusStatus::Expired, &db_now)
                .await?;
            tx.commit().await?;
            cleaned += 1;
        }
        if cleaned > 0 {
            log::info!("🧹 过期奖金任务清理完成: {} 条", cleaned);
        }
        Ok(cleaned)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    fn usage(expired_at: Option<DateTime<Utc>>) -> AppBonusUsage {
        AppBonusUsage {
            id: Some(1),
            bonus_id: 1,
            player_id: 9,
            wallet_id: 2,
            bonus_amount: dec("50"),
            wagering_required: dec("500"),
            wagering_completed: Decimal::ZERO,
            status: BonusStatus::Active.code().to_string(),
            granted_at: None,
            completed_at: None,
            expired_at: expired_at.map(time_util::to_db_time),
        }
    }

    #[test]
    fn progress_flips_to_claimable_at_threshold() {
        let (c, s) = progress_after_stake(dec("460"), dec("30"), dec("500"));
        assert_eq!(c, dec("490"));
        assert_eq!(s, BonusStatus::Active);

        let (c, s) = progress_after_stake(dec("490"), dec("10"), dec("500"));
        assert_eq!(c, dec("500"));
        assert_eq!(s, BonusStatus::Claimable);

        let (c, s) = progress_after_stake(dec("490"), dec("40"), dec("500"));
        assert_eq!(c, dec("530"));
        assert_eq!(s, BonusStatus::Claimable);
    }

    #[test]
    fn only_claimable_tasks_pass_claim_check() {
        assert!(ensure_claimable(BonusStatus::Claimable.code()).is_ok());
        for status in [
            BonusStatus::Active,
            BonusStatus::Completed,
            BonusStatus::Expired,
            BonusStatus::Cancelled,
        ] {
            assert!(ensure_claimable(status.code()).is_err(), "{:?}", status);
        }
    }

    #[test]
    fn force_expiry_check() {
        use chrono::TimeZone;
        let deadline = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let u = usage(Some(deadline));
        assert!(!is_force_expired(&u, deadline));
        assert!(is_force_expired(
            &u,
            deadline + chrono::Duration::seconds(1)
        ));
        assert!(!is_force_expired(&usage(None), deadline));
    }

    #[test]
    fn campaign_window_is_inclusive() {
        use chrono::TimeZone;
        let from = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        let to = Utc.with_ymd_and_hms(2025, 2, 1, 0, 0, 0).unwrap();
        let bonus = AppBonus {
            id: Some(1),
            tenant_id: 1,
            bonus_name: "welcome".into(),
            bonus_type: None,
            bonus_amount: dec("50"),
            wagering_multiplier: dec("10"),
            valid_from: Some(time_util::to_db_time(from)),
            valid_to: Some(time_util::to_db_time(to)),
            is_active: Some(true),
        };
        assert!(campaign_window_contains(&bonus, from));
        assert!(campaign_window_contains(&bonus, to));
        assert!(!campaign_window_contains(
            &bonus,
            to + chrono::Duration::seconds(1)
        ));
        assert!(!campaign_window_contains(
            &bonus,
            from - chrono::Duration::seconds(1)
        ));
    }
}
