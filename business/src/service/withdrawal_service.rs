use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::enums::status::{KycStatus, WithdrawalAction, WithdrawalStatus};
use common::enums::TransactionCode;
use common::error::AppError;
use common::services::ledger_service::{LedgerRef, LedgerService, MovementReq};
use common::utils::time_util;
use common::WalletKind;
use orm::entities::{AppPlayer, AppWithdrawal};
use rbatis::RBatis;
use rust_decimal::Decimal;

use crate::service::notification_service::NotificationService;

/// KYC 硬闸门: rejected / expired 直接拒绝
pub fn check_kyc_gate(kyc_status: Option<&str>) -> Result<Option<KycStatus>, AppError> {
    let status = kyc_status.and_then(KycStatus::from_code);
    if let Some(s) = status {
        if s.blocks_withdrawal() {
            return Err(AppError::KycBlocked(s.code().to_string()));
        }
    }
    Ok(status)
}

/// 初始状态: KYC 已通过走 requested, 其余待审
pub fn initial_status(kyc: Option<KycStatus>) -> WithdrawalStatus {
    match kyc {
        Some(KycStatus::Verified) => WithdrawalStatus::Requested,
        _ => WithdrawalStatus::KycPending,
    }
}

/// 申请时的托管扣款
pub fn escrow_movement(withdrawal_id: i64, amount: Decimal) -> MovementReq {
    MovementReq::new(
        TransactionCode::Withdrawal,
        -amount,
        LedgerRef::Withdrawal(withdrawal_id),
    )
    .remark("提现托管")
}

/// 驳回冲正, 与托管扣款等额反向
pub fn refund_movement(withdrawal_id: i64, amount: Decimal) -> MovementReq {
    MovementReq::new(
        TransactionCode::WithdrawalRefund,
        amount,
        LedgerRef::Withdrawal(withdrawal_id),
    )
    .remark("提现驳回返还")
}

/// 提现状态机, 非法流转报错并点名当前/目标状态
pub fn transition(
    current: WithdrawalStatus,
    action: WithdrawalAction,
) -> Result<WithdrawalStatus, AppError> {
    use WithdrawalAction as A;
    use WithdrawalStatus as S;
    let next = match (current, action) {
        (S::Requested | S::KycPending, A::Approve) => S::Approved,
        (S::Approved, A::Process) => S::Processing,
        (S::Processing, A::Complete) => S::Completed,
        (S::Requested | S::KycPending | S::Approved, A::Reject) => S::Rejected,
        _ => {
            return Err(AppError::InvalidWithdrawalState {
                current: current.code().to_string(),
                requested: action.code().to_string(),
            })
        }
    };
    Ok(next)
}

/// 提现生命周期服务
///
/// 申请即托管: 资金在申请时刻离开现金钱包, 驳回时按原额冲正
pub struct WithdrawalService {
    rb: Arc<RBatis>,
    notifier: Arc<NotificationService>,
}

impl WithdrawalService {
    pub fn new(rb: Arc<RBatis>, notifier: Arc<NotificationService>) -> Self {
        Self { rb, notifier }
    }

    pub async fn request(
        &self,
        player_id: i64,
        tenant_id: i64,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<AppWithdrawal, AppError> {
        if amount <= Decimal::ZERO {
            return Err(AppError::validation("提现金额必须大于 0"));
        }

        let tx = self.rb.acquire_begin().await?;
        let mut tx = tx.defer_async(|mut tx| async move {
            if !tx.done {
                let _ = tx.rollback().await;
                log::warn!("提现申请事务回滚");
            }
        });

        let player = AppPlayer::select_by_id(&tx, player_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("玩家不存在: {}", player_id)))?;
        let kyc = check_kyc_gate(player.kyc_status.as_deref())?;

        let mut wallet =
            LedgerService::lock_wallet_by_kind(&tx, player_id, tenant_id, WalletKind::Cash).await?;
        if wallet.balance < amount {
            return Err(AppError::InsufficientFunds);
        }

        let db_now = time_util::to_db_time(now);
        let mut withdrawal = AppWithdrawal {
            id: None,
            player_id,
            tenant_id,
            wallet_id: wallet.id.unwrap_or_default(),
            currency_id: wallet.currency_id,
            amount,
            status: initial_status(kyc).code().to_string(),
            requested_at: Some(db_now.clone()),
            processed_at: None,
            gateway_reference: None,
            rejection_reason: None,
        };
        let res = AppWithdrawal::insert(&tx, &withdrawal).await?;
        withdrawal.id = res.last_insert_id.as_i64();
        let withdrawal_id = withdrawal.id.unwrap_or_default();

        // 托管扣款
        LedgerService::apply_movement(&tx, &mut wallet, escrow_movement(withdrawal_id, amount), &db_now)
            .await?;

        tx.commit().await?;
        log::info!(
            "💸 玩家 {} 提现申请 {} 金额 {} 状态 {}",
            player_id,
            withdrawal_id,
            amount,
            withdrawal.status
        );
        Ok(withdrawal)
    }

    /// 后台操作: approve / process / complete / reject
    pub async fn admin_process(
        &self,
        withdrawal_id: i64,
        action: WithdrawalAction,
        gateway_reference: Option<String>,
        rejection_reason: Option<String>,
        now: DateTime<Utc>,
    ) -> Result<AppWithdrawal, AppError> {
        if action == WithdrawalAction::Complete && gateway_reference.is_none() {
            return Err(AppError::validation("完成提现必须提供支付网关流水号"));
        }
        if action == WithdrawalAction::Reject && rejection_reason.is_none() {
            return Err(AppError::validation("驳回提现必须说明原因"));
        }

        let tx = self.rb.acquire_begin().await?;
        let mut tx = tx.defer_async(|mut tx| async move {
            if !tx.done {
                let _ = tx.rollback().await;
                log::warn!("提现处理事务回滚");
            }
        });

        // 先锁单据, 再锁钱包
        let mut withdrawal = AppWithdrawal::select_by_id_for_update(&tx, withdrawal_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("提现单不存在: {}", withdrawal_id)))?;
        let current = WithdrawalStatus::from_code(&withdrawal.status).ok_or_else(|| {
            AppError::internal(format!("提现单状态非法: {}", withdrawal.status))
        })?;
        let next = transition(current, action)?;

        let db_now = time_util::to_db_time(now);

        if next == WithdrawalStatus::Rejected {
            // 补偿冲正: 托管金额原路退回
            let mut wallet = LedgerService::lock_wallet(&tx, withdrawal.wallet_id).await?;
            LedgerService::apply_movement(
                &tx,
                &mut wallet,
                refund_movement(withdrawal_id, withdrawal.amount),
                &db_now,
            )
            .await?;
            withdrawal.rejection_reason = rejection_reason;
        }
        if next == WithdrawalStatus::Completed {
            withdrawal.gateway_reference = gateway_reference;
        }

        withdrawal.status = next.code().to_string();
        withdrawal.processed_at = Some(db_now);
        AppWithdrawal::update_by_map(&tx, &withdrawal, rbs::value! { "id": withdrawal.id })
            .await?;

        tx.commit().await?;
        log::info!(
            "🏦 提现单 {} {} -> {}",
            withdrawal_id,
            current.code(),
            next.code()
        );

        // 事务提交后再通知, 尽力而为
        match next {
            WithdrawalStatus::Approved => {
                self.notifier
                    .notify(
                        withdrawal.player_id,
                        "提现已批准",
                        format!("您的提现申请 (金额 {}) 已批准", withdrawal.amount),
                        Some("withdrawal".into()),
                    )
                    .await;
            }
            WithdrawalStatus::Completed => {
                self.notifier
                    .notify(
                        withdrawal.player_id,
                        "提现已到账",
                        format!("您的提现 (金额 {}) 已处理完成", withdrawal.amount),
                        Some("withdrawal".into()),
                    )
                    .await;
            }
            WithdrawalStatus::Rejected => {
                self.notifier
                    .notify(
                        withdrawal.player_id,
                        "提现被驳回",
                        format!(
                            "您的提现申请 (金额 {}) 被驳回, 资金已退回钱包",
                            withdrawal.amount
                        ),
                        Some("withdrawal".into()),
                    )
                    .await;
            }
            _ => {}
        }

        Ok(withdrawal)
    }

    /// 玩家的提现记录
    pub async fn list_for_player(&self, player_id: i64) -> Result<Vec<AppWithdrawal>, AppError> {
        Ok(AppWithdrawal::select_by_player(self.rb.as_ref(), player_id).await?)
    }

    /// 后台按租户列出提现单, 可按状态过滤
    pub async fn list_for_tenant(
        &self,
        tenant_id: i64,
        status: Option<WithdrawalStatus>,
    ) -> Result<Vec<AppWithdrawal>, AppError> {
        let rows = match status {
            Some(s) => {
                AppWithdrawal::select_by_tenant_status(self.rb.as_ref(), tenant_id, s.code())
                    .await?
            }
            None => AppWithdrawal::select_by_tenant(self.rb.as_ref(), tenant_id).await?,
        };
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn kyc_gate_blocks_rejected_and_expired() {
        assert!(matches!(
            check_kyc_gate(Some("rejected")),
            Err(AppError::KycBlocked(_))
        ));
        assert!(matches!(
            check_kyc_gate(Some("expired")),
            Err(AppError::KycBlocked(_))
        ));
        assert!(check_kyc_gate(Some("verified")).is_ok());
        assert!(check_kyc_gate(Some("pending")).is_ok());
        assert!(check_kyc_gate(None).is_ok());
    }

    #[test]
    fn initial_status_depends_on_kyc() {
        assert_eq!(
            initial_status(Some(KycStatus::Verified)),
            WithdrawalStatus::Requested
        );
        assert_eq!(
            initial_status(Some(KycStatus::Pending)),
            WithdrawalStatus::KycPending
        );
        assert_eq!(initial_status(None), WithdrawalStatus::KycPending);
    }

    #[test]
    fn rejection_refund_mirrors_escrow_debit() {
        // 驳回返还必须与托管扣款等额反向, 且指向同一张提现单
        let amount: Decimal = "75.50".parse().unwrap();
        let escrow = escrow_movement(42, amount);
        let refund = refund_movement(42, amount);

        assert_eq!(escrow.amount, -amount);
        assert_eq!(refund.amount, amount);
        assert_eq!(refund.amount, -escrow.amount);
        assert_eq!(escrow.reference, LedgerRef::Withdrawal(42));
        assert_eq!(refund.reference, LedgerRef::Withdrawal(42));
        assert_eq!(escrow.code, TransactionCode::Withdrawal);
        assert_eq!(refund.code, TransactionCode::WithdrawalRefund);
    }

    #[test]
    fn transition_table_is_exhaustive() {
        use WithdrawalAction as A;
        use WithdrawalStatus as S;

        // 合法流转
        assert_eq!(transition(S::Requested, A::Approve).unwrap(), S::Approved);
        assert_eq!(transition(S::KycPending, A::Approve).unwrap(), S::Approved);
        assert_eq!(transition(S::Approved, A::Process).unwrap(), S::Processing);
        assert_eq!(transition(S::Processing, A::Complete).unwrap(), S::Completed);
        assert_eq!(transition(S::Requested, A::Reject).unwrap(), S::Rejected);
        assert_eq!(transition(S::KycPending, A::Reject).unwrap(), S::Rejected);
        assert_eq!(transition(S::Approved, A::Reject).unwrap(), S::Rejected);

        // 其余所有组合都必须拒绝
        let legal = [
            (S::Requested, A::Approve),
            (S::KycPending, A::Approve),
            (S::Approved, A::Process),
            (S::Processing, A::Complete),
            (S::Requested, A::Reject),
            (S::KycPending, A::Reject),
            (S::Approved, A::Reject),
        ];
        for s in S::iter() {
            for a in A::iter() {
                if legal.contains(&(s, a)) {
                    continue;
                }
                match transition(s, a) {
                    Err(AppError::InvalidWithdrawalState { current, requested }) => {
                        assert_eq!(current, s.code());
                        assert_eq!(requested, a.code());
                    }
                    other => panic!("{:?} + {:?} 应当被拒绝, 实际 {:?}", s, a, other.ok()),
                }
            }
        }
    }
}
