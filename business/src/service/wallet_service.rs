use std::sync::Arc;

use chrono::{DateTime, Utc};
use common::enums::TransactionCode;
use common::error::AppError;
use common::services::ledger_service::{
    AppWallet, AppWalletTransaction, LedgerRef, LedgerService, MovementReq,
};
use common::utils::time_util;
use common::WalletKind;
use rbatis::executor::Executor;
use rbatis::RBatis;
use rust_decimal::Decimal;

/// 账变历史查询条件
#[derive(Debug, Clone, Default)]
pub struct TransactionQuery {
    pub from: Option<DateTime<Utc>>,
    pub to: Option<DateTime<Utc>>,
    pub transaction_code: Option<TransactionCode>,
    pub limit: Option<i64>,
}

/// 钱包读写服务 (充值入口 + 读投影)
pub struct WalletService {
    rb: Arc<RBatis>,
}

impl WalletService {
    pub fn new(rb: Arc<RBatis>) -> Self {
        Self { rb }
    }

    /// 玩家的全部在用钱包
    pub async fn get_wallets(&self, player_id: i64) -> Result<Vec<AppWallet>, AppError> {
        Ok(AppWallet::select_active_by_player(self.rb.as_ref(), player_id).await?)
    }

    /// 充值: 现金钱包入账
    pub async fn deposit(
        &self,
        player_id: i64,
        tenant_id: i64,
        amount: Decimal,
        now: DateTime<Utc>,
    ) -> Result<AppWalletTransaction, AppError> {
        if amount <= Decimal::ZERO {
            return Err(AppError::validation("充值金额必须大于 0"));
        }

        let tx = self.rb.acquire_begin().await?;
        let mut tx = tx.defer_async(|mut tx| async move {
            if !tx.done {
                let _ = tx.rollback().await;
                log::warn!("充值事务回滚");
            }
        });

        let mut wallet =
            LedgerService::lock_wallet_by_kind(&tx, player_id, tenant_id, WalletKind::Cash).await?;
        let movement = LedgerService::apply_movement(
            &tx,
            &mut wallet,
            MovementReq::new(TransactionCode::Deposit, amount, LedgerRef::Deposit)
                .remark("充值"),
            &time_util::to_db_time(now),
        )
        .await?;

        tx.commit().await?;
        Ok(movement)
    }

    /// 账变历史, 支持时间窗与交易类型过滤
    pub async fn transactions(
        &self,
        player_id: i64,
        wallet_id: i64,
        query: TransactionQuery,
    ) -> Result<Vec<AppWalletTransaction>, AppError> {
        // 归属校验
        AppWallet::select_by_id(self.rb.as_ref(), wallet_id)
            .await?
            .filter(|w| w.player_id == player_id)
            .ok_or_else(|| AppError::not_found(format!("钱包不存在: {}", wallet_id)))?;

        let mut sql = String::from(
            "select t.* from app_wallet_transaction t where t.wallet_id = ?",
        );
        let mut args = vec![rbs::value!(wallet_id)];

        if let Some(from) = query.from {
            sql.push_str(" and t.created_at >= ?");
            args.push(rbs::value!(time_util::to_db_time(from)));
        }
        if let Some(to) = query.to {
            sql.push_str(" and t.created_at <= ?");
            args.push(rbs::value!(time_util::to_db_time(to)));
        }
        if let Some(code) = query.transaction_code {
            sql.push_str(
                " and t.transaction_type_id = \
                 (select id from app_transaction_type where transaction_code = ?)",
            );
            args.push(rbs::value!(code.code()));
        }

        sql.push_str(" order by t.created_at desc, t.id desc limit ?");
        args.push(rbs::value!(query.limit.unwrap_or(100).clamp(1, 500)));

        let v = Executor::query(self.rb.as_ref(), &sql, args).await?;
        Ok(rbatis::decode(v)?)
    }
}
