use crate::enums::{TransactionCode, WalletKind};
use crate::error::AppError;
use rbatis::executor::RBatisTxExecutorGuard;
use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 钱包表
///
/// 每个 (玩家, 租户, 币种, 钱包类型) 一行; 余额只能经由 apply_movement 变动,
/// 每次变动都配对一条不可变账变记录
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppWallet {
    pub id: Option<i64>,
    pub player_id: i64,
    pub tenant_id: i64,
    pub currency_id: i64,
    pub wallet_type_id: i64,
    pub balance: Decimal,
    pub is_active: Option<bool>,
    pub created_at: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

crud!(AppWallet {}, "app_wallet");
impl_select!(AppWallet{select_by_id(id: i64) -> Option => "`where id = #{id} limit 1`"});
impl_select!(AppWallet{select_by_id_for_update(id: i64) -> Option => "`where id = #{id} limit 1 for update`"});
impl_select!(AppWallet{select_for_update_by_kind(player_id: i64, tenant_id: i64, wallet_type_id: i64) -> Option =>
    "`where player_id = #{player_id} and tenant_id = #{tenant_id} and wallet_type_id = #{wallet_type_id} and is_active = 1 limit 1 for update`"});
impl_select!(AppWallet{select_for_update_by_currency(player_id: i64, currency_id: i64, wallet_type_id: i64) -> Option =>
    "`where player_id = #{player_id} and currency_id = #{currency_id} and wallet_type_id = #{wallet_type_id} and is_active = 1 limit 1 for update`"});
impl_select!(AppWallet{select_active_by_player(player_id: i64) -> Vec => "`where player_id = #{player_id} and is_active = 1`"});

impl AppWallet {
    pub const TABLE_NAME: &'static str = "app_wallet";
}

/// 账变记录表 (追加写入, 永不更新或删除; 纠错只允许追加冲正记录)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppWalletTransaction {
    pub id: Option<i64>,
    pub serial_no: Option<String>,
    pub wallet_id: i64,
    pub transaction_type_id: i64,
    pub amount: Decimal,
    pub balance_before: Decimal,
    pub balance_after: Decimal,
    pub reference_type: Option<String>,
    pub reference_id: Option<i64>,
    pub remark: Option<String>,
    pub created_at: Option<DateTime>,
}

crud!(AppWalletTransaction {}, "app_wallet_transaction");
impl_select!(AppWalletTransaction{select_by_wallet(wallet_id: i64, limit: i64) -> Vec =>
    "`where wallet_id = #{wallet_id} order by created_at desc, id desc limit #{limit}`"});

impl AppWalletTransaction {
    pub const TABLE_NAME: &'static str = "app_wallet_transaction";
}

/// 钱包类型表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppWalletType {
    pub id: Option<i64>,
    pub wallet_type_code: String,
    pub description: Option<String>,
}

crud!(AppWalletType {}, "app_wallet_type");
impl_select!(AppWalletType{select_by_code(code: String) -> Option => "`where wallet_type_code = #{code} limit 1`"});
impl_select!(AppWalletType{select_by_id(id: i64) -> Option => "`where id = #{id} limit 1`"});

/// 交易类型表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppTransactionType {
    pub id: Option<i64>,
    pub transaction_code: String,
    pub description: Option<String>,
}

crud!(AppTransactionType {}, "app_transaction_type");
impl_select!(AppTransactionType{select_by_code(code: String) -> Option => "`where transaction_code = #{code} limit 1`"});

/// 账变引用 - 指向引起资金变动的业务对象
///
/// 用带类型的枚举代替裸 (类型字符串, id) 二元组, 穷举可指向的对象
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LedgerRef {
    /// 充值 (无业务对象)
    Deposit,
    /// 注单
    Bet(i64),
    /// 提现单
    Withdrawal(i64),
    /// 奖金任务
    BonusUsage(i64),
    /// 抽奖入场
    RaffleEntry(i64),
    /// 奖池本身 (开奖/取消退款)
    RaffleJackpot(i64),
}

impl LedgerRef {
    pub fn type_code(&self) -> &'static str {
        match self {
            LedgerRef::Deposit => "DEPOSIT",
            LedgerRef::Bet(_) => "BET",
            LedgerRef::Withdrawal(_) => "WITHDRAWAL",
            LedgerRef::BonusUsage(_) => "BONUS_USAGE",
            LedgerRef::RaffleEntry(_) => "RAFFLE_ENTRY",
            LedgerRef::RaffleJackpot(_) => "RAFFLE_JACKPOT",
        }
    }

    pub fn ref_id(&self) -> Option<i64> {
        match self {
            LedgerRef::Deposit => None,
            LedgerRef::Bet(id)
            | LedgerRef::Withdrawal(id)
            | LedgerRef::BonusUsage(id)
            | LedgerRef::RaffleEntry(id)
            | LedgerRef::RaffleJackpot(id) => Some(*id),
        }
    }
}

/// 账变请求
#[derive(Debug, Clone)]
pub struct MovementReq {
    pub code: TransactionCode,
    pub amount: Decimal,
    pub reference: LedgerRef,
    pub remark: Option<String>,
}

impl MovementReq {
    /// 创建账变请求, amount 带符号 (扣款为负)
    pub fn new(code: TransactionCode, amount: Decimal, reference: LedgerRef) -> Self {
        Self {
            code,
            amount,
            reference,
            remark: None,
        }
    }

    /// 设置备注 - 可选字段
    pub fn remark(mut self, remark: impl Into<String>) -> Self {
        self.remark = Some(remark.into());
        self
    }
}

/// 计算账变后余额
///
/// 余额链不变式: balance_after = balance_before + amount;
/// 禁负钱包出现负余额时拒绝整笔账变
pub fn compute_movement(
    balance_before: Decimal,
    amount: Decimal,
    requires_non_negative: bool,
) -> Result<Decimal, AppError> {
    let balance_after = balance_before + amount;
    if requires_non_negative && balance_after < Decimal::ZERO {
        return Err(AppError::InsufficientFunds);
    }
    Ok(balance_after)
}

/// 账本服务 - 系统内所有资金变动的唯一入口
pub struct LedgerService;

impl LedgerService {
    /// 查询钱包类型 id, 未配置按运营方故障处理
    pub async fn wallet_type_id(
        tx: &RBatisTxExecutorGuard,
        kind: WalletKind,
    ) -> Result<i64, AppError> {
        let row = AppWalletType::select_by_code(tx, kind.code().to_string()).await?;
        row.and_then(|t| t.id)
            .ok_or_else(|| AppError::config_missing(format!("wallet_type {}", kind.code())))
    }

    /// 查询交易类型 id, 未配置按运营方故障处理
    pub async fn transaction_type_id(
        tx: &RBatisTxExecutorGuard,
        code: TransactionCode,
    ) -> Result<i64, AppError> {
        let row = AppTransactionType::select_by_code(tx, code.code().to_string()).await?;
        row.and_then(|t| t.id)
            .ok_or_else(|| AppError::config_missing(format!("transaction_type {}", code.code())))
    }

    /// 按钱包 id 加排他行锁 (select ... for update)
    ///
    /// 锁持续到所属事务提交或回滚, 并发抢锁方被阻塞串行化
    pub async fn lock_wallet(
        tx: &RBatisTxExecutorGuard,
        wallet_id: i64,
    ) -> Result<AppWallet, AppError> {
        AppWallet::select_by_id_for_update(tx, wallet_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("钱包不存在: {}", wallet_id)))
    }

    /// 锁定玩家在租户下指定类型的钱包
    pub async fn lock_wallet_by_kind(
        tx: &RBatisTxExecutorGuard,
        player_id: i64,
        tenant_id: i64,
        kind: WalletKind,
    ) -> Result<AppWallet, AppError> {
        let type_id = Self::wallet_type_id(tx, kind).await?;
        AppWallet::select_for_update_by_kind(tx, player_id, tenant_id, type_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("{} 钱包未开通", kind.code())))
    }

    /// 锁定玩家指定币种的现金钱包 (抽奖按奖池币种入场)
    pub async fn lock_cash_wallet_by_currency(
        tx: &RBatisTxExecutorGuard,
        player_id: i64,
        currency_id: i64,
    ) -> Result<AppWallet, AppError> {
        let type_id = Self::wallet_type_id(tx, WalletKind::Cash).await?;
        AppWallet::select_for_update_by_currency(tx, player_id, currency_id, type_id)
            .await?
            .ok_or_else(|| AppError::not_found("该币种现金钱包未开通".to_string()))
    }

    /// 余额变动（在事务中执行）
    ///
    /// 写钱包新余额并追加一条账变记录, 二者永远成对出现;
    /// 任何组件都不得绕过此方法直接改 balance
    pub async fn apply_movement(
        tx: &RBatisTxExecutorGuard,
        wallet: &mut AppWallet,
        req: MovementReq,
        now: &DateTime,
    ) -> Result<AppWalletTransaction, AppError> {
        // 1. 查询钱包类型的禁负规则
        let wallet_type = AppWalletType::select_by_id(tx, wallet.wallet_type_id)
            .await?
            .ok_or_else(|| {
                AppError::config_missing(format!("wallet_type id {}", wallet.wallet_type_id))
            })?;
        let kind = WalletKind::from_code(&wallet_type.wallet_type_code).ok_or_else(|| {
            AppError::config_missing(format!("wallet_type code {}", wallet_type.wallet_type_code))
        })?;

        // 2. 计算新余额
        let balance_before = wallet.balance;
        let balance_after = compute_movement(balance_before, req.amount, kind.requires_non_negative())?;

        // 3. 更新钱包
        wallet.balance = balance_after;
        wallet.updated_at = Some(now.clone());
        let where_map = rbs::value! { "id": wallet.id };
        AppWallet::update_by_map(tx, wallet, where_map).await?;

        // 4. 插入账变记录
        let txn_type_id = Self::transaction_type_id(tx, req.code).await?;
        let movement = AppWalletTransaction {
            id: None,
            serial_no: Some(crate::utils::snowflake::generate_id_string()),
            wallet_id: wallet.id.unwrap_or_default(),
            transaction_type_id: txn_type_id,
            amount: req.amount,
            balance_before,
            balance_after,
            reference_type: Some(req.reference.type_code().to_string()),
            reference_id: req.reference.ref_id(),
            remark: req.remark.clone(),
            created_at: Some(now.clone()),
        };
        AppWalletTransaction::insert(tx, &movement).await?;

        log::debug!(
            "账变: wallet={} {} {} -> {} ({:?})",
            movement.wallet_id,
            req.code.code(),
            balance_before,
            balance_after,
            req.reference
        );

        Ok(movement)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        s.parse().unwrap()
    }

    #[test]
    fn movement_keeps_balance_chain() {
        let after = compute_movement(dec("100.00"), dec("-40.00"), true).unwrap();
        assert_eq!(after, dec("60.00"));
        assert_eq!(dec("100.00") + dec("-40.00"), after);
    }

    #[test]
    fn cash_wallet_rejects_negative_result() {
        let err = compute_movement(dec("30.00"), dec("-40.00"), true).unwrap_err();
        assert!(matches!(err, AppError::InsufficientFunds));
    }

    #[test]
    fn bonus_wallet_allows_negative_reversal() {
        // 奖金回收允许出现负中间余额
        let after = compute_movement(dec("10.00"), dec("-50.00"), false).unwrap();
        assert_eq!(after, dec("-40.00"));
    }

    #[test]
    fn ledger_ref_codes_are_exhaustive() {
        assert_eq!(LedgerRef::Bet(7).type_code(), "BET");
        assert_eq!(LedgerRef::Bet(7).ref_id(), Some(7));
        assert_eq!(LedgerRef::Deposit.ref_id(), None);
        assert_eq!(LedgerRef::RaffleJackpot(3).type_code(), "RAFFLE_JACKPOT");
    }

    #[test]
    fn movement_req_builder() {
        let req = MovementReq::new(TransactionCode::Bet, dec("-40.00"), LedgerRef::Bet(1))
            .remark("coin toss");
        assert_eq!(req.code, TransactionCode::Bet);
        assert_eq!(req.amount, dec("-40.00"));
        assert_eq!(req.remark.as_deref(), Some("coin toss"));
    }
}
