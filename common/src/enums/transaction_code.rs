use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

/// 账变交易类型枚举
///
/// 与 app_transaction_type 表中的 transaction_code 一一对应,
/// 操作所需的交易类型未配置时按运营方故障处理 (ConfigMissing)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr)]
pub enum TransactionCode {
    /// 充值
    #[strum(to_string = "DEPOSIT")]
    Deposit,
    /// 提现申请 (申请时即扣款托管)
    #[strum(to_string = "WITHDRAWAL")]
    Withdrawal,
    /// 提现驳回返还
    #[strum(to_string = "WITHDRAWAL_REFUND")]
    WithdrawalRefund,
    /// 投注扣款
    #[strum(to_string = "BET")]
    Bet,
    /// 中奖派彩
    #[strum(to_string = "WIN")]
    Win,
    /// 奖金转换 (发放/领取/回收共用)
    #[strum(to_string = "BONUS_CONVERSION")]
    BonusConversion,
    /// 抽奖入场费
    #[strum(to_string = "JACKPOT_ENTRY")]
    JackpotEntry,
    /// 抽奖中奖
    #[strum(to_string = "JACKPOT_WIN")]
    JackpotWin,
    /// 抽奖取消退款
    #[strum(to_string = "JACKPOT_REFUND")]
    JackpotRefund,
}

impl TransactionCode {
    /// 获取数据库中的交易代码
    pub fn code(&self) -> &str {
        self.as_ref()
    }

    /// 从交易代码转换
    pub fn from_code(code: &str) -> Option<Self> {
        Self::iter().find(|e| e.as_ref() == code)
    }

    /// 获取中文描述
    pub fn description(&self) -> &'static str {
        match self {
            TransactionCode::Deposit => "充值",
            TransactionCode::Withdrawal => "提现申请",
            TransactionCode::WithdrawalRefund => "提现驳回返还",
            TransactionCode::Bet => "投注",
            TransactionCode::Win => "派彩",
            TransactionCode::BonusConversion => "奖金转换",
            TransactionCode::JackpotEntry => "抽奖入场",
            TransactionCode::JackpotWin => "抽奖中奖",
            TransactionCode::JackpotRefund => "抽奖退款",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_round_trip() {
        for code in TransactionCode::iter() {
            assert_eq!(TransactionCode::from_code(code.code()), Some(code));
        }
    }

    #[test]
    fn unknown_code_is_none() {
        assert_eq!(TransactionCode::from_code("ROLLBACK"), None);
    }
}
