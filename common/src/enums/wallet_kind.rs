use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

/// 钱包类型枚举
///
/// 与 app_wallet_type 表中的 wallet_type_code 一一对应
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr)]
pub enum WalletKind {
    /// 现金钱包
    #[strum(to_string = "CASH")]
    Cash,
    /// 奖金钱包
    #[strum(to_string = "BONUS")]
    Bonus,
}

impl WalletKind {
    pub fn code(&self) -> &str {
        self.as_ref()
    }

    pub fn from_code(code: &str) -> Option<Self> {
        Self::iter().find(|e| e.as_ref() == code)
    }

    /// 该类型钱包是否禁止出现负余额
    ///
    /// 现金钱包任何已提交状态下余额不得为负;
    /// 奖金钱包允许回收时出现负值中间态 (任务资金已被下注消耗的场景)
    pub fn requires_non_negative(&self) -> bool {
        match self {
            WalletKind::Cash => true,
            WalletKind::Bonus => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn code_round_trip() {
        assert_eq!(WalletKind::from_code("CASH"), Some(WalletKind::Cash));
        assert_eq!(WalletKind::from_code("BONUS"), Some(WalletKind::Bonus));
        assert_eq!(WalletKind::from_code("CRYPTO"), None);
    }

    #[test]
    fn cash_wallets_never_go_negative() {
        assert!(WalletKind::Cash.requires_non_negative());
        assert!(!WalletKind::Bonus.requires_non_negative());
    }
}
