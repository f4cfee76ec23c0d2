use serde::{Deserialize, Serialize};
use strum::{AsRefStr, EnumIter, IntoEnumIterator};

/// 游戏会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr)]
pub enum SessionStatus {
    #[strum(to_string = "active")]
    Active,
    #[strum(to_string = "completed")]
    Completed,
}

/// 注单状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr)]
pub enum BetStatus {
    #[strum(to_string = "placed")]
    Placed,
    #[strum(to_string = "settled")]
    Settled,
}

/// 奖金任务状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr)]
pub enum BonusStatus {
    #[strum(to_string = "active")]
    Active,
    #[strum(to_string = "claimable")]
    Claimable,
    #[strum(to_string = "completed")]
    Completed,
    #[strum(to_string = "expired")]
    Expired,
    #[strum(to_string = "cancelled")]
    Cancelled,
}

impl BonusStatus {
    /// 是否占用玩家的唯一活动名额 (同一玩家最多一个)
    pub fn is_open(&self) -> bool {
        matches!(self, BonusStatus::Active | BonusStatus::Claimable)
    }
}

/// 提现状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr)]
pub enum WithdrawalStatus {
    #[strum(to_string = "requested")]
    Requested,
    #[strum(to_string = "kyc_pending")]
    KycPending,
    #[strum(to_string = "approved")]
    Approved,
    #[strum(to_string = "processing")]
    Processing,
    #[strum(to_string = "completed")]
    Completed,
    #[strum(to_string = "rejected")]
    Rejected,
}

/// 提现后台操作
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr)]
pub enum WithdrawalAction {
    #[strum(to_string = "approve")]
    Approve,
    #[strum(to_string = "process")]
    Process,
    #[strum(to_string = "complete")]
    Complete,
    #[strum(to_string = "reject")]
    Reject,
}

/// 奖池状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr)]
pub enum JackpotStatus {
    #[strum(to_string = "active")]
    Active,
    #[strum(to_string = "completed")]
    Completed,
    #[strum(to_string = "cancelled")]
    Cancelled,
}

/// 奖池类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr)]
pub enum JackpotType {
    /// 手动开奖
    #[strum(to_string = "MANUAL")]
    Manual,
    /// 到时开奖
    #[strum(to_string = "TIME_BASED")]
    TimeBased,
    /// 达标开奖
    #[strum(to_string = "THRESHOLD")]
    Threshold,
}

/// KYC 状态 (外部认证流程只读消费)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, AsRefStr)]
pub enum KycStatus {
    #[strum(to_string = "not_submitted")]
    NotSubmitted,
    #[strum(to_string = "pending")]
    Pending,
    #[strum(to_string = "verified")]
    Verified,
    #[strum(to_string = "rejected")]
    Rejected,
    #[strum(to_string = "expired")]
    Expired,
}

impl KycStatus {
    /// 硬性禁止提现的状态
    pub fn blocks_withdrawal(&self) -> bool {
        matches!(self, KycStatus::Rejected | KycStatus::Expired)
    }
}

macro_rules! impl_status_codes {
    ($($t:ty),*) => {
        $(impl $t {
            pub fn code(&self) -> &str {
                self.as_ref()
            }

            pub fn from_code(code: &str) -> Option<Self> {
                Self::iter().find(|e| e.as_ref() == code)
            }
        })*
    };
}

impl_status_codes!(
    SessionStatus,
    BetStatus,
    BonusStatus,
    WithdrawalStatus,
    WithdrawalAction,
    JackpotStatus,
    JackpotType,
    KycStatus
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_round_trip() {
        assert_eq!(WithdrawalStatus::from_code("kyc_pending"), Some(WithdrawalStatus::KycPending));
        assert_eq!(BonusStatus::from_code("claimable"), Some(BonusStatus::Claimable));
        assert_eq!(JackpotType::from_code("TIME_BASED"), Some(JackpotType::TimeBased));
        assert_eq!(KycStatus::from_code("not_submitted"), Some(KycStatus::NotSubmitted));
        assert_eq!(WithdrawalStatus::from_code("paid"), None);
    }

    #[test]
    fn open_bonus_statuses() {
        assert!(BonusStatus::Active.is_open());
        assert!(BonusStatus::Claimable.is_open());
        assert!(!BonusStatus::Completed.is_open());
        assert!(!BonusStatus::Expired.is_open());
        assert!(!BonusStatus::Cancelled.is_open());
    }

    #[test]
    fn kyc_hard_blocks() {
        assert!(KycStatus::Rejected.blocks_withdrawal());
        assert!(KycStatus::Expired.blocks_withdrawal());
        assert!(!KycStatus::Pending.blocks_withdrawal());
        assert!(!KycStatus::Verified.blocks_withdrawal());
    }
}
