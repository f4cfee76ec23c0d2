// 枚举模块

pub mod transaction_code;
pub mod wallet_kind;
pub mod status;

pub use transaction_code::TransactionCode;
pub use wallet_kind::WalletKind;
pub use status::{
    BetStatus, BonusStatus, JackpotStatus, JackpotType, KycStatus, SessionStatus,
    WithdrawalAction, WithdrawalStatus,
};
