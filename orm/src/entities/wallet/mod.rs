// 钱包与账变实体定义在 common::services::ledger_service
// (账本服务与其实体同处一个模块, 避免两份字段定义漂移), 此处统一转出

pub use common::services::ledger_service::{
    AppTransactionType, AppWallet, AppWalletTransaction, AppWalletType,
};
