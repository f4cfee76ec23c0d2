/// 应用常量定义

/// SA Token related constants
pub const SA_TOKEN_KEY_PREFIX: &str = "sa-token:";
pub const SA_TOKEN_AUTH_HEADER_NAME: &str = "Authorization";

/// 公平赔率游戏的固定派彩倍数 (二选一均匀开奖, 中奖恒定 2 倍, 不可配置)
pub const FAIR_ODDS_PAYOUT_MULTIPLIER: u32 = 2;

/// MQ 主题
pub mod topics {
    /// 站内通知分发
    pub const NOTIFICATION_CREATED: &str = "notification.created";

    /// 新玩家注册 (钱包开通完成后发布)
    pub const PLAYER_REGISTERED: &str = "player.registered";
}
