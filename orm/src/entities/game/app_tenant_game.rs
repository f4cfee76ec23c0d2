use rbatis::{crud, impl_select};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 租户-游戏开通表, 覆盖项为空时回落到游戏全局限额
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppTenantGame {
    pub id: Option<i64>,
    pub tenant_id: i64,
    pub game_id: i64,
    pub is_enabled: Option<bool>,
    pub min_bet_override: Option<Decimal>,
    pub max_bet_override: Option<Decimal>,
}

crud!(AppTenantGame {}, "app_tenant_game");
impl_select!(AppTenantGame{select_by_tenant_game(tenant_id: i64, game_id: i64) -> Option =>
    "`where tenant_id = #{tenant_id} and game_id = #{game_id} limit 1`"});

impl AppTenantGame {
    pub const TABLE_NAME: &'static str = "app_tenant_game";
}
