use rbatis::{crud, impl_select};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 游戏目录表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppGame {
    pub id: Option<i64>,
    pub game_code: String,
    pub game_name: Option<String>,
    pub min_bet: Decimal,
    pub max_bet: Decimal,
    pub is_active: Option<bool>,
}

crud!(AppGame {}, "app_game");
impl_select!(AppGame{select_by_id(id: i64) -> Option => "`where id = #{id} limit 1`"});
impl_select!(AppGame{select_by_code(code: &str) -> Option => "`where game_code = #{code} limit 1`"});
impl_select!(AppGame{select_active() -> Vec => "`where is_active = 1`"});

impl AppGame {
    pub const TABLE_NAME: &'static str = "app_game";
}
