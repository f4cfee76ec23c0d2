use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 负责任博彩限额表, 每玩家一行; 限额为空表示不设上限
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppResponsibleLimit {
    pub id: Option<i64>,
    pub player_id: i64,
    pub daily_bet_limit: Option<Decimal>,
    pub monthly_bet_limit: Option<Decimal>,
    pub self_exclusion_until: Option<DateTime>,
    pub updated_at: Option<DateTime>,
}

crud!(AppResponsibleLimit {}, "app_responsible_limit");
impl_select!(AppResponsibleLimit{select_by_player(player_id: i64) -> Option =>
    "`where player_id = #{player_id} limit 1`"});

impl AppResponsibleLimit {
    pub const TABLE_NAME: &'static str = "app_responsible_limit";
}
