use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 注单表, 结算后不再变动
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppBet {
    pub id: Option<i64>,
    pub round_id: i64,
    pub wallet_id: i64,
    pub bet_currency_id: i64,
    pub bet_amount: Decimal,
    pub win_amount: Option<Decimal>,
    pub bet_status: String,
    pub placed_at: Option<DateTime>,
    pub settled_at: Option<DateTime>,
}

crud!(AppBet {}, "app_bet");
impl_select!(AppBet{select_by_id(id: i64) -> Option => "`where id = #{id} limit 1`"});
impl_select!(AppBet{select_by_round(round_id: i64) -> Vec => "`where round_id = #{round_id}`"});

impl AppBet {
    pub const TABLE_NAME: &'static str = "app_bet";
}
