use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 抽奖入场记录表, (jackpot_id, player_id) 唯一, 写入后不再变动
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppRaffleEntry {
    pub id: Option<i64>,
    pub jackpot_id: i64,
    pub player_id: i64,
    pub wallet_id: i64,
    pub amount_paid: Decimal,
    pub created_at: Option<DateTime>,
}

crud!(AppRaffleEntry {}, "app_raffle_entry");
impl_select!(AppRaffleEntry{select_by_jackpot(jackpot_id: i64) -> Vec =>
    "`where jackpot_id = #{jackpot_id} order by id asc`"});
impl_select!(AppRaffleEntry{select_by_jackpot_player(jackpot_id: i64, player_id: i64) -> Option =>
    "`where jackpot_id = #{jackpot_id} and player_id = #{player_id} limit 1`"});

impl AppRaffleEntry {
    pub const TABLE_NAME: &'static str = "app_raffle_entry";
}
