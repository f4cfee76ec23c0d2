use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 抽奖奖池表
///
/// current_amount 只随入场费累加或开奖/取消清算, 与入场记录总额对账
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppRaffleJackpot {
    pub id: Option<i64>,
    pub tenant_id: i64,
    pub currency_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub jackpot_type: String,
    pub seed_amount: Decimal,
    pub current_amount: Decimal,
    pub entry_fee: Decimal,
    pub draw_at: Option<DateTime>,
    pub target_amount: Option<Decimal>,
    pub status: String,
    pub winner_id: Option<i64>,
    pub won_amount: Option<Decimal>,
    pub drawn_at: Option<DateTime>,
    pub created_at: Option<DateTime>,
}

crud!(AppRaffleJackpot {}, "app_raffle_jackpot");
impl_select!(AppRaffleJackpot{select_by_id(id: i64) -> Option => "`where id = #{id} limit 1`"});
impl_select!(AppRaffleJackpot{select_by_id_for_update(id: i64) -> Option => "`where id = #{id} limit 1 for update`"});
impl_select!(AppRaffleJackpot{select_active_by_tenant(tenant_id: i64) -> Vec =>
    "`where tenant_id = #{tenant_id} and status = 'active' order by created_at desc`"});
impl_select!(AppRaffleJackpot{select_by_tenant(tenant_id: i64) -> Vec =>
    "`where tenant_id = #{tenant_id} order by created_at desc`"});

impl AppRaffleJackpot {
    pub const TABLE_NAME: &'static str = "app_raffle_jackpot";
}
