use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 提现单表
///
/// 申请即托管: 创建时已从现金钱包扣款, 驳回时按原额冲正
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppWithdrawal {
    pub id: Option<i64>,
    pub player_id: i64,
    pub tenant_id: i64,
    pub wallet_id: i64,
    pub currency_id: i64,
    pub amount: Decimal,
    pub status: String,
    pub requested_at: Option<DateTime>,
    pub processed_at: Option<DateTime>,
    pub gateway_reference: Option<String>,
    pub rejection_reason: Option<String>,
}

crud!(AppWithdrawal {}, "app_withdrawal");
impl_select!(AppWithdrawal{select_by_id(id: i64) -> Option => "`where id = #{id} limit 1`"});
impl_select!(AppWithdrawal{select_by_id_for_update(id: i64) -> Option => "`where id = #{id} limit 1 for update`"});
impl_select!(AppWithdrawal{select_by_player(player_id: i64) -> Vec =>
    "`where player_id = #{player_id} order by requested_at desc`"});
impl_select!(AppWithdrawal{select_by_tenant(tenant_id: i64) -> Vec =>
    "`where tenant_id = #{tenant_id} order by requested_at desc`"});
impl_select!(AppWithdrawal{select_by_tenant_status(tenant_id: i64, status: &str) -> Vec =>
    "`where tenant_id = #{tenant_id} and status = #{status} order by requested_at desc`"});

impl AppWithdrawal {
    pub const TABLE_NAME: &'static str = "app_withdrawal";
}
