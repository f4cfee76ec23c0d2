use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 奖金活动表 (租户级营销配置)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppBonus {
    pub id: Option<i64>,
    pub tenant_id: i64,
    pub bonus_name: String,
    pub bonus_type: Option<String>,
    pub bonus_amount: Decimal,
    pub wagering_multiplier: Decimal,
    pub valid_from: Option<DateTime>,
    pub valid_to: Option<DateTime>,
    pub is_active: Option<bool>,
}

crud!(AppBonus {}, "app_bonus");
impl_select!(AppBonus{select_by_id(id: i64) -> Option => "`where id = #{id} limit 1`"});
impl_select!(AppBonus{select_active_by_tenant(tenant_id: i64) -> Vec =>
    "`where tenant_id = #{tenant_id} and is_active = 1`"});

impl AppBonus {
    pub const TABLE_NAME: &'static str = "app_bonus";
}
