use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// 奖金任务表
///
/// 同一玩家最多一条处于 active/claimable 的记录, 激活时加锁校验
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppBonusUsage {
    pub id: Option<i64>,
    pub bonus_id: i64,
    pub player_id: i64,
    pub wallet_id: i64,
    pub bonus_amount: Decimal,
    pub wagering_required: Decimal,
    pub wagering_completed: Decimal,
    pub status: String,
    pub granted_at: Option<DateTime>,
    pub completed_at: Option<DateTime>,
    pub expired_at: Option<DateTime>,
}

crud!(AppBonusUsage {}, "app_bonus_usage");
impl_select!(AppBonusUsage{select_by_id(id: i64) -> Option => "`where id = #{id} limit 1`"});
impl_select!(AppBonusUsage{select_by_id_for_update(id: i64) -> Option => "`where id = #{id} limit 1 for update`"});
impl_select!(AppBonusUsage{select_open_by_player(player_id: i64) -> Option =>
    "`where player_id = #{player_id} and status in ('active', 'claimable') limit 1`"});
impl_select!(AppBonusUsage{select_open_by_player_for_update(player_id: i64) -> Option =>
    "`where player_id = #{player_id} and status in ('active', 'claimable') limit 1 for update`"});
impl_select!(AppBonusUsage{select_active_by_player_for_update(player_id: i64) -> Option =>
    "`where player_id = #{player_id} and status = 'active' limit 1 for update`"});
impl_select!(AppBonusUsage{select_by_player(player_id: i64) -> Vec =>
    "`where player_id = #{player_id} order by granted_at desc`"});
impl_select!(AppBonusUsage{select_by_player_bonus(player_id: i64, bonus_id: i64) -> Option =>
    "`where player_id = #{player_id} and bonus_id = #{bonus_id} limit 1`"});
impl_select!(AppBonusUsage{select_active_expired_before(now: rbatis::rbdc::datetime::DateTime) -> Vec =>
    "`where status = 'active' and expired_at is not null and expired_at < #{now}`"});

impl AppBonusUsage {
    pub const TABLE_NAME: &'static str = "app_bonus_usage";
}
