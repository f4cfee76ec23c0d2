use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use serde::{Deserialize, Serialize};

/// 玩家表
///
/// id 即登录用户 id; kyc_status 由外部认证流程维护, 本系统只读取用作闸门
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppPlayer {
    pub id: Option<i64>,
    pub tenant_id: i64,
    pub player_name: Option<String>,
    pub status: Option<String>,
    pub kyc_status: Option<String>,
    pub kyc_verified_at: Option<DateTime>,
    pub created_at: Option<DateTime>,
}

crud!(AppPlayer {}, "app_player");
impl_select!(AppPlayer{select_by_id(id: i64) -> Option => "`where id = #{id} limit 1`"});
impl_select!(AppPlayer{select_by_id_for_update(id: i64) -> Option => "`where id = #{id} limit 1 for update`"});

impl AppPlayer {
    pub const TABLE_NAME: &'static str = "app_player";
}
