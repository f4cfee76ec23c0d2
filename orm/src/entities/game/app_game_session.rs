use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use serde::{Deserialize, Serialize};

/// 游戏会话表
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppGameSession {
    pub id: Option<i64>,
    pub player_id: i64,
    pub tenant_id: i64,
    pub game_id: i64,
    pub status: String,
    pub started_at: Option<DateTime>,
    pub ended_at: Option<DateTime>,
    pub ip_address: Option<String>,
    pub device_info: Option<String>,
}

crud!(AppGameSession {}, "app_game_session");
impl_select!(AppGameSession{select_by_id(id: i64) -> Option => "`where id = #{id} limit 1`"});
impl_select!(AppGameSession{select_active(player_id: i64, tenant_id: i64, game_id: i64) -> Option =>
    "`where player_id = #{player_id} and tenant_id = #{tenant_id} and game_id = #{game_id} and status = 'active' limit 1`"});
impl_select!(AppGameSession{select_active_by_player_game(player_id: i64, game_id: i64) -> Option =>
    "`where player_id = #{player_id} and game_id = #{game_id} and status = 'active' limit 1`"});

impl AppGameSession {
    pub const TABLE_NAME: &'static str = "app_game_session";
}
