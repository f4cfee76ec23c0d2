use rbatis::rbdc::datetime::DateTime;
use rbatis::{crud, impl_select};
use serde::{Deserialize, Serialize};

/// 游戏回合表, round_number 在会话内单调递增
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppGameRound {
    pub id: Option<i64>,
    pub session_id: i64,
    pub round_number: i64,
    pub outcome: Option<String>,
    pub started_at: Option<DateTime>,
    pub ended_at: Option<DateTime>,
}

crud!(AppGameRound {}, "app_game_round");
impl_select!(AppGameRound{select_by_id(id: i64) -> Option => "`where id = #{id} limit 1`"});

impl AppGameRound {
    pub const TABLE_NAME: &'static str = "app_game_round";
}
