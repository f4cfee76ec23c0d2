// 工具模块

pub mod snowflake;
pub mod time_util;
pub mod redis_util;
