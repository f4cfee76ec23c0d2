// 公共服务模块

pub mod ledger_service;
