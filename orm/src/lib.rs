pub mod entities;

pub fn init() {
    log::info!("初始化ORM模块...");
}
