// 影视目录聚合后端库
//
// 本库提供目录浏览的核心功能，包括：
// - API 路由
// - 本地内容缓存
// - TMDB 与身份服务集成
// - 浏览 / 搜索聚合

pub mod api;
pub mod config;
pub mod database;
pub mod external;
pub mod models;
pub mod services;

#[cfg(test)]
pub(crate) mod testing;
