//! 共享库
//!
//! 包含徽章服务共用的配置加载、错误类型、日志/指标初始化以及 HTTP 中间件。

pub mod config;
pub mod error;
pub mod observability;
