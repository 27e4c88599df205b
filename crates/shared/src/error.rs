//! 统一错误处理模块
//!
//! 定义服务启动与基础设施层共享的错误类型，使用 thiserror 提供良好的错误信息。
//! 请求级别的错误由各服务自己的错误枚举处理。

use thiserror::Error;

/// 基础设施错误类型
#[derive(Debug, Error)]
pub enum SharedError {
    #[error("配置加载失败: {0}")]
    Config(#[from] config::ConfigError),

    #[error("日志初始化失败: {0}")]
    Logging(String),

    #[error("指标导出初始化失败: {0}")]
    Metrics(String),

    #[error("地址绑定失败: {addr}")]
    Bind {
        addr: String,
        #[source]
        source: std::io::Error,
    },
}

/// 错误结果类型别名
pub type Result<T> = std::result::Result<T, SharedError>;

impl SharedError {
    /// 获取错误码
    pub fn code(&self) -> &'static str {
        match self {
            Self::Config(_) => "CONFIG_ERROR",
            Self::Logging(_) => "LOGGING_ERROR",
            Self::Metrics(_) => "METRICS_ERROR",
            Self::Bind { .. } => "BIND_ERROR",
        }
    }
}
