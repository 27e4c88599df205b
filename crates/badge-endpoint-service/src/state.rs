//! 应用状态定义

use std::sync::Arc;

use rule_engine::RuleTable;

use crate::upstream::ProductApi;

/// Axum 应用共享状态
///
/// 启动后只读；规则表内部是 `Arc<[BadgeRule]>`，clone 只增加引用计数。
#[derive(Clone)]
pub struct AppState {
    pub rules: RuleTable,
    pub upstream: Arc<dyn ProductApi>,
}

impl AppState {
    pub fn new(rules: RuleTable, upstream: Arc<dyn ProductApi>) -> Self {
        Self { rules, upstream }
    }
}
