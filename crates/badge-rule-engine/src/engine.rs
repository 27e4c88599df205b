//! 规则评估
//!
//! 按规则表顺序依次求值，命中即输出一条徽章描述。无 I/O、无副作用，
//! 复杂度与规则数量成正比。

use crate::models::{BadgeDescriptor, ProductBadgeContext};
use crate::table::RuleTable;

/// 评估商品上下文，返回有序的徽章列表
///
/// 规则表构建时已保证 key 唯一，因此输出中的 key 也唯一。
pub fn evaluate(table: &RuleTable, ctx: &ProductBadgeContext) -> Vec<BadgeDescriptor> {
    table
        .iter()
        .filter(|rule| rule.predicate.matches(ctx))
        .map(|rule| rule.template.to_descriptor(&rule.key))
        .collect()
}

impl RuleTable {
    /// 等价于 [`evaluate`]
    pub fn evaluate(&self, ctx: &ProductBadgeContext) -> Vec<BadgeDescriptor> {
        evaluate(self, ctx)
    }
}
