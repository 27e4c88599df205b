//! 规则表
//!
//! 规则表在进程启动时构建一次，之后只读；所有请求共享同一个 `Arc<[BadgeRule]>`，
//! clone 只增加引用计数，无需加锁。

use crate::error::{Result, RuleError};
use crate::models::{BadgeRule, BadgeTemplate, BadgeVariant};
use crate::predicate::Predicate;
use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, LazyLock};
use tracing::info;

static DEFAULT_TABLE: LazyLock<RuleTable> = LazyLock::new(|| RuleTable {
    rules: default_rules().into(),
});

/// 内置默认规则，顺序即展示顺序
fn default_rules() -> Vec<BadgeRule> {
    vec![
        BadgeRule::new(
            "free-shipping",
            Predicate::FreeShippingEligible,
            BadgeTemplate::new("Ships Free Over $99", BadgeVariant::Info, Some("/shipping")),
        ),
        BadgeRule::new(
            "b2b-only",
            Predicate::B2bOnly,
            BadgeTemplate::new("B2B Only Item", BadgeVariant::Warning, Some("/login")),
        ),
        BadgeRule::new(
            "planted-sale",
            Predicate::brand_contains("planted"),
            BadgeTemplate::new("SALE", BadgeVariant::Sale, Some("/sale")),
        ),
    ]
}

/// 不可变的有序规则表
#[derive(Debug, Clone)]
pub struct RuleTable {
    rules: Arc<[BadgeRule]>,
}

impl RuleTable {
    /// 从规则列表构建，校验 key 非空且不重复
    pub fn new(rules: Vec<BadgeRule>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(rules.len());
        for rule in &rules {
            if rule.key.trim().is_empty() {
                return Err(RuleError::EmptyKey);
            }
            if !seen.insert(rule.key.as_str()) {
                return Err(RuleError::DuplicateKey(rule.key.clone()));
            }
        }

        Ok(Self {
            rules: rules.into(),
        })
    }

    /// 内置默认规则表（进程内只构建一次）
    pub fn builtin() -> Self {
        DEFAULT_TABLE.clone()
    }

    /// 从 JSON 字符串加载（顶层为规则数组）
    pub fn from_json(json: &str) -> Result<Self> {
        let rules: Vec<BadgeRule> = serde_json::from_str(json)?;
        Self::new(rules)
    }

    /// 从 JSON 文件加载
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| RuleError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let table = Self::from_json(&content)?;
        info!(path = %path.display(), rules = table.len(), "规则表已加载");
        Ok(table)
    }

    /// 按配置加载：有路径时读文件，否则使用内置规则表
    pub fn load(path: Option<&str>) -> Result<Self> {
        match path {
            Some(path) if !path.trim().is_empty() => Self::load_from_path(path),
            _ => Ok(Self::builtin()),
        }
    }

    pub fn rules(&self) -> &[BadgeRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &BadgeRule> {
        self.rules.iter()
    }
}

impl Default for RuleTable {
    fn default() -> Self {
        Self::builtin()
    }
}
