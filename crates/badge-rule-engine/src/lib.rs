//! 徽章规则引擎
//!
//! 将商品属性映射为有序、确定的徽章列表：
//! - 商品 JSON 的形状校验与归一化（[`validator`]）
//! - 可序列化的谓词定义（[`predicate`]）
//! - 启动时构建、之后只读的规则表（[`table`]）
//! - 无 I/O 的纯函数评估（[`engine`]）

pub mod engine;
pub mod error;
pub mod models;
pub mod predicate;
pub mod table;
pub mod validator;

pub use engine::evaluate;
pub use error::{Result, RuleError};
pub use models::{BadgeDescriptor, BadgeRule, BadgeTemplate, BadgeVariant, ProductBadgeContext};
pub use predicate::Predicate;
pub use table::RuleTable;
pub use validator::{Validation, validate};
