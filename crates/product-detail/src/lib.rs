//! 商品详情页组装
//!
//! 把商品描述、折叠面板和徽章合成一个渲染模型，交给展示层使用。
//!
//! ## 模块结构
//!
//! - `cms`: 页面编辑器可配置的属性（JSON，camelCase）
//! - `composer`: 渲染模型组装与徽章节点优先级
//! - `fetcher`: 客户端徽章拉取，取消与过期响应保护
//! - `merge`: 编辑器折叠面板与商品目录折叠面板的按位合并
//! - `transport`: 徽章端点传输抽象与响应体宽松解码

pub mod cms;
pub mod composer;
pub mod fetcher;
pub mod merge;
pub mod transport;

pub use cms::{BadgeItem, BadgePlacement, BadgeSettings, DescriptionSettings, DescriptionSource, EditableProps, Slot};
pub use composer::{BadgeNode, BadgePill, CatalogProduct, Description, ProductDetailModel, SectionContent, compose};
pub use fetcher::{BadgeFetcher, BadgeWatch, FetchState};
pub use merge::{AccordionSection, merge_sections};
pub use transport::{BadgeTransport, HttpBadgeTransport, TransportError, coerce_badges};
