//! 商品详情页徽章服务
//!
//! 提供 `GET /badges?entityId=<id>&locale=<opt>`：拉取上游商品数据、校验形状、
//! 运行规则引擎并返回有序徽章列表。
//!
//! ## 降级策略
//!
//! 除了 entityId 缺失或非数字（400）之外，所有路径都返回 200；
//! 上游失败、响应无法解析、形状校验失败乃至评估过程中的 panic，
//! 都会降级为 `{ entityId, badges: [] }`，徽章永远不会拖垮页面渲染。
//!
//! ## 模块结构
//!
//! - `dto`: 请求参数与响应体
//! - `error`: 客户端输入错误
//! - `handlers`: HTTP 请求处理器
//! - `routes`: 路由配置
//! - `state`: 应用状态
//! - `upstream`: 上游商品 API 抽象与 reqwest 实现

pub mod dto;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;
pub mod upstream;

pub use error::EndpointError;
pub use state::AppState;
pub use upstream::{HttpProductApi, ProductApi, ProductRequest, UpstreamError};
