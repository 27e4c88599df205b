//! 商品响应校验
//!
//! 将任意 JSON 解码为规则评估上下文。只有 `brand.name` 的形状决定成败；
//! 其他可选属性按宽松方式读取，类型不对时视为缺失。该函数不会返回错误，也不会 panic。

use crate::models::ProductBadgeContext;
use serde_json::{Map, Value};

/// 校验结果
#[derive(Debug, Clone, PartialEq)]
pub enum Validation {
    /// 形状合法，得到归一化后的上下文
    Known(ProductBadgeContext),
    /// 形状不合法，等同于“商品没有可确定的品牌”
    AttributesUnknown,
}

impl Validation {
    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }

    /// 转为上下文；未知属性退化为只有 entity_id 的空上下文
    pub fn into_context(self, entity_id: i64) -> ProductBadgeContext {
        match self {
            Self::Known(ctx) => ctx,
            Self::AttributesUnknown => ProductBadgeContext::new(entity_id),
        }
    }
}

/// 校验上游商品 JSON
///
/// 合法条件：值是对象；`brand` 缺失、为 null，或是对象；
/// 若 `brand` 是对象，其 `name` 缺失、为 null，或是字符串。
pub fn validate(value: &Value, entity_id: i64) -> Validation {
    let Value::Object(product) = value else {
        return Validation::AttributesUnknown;
    };

    let brand_name = match product.get("brand") {
        None | Some(Value::Null) => None,
        Some(Value::Object(brand)) => match brand.get("name") {
            None | Some(Value::Null) => None,
            Some(Value::String(name)) => Some(name.as_str()),
            Some(_) => return Validation::AttributesUnknown,
        },
        Some(_) => return Validation::AttributesUnknown,
    };

    let mut ctx = ProductBadgeContext::new(entity_id).with_brand(brand_name);
    ctx.sku = string_field(product, "sku");
    ctx.price = product.get("price").and_then(price_value);
    ctx.is_free_shipping_eligible = bool_field(product, "isFreeShippingEligible");
    ctx.is_b2b_only = bool_field(product, "isB2BOnly");

    Validation::Known(ctx)
}

fn string_field(product: &Map<String, Value>, field: &str) -> Option<String> {
    product
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn bool_field(product: &Map<String, Value>, field: &str) -> Option<bool> {
    product.get(field).and_then(Value::as_bool)
}

/// 价格可能是数字，也可能是 `{ "value": 12.5 }` 形式的金额对象
fn price_value(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::Object(money) => money.get("value").and_then(Value::as_f64),
        _ => None,
    }
}
