//! 徽章规则评估性能基准测试
//!
//! 测试覆盖：
//! - 内置规则表的命中 / 未命中评估
//! - 上游 JSON 校验
//! - 不同规则数量下的性能曲线

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rule_engine::{
    BadgeRule, BadgeTemplate, BadgeVariant, Predicate, ProductBadgeContext, RuleTable, evaluate,
    validate,
};
use serde_json::json;
use std::hint::black_box;

/// 创建 N 条品牌规则的规则表
fn create_table(rules_count: usize) -> RuleTable {
    let rules = (0..rules_count)
        .map(|i| {
            BadgeRule::new(
                format!("brand-{}", i),
                Predicate::brand_contains(format!("brand{}", i)),
                BadgeTemplate::new(format!("Brand {}", i), BadgeVariant::Info, None),
            )
        })
        .collect();
    RuleTable::new(rules).unwrap()
}

fn bench_builtin_table(c: &mut Criterion) {
    let mut group = c.benchmark_group("builtin_table");
    let table = RuleTable::builtin();

    let matched = ProductBadgeContext::new(1)
        .with_brand(Some("Planted Co."))
        .with_free_shipping(true);
    let unmatched = ProductBadgeContext::new(1).with_brand(Some("Acme"));

    group.bench_function("matched", |b| {
        b.iter(|| evaluate(black_box(&table), black_box(&matched)))
    });
    group.bench_function("unmatched", |b| {
        b.iter(|| evaluate(black_box(&table), black_box(&unmatched)))
    });

    group.finish();
}

fn bench_validate(c: &mut Criterion) {
    let product = json!({
        "entityId": 7,
        "brand": { "name": "Planted" },
        "sku": "PLT-1",
        "price": { "value": 19.5 },
        "isFreeShippingEligible": true
    });

    c.bench_function("validate_product", |b| {
        b.iter(|| validate(black_box(&product), black_box(7)))
    });
}

fn bench_table_size(c: &mut Criterion) {
    let mut group = c.benchmark_group("table_size");
    let ctx = ProductBadgeContext::new(1).with_brand(Some("brand5"));

    for size in [10, 100, 1000] {
        let table = create_table(size);
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &table, |b, table| {
            b.iter(|| evaluate(black_box(table), black_box(&ctx)))
        });
    }

    group.finish();
}

criterion_group!(benches, bench_builtin_table, bench_validate, bench_table_size);
criterion_main!(benches);
