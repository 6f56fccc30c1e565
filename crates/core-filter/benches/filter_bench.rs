use core_attribute::{AttributeValue, IdpAttribute};
use core_filter::{
    AttributeFilter, AttributeFilterBuilder, AttributeFilterContext, AttributeRuleBuilder,
    FactRule, FilterPolicyBuilder, ValuePattern, ValueStringMatcher,
};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use std::sync::Arc;

fn create_test_engine(num_policies: usize) -> AttributeFilter {
    let mut builder = AttributeFilterBuilder::new("benchmark-engine");

    for i in 0..num_policies {
        let policy = FilterPolicyBuilder::new(format!("policy{i}"))
            .when(Arc::new(FactRule::requester(ValuePattern::exact(format!(
                "https://sp{i}.example.org"
            )))))
            .add_rule(
                AttributeRuleBuilder::new()
                    .for_attribute("eduPersonAffiliation")
                    .permit(Arc::new(ValueStringMatcher::new(ValuePattern::exact(
                        "member",
                    ))))
                    .build()
                    .unwrap(),
            )
            .build()
            .unwrap();
        builder = builder.add_policy(policy);
    }

    builder.build().unwrap()
}

fn create_test_context(requester: &str) -> AttributeFilterContext {
    let mut ctx = AttributeFilterContext::new()
        .with_principal("jsmith")
        .with_requester(requester);
    ctx.set_prefiltered_attributes(vec![
        IdpAttribute::new("eduPersonAffiliation")
            .unwrap()
            .with_value(AttributeValue::from("member"))
            .with_value(AttributeValue::from("student"))
            .with_value(AttributeValue::from("staff")),
        IdpAttribute::new("uid")
            .unwrap()
            .with_value(AttributeValue::from("jsmith")),
    ]);
    ctx
}

fn benchmark_filtering(c: &mut Criterion) {
    let engine_10 = create_test_engine(10);
    let engine_100 = create_test_engine(100);

    c.bench_function("filter_10_policies", |b| {
        b.iter(|| {
            let mut ctx = create_test_context(black_box("https://sp5.example.org"));
            engine_10.filter_attributes(&mut ctx).unwrap();
            ctx
        });
    });

    c.bench_function("filter_100_policies", |b| {
        b.iter(|| {
            let mut ctx = create_test_context(black_box("https://sp50.example.org"));
            engine_100.filter_attributes(&mut ctx).unwrap();
            ctx
        });
    });
}

fn benchmark_engine_creation(c: &mut Criterion) {
    c.bench_function("engine_create_10_policies", |b| {
        b.iter(|| create_test_engine(black_box(10)));
    });
}

criterion_group!(benches, benchmark_filtering, benchmark_engine_creation);
criterion_main!(benches);
