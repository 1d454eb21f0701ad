use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use sqlquery::{Dialect, JoinKind, QueryFactory, Select, SqlQuery};

/// SELECT with `n` columns and `n` bound WHERE conditions:
/// SELECT t.col0, ... FROM t JOIN u ... WHERE t.col0 = :_1_ AND ...
fn build_select(factory: &QueryFactory, n: usize) -> Select {
    let mut select = factory.new_select();
    select
        .cols((0..n).map(|i| format!("t.col{i}")))
        .from("t")
        .join(JoinKind::Inner, "u", "u.id = t.u_id");
    for i in 0..n {
        select.and_where(&format!("t.col{i} = ?"), i as i64);
    }
    select.order_by(["t.col0"]).page(3);
    select
}

fn bench_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build/select");
    let factory = QueryFactory::new(Dialect::Pgsql);

    for n in [1, 5, 10, 50, 100] {
        let select = build_select(&factory, n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &select, |b, select| {
            b.iter(|| black_box(select.build()));
        });
    }

    group.finish();
}

fn bench_assemble_and_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("build/assemble_and_build");
    let factory = QueryFactory::new(Dialect::Mysql);

    for n in [1, 5, 10, 50, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let select = build_select(&factory, n);
                black_box(select.build())
            });
        });
    }

    group.finish();
}

fn bench_sub_select_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("build/sub_select_merge");
    let factory = QueryFactory::new(Dialect::Common);

    for n in [5, 20, 100] {
        let sub = build_select(&factory, n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &sub, |b, sub| {
            b.iter(|| {
                let mut outer = factory.new_select();
                outer
                    .cols(["*"])
                    .and_where("a.flag = ?", true)
                    .from_sub_select(sub, "a");
                black_box(outer.build())
            });
        });
    }

    group.finish();
}

fn bench_insert(c: &mut Criterion) {
    let mut group = c.benchmark_group("build/insert");
    let factory = QueryFactory::new(Dialect::Sqlite);

    for n in [5, 20, 100] {
        group.bench_with_input(BenchmarkId::from_parameter(n), &n, |b, &n| {
            b.iter(|| {
                let mut insert = factory.new_insert();
                insert.table("t");
                for i in 0..n {
                    insert.value(&format!("col{i}"), i as i64);
                }
                black_box(insert.build())
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_build,
    bench_assemble_and_build,
    bench_sub_select_merge,
    bench_insert
);
criterion_main!(benches);
