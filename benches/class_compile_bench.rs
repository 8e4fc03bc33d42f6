use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use opgraph::demo::{self, DEFAULT_HOST};
use opgraph::object::{Chain, ClassDef, compile_class, compile_classes};
use opgraph::scalar::{Expr, Link, ValueType};

struct Corpus {
    name: &'static str,
    class: ClassDef,
}

/// A class with `methods` POST methods, each binding `depth` chained entries.
fn build_wide_class(methods: usize, depth: usize) -> ClassDef {
    let mut class = ClassDef::new("/app/wide")
        .expect("valid link")
        .configure(|fields| fields.set("total", Chain::sync(Expr::init(ValueType::Number, 0))));

    for i in 0..methods {
        class = class.post_method(&format!("step_{i}"), &["delta"], move |cx, this, params| {
            let mut acc = cx.define("acc_0", this.chain("total").subject())?;
            for d in 1..depth {
                acc = cx.define(&format!("acc_{d}"), &acc + params.get("delta"))?;
            }
            Ok(Expr::if_then_else(acc.gt(i as u64), this.chain("total").set(&acc), Expr::none()))
        });
    }

    class
}

fn build_corpora() -> Vec<Corpus> {
    let host = Link::parse(DEFAULT_HOST).expect("valid host");
    let (left, _) = demo::balance_clusters(&host).expect("balance clusters");

    vec![
        Corpus {
            name: "example",
            class: demo::example_cluster().expect("example cluster"),
        },
        Corpus {
            name: "balance_left",
            class: left,
        },
        Corpus {
            name: "table",
            class: demo::table_cluster(&host).expect("table cluster"),
        },
        Corpus {
            name: "wide_64x32",
            class: build_wide_class(64, 32),
        },
    ]
}

fn bench_compile_class(c: &mut Criterion) {
    let corpora = build_corpora();
    let mut group = c.benchmark_group("compile/class");

    for corpus in &corpora {
        let bytes = compile_class(&corpus.class)
            .ok()
            .and_then(|graph| graph.to_bytes().ok())
            .map_or(0, |bytes| bytes.len());
        group.throughput(Throughput::Bytes(bytes as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(corpus.name),
            &corpus.class,
            |b, class| {
                b.iter(|| {
                    let graph = compile_class(black_box(class));
                    black_box(graph.is_ok());
                });
            },
        );
    }

    group.finish();
}

fn bench_fingerprint(c: &mut Criterion) {
    let graph = compile_class(&build_wide_class(64, 32)).expect("wide class compiles");

    c.bench_function("compile/fingerprint/wide_64x32", |b| {
        b.iter(|| black_box(graph.fingerprint().map(|hex| hex.len())));
    });
}

fn bench_compile_many(c: &mut Criterion) {
    let classes: Vec<ClassDef> = (0..16).map(|_| build_wide_class(16, 16)).collect();
    let mut group = c.benchmark_group("compile/many");
    group.throughput(Throughput::Elements(classes.len() as u64));

    group.bench_function("serial", |b| {
        b.iter(|| {
            let compiled = classes.iter().map(compile_class).filter(Result::is_ok).count();
            black_box(compiled);
        });
    });

    group.bench_function("parallel", |b| {
        b.iter(|| {
            let compiled = compile_classes(black_box(&classes))
                .into_iter()
                .filter(Result::is_ok)
                .count();
            black_box(compiled);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_compile_class, bench_fingerprint, bench_compile_many);
criterion_main!(benches);
