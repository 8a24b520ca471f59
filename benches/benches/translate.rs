use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};
use serts_typegen::{FieldDescriptor, PrimitiveType, SchemaDescriptor, TypeScriptOptions, translate};
use std::hint::black_box;

/// `count` independent schemas spread over ten modules, each with a handful of
/// primitive fields and one reference into the previous module.
fn wide_set(count: usize) -> Vec<SchemaDescriptor> {
    (0..count)
        .map(|i| {
            let module = format!("m{}", i % 10);
            let mut fields = vec![
                FieldDescriptor::primitive("id", PrimitiveType::Integer),
                FieldDescriptor::primitive("name", PrimitiveType::Text),
                FieldDescriptor::primitive("created_at", PrimitiveType::Datetime).nullable(),
                FieldDescriptor::choice("state", &["draft", "live", "archived"]),
            ];
            if i >= 10 {
                fields.push(FieldDescriptor::nested("parent", format!("S{}", i - 10)));
            }
            SchemaDescriptor::new(format!("S{i}"), &[module.as_str()], fields)
        })
        .collect()
}

/// One ring of `count` schemas where each references the next.
fn cyclic_set(count: usize) -> Vec<SchemaDescriptor> {
    (0..count)
        .map(|i| {
            SchemaDescriptor::new(
                format!("R{i}"),
                &["ring"],
                vec![
                    FieldDescriptor::nested("next", format!("R{}", (i + 1) % count)),
                    FieldDescriptor::nested_list("peers", format!("R{}", (i + 2) % count)),
                ],
            )
        })
        .collect()
}

fn benchmark_translate(c: &mut Criterion) {
    let options = TypeScriptOptions::default();
    let mut group = c.benchmark_group("translate");

    for size in [100, 1_000] {
        let wide = wide_set(size);
        group.bench_with_input(BenchmarkId::new("wide", size), &wide, |b, schemas| {
            b.iter(|| translate(black_box(schemas), &options))
        });

        let ring = cyclic_set(size);
        group.bench_with_input(BenchmarkId::new("cyclic", size), &ring, |b, schemas| {
            b.iter(|| translate(black_box(schemas), &options))
        });
    }

    group.finish();
}

criterion_group!(benches, benchmark_translate);
criterion_main!(benches);
