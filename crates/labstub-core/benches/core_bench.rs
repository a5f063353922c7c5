//! Criterion benchmarks for labstub-core.
//!
//! ## Benchmark groups
//!
//! 1. **extract** — Parsing and signature extraction on synthetic adapters.
//! 2. **reconcile** — Signature checks and lab row building.
//! 3. **generate** — Action and assistant stub rendering.
//!
//! ## Running
//!
//! ```sh
//! cargo bench --manifest-path crates/labstub-core/Cargo.toml -- extract
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use labstub_core::generate::actions::generate_action_stubs;
use labstub_core::generate::assistants::generate_assistant_stubs;
use labstub_core::models::{
    AssistantParam, AssistantSignature, Constraint, Lab, RemoteAssistant, RemoteParameter, SubType, TypeInfo,
};
use labstub_core::naming::natural_cmp;
use labstub_core::parser::signatures::{extract_assistant_signatures, extract_file_data};
use labstub_core::parser::source::parse_source;
use labstub_core::reconcile::labs::build_lab_rows;
use labstub_core::reconcile::reconcile;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Adapter module with `n` actions and one dataclass.
fn adapter_source(n: usize) -> String {
    let mut src = String::from(
        "from dataclasses import dataclass\n\
         from artificial.adapter_common import ActionModule, action\n\n\
         @dataclass\nclass Position:\n    x: float\n    y: float\n\n\
         class Arm(ActionModule):\n    def __init__(self):\n        super().__init__('arm')\n\n",
    );
    for i in 0..n {
        src.push_str(&format!(
            "    @action(name='arm/move_{i}')\n    async def move_{i}(self, target: Position, speed: float, \
             wells: List[int]) -> types.Result:\n        pass\n\n"
        ));
    }
    src
}

fn remote_assistants(n: usize) -> Vec<RemoteAssistant> {
    (0..n)
        .map(|i| RemoteAssistant {
            id: format!("A{i}"),
            name: format!("Assistant {i}"),
            constraint: Some(Constraint {
                lab_id: Some(format!("lab-{}", i % 4)),
            }),
            parameters: vec![
                RemoteParameter {
                    id: None,
                    input: true,
                    index: Some(0),
                    type_info: TypeInfo {
                        name: "Plate".into(),
                        type_: "EQUIPMENT_REF".into(),
                        sub_types: vec![],
                    },
                },
                RemoteParameter {
                    id: None,
                    input: true,
                    index: Some(1),
                    type_info: TypeInfo {
                        name: "Wells".into(),
                        type_: "ARRAY".into(),
                        sub_types: vec![SubType { type_: "INT".into() }],
                    },
                },
            ],
        })
        .collect()
}

fn local_stubs(n: usize) -> Vec<AssistantSignature> {
    (0..n)
        .map(|i| AssistantSignature {
            action_id: format!("A{i}"),
            name: format!("assistant_{i}"),
            parameters: vec![
                AssistantParam {
                    name: "arg_plate".into(),
                    type_: "str".into(),
                    assistant_name: "Plate".into(),
                },
                AssistantParam {
                    name: "arg_wells".into(),
                    type_: "List[int]".into(),
                    assistant_name: "Wells".into(),
                },
            ],
        })
        .collect()
}

fn labs() -> Vec<Lab> {
    (0..4)
        .map(|i| Lab {
            id: format!("lab-{i}"),
            name: format!("Lab {i}"),
        })
        .collect()
}

// ---------------------------------------------------------------------------
// 1. Extraction
// ---------------------------------------------------------------------------

fn bench_extract(c: &mut Criterion) {
    let mut group = c.benchmark_group("extract");
    for n in [10usize, 100, 500] {
        let source = adapter_source(n);
        group.bench_with_input(BenchmarkId::new("adapter_file", n), &source, |b, src| {
            b.iter(|| {
                let parsed = parse_source(black_box(src), "arm.py").unwrap();
                black_box(extract_file_data(&parsed))
            })
        });
    }

    let stub_file = generate_assistant_stubs(&remote_assistants(200), &[]);
    group.bench_function("assistant_stub_file_200", |b| {
        b.iter(|| {
            let parsed = parse_source(black_box(&stub_file), "stubs.py").unwrap();
            black_box(extract_assistant_signatures(&parsed))
        })
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// 2. Reconciliation
// ---------------------------------------------------------------------------

fn bench_reconcile(c: &mut Criterion) {
    let mut group = c.benchmark_group("reconcile");
    let remotes = remote_assistants(500);
    let locals = local_stubs(500);

    group.bench_function("single_signature_last_of_500", |b| {
        b.iter(|| black_box(reconcile(black_box(&locals[499]), &remotes)))
    });
    group.bench_function("lab_rows_500", |b| {
        let labs = labs();
        b.iter(|| black_box(build_lab_rows(&labs, &remotes, &locals)))
    });
    group.bench_function("natural_cmp", |b| {
        b.iter(|| black_box(natural_cmp(black_box("Assistant 10b"), black_box("assistant 9c"))))
    });
    group.finish();
}

// ---------------------------------------------------------------------------
// 3. Generation
// ---------------------------------------------------------------------------

fn bench_generate(c: &mut Criterion) {
    let mut group = c.benchmark_group("generate");
    let parsed = parse_source(&adapter_source(200), "arm.py").unwrap();
    let files = vec![extract_file_data(&parsed)];
    group.bench_function("action_stubs_200", |b| {
        b.iter(|| black_box(generate_action_stubs(black_box(&files))))
    });

    let remotes = remote_assistants(200);
    let locals = local_stubs(200);
    group.bench_function("assistant_stubs_200", |b| {
        b.iter(|| black_box(generate_assistant_stubs(black_box(&remotes), &locals)))
    });
    group.finish();
}

criterion_group!(benches, bench_extract, bench_reconcile, bench_generate);
criterion_main!(benches);
