//! Store benchmarks
//!
//! Measures reducer cost in isolation, dispatch throughput through the
//! Store, and the overhead of selector listeners on each dispatch.
//!
//! Run with: `cargo bench`

#![allow(missing_docs)] // Benchmarks don't need extensive docs
#![allow(clippy::expect_used)] // Benchmarks can use expect for setup
#![allow(dead_code)] // Benchmark data structures may have unused fields

use criterion::{Criterion, Throughput, black_box, criterion_group, criterion_main};
use statekit_core::reducer::Reducer;
use statekit_runtime::Store;

#[derive(Clone, Debug)]
struct BenchState {
    counter: i64,
    data: Vec<u8>, // For testing snapshot copy cost
}

impl Default for BenchState {
    fn default() -> Self {
        Self {
            counter: 0,
            data: vec![0; 1024], // 1KB of data
        }
    }
}

#[derive(Clone, Debug)]
enum BenchAction {
    Increment,
    SetValue(i64),
}

struct BenchReducer;

impl Reducer for BenchReducer {
    type State = BenchState;
    type Action = BenchAction;
    type Environment = ();

    fn reduce(&self, state: &mut Self::State, action: Self::Action, _env: &()) {
        match action {
            BenchAction::Increment => state.counter += 1,
            BenchAction::SetValue(v) => state.counter = v,
        }
    }
}

fn benchmark_reducer_execution(c: &mut Criterion) {
    let mut group = c.benchmark_group("reducer");
    group.throughput(Throughput::Elements(1));

    group.bench_function("increment", |b| {
        let mut state = BenchState::default();
        b.iter(|| BenchReducer.reduce(&mut state, black_box(BenchAction::Increment), &()));
    });

    group.finish();
}

fn benchmark_store_throughput(c: &mut Criterion) {
    let mut group = c.benchmark_group("store_throughput");
    group.throughput(Throughput::Elements(1));

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .expect("Failed to build runtime");

    group.bench_function("send_action", |b| {
        let store = Store::new(BenchState::default(), BenchReducer, ());

        b.to_async(&runtime).iter(|| async {
            store.send(black_box(BenchAction::Increment)).await;
        });
    });

    group.bench_function("send_with_ten_listeners", |b| {
        let store = Store::new(BenchState::default(), BenchReducer, ());
        let subscriptions: Vec<_> = runtime.block_on(async {
            let mut subs = Vec::new();
            for _ in 0..10 {
                let (_, sub) = store.subscribe(|s| s.counter, |_| {}).await;
                subs.push(sub);
            }
            subs
        });

        b.to_async(&runtime).iter(|| async {
            store.send(black_box(BenchAction::SetValue(7))).await;
        });

        drop(subscriptions);
    });

    group.finish();
}

criterion_group!(benches, benchmark_reducer_execution, benchmark_store_throughput);
criterion_main!(benches);
