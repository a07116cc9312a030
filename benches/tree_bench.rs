//! Benchmarks for the item view pipeline and the SQLite service
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use tasktree::model::TodoItemStatus;
use tasktree::service::{NotifierConfig, SqliteTodoService, TodoService};
use tasktree::tree::{build_tree, display_order, SortDirection, SortKey, SortOrder};
use tasktree::{ListId, TodoItem};

/// Parents each followed by three children; every fifth item completed
fn create_test_items(parents: usize) -> Vec<TodoItem> {
    let mut items = Vec::with_capacity(parents * 4);
    for p in 0..parents {
        let uid = format!("p{}", p);
        let mut parent = TodoItem::new(uid.clone(), format!("Item {}", parents - p));
        if p % 3 == 0 {
            parent = parent.due(format!("2024-{:02}-{:02}", p % 12 + 1, p % 28 + 1));
        }
        if p % 5 == 0 {
            parent = parent.status(TodoItemStatus::Completed);
        }
        items.push(parent);
        for c in 0..3 {
            items.push(TodoItem::new(format!("{}c{}", uid, c), format!("Sub {} of {}", c, p)).parent(uid.clone()));
        }
    }
    items
}

fn bench_pipeline(c: &mut Criterion) {
    let mut group = c.benchmark_group("pipeline");

    for parents in [100, 1000, 5000] {
        let items = create_test_items(parents);
        group.throughput(Throughput::Elements(items.len() as u64));

        group.bench_function(format!("build_tree_{}", parents), |b| {
            b.iter(|| build_tree(black_box(&items)))
        });

        let by_summary = SortOrder::by(SortKey::Summary, SortDirection::Asc);
        group.bench_function(format!("display_summary_{}", parents), |b| {
            b.iter(|| display_order(black_box(&items), Some("item"), by_summary))
        });

        let by_due = SortOrder::by(SortKey::Due, SortDirection::Desc);
        group.bench_function(format!("display_due_{}", parents), |b| {
            b.iter(|| display_order(black_box(&items), None, by_due))
        });
    }

    group.finish();
}

fn bench_sqlite_move(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let service = SqliteTodoService::open_in_memory(NotifierConfig::default()).unwrap();
    let list = ListId::parse("todo.bench").unwrap();
    runtime.block_on(service.create_list(&list)).unwrap();

    let uids: Vec<String> = runtime.block_on(async {
        let mut uids = Vec::new();
        for i in 0..500 {
            let item = service
                .create(&list, tasktree::NewTodoItem::new(format!("Item {}", i)))
                .await
                .unwrap();
            uids.push(item.uid);
        }
        uids
    });

    c.bench_function("sqlite_move_500", |b| {
        let mut n = 0usize;
        b.iter(|| {
            let uid = &uids[n % uids.len()];
            n += 1;
            runtime
                .block_on(service.move_item(&list, black_box(uid), None))
                .unwrap()
        })
    });
}

criterion_group!(benches, bench_pipeline, bench_sqlite_move);
criterion_main!(benches);
