//! Single-row SELECT latency: raw `rusqlite` against `QueryFacade::select` on
//! the same file. The gap is the facade's checkout, blocking hand-off and
//! value conversion.

use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use rusqlite::Connection;
use sql_facade::prelude::*;
use tokio::runtime::Runtime;

const ROWS: i64 = 1000;
const LOOKUP_SQL: &str = "SELECT id, name, score FROM test WHERE id = ?1";

/// Visits every id once in a fixed, cache-unfriendly order.
fn lookup_order() -> Vec<i64> {
    (0..ROWS).map(|i| (i * 7919) % ROWS + 1).collect()
}

fn seed(path: &str) -> rusqlite::Result<()> {
    let mut conn = Connection::open(path)?;
    conn.execute_batch(
        "CREATE TABLE test (id INTEGER PRIMARY KEY, name TEXT NOT NULL, score REAL NOT NULL);",
    )?;
    let tx = conn.transaction()?;
    {
        let mut insert = tx.prepare("INSERT INTO test (id, name, score) VALUES (?1, ?2, ?3)")?;
        for id in 1..=ROWS {
            insert.execute(rusqlite::params![id, format!("name-{id}"), id as f64 * 0.5])?;
        }
    }
    tx.commit()
}

fn single_row_lookup(c: &mut Criterion) {
    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("lookup.db").to_string_lossy().into_owned();
    seed(&path).expect("seed dataset");
    let ids = lookup_order();
    let runtime = Runtime::new().expect("tokio runtime");

    let mut group = c.benchmark_group("sqlite_single_row_lookup");
    group.throughput(Throughput::Elements(ids.len() as u64));

    let conn = Connection::open(&path).expect("open sqlite");
    group.bench_function(BenchmarkId::new("rusqlite", ids.len()), |b| {
        b.iter(|| {
            let mut stmt = conn.prepare_cached(LOOKUP_SQL).expect("prepare");
            for &id in &ids {
                let name: String = stmt.query_row([id], |row| row.get(1)).expect("row");
                black_box(name);
            }
        });
    });

    let facade = runtime
        .block_on(async { QueryFacade::create(FacadeConfig::sqlite(path.clone())) })
        .expect("create facade");
    group.bench_function(BenchmarkId::new("facade", ids.len()), |b| {
        b.to_async(&runtime).iter(|| async {
            for &id in &ids {
                let rs = facade
                    .select(LOOKUP_SQL, &[RowValues::Int(id)])
                    .await
                    .expect("facade select");
                black_box(rs.results[0].get("name").and_then(RowValues::as_text).map(str::len));
            }
        });
    });

    group.finish();
}

criterion_group!(benches, single_row_lookup);
criterion_main!(benches);
