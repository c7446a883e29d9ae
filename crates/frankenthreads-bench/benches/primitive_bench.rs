use criterion::{Criterion, black_box, criterion_group, criterion_main};

use frankenthreads_native::{Barrier, Mutex, RwLock, Semaphore};

fn benchmark_uncontended_primitives(c: &mut Criterion) {
    let mut group = c.benchmark_group("uncontended");

    let mutex = Mutex::init(None).expect("mutex init");
    group.bench_function("mutex_lock_unlock", |b| {
        b.iter(|| {
            mutex.lock().expect("lock");
            black_box(&mutex);
            mutex.unlock().expect("unlock");
        });
    });

    let rwlock = RwLock::init().expect("rwlock init");
    group.bench_function("rwlock_read", |b| {
        b.iter(|| {
            rwlock.rd_lock().expect("rdlock");
            black_box(&rwlock);
            rwlock.unlock().expect("unlock");
        });
    });
    group.bench_function("rwlock_write", |b| {
        b.iter(|| {
            rwlock.wr_lock().expect("wrlock");
            black_box(&rwlock);
            rwlock.unlock().expect("unlock");
        });
    });

    let semaphore = Semaphore::init(1).expect("sem init");
    group.bench_function("semaphore_wait_post", |b| {
        b.iter(|| {
            semaphore.wait().expect("wait");
            black_box(&semaphore);
            semaphore.post().expect("post");
        });
    });

    let barrier = Barrier::init(1).expect("barrier init");
    group.bench_function("barrier_single_party_round", |b| {
        b.iter(|| {
            barrier.wait().expect("wait");
            black_box(&barrier);
        });
    });

    group.finish();
}

criterion_group!(benches, benchmark_uncontended_primitives);
criterion_main!(benches);
