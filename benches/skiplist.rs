use criterion::{Bencher, Criterion, black_box};
use multiskip::SkipList;
use rand::prelude::*;

fn bench_insert(b: &mut Bencher, base: usize, inserts: usize) {
    let mut sl: SkipList<u32> = SkipList::with_capacity(base + inserts);
    let mut rng = SmallRng::from_rng(&mut rand::rng());

    for _ in 0..base {
        sl.insert(rng.random());
    }

    b.iter(|| {
        for _ in 0..inserts {
            sl.insert(rng.random());
        }
    });
}

fn bench_contains(b: &mut Bencher, size: usize) {
    let mut sl: SkipList<u32> = SkipList::with_capacity(size);
    let mut rng = SmallRng::from_rng(&mut rand::rng());

    for _ in 0..size {
        sl.insert(rng.random());
    }

    b.iter(|| {
        black_box(sl.contains(&rng.random()));
    });
}

fn bench_remove_insert(b: &mut Bencher, size: usize) {
    let mut sl: SkipList<u32> = SkipList::with_capacity(size);
    let mut rng = SmallRng::from_rng(&mut rand::rng());
    let mut values = Vec::with_capacity(size);

    for _ in 0..size {
        let value = rng.random();
        sl.insert(value);
        values.push(value);
    }

    let mut index = 0;
    b.iter(|| {
        let value = values[index % values.len()];
        if sl.remove(&value).is_ok() {
            sl.insert(value);
        }
        index += 1;
    });
}

fn bench_iter(b: &mut Bencher, size: usize) {
    let mut sl: SkipList<u32> = SkipList::with_capacity(size);
    let mut rng = SmallRng::from_rng(&mut rand::rng());

    for _ in 0..size {
        sl.insert(rng.random());
    }

    b.iter(|| {
        for entry in &sl {
            black_box(entry);
        }
    });
}

pub fn benchmark(c: &mut Criterion) {
    c.bench_function("SkipList insert 10 (empty)", |b| {
        bench_insert(b, 0, 10);
    });
    c.bench_function("SkipList insert 1000 (empty)", |b| {
        bench_insert(b, 0, 1_000);
    });
    c.bench_function("SkipList insert 10 (100,000)", |b| {
        bench_insert(b, 100_000, 10);
    });
    c.bench_function("SkipList insert 1000 (100,000)", |b| {
        bench_insert(b, 100_000, 1_000);
    });

    c.bench_function("SkipList contains (1000)", |b| {
        bench_contains(b, 1_000);
    });
    c.bench_function("SkipList contains (100,000)", |b| {
        bench_contains(b, 100_000);
    });

    c.bench_function("SkipList remove + insert (1000)", |b| {
        bench_remove_insert(b, 1_000);
    });
    c.bench_function("SkipList remove + insert (100,000)", |b| {
        bench_remove_insert(b, 100_000);
    });

    c.bench_function("SkipList iter (10,000)", |b| {
        bench_iter(b, 10_000);
    });
}
