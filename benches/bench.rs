// Copyright 2022 houseme
//
// Licensed under the Apache License, Version 2.0 <LICENSE-APACHE or
// http://www.apache.org/licenses/LICENSE-2.0> or the MIT license
// <LICENSE-MIT or http://opensource.org/licenses/MIT>, at your
// option. This file may not be copied, modified, or distributed
// except according to those terms.

use criterion::{Criterion, criterion_group, criterion_main};
use snowflake_drift::Snowflake;
use std::hint::black_box;

fn bench_new(c: &mut Criterion) {
    c.bench_function("bench_new", |b| {
        b.iter(Snowflake::new);
    });
}

fn bench_next_id(c: &mut Criterion) {
    let sf = Snowflake::new().expect("Could not create Snowflake");
    c.bench_function("bench_next_id", |b| {
        b.iter(|| sf.next_id());
    });
}

fn bench_next_ids(c: &mut Criterion) {
    let sf = Snowflake::new().expect("Could not create Snowflake");
    c.bench_function("bench_next_ids_100", |b| {
        b.iter(|| sf.next_ids(black_box(100)));
    });
}

fn bench_parse_id(c: &mut Criterion) {
    let sf = Snowflake::new().expect("Could not create Snowflake");
    let id = sf.next_id().expect("Could not generate id");
    c.bench_function("bench_parse_id", |b| {
        b.iter(|| sf.parse_id(black_box(id)));
    });
}

criterion_group!(
    snowflake_perf,
    bench_new,
    bench_next_id,
    bench_next_ids,
    bench_parse_id
);
criterion_main!(snowflake_perf);
