//! Benchmarks for line editing and redraw.

use criterion::{Criterion, black_box, criterion_group, criterion_main};
use rawline::prelude::*;

fn bench_type_full_line(c: &mut Criterion) {
    c.bench_function("type_full_line", |b| {
        b.iter(|| {
            let options = ReadOptions::new(80).with_highlight(HighlightOptions::disabled());
            let mut session =
                Session::new(ScriptedSource::default(), Vec::new(), options, Callbacks::new());
            for _ in 0..80 {
                session.feed(black_box(b"x")).unwrap();
            }
            session.into_sink()
        });
    });
}

fn bench_insert_at_start(c: &mut Criterion) {
    c.bench_function("insert_at_start", |b| {
        b.iter(|| {
            let options = ReadOptions::new(80).with_highlight(HighlightOptions::disabled());
            let mut session =
                Session::new(ScriptedSource::default(), Vec::new(), options, Callbacks::new());
            for _ in 0..40 {
                session.feed(b"\x1bOH").unwrap();
                session.feed(black_box(b"x")).unwrap();
            }
            session.into_sink()
        });
    });
}

fn bench_callback_replace(c: &mut Criterion) {
    c.bench_function("callback_replace", |b| {
        b.iter(|| {
            let callbacks = Callbacks::new().on(Action::Down, |line, _, _| {
                CallbackResult::none().with_string(line.to_uppercase())
            });
            let options = ReadOptions::new(80).with_highlight(HighlightOptions::disabled());
            let mut session = Session::new(ScriptedSource::default(), Vec::new(), options, callbacks);
            for _ in 0..20 {
                session.feed(b"a").unwrap();
                session.feed(black_box(b"\x1b[B")).unwrap();
            }
            session.into_sink()
        });
    });
}

criterion_group!(
    benches,
    bench_type_full_line,
    bench_insert_at_start,
    bench_callback_replace
);
criterion_main!(benches);
