use criterion::{black_box, Criterion};
use nspline::CurveOptions;
use crate::common::samples::CURVES;

pub fn eval(c: &mut Criterion) {
    c.bench_function("eval", |b| {
        for mut curve in CURVES.iter() {
            b.iter(|| black_box(curve.evaluate(black_box(0.5))))
        }
    });
}

pub fn derivative(c: &mut Criterion) {
    c.bench_function("derivative", |b| {
        for mut curve in CURVES.iter() {
            b.iter(|| black_box(curve.derivative(black_box(0.5))))
        }
    });
}

pub fn basis(c: &mut Criterion) {
    c.bench_function("basis", |b| {
        for curve in CURVES.SPLINES.iter() {
            b.iter(|| {
                let span = curve.find_knot_span(black_box(0.3)).unwrap();
                black_box(curve.basis_functions(span, 0.3))
            })
        }
    });
}

pub fn add_knot(c: &mut Criterion) {
    c.bench_function("add_knot", |b| {
        for curve in CURVES.SPLINES.iter() {
            b.iter(|| {
                let mut curve = curve.clone();
                black_box(curve.add_knot(black_box(0.4)))
            })
        }
    });
}

pub fn sample(c: &mut Criterion) {
    let options = CurveOptions::default().with_sample_steps(200);
    c.bench_function("sample", |b| {
        for mut curve in CURVES.iter() {
            b.iter(|| black_box(curve.sample_with(&options)))
        }
    });
}

pub fn all(c: &mut Criterion) {
    eval(c);
    derivative(c);
    basis(c);
    add_knot(c);
    sample(c);
}
