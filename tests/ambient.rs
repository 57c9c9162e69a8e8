//! Everything here mutates the process-wide settings, so each test holds `LOCK`.

use eltype::prelude::*;
use eltype::{default_precision, set_default_precision, settings, with_precision, Settings};
use once_cell::sync::Lazy;
use parking_lot::Mutex;
use pretty_assertions::assert_eq;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread;

static LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

fn leaf_precisions(v: &Value) -> Vec<u32> {
    match v {
        Value::Collection(c) => c.items().iter().flat_map(leaf_precisions).collect(),
        Value::Complex { re, im } => leaf_precisions(re).into_iter().chain(leaf_precisions(im)).collect(),
        Value::Scalar(Scalar::BigFloat(x)) => vec![x.precision()],
        _ => Vec::new(),
    }
}

fn floats(n: usize) -> Value {
    Value::vector(ScalarKind::Float64, (0..n).map(|i| Value::from(i as f64 / 7.0)).collect()).unwrap()
}

#[test]
fn ambient_default_is_used_without_explicit_precision() {
    let _guard = LOCK.lock();
    let out = with_precision(100, || precisionconvert(&ScalarKind::BigFloat, &floats(3), None)).unwrap().unwrap();
    assert_eq!(leaf_precisions(&out), vec![100; 3]);
    let out = with_precision(100, || precisionconvert(&ScalarKind::BigFloat, &floats(3), Some(33))).unwrap().unwrap();
    assert_eq!(leaf_precisions(&out), vec![33; 3]);
    let out = with_precision(12, || elconvert(&ScalarKind::BigFloat, &floats(2))).unwrap().unwrap();
    assert_eq!(leaf_precisions(&out), vec![12; 2]);
}

#[test]
fn setting_and_restoring_the_default() {
    let _guard = LOCK.lock();
    let before = default_precision();
    let previous = set_default_precision(512).unwrap();
    assert_eq!(previous, before);
    assert_eq!(default_precision(), 512);
    assert_eq!(set_default_precision(0), Err(EltypeError::InvalidPrecision(0)));
    assert_eq!(default_precision(), 512);
    set_default_precision(before).unwrap();

    let seen = with_precision(64, default_precision).unwrap();
    assert_eq!(seen, 64);
    assert_eq!(default_precision(), before);
    assert!(with_precision(0, || ()).is_err());
}

#[test]
fn installed_depth_bounds_classification() {
    let _guard = LOCK.lock();
    let previous = settings::install(Settings { max_depth: 3, ..settings::current() }).unwrap();
    let deep = TypeDesc::vector(TypeDesc::vector(TypeDesc::vector(TypeDesc::vector(ScalarKind::Int8.into()))));
    let result = basetype(&deep);
    settings::install(previous).unwrap();
    assert!(result.unwrap_err().is_recursion());
    assert_eq!(basetype(&deep).unwrap(), TypeDesc::Scalar(ScalarKind::Int8));
    assert!(settings::install(Settings { max_depth: 0, ..previous }).is_err());
}

#[test]
fn unbounded_depth_still_converts() {
    let _guard = LOCK.lock();
    let previous = settings::install(Settings { max_depth: usize::MAX, ..settings::current() }).unwrap();
    let inner = Value::vector(ScalarKind::Int64, vec![Value::from(1i64), Value::from(2i64)]).unwrap();
    let nested = Value::vector(type_of(&inner), vec![inner]).unwrap();
    let out = elconvert(&ScalarKind::Float64, &nested);
    let classified = basetype(&type_of(&nested));
    settings::install(previous).unwrap();
    assert_eq!(type_of(&out.unwrap()), TypeDesc::vector(TypeDesc::vector(ScalarKind::Float64.into())));
    assert_eq!(classified.unwrap(), TypeDesc::Scalar(ScalarKind::Int64));
}

#[test]
fn one_precision_per_call_under_concurrent_changes() {
    let _guard = LOCK.lock();
    let before = default_precision();
    let stop = AtomicBool::new(false);
    let z = Value::complex(Value::from(0.1), Value::from(0.3)).unwrap();
    let a = Value::vector(type_of(&z), vec![z; 200]).unwrap();

    let runs = thread::scope(|scope| {
        scope.spawn(|| {
            let mut flip = false;
            while !stop.load(Ordering::Relaxed) {
                let _ = set_default_precision(if flip { 24 } else { 240 });
                flip = !flip;
            }
        });

        let runs: Vec<(Vec<u32>, Vec<u32>)> = (0..20)
            .map(|_| {
                let explicit = precisionconvert(&ScalarKind::BigFloat, &a, Some(70)).map(|v| leaf_precisions(&v));
                let ambient = precisionconvert(&ScalarKind::BigFloat, &a, None).map(|v| leaf_precisions(&v));
                (explicit.unwrap_or_default(), ambient.unwrap_or_default())
            })
            .collect();
        stop.store(true, Ordering::Relaxed);
        runs
    });
    set_default_precision(before).unwrap();

    for (explicit, ambient) in runs {
        assert_eq!(explicit, vec![70; 400]);
        assert_eq!(ambient.len(), 400);
        assert!(ambient.iter().all(|&p| p == ambient[0]), "mixed precisions in one call");
    }
}
