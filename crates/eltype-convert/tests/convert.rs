use eltype_convert as ec;
use eltype_core::{type_of, BigFloat, ConversionFailure, EltypeError, Scalar, ScalarKind, TypeDesc, Value};
use num_bigint::BigInt;
use pretty_assertions::assert_eq;

fn int(n: i64) -> Value { Value::from(n) }
fn f64v(x: f64) -> Value { Value::from(x) }
fn ints(ns: &[i64]) -> Value { Value::vector(ScalarKind::Int64, ns.iter().map(|&n| int(n)).collect()).unwrap() }

fn bigfloat_precisions(v: &Value, out: &mut Vec<u32>) {
    match v {
        Value::Scalar(Scalar::BigFloat(x)) => out.push(x.precision()),
        Value::Scalar(_) | Value::Range(_) => {}
        Value::Collection(c) => c.items().iter().for_each(|item| bigfloat_precisions(item, out)),
        Value::Complex { re, im } => {
            bigfloat_precisions(re, out);
            bigfloat_precisions(im, out);
        }
        Value::Ratio { num, den } => {
            bigfloat_precisions(num, out);
            bigfloat_precisions(den, out);
        }
    }
}

#[test]
fn elconvert_touches_one_level() {
    let a = Value::vector(TypeDesc::vector(ScalarKind::Int64.into()), vec![ints(&[1, 2]), ints(&[3])]).unwrap();
    let out = ec::elconvert(&TypeDesc::vector(TypeDesc::vector(ScalarKind::Int32.into())), &a).unwrap();
    let i32s = |ns: Vec<i32>| Value::vector(ScalarKind::Int32, ns.into_iter().map(Value::from).collect()).unwrap();
    let expected = Value::vector(TypeDesc::vector(ScalarKind::Int32.into()), vec![i32s(vec![1, 2]), i32s(vec![3])]).unwrap();
    assert_eq!(out, expected);
    // the inner vectors are elements, not leaves
    assert!(ec::elconvert(&ScalarKind::Int32, &a).unwrap_err().is_unsupported());

    let flat = ints(&[1, 2, 3]);
    let out = ec::elconvert(&ScalarKind::Float64, &flat).unwrap();
    assert_eq!(out, Value::vector(ScalarKind::Float64, vec![f64v(1.0), f64v(2.0), f64v(3.0)]).unwrap());
    // element type already matches: converting again changes nothing
    assert_eq!(ec::elconvert(&ScalarKind::Float64, &out).unwrap(), out);
}

#[test]
fn elconvert_of_a_range() {
    let r = Value::range(1i64, 1i64, 10).unwrap();
    let out = ec::elconvert(&ScalarKind::Float64, &r).unwrap();
    assert_eq!(out.to_string(), "1.0:1.0:10.0");
}

#[test]
fn narrowing_a_range_checks_every_element() {
    let r = Value::range(0i64, 10i64, 100).unwrap();
    let err = ec::elconvert(&ScalarKind::Int8, &r).unwrap_err();
    assert!(matches!(err, EltypeError::Conversion { reason: ConversionFailure::Overflow, .. }));
    let wide_steps = Value::range(0i64, 100i64, 10).unwrap();
    assert!(ec::elconvert(&ScalarKind::Int8, &wide_steps).unwrap_err().is_conversion());
    let short = Value::range(0i64, 10i64, 12).unwrap();
    assert_eq!(ec::elconvert(&ScalarKind::Int8, &short).unwrap(), Value::range(0i8, 10i8, 12).unwrap());
}

#[test]
fn bigfloat_ranges_take_the_precision() {
    let r = Value::range(0.5, 0.25, 8).unwrap();
    let out = ec::precisionconvert(&ScalarKind::BigFloat, &r, Some(40)).unwrap();
    assert_eq!(type_of(&out), TypeDesc::range(ScalarKind::BigFloat.into()));
    match out {
        Value::Range(range) => {
            assert_eq!(range.start().precision(), Some(40));
            assert_eq!(range.step().precision(), Some(40));
            assert_eq!(range.len(), 8);
        }
        other => panic!("expected a range, got {other:?}"),
    }
}

#[test]
fn sequences_keep_their_order() {
    let seq = Value::sequence(ScalarKind::Int64, vec![int(3), int(-1), int(2)]).unwrap();
    let out = ec::elconvert(&ScalarKind::Float64, &seq).unwrap();
    assert_eq!(type_of(&out), TypeDesc::sequence(ScalarKind::Float64.into()));
    assert_eq!(out, Value::sequence(ScalarKind::Float64, vec![f64v(3.0), f64v(-1.0), f64v(2.0)]).unwrap());
    assert!(ec::elconvert(&TypeDesc::vector(ScalarKind::Float64.into()), &seq).is_ok());
}

#[test]
fn baseconvert_reaches_every_leaf() {
    let inner = Value::set(ScalarKind::Int64, vec![int(1), int(2)]).unwrap();
    let a = Value::vector(type_of(&inner), vec![inner]).unwrap();
    let out = ec::baseconvert(&ScalarKind::UInt8, &a).unwrap();
    assert_eq!(type_of(&out), TypeDesc::vector(TypeDesc::set(ScalarKind::UInt8.into())));
    assert_eq!(out.to_string(), "[Set([1, 2])]");
}

#[test]
fn baseconvert_replaces_complex_leaves() {
    let z = Value::complex(f64v(2.0), f64v(0.0)).unwrap();
    let a = Value::vector(type_of(&z), vec![z]).unwrap();
    let out = ec::baseconvert(&ScalarKind::Int16, &a).unwrap();
    assert_eq!(out, Value::vector(ScalarKind::Int16, vec![Value::from(2i16)]).unwrap());

    let w = Value::complex(f64v(2.0), f64v(1.0)).unwrap();
    let b = Value::vector(type_of(&w), vec![w]).unwrap();
    let err = ec::baseconvert(&ScalarKind::Int16, &b).unwrap_err();
    assert!(matches!(err, EltypeError::Conversion { reason: ConversionFailure::Inexact, .. }));
}

#[test]
fn precisionconvert_keeps_complex_wrappers() {
    let z = Value::complex(Value::from(1.5f32), Value::from(-0.25f32)).unwrap();
    let m = Value::matrix(type_of(&z), 1, 1, vec![z]).unwrap();
    let out = ec::precisionconvert(&ScalarKind::Float64, &m, None).unwrap();
    let expected = Value::complex(f64v(1.5), f64v(-0.25)).unwrap();
    assert_eq!(out, Value::matrix(type_of(&expected), 1, 1, vec![expected]).unwrap());
}

#[test]
fn explicit_precision_reaches_every_bigfloat_leaf() {
    let z = Value::complex(f64v(0.1), f64v(0.2)).unwrap();
    let a = Value::vector(type_of(&z), vec![z.clone(), z]).unwrap();
    let out = ec::precisionconvert(&ScalarKind::BigFloat, &a, Some(80)).unwrap();
    let mut precisions = Vec::new();
    bigfloat_precisions(&out, &mut precisions);
    assert_eq!(precisions, vec![80; 4]);
}

#[test]
fn explicit_precision_is_ignored_by_fixed_targets() {
    let a = ints(&[1, 2]);
    assert_eq!(ec::precisionconvert(&ScalarKind::Float32, &a, Some(7)).unwrap(), ec::precisionconvert(&ScalarKind::Float32, &a, None).unwrap());
    assert_eq!(ec::precisionconvert(&ScalarKind::Int8, &a, Some(0)), Err(EltypeError::InvalidPrecision(0)));
}

#[test]
fn bigfloat_rounding_follows_the_precision() {
    let third = Value::ratio(int(1), int(3)).unwrap();
    let out = ec::precisionconvert(&ScalarKind::BigFloat, &third, Some(4)).unwrap();
    let expected = BigFloat::from_rational(&third.to_rational().unwrap(), 4).unwrap();
    assert_eq!(out, Value::from(expected));
}

#[test]
fn ratios_narrow_in_integer_context() {
    let q = Value::ratio(Value::from(BigInt::from(3)), Value::from(BigInt::from(4))).unwrap();
    let out = ec::precisionconvert(&ScalarKind::Int64, &q, None).unwrap();
    assert_eq!(out, Value::ratio(int(3), int(4)).unwrap());

    let huge = Value::ratio(Value::from(BigInt::from(u64::MAX)), Value::from(BigInt::from(7))).unwrap();
    let err = ec::precisionconvert(&ScalarKind::Int64, &huge, None).unwrap_err();
    assert!(matches!(err, EltypeError::Conversion { reason: ConversionFailure::Overflow, .. }));
}

#[test]
fn ratios_collapse_in_float_context() {
    let q = Value::ratio(int(1), int(4)).unwrap();
    let zq = Value::complex(q.clone(), Value::ratio(int(-1), int(2)).unwrap()).unwrap();
    let out = ec::precisionconvert(&ScalarKind::Float64, &zq, None).unwrap();
    assert_eq!(out, Value::complex(f64v(0.25), f64v(-0.5)).unwrap());
}

#[test]
fn structural_mismatch_is_unsupported() {
    let bits = Value::bitarray(vec![2, 1], vec![true, false]).unwrap();
    let out = ec::elconvert(&ScalarKind::Int8, &bits).unwrap();
    assert_eq!(type_of(&out), TypeDesc::matrix(ScalarKind::Int8.into()));
    // a bare scalar takes the template's element type
    assert!(ec::elconvert(&TypeDesc::vector(ScalarKind::Int8.into()), &int(1)).is_ok());
    let target = TypeDesc::ratio(TypeDesc::complex(ScalarKind::Int64.into()));
    assert!(ec::baseconvert(&target, &ints(&[1])).unwrap_err().is_unsupported());
}
