//! Element, base and precision types of a descriptor.
//!
//! Every walk is bounded by `limit` unwrap steps, so malformed or self-referential descriptors
//! fail with a recursion error instead of looping.

use eltype_core::{EltypeError, Result, TypeDesc};
use tracing::trace;

/// One level below a container; non-containers are their own element type.
pub fn element_type(t: &TypeDesc) -> TypeDesc {
    match t.resolved() {
        TypeDesc::Container(_, elem) => (**elem).clone(),
        _ => t.clone(),
    }
}

/// Applies [`element_type`] until it stops changing, unwrapping at most `limit` levels.
pub fn basetype_with_limit(t: &TypeDesc, limit: usize) -> Result<TypeDesc> {
    let mut current = t.clone();
    for step in 0..=limit {
        let next = element_type(&current);
        if next == current {
            trace!(%t, steps = step, base = %current, "basetype fixpoint");
            return Ok(current);
        }
        current = next;
    }
    Err(recursion(t, limit))
}

/// Unwraps containers and complex wrappers. Ratio wrappers are unwrapped only in an integer
/// context; otherwise they are terminal.
pub fn precisiontype_with_limit(t: &TypeDesc, integer_context: bool, limit: usize) -> Result<TypeDesc> {
    let mut current = t;
    for _ in 0..=limit {
        current = match current.resolved() {
            TypeDesc::Container(_, elem) => &**elem,
            TypeDesc::Complex(component) => &**component,
            TypeDesc::Ratio(part) if integer_context => &**part,
            _ => return Ok(current.clone()),
        };
    }
    Err(recursion(t, limit))
}

/// `precisiontype(t)` in the calling context of `target`: ratios unwrap when `target`'s own
/// precision type is an integer kind.
pub fn precisiontype_for(target: &TypeDesc, t: &TypeDesc, limit: usize) -> Result<TypeDesc> {
    let integer_context = precisiontype_with_limit(target, false, limit)?.is_integer();
    precisiontype_with_limit(t, integer_context, limit)
}

/// `s` with its element type replaced by the element type of `t`.
pub fn to_eltype(t: &TypeDesc, s: &TypeDesc) -> TypeDesc {
    let elem = element_type(t).resolved().clone();
    match s.resolved() {
        TypeDesc::Container(kind, _) => TypeDesc::container(*kind, elem),
        _ => elem,
    }
}

/// `s`'s container nesting around the basetype of `t`.
pub fn to_basetype(t: &TypeDesc, s: &TypeDesc, limit: usize) -> Result<TypeDesc> {
    let leaf = basetype_with_limit(t, limit)?.resolved().clone();
    rebuild(s, limit, &|node: &TypeDesc| match node {
        TypeDesc::Container(..) => Descend::Into,
        _ => Descend::Replace,
    }, &leaf)
}

/// `s` with containers, complex wrappers and (for integer targets) ratio wrappers kept, and
/// everything below them replaced by the precision type of `t`.
pub fn to_precisiontype(t: &TypeDesc, s: &TypeDesc, limit: usize) -> Result<TypeDesc> {
    let leaf = precisiontype_with_limit(t, false, limit)?.resolved().clone();
    let unwrap_ratio = leaf.is_integer();
    rebuild(s, limit, &|node: &TypeDesc| match node {
        TypeDesc::Container(..) | TypeDesc::Complex(_) => Descend::Into,
        TypeDesc::Ratio(_) if unwrap_ratio => Descend::Into,
        _ => Descend::Replace,
    }, &leaf)
}

enum Descend {
    Into,
    Replace,
}

fn rebuild(s: &TypeDesc, limit: usize, rule: &dyn Fn(&TypeDesc) -> Descend, leaf: &TypeDesc) -> Result<TypeDesc> {
    fn go(
        node: &TypeDesc,
        depth: usize,
        limit: usize,
        rule: &dyn Fn(&TypeDesc) -> Descend,
        leaf: &TypeDesc,
    ) -> Result<TypeDesc> {
        if depth > limit {
            return Err(recursion(node, limit));
        }
        let node = node.resolved();
        if let Descend::Replace = rule(node) {
            return Ok(leaf.clone());
        }
        Ok(match node {
            TypeDesc::Container(kind, elem) => TypeDesc::container(*kind, go(elem, depth + 1, limit, rule, leaf)?),
            TypeDesc::Complex(component) => TypeDesc::complex(go(component, depth + 1, limit, rule, leaf)?),
            TypeDesc::Ratio(part) => TypeDesc::ratio(go(part, depth + 1, limit, rule, leaf)?),
            _ => leaf.clone(),
        })
    }
    go(s, 0, limit, rule, leaf)
}

fn recursion(t: &TypeDesc, limit: usize) -> EltypeError {
    EltypeError::Recursion { ty: t.to_string(), limit }
}
