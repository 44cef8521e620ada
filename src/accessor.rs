//! Single-result read and in-place write operations.
//!
//! These walk the raw split segments without classifying them: on a mapping
//! the segment is a literal key, on a sequence it must parse as `[index]`.
//! Predicate syntax is never interpreted here; resolve it with
//! [`get_all`](crate::get_all) first and feed the concrete path back in.
use crate::error::{PathError, kind_of};
use crate::parser::{parse_index, split_path};
use serde_json::{Map, Value};

/// Looks up the value at a path.
///
/// The contract is lenient: any failure along the walk, a missing key, an
/// out-of-range index, a scalar in the middle of the path, or a path that
/// does not split, yields `None` rather than an error.
pub fn get<'a>(path: &str, root: &'a Value) -> Option<&'a Value> {
    let segments = split_path(path).ok()?;
    let mut current = root;
    for raw in &segments {
        current = step(current, raw)?;
    }
    Some(current)
}

/// Replaces the value at a path.
///
/// Unlike [`get`], every resolution failure is a hard error. The terminal
/// slot must already exist: `set` never creates keys or extends sequences.
pub fn set(path: &str, new_value: Value, root: &mut Value) -> Result<(), PathError> {
    let segments = split_path(path)?;
    let Some((last, parents)) = segments.split_last() else {
        return Err(PathError::EmptyPath);
    };
    let mut current = root;
    for raw in parents {
        current = step_mut(current, raw)?;
    }
    match current {
        Value::Object(map) => match map.get_mut(last) {
            Some(slot) => {
                *slot = new_value;
                Ok(())
            }
            None => Err(PathError::MissingKey { key: last.clone() }),
        },
        Value::Array(seq) => {
            let len = seq.len();
            let index = sequence_index(last, len)?;
            seq[index] = new_value;
            Ok(())
        }
        other => Err(PathError::TypeMismatch {
            segment: last.clone(),
            expected: "a mapping or a sequence",
            actual: kind_of(other),
        }),
    }
}

/// Like [`set`], but materializes every missing intermediate as a fresh
/// empty mapping and assigns the terminal key unconditionally.
///
/// All segments are treated as literal map keys and the root must be a
/// mapping. An intermediate that already holds a non-mapping value is
/// replaced by an empty mapping, discarding whatever was there.
pub fn set_creating_new(path: &str, new_value: Value, root: &mut Value) -> Result<(), PathError> {
    let segments = split_path(path)?;
    let Some((last, parents)) = segments.split_last() else {
        return Err(PathError::EmptyPath);
    };
    let mut map = match root {
        Value::Object(map) => map,
        other => {
            return Err(PathError::TypeMismatch {
                segment: segments[0].clone(),
                expected: "a mapping",
                actual: kind_of(other),
            });
        }
    };
    for key in parents {
        let slot = map.entry(key.clone()).or_insert_with(empty_mapping);
        if !slot.is_object() {
            log::debug!("replacing the non-mapping value at key '{key}' with an empty mapping");
            *slot = empty_mapping();
        }
        map = match slot {
            Value::Object(inner) => inner,
            other => {
                return Err(PathError::TypeMismatch {
                    segment: key.clone(),
                    expected: "a mapping",
                    actual: kind_of(other),
                });
            }
        };
    }
    map.insert(last.clone(), new_value);
    Ok(())
}

fn empty_mapping() -> Value {
    Value::Object(Map::new())
}

/// One lenient navigation step, shared by the walk in [`get`].
fn step<'a>(node: &'a Value, raw: &str) -> Option<&'a Value> {
    match node {
        Value::Object(map) => map.get(raw),
        Value::Array(seq) => seq.get(parse_index(raw)?),
        _ => None,
    }
}

/// One strict navigation step, shared by the parent walk in [`set`].
fn step_mut<'a>(node: &'a mut Value, raw: &str) -> Result<&'a mut Value, PathError> {
    match node {
        Value::Object(map) => map
            .get_mut(raw)
            .ok_or_else(|| PathError::MissingKey {
                key: raw.to_string(),
            }),
        Value::Array(seq) => {
            let len = seq.len();
            let index = sequence_index(raw, len)?;
            Ok(&mut seq[index])
        }
        other => Err(PathError::TypeMismatch {
            segment: raw.to_string(),
            expected: "a mapping or a sequence",
            actual: kind_of(other),
        }),
    }
}

/// Interprets a raw segment as an index into a sequence of length `len`.
fn sequence_index(raw: &str, len: usize) -> Result<usize, PathError> {
    let index = parse_index(raw).ok_or_else(|| PathError::TypeMismatch {
        segment: raw.to_string(),
        expected: "a sequence index",
        actual: "a sequence",
    })?;
    if index >= len {
        return Err(PathError::IndexOutOfRange { index, len });
    }
    Ok(index)
}
