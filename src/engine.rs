//! The multi-match traversal engine: resolves every branch a path implies
//! against a configuration tree.
use crate::ast::{PathExpr, Segment, render_key};
use crate::error::{PathError, kind_of};
use crate::parser::parse_path;
use serde_json::Value;
use std::collections::HashMap;

/// One resolved branch of a multi-match traversal.
#[derive(Debug, Clone, PartialEq)]
pub struct Match<'a> {
    /// The concrete key path: every segment a literal key or a `[index]`,
    /// one entry per segment of the original path.
    pub key_path: Vec<String>,
    /// The value this branch resolved to, borrowed from the caller's tree.
    pub value: &'a Value,
    /// Capture name to matched field value, accumulated along this branch.
    pub bindings: HashMap<String, String>,
}

impl Match<'_> {
    /// Renders the concrete key path as a path string that parses back to
    /// the same walk, so a resolved match can be fed to [`set`](crate::set).
    pub fn path_string(&self) -> String {
        self.key_path
            .iter()
            .map(|segment| render_key(segment))
            .collect::<Vec<_>>()
            .join(".")
    }
}

/// Resolves a path against a tree and returns every match.
///
/// Predicate segments fork the walk, one branch per matching element, and a
/// predicate matching nothing simply contributes zero branches. Key and
/// index segments are mandatory: the first one that fails to resolve aborts
/// the whole call with an error and no partial results.
pub fn get_all<'a>(path: &str, root: &'a Value) -> Result<Vec<Match<'a>>, PathError> {
    let expr: PathExpr = parse_path(path)?;
    let mut results = Vec::new();
    let mut key_path = Vec::with_capacity(expr.segments.len());
    resolve(
        &expr.segments,
        root,
        &mut key_path,
        &HashMap::new(),
        &mut results,
    )?;
    Ok(results)
}

fn resolve<'a>(
    segments: &[Segment],
    node: &'a Value,
    key_path: &mut Vec<String>,
    bindings: &HashMap<String, String>,
    results: &mut Vec<Match<'a>>,
) -> Result<(), PathError> {
    let Some((segment, rest)) = segments.split_first() else {
        results.push(Match {
            key_path: key_path.clone(),
            value: node,
            bindings: bindings.clone(),
        });
        return Ok(());
    };
    match segment {
        Segment::Key(key) => {
            let Value::Object(map) = node else {
                return Err(PathError::TypeMismatch {
                    segment: segment.to_string(),
                    expected: "a mapping",
                    actual: kind_of(node),
                });
            };
            let child = map.get(key).ok_or_else(|| PathError::MissingKey {
                key: key.clone(),
            })?;
            key_path.push(key.clone());
            let outcome = resolve(rest, child, key_path, bindings, results);
            key_path.pop();
            outcome
        }
        Segment::Index(index) => {
            let Value::Array(seq) = node else {
                return Err(PathError::TypeMismatch {
                    segment: segment.to_string(),
                    expected: "a sequence",
                    actual: kind_of(node),
                });
            };
            let child = seq.get(*index).ok_or(PathError::IndexOutOfRange {
                index: *index,
                len: seq.len(),
            })?;
            key_path.push(format!("[{index}]"));
            let outcome = resolve(rest, child, key_path, bindings, results);
            key_path.pop();
            outcome
        }
        Segment::Predicate {
            capture,
            field,
            value,
        } => {
            let Value::Array(seq) = node else {
                return Err(PathError::TypeMismatch {
                    segment: segment.to_string(),
                    expected: "a sequence",
                    actual: kind_of(node),
                });
            };
            for (index, element) in seq.iter().enumerate() {
                let Value::Object(map) = element else {
                    continue;
                };
                let Some(matched) = map.get(field).and_then(scalar_string) else {
                    continue;
                };
                if let Some(wanted) = value {
                    if wanted != &matched {
                        continue;
                    }
                }
                // Each branch gets its own bindings snapshot.
                let mut branch_bindings = bindings.clone();
                branch_bindings.insert(capture.clone(), matched);
                key_path.push(format!("[{index}]"));
                let outcome = resolve(rest, element, key_path, &branch_bindings, results);
                key_path.pop();
                outcome?;
            }
            Ok(())
        }
    }
}

/// The string form a predicate compares against. Only scalars have one.
fn scalar_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn deployment() -> Value {
        json!({
            "spec": {
                "containers": [
                    { "name": "nginx", "image": "a" },
                    { "name": "sidecar", "image": "b" },
                ]
            }
        })
    }

    #[test]
    fn test_single_predicate_match() {
        let tree = deployment();
        let matches = get_all("spec.containers.[name=nginx].image", &tree).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].value, &json!("a"));
        assert_eq!(matches[0].key_path, vec!["spec", "containers", "[0]", "image"]);
        assert_eq!(matches[0].bindings["name"], "nginx");
    }

    #[test]
    fn test_predicate_without_value_matches_every_element_with_the_field() {
        let tree = deployment();
        let matches = get_all("spec.containers.[name].image", &tree).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].bindings["name"], "nginx");
        assert_eq!(matches[1].bindings["name"], "sidecar");
        assert_eq!(matches[0].key_path[2], "[0]");
        assert_eq!(matches[1].key_path[2], "[1]");
    }

    #[test]
    fn test_predicate_matching_nothing_is_not_an_error() {
        let tree = deployment();
        let matches = get_all("spec.containers.[name=missing].image", &tree).unwrap();
        assert!(matches.is_empty());
    }

    #[test]
    fn test_index_out_of_range_aborts() {
        let tree = deployment();
        assert_eq!(
            get_all("spec.containers.[5].image", &tree),
            Err(PathError::IndexOutOfRange { index: 5, len: 2 })
        );
    }

    #[test]
    fn test_missing_key_aborts_even_after_predicate_matches() {
        let tree = json!({
            "containers": [
                { "name": "nginx", "image": "a" },
                { "name": "sidecar" },
            ]
        });
        // The second branch lacks the key, which poisons the whole call.
        assert_eq!(
            get_all("containers.[name].image", &tree),
            Err(PathError::MissingKey {
                key: "image".to_string()
            })
        );
    }

    #[test]
    fn test_key_segment_on_a_sequence_is_a_type_mismatch() {
        let tree = json!({ "containers": [ { "name": "nginx" } ] });
        assert_eq!(
            get_all("containers.name", &tree),
            Err(PathError::TypeMismatch {
                segment: "name".to_string(),
                expected: "a mapping",
                actual: "a sequence",
            })
        );
    }

    #[test]
    fn test_index_segment_on_a_mapping_is_a_type_mismatch() {
        let tree = json!({ "spec": { "a": 1 } });
        assert_eq!(
            get_all("spec.[0]", &tree),
            Err(PathError::TypeMismatch {
                segment: "[0]".to_string(),
                expected: "a sequence",
                actual: "a mapping",
            })
        );
    }

    #[test]
    fn test_non_mapping_elements_are_skipped_by_predicates() {
        let tree = json!({
            "items": [ "stray", { "name": "a" }, 42, { "name": "b" } ]
        });
        let matches = get_all("items.[name]", &tree).unwrap();
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].key_path, vec!["items", "[1]"]);
        assert_eq!(matches[1].key_path, vec!["items", "[3]"]);
    }

    #[test]
    fn test_predicate_compares_the_string_form_of_scalars() {
        let tree = json!({
            "ports": [
                { "port": 8080, "protocol": "TCP" },
                { "port": 9090, "protocol": "UDP" },
            ]
        });
        let matches = get_all("ports.[port=8080].protocol", &tree).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].value, &json!("TCP"));
        assert_eq!(matches[0].bindings["port"], "8080");
    }

    #[test]
    fn test_independent_predicates_multiply_branches() {
        let tree = json!({
            "services": [
                {
                    "name": "web",
                    "ports": [ { "port": 80 }, { "port": 443 } ]
                },
                {
                    "name": "db",
                    "ports": [ { "port": 5432 } ]
                },
            ]
        });
        let matches = get_all("services.[name].ports.[port]", &tree).unwrap();
        assert_eq!(matches.len(), 3);
        let concrete: Vec<String> = matches.iter().map(Match::path_string).collect();
        assert_eq!(
            concrete,
            vec![
                "services.[0].ports.[0]",
                "services.[0].ports.[1]",
                "services.[1].ports.[0]",
            ]
        );
        assert_eq!(matches[1].bindings["name"], "web");
        assert_eq!(matches[1].bindings["port"], "443");
        assert_eq!(matches[2].bindings["name"], "db");
        assert_eq!(matches[2].bindings["port"], "5432");
    }

    #[test]
    fn test_branches_never_share_bindings() {
        let tree = deployment();
        let mut matches = get_all("spec.containers.[name].image", &tree).unwrap();
        matches[0]
            .bindings
            .insert("poisoned".to_string(), "yes".to_string());
        assert!(!matches[1].bindings.contains_key("poisoned"));
    }

    #[test]
    fn test_predicate_on_a_scalar_is_a_type_mismatch() {
        let tree = json!({ "spec": "not-a-list" });
        assert_eq!(
            get_all("spec.[name=nginx]", &tree),
            Err(PathError::TypeMismatch {
                segment: "[name=nginx]".to_string(),
                expected: "a sequence",
                actual: "a string",
            })
        );
    }

    #[test]
    fn test_capture_name_prefix_renames_the_binding() {
        let tree = deployment();
        let matches =
            get_all("spec.containers.[containerName:name=nginx].image", &tree).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].bindings["containerName"], "nginx");
        assert!(!matches[0].bindings.contains_key("name"));
    }

    #[test]
    fn test_predicate_free_path_yields_at_most_one_match() {
        let tree = deployment();
        let matches = get_all("spec.containers.[0].name", &tree).unwrap();
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].value, &json!("nginx"));
        assert!(matches[0].bindings.is_empty());
    }

    #[test]
    fn test_key_path_length_always_equals_segment_count() {
        let tree = deployment();
        for path in [
            "spec",
            "spec.containers",
            "spec.containers.[name=nginx].image",
            "spec.containers.[1].name",
        ] {
            let segment_count = path.split('.').count();
            for matched in get_all(path, &tree).unwrap() {
                assert_eq!(matched.key_path.len(), segment_count);
            }
        }
    }
}
