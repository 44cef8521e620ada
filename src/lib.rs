//! A small dotted-path query and mutation engine for configuration trees.
//!
//! This crate locates and rewrites fields inside dynamically shaped
//! configuration documents (parsed YAML or JSON held as `serde_json::Value`)
//! without the caller knowing the exact shape in advance. It grew out of
//! parameterizing generated Kubernetes resources: "find the container named
//! `nginx` inside this Deployment and replace its image" becomes
//!
//! ```
//! use serde_json::json;
//!
//! let mut deployment = json!({
//!     "spec": { "containers": [ { "name": "nginx", "image": "nginx:1.21" } ] }
//! });
//! let matches = confpath::get_all("spec.containers.[name=nginx].image", &deployment).unwrap();
//! let concrete = matches[0].path_string();
//! confpath::set(&concrete, json!("{{ .Values.image }}"), &mut deployment).unwrap();
//! ```
//!
//! Paths are dotted (`spec.template.metadata`), support quoted keys with
//! literal dots (`metadata.labels."app.kubernetes.io/name"`), positional
//! indices (`containers.[0]`), and field filters over sequences of mappings
//! (`containers.[name=nginx]`, optionally capturing the matched value under
//! a different name: `containers.[containerName:name=nginx]`).

pub mod ast;
pub mod engine;
pub mod error;
mod accessor;
mod parser;

// --- Public API ---
pub use accessor::{get, set, set_creating_new};
pub use ast::{PathExpr, Segment};
pub use engine::{Match, get_all};
pub use error::PathError;
pub use parser::{classify_segment, parse_path, split_path};
