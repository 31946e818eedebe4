//! Dotted-path flattening and mutation of payload trees.
//!
//! A dotted path such as `error.stacktrace.filename` names a key through any
//! number of objects. Arrays do not contribute a segment: the path reaches the
//! same key inside every element of an array of objects.
//!
//! [`mutate`] rewrites every occurrence of a path. Descent rules:
//! - at the root object, an operation whose parent path is empty is applied
//!   before the children are walked;
//! - a child whose accumulated path equals the parent portion of the target
//!   is walked first, then receives the operation (for an array, every object
//!   element receives it);
//! - an object that is empty once its children were walked collapses: it
//!   becomes `null` inside an object and disappears inside an array, as do
//!   `null` array elements. The root object never collapses.
//!
//! Oracles rely on the collapse: deleting the last key of an object leaves
//! `{}` in place (a validator reports the missing key), while a later walk
//! over the same tree turns that `{}` into an absent value.

use serde_json::{Map, Value};

use crate::set::FieldSet;

/// Operation applied at every occurrence of a dotted path.
#[derive(Debug, Clone, PartialEq)]
pub enum Mutation {
    /// Set the key to a value, creating it if needed.
    Upsert(Value),
    /// Remove the key together with its whole subtree.
    Delete,
}

impl Mutation {
    fn apply(&self, node: &mut Value, key: &str) {
        match node {
            Value::Object(map) => self.apply_to_object(map, key),
            Value::Array(items) => {
                for item in items {
                    if let Value::Object(map) = item {
                        self.apply_to_object(map, key);
                    }
                }
            }
            Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
        }
    }

    fn apply_to_object(&self, map: &mut Map<String, Value>, key: &str) {
        match self {
            Self::Upsert(value) => {
                map.insert(key.to_owned(), value.clone());
            }
            Self::Delete => {
                map.remove(key);
            }
        }
    }
}

/// Split a dotted path on its last `.` into `(parent, leaf)`.
///
/// A root-level key has the empty parent.
#[must_use]
pub fn split_key(path: &str) -> (&str, &str) {
    path.rsplit_once('.').unwrap_or(("", path))
}

/// Append a key to a dotted prefix.
#[must_use]
pub fn join_key(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_owned()
    } else {
        format!("{prefix}.{key}")
    }
}

/// Every dotted path reachable in the tree, containers included.
#[must_use]
pub fn flatten(tree: &Value) -> FieldSet {
    let mut out = FieldSet::new();
    flatten_into(tree, "", &mut out);
    out
}

/// Add the dotted paths of `tree`, rooted at `prefix`, to `out`.
pub fn flatten_into(tree: &Value, prefix: &str, out: &mut FieldSet) {
    match tree {
        Value::Object(map) => {
            for (key, value) in map {
                let path = join_key(prefix, key);
                flatten_into(value, &path, out);
                out.insert(path);
            }
        }
        Value::Array(items) => {
            for item in items {
                flatten_into(item, prefix, out);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

/// Every value stored at `path`, across all array elements.
#[must_use]
pub fn values_at<'a>(tree: &'a Value, path: &str) -> Vec<&'a Value> {
    let mut out = Vec::new();
    collect_values(tree, "", path, &mut out);
    out
}

fn collect_values<'a>(node: &'a Value, prefix: &str, path: &str, out: &mut Vec<&'a Value>) {
    match node {
        Value::Object(map) => {
            for (key, value) in map {
                let current = join_key(prefix, key);
                if current == path {
                    out.push(value);
                } else if path
                    .strip_prefix(current.as_str())
                    .is_some_and(|rest| rest.starts_with('.'))
                {
                    collect_values(value, &current, path, out);
                }
            }
        }
        Value::Array(items) => {
            for item in items {
                collect_values(item, prefix, path, out);
            }
        }
        Value::Null | Value::Bool(_) | Value::Number(_) | Value::String(_) => {}
    }
}

struct Target<'a> {
    parent: &'a str,
    leaf: &'a str,
    mutation: &'a Mutation,
}

/// Apply `mutation` at every occurrence of `path` and return the new tree.
///
/// Paths whose parent never occurs leave the tree unchanged apart from the
/// collapse of empty objects described in the module documentation.
#[must_use]
pub fn mutate(tree: Value, path: &str, mutation: &Mutation) -> Value {
    let (parent, leaf) = split_key(path);
    let target = Target {
        parent,
        leaf,
        mutation,
    };
    let root_is_object = tree.is_object();
    match walk(tree, "", &target) {
        Some(tree) => tree,
        None if root_is_object => Value::Object(Map::new()),
        None => Value::Null,
    }
}

fn walk(node: Value, prefix: &str, target: &Target<'_>) -> Option<Value> {
    match node {
        Value::Object(mut map) => {
            if prefix.is_empty() && target.parent.is_empty() {
                target.mutation.apply_to_object(&mut map, target.leaf);
            }
            for (key, slot) in &mut map {
                let path = join_key(prefix, key);
                let mut child = walk(slot.take(), &path, target).unwrap_or(Value::Null);
                if path == target.parent {
                    target.mutation.apply(&mut child, target.leaf);
                }
                *slot = child;
            }
            if map.is_empty() {
                None
            } else {
                Some(Value::Object(map))
            }
        }
        Value::Array(items) => Some(Value::Array(
            items
                .into_iter()
                .filter_map(|item| walk(item, prefix, target))
                .collect(),
        )),
        Value::Null => None,
        scalar @ (Value::Bool(_) | Value::Number(_) | Value::String(_)) => Some(scalar),
    }
}
