//! The semantic (structural) tree differ: compares two JSON-like values and
//! produces a path-addressed list of typed [`TreeChange`]s. The
//! recursive walk mirrors the divide-and-conquer style of the line-diff
//! engines, with a dotted/bracketed path string standing in for an index
//! range as the recursion's "coordinate space".

use serde_json::Value;

/// The effective JSON type tag used for `type-change` detection.
/// `Value::Null` and `Undefined` are optionally equated by
/// `null_equals_undefined`; `serde_json::Value` has no `Undefined` variant,
/// so in this crate that equivalence only affects whether a present-`null`
/// is compared against an absent key as "no change" versus `type-change`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TreeType {
    Null,
    Boolean,
    Number,
    String,
    Array,
    Object,
}

fn type_of(value: &Value) -> TreeType {
    match value {
        Value::Null => TreeType::Null,
        Value::Bool(_) => TreeType::Boolean,
        Value::Number(_) => TreeType::Number,
        Value::String(_) => TreeType::String,
        Value::Array(_) => TreeType::Array,
        Value::Object(_) => TreeType::Object,
    }
}

/// A single typed change at a `path`.
#[derive(Debug, Clone, PartialEq)]
pub enum TreeChange {
    Add { path: String, new_value: Value },
    Delete { path: String, old_value: Value },
    Modify { path: String, old_value: Value, new_value: Value },
    TypeChange {
        path: String,
        old_type: TreeType,
        new_type: TreeType,
        old_value: Value,
        new_value: Value,
    },
    Move { path: String, old_index: usize, new_index: usize, value: Value },
}

impl TreeChange {
    pub fn path(&self) -> &str {
        match self {
            TreeChange::Add { path, .. }
            | TreeChange::Delete { path, .. }
            | TreeChange::Modify { path, .. }
            | TreeChange::TypeChange { path, .. }
            | TreeChange::Move { path, .. } => path,
        }
    }
}

/// How array elements are paired during the semantic diff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ArrayStrategy {
    #[default]
    IndexWise,
    OrderInsensitive,
    DetectMoves,
}

/// Tunables for [`diff_tree`].
#[derive(Debug, Clone)]
pub struct SemanticDiffOptions {
    pub ignore_paths: Vec<String>,
    pub max_depth: Option<usize>,
    pub null_equals_undefined: bool,
    pub array_strategy: ArrayStrategy,
}

impl Default for SemanticDiffOptions {
    fn default() -> Self {
        SemanticDiffOptions {
            ignore_paths: Vec::new(),
            max_depth: None,
            null_equals_undefined: true,
            array_strategy: ArrayStrategy::IndexWise,
        }
    }
}

/// Running counts of each change kind, plus an `is_equal` shortcut.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TreeDiffStats {
    pub adds: usize,
    pub deletes: usize,
    pub modifies: usize,
    pub type_changes: usize,
    pub moves: usize,
}

impl TreeDiffStats {
    pub fn is_equal(&self) -> bool {
        self.adds == 0 && self.deletes == 0 && self.modifies == 0 && self.type_changes == 0 && self.moves == 0
    }
}

/// Computes the ordered change list between `old` and `new`.
pub fn diff_tree(old: &Value, new: &Value, options: &SemanticDiffOptions) -> (Vec<TreeChange>, TreeDiffStats) {
    let mut changes = Vec::new();
    walk(old, new, "", 0, options, &mut changes);
    let stats = tally(&changes);
    (changes, stats)
}

fn tally(changes: &[TreeChange]) -> TreeDiffStats {
    let mut stats = TreeDiffStats::default();
    for change in changes {
        match change {
            TreeChange::Add { .. } => stats.adds += 1,
            TreeChange::Delete { .. } => stats.deletes += 1,
            TreeChange::Modify { .. } => stats.modifies += 1,
            TreeChange::TypeChange { .. } => stats.type_changes += 1,
            TreeChange::Move { .. } => stats.moves += 1,
        }
    }
    stats
}

fn matches_ignore_path(path: &str, pattern: &str) -> bool {
    glob_match(pattern.as_bytes(), path.as_bytes())
}

/// A minimal `*`/`?` glob matcher: `*` matches any run
/// (including empty) of characters, `?` matches exactly one.
fn glob_match(pattern: &[u8], text: &[u8]) -> bool {
    fn go(p: &[u8], t: &[u8]) -> bool {
        match (p.first(), t.first()) {
            (None, None) => true,
            (Some(b'*'), _) => go(&p[1..], t) || (!t.is_empty() && go(p, &t[1..])),
            (Some(b'?'), Some(_)) => go(&p[1..], &t[1..]),
            (Some(&pc), Some(&tc)) if pc == tc => go(&p[1..], &t[1..]),
            _ => false,
        }
    }
    go(pattern, text)
}

fn append_key(path: &str, key: &str) -> String {
    let is_identifier = !key.is_empty()
        && key.chars().next().map(|c| c.is_ascii_alphabetic() || c == '_').unwrap_or(false)
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if is_identifier {
        if path.is_empty() {
            key.to_string()
        } else {
            format!("{path}.{key}")
        }
    } else {
        format!("{path}[{key:?}]")
    }
}

fn append_index(path: &str, index: usize) -> String {
    format!("{path}[{index}]")
}

fn walk(
    old: &Value,
    new: &Value,
    path: &str,
    depth: usize,
    options: &SemanticDiffOptions,
    changes: &mut Vec<TreeChange>,
) {
    if options.ignore_paths.iter().any(|pat| matches_ignore_path(path, pat)) {
        return;
    }

    if let Some(max_depth) = options.max_depth {
        if depth > max_depth {
            if old != new {
                changes.push(TreeChange::Modify {
                    path: path.to_string(),
                    old_value: old.clone(),
                    new_value: new.clone(),
                });
            }
            return;
        }
    }

    let old_type = type_of(old);
    let new_type = type_of(new);
    let types_equal = old_type == new_type
        || (options.null_equals_undefined && matches!(old_type, TreeType::Null) && matches!(new_type, TreeType::Null));

    if !types_equal {
        changes.push(TreeChange::TypeChange {
            path: path.to_string(),
            old_type,
            new_type,
            old_value: old.clone(),
            new_value: new.clone(),
        });
        return;
    }

    match (old, new) {
        (Value::Object(old_map), Value::Object(new_map)) => {
            for (key, old_value) in old_map {
                let child_path = append_key(path, key);
                if options.ignore_paths.iter().any(|pat| matches_ignore_path(&child_path, pat)) {
                    continue;
                }
                match new_map.get(key) {
                    None => changes.push(TreeChange::Delete {
                        path: child_path,
                        old_value: old_value.clone(),
                    }),
                    Some(new_value) => walk(old_value, new_value, &child_path, depth + 1, options, changes),
                }
            }
            for (key, new_value) in new_map {
                if old_map.contains_key(key) {
                    continue;
                }
                let child_path = append_key(path, key);
                if options.ignore_paths.iter().any(|pat| matches_ignore_path(&child_path, pat)) {
                    continue;
                }
                changes.push(TreeChange::Add {
                    path: child_path,
                    new_value: new_value.clone(),
                });
            }
        }
        (Value::Array(old_arr), Value::Array(new_arr)) => {
            diff_array(old_arr, new_arr, path, depth, options, changes);
        }
        _ if old != new => changes.push(TreeChange::Modify {
            path: path.to_string(),
            old_value: old.clone(),
            new_value: new.clone(),
        }),
        _ => {}
    }
}

fn diff_array(
    old: &[Value],
    new: &[Value],
    path: &str,
    depth: usize,
    options: &SemanticDiffOptions,
    changes: &mut Vec<TreeChange>,
) {
    match options.array_strategy {
        ArrayStrategy::IndexWise => {
            for i in 0..old.len().max(new.len()) {
                let child_path = append_index(path, i);
                if options.ignore_paths.iter().any(|pat| matches_ignore_path(&child_path, pat)) {
                    continue;
                }
                match (old.get(i), new.get(i)) {
                    (Some(o), Some(n)) => walk(o, n, &child_path, depth + 1, options, changes),
                    (Some(o), None) => changes.push(TreeChange::Delete {
                        path: child_path,
                        old_value: o.clone(),
                    }),
                    (None, Some(n)) => changes.push(TreeChange::Add {
                        path: child_path,
                        new_value: n.clone(),
                    }),
                    (None, None) => unreachable!(),
                }
            }
        }
        ArrayStrategy::OrderInsensitive => {
            let mut new_used = vec![false; new.len()];
            let mut old_used = vec![false; old.len()];
            for (i, o) in old.iter().enumerate() {
                if let Some(j) = new.iter().enumerate().position(|(j, n)| !new_used[j] && n == o) {
                    old_used[i] = true;
                    new_used[j] = true;
                }
            }
            for (i, o) in old.iter().enumerate() {
                if !old_used[i] {
                    let child_path = append_index(path, i);
                    if options.ignore_paths.iter().any(|pat| matches_ignore_path(&child_path, pat)) {
                        continue;
                    }
                    changes.push(TreeChange::Delete {
                        path: child_path,
                        old_value: o.clone(),
                    });
                }
            }
            for (j, n) in new.iter().enumerate() {
                if !new_used[j] {
                    let child_path = append_index(path, j);
                    if options.ignore_paths.iter().any(|pat| matches_ignore_path(&child_path, pat)) {
                        continue;
                    }
                    changes.push(TreeChange::Add {
                        path: child_path,
                        new_value: n.clone(),
                    });
                }
            }
        }
        ArrayStrategy::DetectMoves => {
            let mut old_used = vec![false; old.len()];
            let mut new_used = vec![false; new.len()];
            // Pass 1: pair identical indices by deep equality.
            for i in 0..old.len().min(new.len()) {
                if old[i] == new[i] {
                    old_used[i] = true;
                    new_used[i] = true;
                }
            }
            // Pass 2: pair remaining old elements with the first unpaired
            // deep-equal new element, emitting a `move`.
            for (i, o) in old.iter().enumerate() {
                if old_used[i] {
                    continue;
                }
                if let Some(j) = new.iter().enumerate().position(|(j, n)| !new_used[j] && n == o) {
                    old_used[i] = true;
                    new_used[j] = true;
                    if options.ignore_paths.iter().any(|pat| matches_ignore_path(path, pat)) {
                        continue;
                    }
                    changes.push(TreeChange::Move {
                        path: path.to_string(),
                        old_index: i,
                        new_index: j,
                        value: o.clone(),
                    });
                }
            }
            for (i, o) in old.iter().enumerate() {
                if !old_used[i] {
                    let child_path = append_index(path, i);
                    if options.ignore_paths.iter().any(|pat| matches_ignore_path(&child_path, pat)) {
                        continue;
                    }
                    changes.push(TreeChange::Delete {
                        path: child_path,
                        old_value: o.clone(),
                    });
                }
            }
            for (j, n) in new.iter().enumerate() {
                if !new_used[j] {
                    let child_path = append_index(path, j);
                    if options.ignore_paths.iter().any(|pat| matches_ignore_path(&child_path, pat)) {
                        continue;
                    }
                    changes.push(TreeChange::Add {
                        path: child_path,
                        new_value: n.clone(),
                    });
                }
            }
        }
    }
}
