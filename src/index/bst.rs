//! Primary-key index for FernDB
//!
//! An unbalanced binary search tree mapping primary-key values to row
//! positions in the owning table's tuple vector. In-order traversal yields
//! rows in ascending key order; that ordering is an externally visible
//! contract, so any replacement structure must preserve it.

use crate::storage::Value;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A key in the index (wraps a validated, non-null primary-key value)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndexKey(Value);

impl IndexKey {
    /// Create a new index key
    pub fn new(value: Value) -> Self {
        Self(value)
    }

    /// The wrapped key value
    pub fn value(&self) -> &Value {
        &self.0
    }

    /// Compare two index keys with the natural order of the key's domain.
    /// All keys of one index share a domain; mixed pairs fall back to
    /// comparing displayed forms so the order stays total.
    pub fn compare(&self, other: &IndexKey) -> Ordering {
        match (&self.0, &other.0) {
            (Value::Int(a), Value::Int(b)) => a.cmp(b),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (a, b) => a.to_string().cmp(&b.to_string()),
        }
    }
}

impl PartialOrd for IndexKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.compare(other))
    }
}

impl Ord for IndexKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.compare(other)
    }
}

impl Eq for IndexKey {}

impl std::fmt::Display for IndexKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One node of the tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Node {
    key: IndexKey,
    row: usize,
    left: Option<Box<Node>>,
    right: Option<Box<Node>>,
}

impl Node {
    fn leaf(key: IndexKey, row: usize) -> Box<Node> {
        Box::new(Node {
            key,
            row,
            left: None,
            right: None,
        })
    }
}

/// Unbalanced binary search tree index
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BstIndex {
    root: Option<Box<Node>>,
    size: usize,
}

impl BstIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.size
    }

    /// Check if the index is empty
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// Insert a key. Returns false (and leaves the tree unchanged) when the
    /// key is already present; duplicates are filtered out upstream, so a
    /// rejection here signals a bug.
    pub fn insert(&mut self, key: IndexKey, row: usize) -> bool {
        if insert_node(&mut self.root, key, row) {
            self.size += 1;
            true
        } else {
            false
        }
    }

    /// Point lookup: row position for the given key
    pub fn search(&self, key: &IndexKey) -> Option<usize> {
        let mut current = self.root.as_deref();
        while let Some(node) = current {
            match key.compare(&node.key) {
                Ordering::Equal => return Some(node.row),
                Ordering::Less => current = node.left.as_deref(),
                Ordering::Greater => current = node.right.as_deref(),
            }
        }
        None
    }

    /// Remove a key, returning the row position it mapped to
    pub fn delete(&mut self, key: &IndexKey) -> Option<usize> {
        let removed = delete_node(&mut self.root, key);
        if removed.is_some() {
            self.size -= 1;
        }
        removed
    }

    /// Row positions in ascending key order
    pub fn in_order(&self) -> Vec<usize> {
        let mut rows = Vec::with_capacity(self.size);
        collect_in_order(self.root.as_deref(), &mut |node| rows.push(node.row));
        rows
    }

    /// (key, row) pairs in ascending key order
    pub fn entries(&self) -> Vec<(IndexKey, usize)> {
        let mut entries = Vec::with_capacity(self.size);
        collect_in_order(self.root.as_deref(), &mut |node| {
            entries.push((node.key.clone(), node.row))
        });
        entries
    }
}

fn insert_node(slot: &mut Option<Box<Node>>, key: IndexKey, row: usize) -> bool {
    match slot {
        None => {
            *slot = Some(Node::leaf(key, row));
            true
        }
        Some(node) => match key.compare(&node.key) {
            Ordering::Less => insert_node(&mut node.left, key, row),
            Ordering::Greater => insert_node(&mut node.right, key, row),
            Ordering::Equal => false,
        },
    }
}

fn delete_node(slot: &mut Option<Box<Node>>, key: &IndexKey) -> Option<usize> {
    let node = slot.as_deref_mut()?;
    match key.compare(&node.key) {
        Ordering::Less => delete_node(&mut node.left, key),
        Ordering::Greater => delete_node(&mut node.right, key),
        Ordering::Equal => {
            let removed = node.row;
            match (node.left.take(), node.right.take()) {
                (None, None) => *slot = None,
                (Some(left), None) => *slot = Some(left),
                (None, Some(right)) => *slot = Some(right),
                (Some(left), Some(right)) => {
                    // Replace with the in-order successor, then remove it
                    // from the right subtree.
                    let (succ_key, succ_row) = min_entry(&right);
                    node.left = Some(left);
                    node.right = Some(right);
                    node.key = succ_key.clone();
                    node.row = succ_row;
                    delete_node(&mut node.right, &succ_key);
                }
            }
            Some(removed)
        }
    }
}

fn min_entry(mut node: &Node) -> (IndexKey, usize) {
    while let Some(left) = node.left.as_deref() {
        node = left;
    }
    (node.key.clone(), node.row)
}

fn collect_in_order(node: Option<&Node>, visit: &mut impl FnMut(&Node)) {
    if let Some(node) = node {
        collect_in_order(node.left.as_deref(), visit);
        visit(node);
        collect_in_order(node.right.as_deref(), visit);
    }
}
