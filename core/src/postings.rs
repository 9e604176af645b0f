//! Merge-based set operations over posting lists.
//!
//! Every input must be strictly ascending. Each operation is a single linear scan
//! over both inputs and its output is again strictly ascending.

use crate::index::DocId;
use std::cmp::Ordering;

/// Documents present in both lists.
pub fn intersect(p1: &[DocId], p2: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(p1.len().min(p2.len()));
    let (mut i, mut j) = (0, 0);
    while i < p1.len() && j < p2.len() {
        match p1[i].cmp(&p2[j]) {
            Ordering::Equal => {
                out.push(p1[i]);
                i += 1;
                j += 1;
            }
            Ordering::Less => i += 1,
            Ordering::Greater => j += 1,
        }
    }
    out
}

/// Documents present in either list, each once.
pub fn union(p1: &[DocId], p2: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(p1.len() + p2.len());
    let (mut i, mut j) = (0, 0);
    while i < p1.len() && j < p2.len() {
        match p1[i].cmp(&p2[j]) {
            Ordering::Equal => {
                out.push(p1[i]);
                i += 1;
                j += 1;
            }
            Ordering::Less => {
                out.push(p1[i]);
                i += 1;
            }
            Ordering::Greater => {
                out.push(p2[j]);
                j += 1;
            }
        }
    }
    out.extend_from_slice(&p1[i..]);
    out.extend_from_slice(&p2[j..]);
    out
}

/// Documents of `p1` that are not in `p2` (`p1 AND NOT p2`).
pub fn and_not(p1: &[DocId], p2: &[DocId]) -> Vec<DocId> {
    let mut out = Vec::with_capacity(p1.len());
    let (mut i, mut j) = (0, 0);
    while i < p1.len() && j < p2.len() {
        match p1[i].cmp(&p2[j]) {
            Ordering::Less => {
                out.push(p1[i]);
                i += 1;
            }
            Ordering::Greater => j += 1,
            Ordering::Equal => {
                i += 1;
                j += 1;
            }
        }
    }
    out.extend_from_slice(&p1[i..]);
    out
}
