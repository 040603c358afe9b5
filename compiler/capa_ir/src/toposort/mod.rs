//! Topological ordering over arbitrary keys (Kahn's algorithm).
//!
//! Used to order carrier definitions so that every definition is emitted
//! after the definitions it depends on. Nodes are kept in insertion order and
//! ties are broken by that order, so the same sequence of `add` calls always
//! yields the same sort.
//!
//! Sorting never mutates the edge set: `add` and `sort` may be interleaved
//! freely, and a failed sort leaves the graph intact for inspection.

use std::collections::VecDeque;
use std::fmt;
use std::hash::Hash;

use rustc_hash::FxHashMap;


/// The nodes that could not be ordered because they sit on (or behind) a
/// dependency cycle, in insertion order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CyclicDependency<K> {
    pub remaining: Vec<K>,
}

impl<K: fmt::Display> fmt::Display for CyclicDependency<K> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "cyclic dependency among ")?;
        for (i, key) in self.remaining.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{key}")?;
        }
        Ok(())
    }
}

impl<K: fmt::Display + fmt::Debug> std::error::Error for CyclicDependency<K> {}

/// A dependency graph that can be sorted so dependencies precede dependents.
#[derive(Clone, Debug)]
pub struct DependencySort<K> {
    /// All nodes in first-seen order.
    nodes: Vec<K>,
    /// Key → position in `nodes`.
    index: FxHashMap<K, usize>,
    /// `dependencies[i]`: distinct nodes `i` depends on.
    dependencies: Vec<Vec<usize>>,
    /// `dependents[i]`: nodes that depend on `i` (reverse edges).
    dependents: Vec<Vec<usize>>,
}

impl<K> Default for DependencySort<K> {
    fn default() -> Self {
        DependencySort {
            nodes: Vec::new(),
            index: FxHashMap::default(),
            dependencies: Vec::new(),
            dependents: Vec::new(),
        }
    }
}

impl<K: Clone + Eq + Hash> DependencySort<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `item` and record that it depends on each of `dependencies`.
    ///
    /// Unseen nodes are created on the fly; repeating an edge is a no-op.
    pub fn add<I>(&mut self, item: K, dependencies: I)
    where
        I: IntoIterator<Item = K>,
    {
        let item = self.node(item);
        for dependency in dependencies {
            let dependency = self.node(dependency);
            if !self.dependencies[item].contains(&dependency) {
                self.dependencies[item].push(dependency);
                self.dependents[dependency].push(item);
            }
        }
    }

    fn node(&mut self, key: K) -> usize {
        if let Some(&i) = self.index.get(&key) {
            return i;
        }
        let i = self.nodes.len();
        self.index.insert(key.clone(), i);
        self.nodes.push(key);
        self.dependencies.push(Vec::new());
        self.dependents.push(Vec::new());
        i
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    #[inline]
    pub fn contains(&self, key: &K) -> bool {
        self.index.contains_key(key)
    }

    /// Order every node so each dependency precedes its dependents.
    ///
    /// Fails with the unresolved remainder if the graph has a cycle.
    pub fn sort(&self) -> Result<Vec<K>, CyclicDependency<K>> {
        // left[i] = number of i's dependencies not yet emitted.
        let mut left: Vec<usize> = self.dependencies.iter().map(Vec::len).collect();
        let mut ready: VecDeque<usize> = (0..self.nodes.len()).filter(|&i| left[i] == 0).collect();
        let mut order = Vec::with_capacity(self.nodes.len());

        while let Some(i) = ready.pop_front() {
            order.push(self.nodes[i].clone());
            for &dependent in &self.dependents[i] {
                left[dependent] -= 1;
                if left[dependent] == 0 {
                    ready.push_back(dependent);
                }
            }
        }

        if order.len() == self.nodes.len() {
            return Ok(order);
        }
        let remaining = (0..self.nodes.len())
            .filter(|&i| left[i] > 0)
            .map(|i| self.nodes[i].clone())
            .collect();
        Err(CyclicDependency { remaining })
    }
}
