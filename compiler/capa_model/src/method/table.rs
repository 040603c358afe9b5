//! Signature-keyed method table.

use rustc_hash::FxHashMap;

use super::{MethodDefinition, Signature};

/// Methods in insertion order, indexed by signature.
///
/// Iteration order is insertion order, never hash order, so output built from
/// a table is reproducible.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MethodTable {
    methods: Vec<MethodDefinition>,
    by_signature: FxHashMap<Signature, usize>,
}

impl MethodTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a method under its signature.
    ///
    /// If the signature is already present the table is unchanged and the
    /// rejected method is handed back.
    pub fn insert(&mut self, method: MethodDefinition) -> Result<(), MethodDefinition> {
        if self.by_signature.contains_key(method.signature()) {
            return Err(method);
        }
        self.by_signature
            .insert(method.signature().clone(), self.methods.len());
        self.methods.push(method);
        Ok(())
    }

    /// Replace the method stored under the same signature, in place.
    ///
    /// Returns `false` (and drops `method`) if the signature is absent.
    pub fn replace(&mut self, method: MethodDefinition) -> bool {
        match self.by_signature.get(method.signature()) {
            Some(&index) => {
                self.methods[index] = method;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, signature: &Signature) -> Option<&MethodDefinition> {
        self.by_signature
            .get(signature)
            .map(|&index| &self.methods[index])
    }

    pub fn get_mut(&mut self, signature: &Signature) -> Option<&mut MethodDefinition> {
        self.by_signature
            .get(signature)
            .map(|&index| &mut self.methods[index])
    }

    #[inline]
    pub fn contains(&self, signature: &Signature) -> bool {
        self.by_signature.contains_key(signature)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, MethodDefinition> {
        self.methods.iter()
    }

    pub fn signatures(&self) -> impl Iterator<Item = &Signature> {
        self.methods.iter().map(MethodDefinition::signature)
    }
}

impl<'a> IntoIterator for &'a MethodTable {
    type Item = &'a MethodDefinition;
    type IntoIter = std::slice::Iter<'a, MethodDefinition>;

    fn into_iter(self) -> Self::IntoIter {
        self.methods.iter()
    }
}
