//! Single-level, simultaneous substitution of type parameters.
//!
//! `substitute(r, [T, U], [A, B])` replaces every `T` and `U` in `r` by `A`
//! and `B` in one pass. Replacements are never re-substituted, so
//! `substitute(List<T>, [T, U], [U, T])` yields `List<U>`, not `List<T>`.
//!
//! A type variable can only appear as the head of a chain (`T`, `T[]`,
//! `T.Inner`); later segments are member types and keep their names, but the
//! arguments on every segment are substituted.

use rustc_hash::FxHashMap;

use super::{TypeArgument, TypeParameter, TypeReference, TypeSegment, Wildcard, WildcardBound};

/// Name → replacement table for one substitution.
struct Bindings<'a> {
    map: FxHashMap<&'a str, &'a TypeArgument>,
}

impl<'a> Bindings<'a> {
    fn new(params: &'a [TypeParameter], args: &'a [TypeArgument]) -> Self {
        debug_assert_eq!(
            params.len(),
            args.len(),
            "substitution requires one argument per parameter"
        );
        let map = params
            .iter()
            .zip(args)
            .map(|(param, arg)| (param.name.as_str(), arg))
            .collect();
        Bindings { map }
    }

    fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Substitute inside a reference that appears in argument position, where
    /// a bare variable may be replaced by a wildcard.
    fn argument_of(&self, reference: &TypeReference) -> TypeArgument {
        if let Some(TypeArgument::Wildcard(wildcard)) = self.binding_for_bare(reference) {
            return TypeArgument::Wildcard(wildcard.clone());
        }
        TypeArgument::Concrete(self.reference(reference))
    }

    fn binding_for_bare(&self, reference: &TypeReference) -> Option<&'a TypeArgument> {
        if reference.dimensions() != 0 || reference.segments().len() != 1 {
            return None;
        }
        let head = reference.variable_head()?;
        self.map.get(head).copied()
    }

    fn reference(&self, reference: &TypeReference) -> TypeReference {
        let segments = reference.segments();
        let replacement = reference
            .variable_head()
            .and_then(|head| self.map.get(head).copied());

        let Some(replacement) = replacement else {
            let segments = segments.iter().map(|s| self.segment(s)).collect();
            return TypeReference {
                segments,
                dimensions: reference.dimensions(),
            };
        };

        // The replacement is already final; only the tail is substituted.
        let head = replacement.as_reference();
        let mut out = head.segments().to_vec();
        out.extend(segments[1..].iter().map(|s| self.segment(s)));
        let dimensions = if segments.len() == 1 {
            head.dimensions() + reference.dimensions()
        } else {
            reference.dimensions()
        };
        TypeReference {
            segments: out,
            dimensions,
        }
    }

    fn segment(&self, segment: &TypeSegment) -> TypeSegment {
        TypeSegment {
            name: segment.name.clone(),
            args: segment.args.iter().map(|a| self.argument(a)).collect(),
        }
    }

    fn argument(&self, argument: &TypeArgument) -> TypeArgument {
        match argument {
            TypeArgument::Concrete(reference) => self.argument_of(reference),
            TypeArgument::Wildcard(wildcard) => TypeArgument::Wildcard(Wildcard {
                bound: wildcard.bound.as_ref().map(|bound| WildcardBound {
                    direction: bound.direction,
                    reference: self.reference(&bound.reference),
                }),
            }),
        }
    }
}

/// Substitute `args` for `params` throughout `reference`.
///
/// `params` and `args` must have the same length. Names not in `params` pass
/// through unchanged; with empty lists the result equals the input. A bare
/// variable bound to a wildcard erases to the wildcard's upper bound (or
/// `java.lang.Object`) since a wildcard cannot stand alone as a type.
pub fn substitute(
    reference: &TypeReference,
    params: &[TypeParameter],
    args: &[TypeArgument],
) -> TypeReference {
    let bindings = Bindings::new(params, args);
    if bindings.is_empty() {
        return reference.clone();
    }
    bindings.reference(reference)
}

/// Substitute `args` for `params` inside a type argument.
///
/// Unlike [`substitute`], a bare variable in argument position may become a
/// wildcard. For a wildcard only its bound is affected.
pub fn substitute_argument(
    argument: &TypeArgument,
    params: &[TypeParameter],
    args: &[TypeArgument],
) -> TypeArgument {
    let bindings = Bindings::new(params, args);
    if bindings.is_empty() {
        return argument.clone();
    }
    bindings.argument(argument)
}
