//! Type references, type parameters, and type arguments.
//!
//! These are immutable value types: every transformation (substitution,
//! renaming) produces a new value. Equality and hashing are structural over
//! the name chain, the arguments, and the array dimensions, so two references
//! written differently in source compare equal when they denote the same
//! shape. That makes them usable as map keys for deduplication.
//!
//! # Textual form
//!
//! References print (and parse, see [`TypeReference::from_str`]) as
//! `a.b.Outer<T>.Inner<? extends X>[][]`.

mod parse;
mod subst;


use std::fmt;

pub use parse::ParseTypeError;
pub use subst::{substitute, substitute_argument};

/// Fully qualified name every unbounded type variable erases to.
pub const OBJECT: &str = "java.lang.Object";

/// One dotted segment of a type reference, with its own type arguments.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct TypeSegment {
    pub name: String,
    pub args: Vec<TypeArgument>,
}

impl TypeSegment {
    /// A segment without type arguments.
    #[inline]
    pub fn new(name: impl Into<String>) -> Self {
        TypeSegment {
            name: name.into(),
            args: Vec::new(),
        }
    }

    /// A segment with type arguments.
    #[inline]
    pub fn with_args(name: impl Into<String>, args: Vec<TypeArgument>) -> Self {
        TypeSegment {
            name: name.into(),
            args,
        }
    }
}

/// A reference to a named type: a dotted chain of segments plus a count of
/// array dimensions.
///
/// The chain is never empty.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "String", into = "String")
)]
pub struct TypeReference {
    segments: Vec<TypeSegment>,
    dimensions: u32,
}

impl TypeReference {
    /// Reference to a (possibly dotted) name without type arguments.
    ///
    /// `TypeReference::named("java.util.List")` has three segments.
    pub fn named(name: &str) -> Self {
        TypeReference {
            segments: name.split('.').map(TypeSegment::new).collect(),
            dimensions: 0,
        }
    }

    /// Reference to a (possibly dotted) name whose last segment carries `args`.
    pub fn generic(name: &str, args: Vec<TypeArgument>) -> Self {
        let mut reference = Self::named(name);
        if let Some(last) = reference.segments.last_mut() {
            last.args = args;
        }
        reference
    }

    /// Build a reference from explicit segments.
    ///
    /// Returns `None` for an empty chain.
    pub fn from_segments(segments: Vec<TypeSegment>, dimensions: u32) -> Option<Self> {
        if segments.is_empty() {
            return None;
        }
        Some(TypeReference {
            segments,
            dimensions,
        })
    }

    /// `java.lang.Object`.
    pub fn object() -> Self {
        Self::named(OBJECT)
    }

    /// The same reference with `extra` more array dimensions.
    #[must_use]
    pub fn array_of(mut self, extra: u32) -> Self {
        self.dimensions += extra;
        self
    }

    #[inline]
    pub fn segments(&self) -> &[TypeSegment] {
        &self.segments
    }

    #[inline]
    pub fn dimensions(&self) -> u32 {
        self.dimensions
    }

    /// The dotted name chain without any arguments, e.g. `java.util.Map`.
    pub fn qualified_name(&self) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push('.');
            }
            out.push_str(&segment.name);
        }
        out
    }

    /// Name of the last segment, e.g. `Map` for `java.util.Map<K, V>`.
    pub fn simple_name(&self) -> &str {
        self.segments.last().map_or("", |s| s.name.as_str())
    }

    /// Type arguments of the last segment.
    pub fn args(&self) -> &[TypeArgument] {
        self.segments.last().map_or(&[], |s| s.args.as_slice())
    }

    /// Whether this is exactly the bare name `name`: one segment, no
    /// arguments, no array dimensions.
    pub fn is_bare(&self, name: &str) -> bool {
        self.dimensions == 0
            && self.segments.len() == 1
            && self.segments[0].args.is_empty()
            && self.segments[0].name == name
    }

    /// Head segment name when it could name a type variable (no arguments).
    pub(crate) fn variable_head(&self) -> Option<&str> {
        let head = self.segments.first()?;
        head.args.is_empty().then_some(head.name.as_str())
    }

    /// Wrap as a concrete type argument.
    #[inline]
    pub fn into_argument(self) -> TypeArgument {
        TypeArgument::Concrete(self)
    }
}

impl fmt::Display for TypeReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{}", segment.name)?;
            if !segment.args.is_empty() {
                write!(f, "<")?;
                for (j, arg) in segment.args.iter().enumerate() {
                    if j > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{arg}")?;
                }
                write!(f, ">")?;
            }
        }
        for _ in 0..self.dimensions {
            write!(f, "[]")?;
        }
        Ok(())
    }
}

impl From<TypeReference> for String {
    fn from(reference: TypeReference) -> String {
        reference.to_string()
    }
}

impl TryFrom<String> for TypeReference {
    type Error = ParseTypeError;

    fn try_from(text: String) -> Result<Self, Self::Error> {
        text.parse()
    }
}

/// Direction of a wildcard bound.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
pub enum BoundDirection {
    /// `? extends X`
    Upper,
    /// `? super X`
    Lower,
}

impl BoundDirection {
    pub fn keyword(self) -> &'static str {
        match self {
            BoundDirection::Upper => "extends",
            BoundDirection::Lower => "super",
        }
    }
}

/// The bound of a wildcard argument.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub struct WildcardBound {
    pub direction: BoundDirection,
    pub reference: TypeReference,
}

/// A wildcard argument: `?`, `? extends X`, or `? super X`.
#[derive(Clone, Eq, PartialEq, Hash, Debug, Default)]
pub struct Wildcard {
    pub bound: Option<WildcardBound>,
}

impl Wildcard {
    /// The unbounded wildcard `?`.
    pub fn unbounded() -> Self {
        Wildcard { bound: None }
    }

    pub fn upper(reference: TypeReference) -> Self {
        Wildcard {
            bound: Some(WildcardBound {
                direction: BoundDirection::Upper,
                reference,
            }),
        }
    }

    pub fn lower(reference: TypeReference) -> Self {
        Wildcard {
            bound: Some(WildcardBound {
                direction: BoundDirection::Lower,
                reference,
            }),
        }
    }

    /// The reference a wildcard stands for when it must be used as a type:
    /// its upper bound, or `java.lang.Object`.
    pub fn erasure(&self) -> TypeReference {
        match &self.bound {
            Some(WildcardBound {
                direction: BoundDirection::Upper,
                reference,
            }) => reference.clone(),
            _ => TypeReference::object(),
        }
    }
}

/// A type argument: a concrete reference or a wildcard.
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
pub enum TypeArgument {
    Concrete(TypeReference),
    Wildcard(Wildcard),
}

impl TypeArgument {
    /// Concrete argument naming `name`.
    pub fn named(name: &str) -> Self {
        TypeArgument::Concrete(TypeReference::named(name))
    }

    /// The reference this argument denotes when it has to stand alone.
    pub fn as_reference(&self) -> TypeReference {
        match self {
            TypeArgument::Concrete(reference) => reference.clone(),
            TypeArgument::Wildcard(wildcard) => wildcard.erasure(),
        }
    }
}

impl fmt::Display for TypeArgument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeArgument::Concrete(reference) => write!(f, "{reference}"),
            TypeArgument::Wildcard(Wildcard { bound: None }) => write!(f, "?"),
            TypeArgument::Wildcard(Wildcard {
                bound: Some(bound),
            }) => write!(f, "? {} {}", bound.direction.keyword(), bound.reference),
        }
    }
}

/// A declared type parameter: a name and its bounds (empty = unbounded).
#[derive(Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TypeParameter {
    pub name: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub bounds: Vec<TypeReference>,
}

impl TypeParameter {
    /// An unbounded type parameter.
    pub fn new(name: impl Into<String>) -> Self {
        TypeParameter {
            name: name.into(),
            bounds: Vec::new(),
        }
    }

    pub fn bounded(name: impl Into<String>, bounds: Vec<TypeReference>) -> Self {
        TypeParameter {
            name: name.into(),
            bounds,
        }
    }

    /// A copy of this parameter under a different name. Bounds are kept as
    /// written; callers that rename several parameters at once substitute the
    /// bounds themselves.
    #[must_use]
    pub fn renamed(&self, name: impl Into<String>) -> Self {
        TypeParameter {
            name: name.into(),
            bounds: self.bounds.clone(),
        }
    }

    /// The parameter used as an argument, e.g. to rename `T` onto `U`.
    pub fn as_argument(&self) -> TypeArgument {
        TypeArgument::named(&self.name)
    }

    /// What a reference to this parameter erases to: its first bound, or
    /// `java.lang.Object`.
    pub fn erasure(&self) -> TypeReference {
        self.bounds
            .first()
            .cloned()
            .unwrap_or_else(TypeReference::object)
    }
}

impl fmt::Display for TypeParameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name)?;
        for (i, bound) in self.bounds.iter().enumerate() {
            if i == 0 {
                write!(f, " extends {bound}")?;
            } else {
                write!(f, " & {bound}")?;
            }
        }
        Ok(())
    }
}

/// Render a type parameter list, `<A, B extends X>`, or nothing when empty.
pub fn display_params(params: &[TypeParameter]) -> String {
    if params.is_empty() {
        return String::new();
    }
    let inner: Vec<String> = params.iter().map(ToString::to_string).collect();
    format!("<{}>", inner.join(", "))
}
