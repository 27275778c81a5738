//! Class, field, and marker declarations as lowered by the host front end.

use crate::location::SourceLocation;
use crate::name::QualifiedName;
use crate::ty::TypeRef;

/// Declared accessibility, ordered most- to least-visible.
#[derive(Clone, Copy, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum Accessibility {
    Public,
    ProtectedInternal,
    Internal,
    Protected,
    PrivateProtected,
    Private,
}

impl Accessibility {
    /// Keyword form used in emitted source.
    pub fn keyword(self) -> &'static str {
        match self {
            Accessibility::Public => "public",
            Accessibility::ProtectedInternal => "protected internal",
            Accessibility::Internal => "internal",
            Accessibility::Protected => "protected",
            Accessibility::PrivateProtected => "private protected",
            Accessibility::Private => "private",
        }
    }
}

/// A constant value appearing as a marker argument or resolution key.
#[derive(Clone, PartialEq, Debug)]
pub enum ConstValue {
    Null,
    Str(String),
    Bool(bool),
    Char(char),
    Int(i32),
    Long(i64),
    UInt(u32),
    ULong(u64),
    Float(f32),
    Double(f64),
    /// A value kind the generator does not support as a service key. Carries
    /// the host's rendering of the value for messages.
    Unsupported(String),
}

impl ConstValue {
    /// The value read as a boolean flag, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConstValue::Bool(value) => Some(*value),
            _ => None,
        }
    }
}

/// One declarative marker attached to a class or a field, with
/// constructor-style positional arguments. Marker names arrive with aliases
/// already resolved, so recognition is plain name equality.
#[derive(Clone, PartialEq, Debug)]
pub struct MarkerUse {
    pub name: QualifiedName,
    pub args: Vec<ConstValue>,
    pub location: Option<SourceLocation>,
}

impl MarkerUse {
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            args: Vec::new(),
            location: None,
        }
    }

    pub fn with_args(name: QualifiedName, args: Vec<ConstValue>) -> Self {
        Self {
            name,
            args,
            location: None,
        }
    }
}

/// Setter half of a field, as visible to generated code.
#[derive(Clone, Copy, Eq, PartialEq, Hash, Debug)]
pub struct Setter {
    pub accessibility: Accessibility,
    /// Assignable during construction only.
    pub init_only: bool,
}

/// A field declaration on a class.
#[derive(Clone, PartialEq, Debug)]
pub struct FieldDeclaration {
    pub name: String,
    pub ty: TypeRef,
    pub is_static: bool,
    /// `None` when the field has no setter at all.
    pub setter: Option<Setter>,
    pub markers: Vec<MarkerUse>,
    pub location: Option<SourceLocation>,
}

impl FieldDeclaration {
    /// A non-static field with a public mutable setter and no markers.
    pub fn new<S: Into<String>>(name: S, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            is_static: false,
            setter: Some(Setter {
                accessibility: Accessibility::Public,
                init_only: false,
            }),
            markers: Vec::new(),
            location: None,
        }
    }
}

/// One declaration piece of a class.
///
/// Partial types contribute multiple pieces sharing a qualified name; the
/// generator merges pieces by fully-qualified identity.
#[derive(Clone, PartialEq, Debug)]
pub struct ClassDeclaration {
    pub name: QualifiedName,
    pub accessibility: Accessibility,
    pub is_abstract: bool,
    pub generic_arity: u32,
    /// Parent link; `None` at a chain root.
    pub base: Option<QualifiedName>,
    pub fields: Vec<FieldDeclaration>,
    pub markers: Vec<MarkerUse>,
    pub location: Option<SourceLocation>,
}

impl ClassDeclaration {
    /// A public, non-abstract, non-generic class with no base and no members.
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            accessibility: Accessibility::Public,
            is_abstract: false,
            generic_arity: 0,
            base: None,
            fields: Vec::new(),
            markers: Vec::new(),
            location: None,
        }
    }
}
