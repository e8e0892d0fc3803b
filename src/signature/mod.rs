//! Typed signature model and deterministic stub rendering.
//!
//! This module describes a type's field/method surface as plain data and
//! renders that description to stable source text. The split keeps "what a
//! surface looks like" ([`SignatureDescriptor`]) independent from "how to
//! print it" ([`SignatureRenderer`]), so the determinism contract is easy to
//! test in isolation: identical descriptors always render to byte-identical
//! text, which is what backs the content-hash [`StubCache`].

use serde::{Deserialize, Serialize};

pub mod literal;
pub mod render;
pub mod stub_cache;

pub use literal::Literal;
pub use render::{RenderOptions, SignatureRenderer};
pub use stub_cache::{ContentHash, StubCache};

/// Reference to a type in a rendered signature.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TypeRef {
    /// A declared, named type, rendered verbatim.
    Named(String),
    /// Sentinel for an untyped parameter; renders as `Box<dyn Any>`.
    Any,
}

impl TypeRef {
    /// Convenience constructor for a named type.
    pub fn named(name: impl Into<String>) -> Self {
        TypeRef::Named(name.into())
    }

    /// The textual form used in rendered signatures.
    pub fn rendered(&self) -> &str {
        match self {
            TypeRef::Named(name) => name,
            TypeRef::Any => "Box<dyn Any>",
        }
    }
}

/// Visibility of a field in rendered output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Visibility {
    /// Rendered with a `pub ` prefix.
    Public,
    /// Rendered with a `pub(crate) ` prefix.
    Crate,
    /// Rendered with no prefix.
    Private,
}

impl Visibility {
    pub(crate) fn prefix(&self) -> &'static str {
        match self {
            Visibility::Public => "pub ",
            Visibility::Crate => "pub(crate) ",
            Visibility::Private => "",
        }
    }
}

/// One field of a described type's surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldSignature {
    /// Field name.
    pub name: String,
    /// Declared field type.
    pub ty: TypeRef,
    /// Rendered visibility.
    pub visibility: Visibility,
}

impl FieldSignature {
    /// A public field of the given name and type.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty,
            visibility: Visibility::Public,
        }
    }
}

/// One parameter of a described method.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParamSignature {
    /// Parameter name.
    pub name: String,
    /// Declared type, or `None` for an untyped parameter.
    pub ty: Option<TypeRef>,
    /// Default value, rendered as an inline literal annotation.
    pub default: Option<Literal>,
}

impl ParamSignature {
    /// A typed parameter with no default.
    pub fn new(name: impl Into<String>, ty: TypeRef) -> Self {
        Self {
            name: name.into(),
            ty: Some(ty),
            default: None,
        }
    }

    /// An untyped parameter; its type renders as the `any` sentinel.
    pub fn untyped(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ty: None,
            default: None,
        }
    }

    /// Attaches a default value literal.
    pub fn with_default(mut self, default: Literal) -> Self {
        self.default = Some(default);
        self
    }
}

/// One method of a described type's surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MethodSignature {
    /// Method name.
    pub name: String,
    /// Parameters in declaration order; the receiver is implicit.
    pub params: Vec<ParamSignature>,
    /// Return type, or `None` for unit.
    pub return_type: Option<TypeRef>,
    /// True when the described method carries no body of its own.
    pub is_abstract: bool,
}

impl MethodSignature {
    /// A concrete method with the given name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            params: Vec::new(),
            return_type: None,
            is_abstract: false,
        }
    }

    /// Marks the method abstract.
    pub fn abstract_method(mut self) -> Self {
        self.is_abstract = true;
        self
    }

    /// Appends a parameter.
    pub fn param(mut self, param: ParamSignature) -> Self {
        self.params.push(param);
        self
    }

    /// Sets the return type.
    pub fn returns(mut self, ty: TypeRef) -> Self {
        self.return_type = Some(ty);
        self
    }
}

/// Structured description of a type's field/method surface.
///
/// Purely derived data: descriptors are regenerated on demand from whatever
/// introspection source feeds them and never mutated in place. Rendering a
/// descriptor is a pure function, so the same descriptor always produces the
/// same stub text.
///
/// # Examples
///
/// ```rust
/// use bindery::signature::{
///     FieldSignature, MethodSignature, ParamSignature, RenderOptions,
///     SignatureDescriptor, SignatureRenderer, TypeRef,
/// };
///
/// let descriptor = SignatureDescriptor::new("Widget")
///     .field(FieldSignature::new("id", TypeRef::named("u64")))
///     .method(
///         MethodSignature::new("render")
///             .param(ParamSignature::new("depth", TypeRef::named("i64")))
///             .returns(TypeRef::named("String"))
///             .abstract_method(),
///     );
///
/// let renderer = SignatureRenderer::new();
/// let text = renderer.surface(&descriptor, RenderOptions::default())?;
/// assert!(text.contains("pub struct WidgetStub"));
/// assert!(text.contains("fn render(&self, depth: i64) -> String;"));
/// # Ok::<(), bindery::ContainerError>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignatureDescriptor {
    /// Name of the described type.
    pub type_name: String,
    /// Field surface in declaration order.
    pub fields: Vec<FieldSignature>,
    /// Method surface in declaration order.
    pub methods: Vec<MethodSignature>,
}

impl SignatureDescriptor {
    /// An empty descriptor for the given type name.
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            fields: Vec::new(),
            methods: Vec::new(),
        }
    }

    /// Appends a field.
    pub fn field(mut self, field: FieldSignature) -> Self {
        self.fields.push(field);
        self
    }

    /// Appends a method.
    pub fn method(mut self, method: MethodSignature) -> Self {
        self.methods.push(method);
        self
    }
}
