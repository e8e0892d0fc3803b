//! Deterministic rendering of signature descriptors to stub source text.

use crate::error::ContainerResult;

use super::{FieldSignature, MethodSignature, ParamSignature, SignatureDescriptor, TypeRef};

/// Switches controlling how signatures render.
///
/// Both switches exist for generation contexts with stricter grammar than
/// the described type: a concrete stand-in cannot keep the abstract marker,
/// and an interface-satisfaction context cannot redeclare defaults.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Render abstract methods in body form instead of declaration form.
    pub skip_abstract_qualifier: bool,
    /// Omit default-value annotations from parameters.
    pub skip_default_values: bool,
}

impl RenderOptions {
    /// Declaration-form output with defaults included.
    pub fn new() -> Self {
        Self::default()
    }

    /// Body-form output for generating a concrete stand-in.
    pub fn concrete() -> Self {
        Self {
            skip_abstract_qualifier: true,
            skip_default_values: true,
        }
    }
}

/// Renders descriptors to stable source text.
///
/// Rendering is a pure function of the descriptor and options: the same
/// input always produces byte-identical output. That determinism is what
/// lets [`StubCache`](super::StubCache) key generated text by content hash.
#[derive(Debug, Clone, Copy, Default)]
pub struct SignatureRenderer;

impl SignatureRenderer {
    /// Creates a renderer.
    pub fn new() -> Self {
        Self
    }

    /// The parameter's declared type, or the `any` sentinel when untyped.
    pub fn param_type(&self, param: &ParamSignature) -> TypeRef {
        param.ty.clone().unwrap_or(TypeRef::Any)
    }

    /// Renders one field as a struct-field line, without any initializer.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::signature::{FieldSignature, SignatureRenderer, TypeRef};
    ///
    /// let renderer = SignatureRenderer::new();
    /// let field = FieldSignature::new("id", TypeRef::named("u64"));
    /// assert_eq!(renderer.field_signature(&field), "pub id: u64");
    /// ```
    pub fn field_signature(&self, field: &FieldSignature) -> String {
        format!(
            "{}{}: {}",
            field.visibility.prefix(),
            field.name,
            field.ty.rendered()
        )
    }

    /// Renders one method signature.
    ///
    /// Abstract methods render in declaration form (`fn name(...) -> T;`)
    /// unless `skip_abstract_qualifier` is set, in which case they render in
    /// body form like concrete methods (`{ unimplemented!() }`). Parameter
    /// defaults render as inline annotations unless `skip_default_values`
    /// is set. A default that cannot be rendered (an opaque value) fails
    /// the whole call.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use bindery::signature::{
    ///     Literal, MethodSignature, ParamSignature, RenderOptions, SignatureRenderer, TypeRef,
    /// };
    ///
    /// let renderer = SignatureRenderer::new();
    /// let method = MethodSignature::new("page")
    ///     .param(ParamSignature::new("size", TypeRef::named("i64")).with_default(Literal::Int(25)))
    ///     .returns(TypeRef::named("String"))
    ///     .abstract_method();
    ///
    /// assert_eq!(
    ///     renderer.method_signature(&method, RenderOptions::default())?,
    ///     "fn page(&self, size: i64 /* = 25 */) -> String;"
    /// );
    /// assert_eq!(
    ///     renderer.method_signature(&method, RenderOptions::concrete())?,
    ///     "fn page(&self, size: i64) -> String { unimplemented!() }"
    /// );
    /// # Ok::<(), bindery::ContainerError>(())
    /// ```
    pub fn method_signature(
        &self,
        method: &MethodSignature,
        options: RenderOptions,
    ) -> ContainerResult<String> {
        let mut out = String::new();
        out.push_str("fn ");
        out.push_str(&method.name);
        out.push_str("(&self");
        for param in &method.params {
            out.push_str(", ");
            out.push_str(&param.name);
            out.push_str(": ");
            out.push_str(self.param_type(param).rendered());
            if !options.skip_default_values {
                if let Some(default) = &param.default {
                    out.push_str(" /* = ");
                    out.push_str(&default.render()?);
                    out.push_str(" */");
                }
            }
        }
        out.push(')');
        if let Some(return_type) = &method.return_type {
            out.push_str(" -> ");
            out.push_str(return_type.rendered());
        }
        if method.is_abstract && !options.skip_abstract_qualifier {
            out.push(';');
        } else {
            out.push_str(" { unimplemented!() }");
        }
        Ok(out)
    }

    /// Renders the full stand-in surface for a descriptor.
    ///
    /// Fields become a `{name}Stub` struct block (a unit struct when there
    /// are none) and methods become a `{name}Surface` trait block. The
    /// output mirrors the described public surface without materializing
    /// any real state.
    pub fn surface(
        &self,
        descriptor: &SignatureDescriptor,
        options: RenderOptions,
    ) -> ContainerResult<String> {
        let mut out = String::new();
        if descriptor.fields.is_empty() {
            out.push_str(&format!("pub struct {}Stub;\n", descriptor.type_name));
        } else {
            out.push_str(&format!("pub struct {}Stub {{\n", descriptor.type_name));
            for field in &descriptor.fields {
                out.push_str("    ");
                out.push_str(&self.field_signature(field));
                out.push_str(",\n");
            }
            out.push_str("}\n");
        }
        if !descriptor.methods.is_empty() {
            out.push_str(&format!("\npub trait {}Surface {{\n", descriptor.type_name));
            for method in &descriptor.methods {
                out.push_str("    ");
                out.push_str(&self.method_signature(method, options)?);
                out.push('\n');
            }
            out.push_str("}\n");
        }
        Ok(out)
    }
}
