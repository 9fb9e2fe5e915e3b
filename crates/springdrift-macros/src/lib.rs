use proc_macro::TokenStream;
use quote::quote;
use syn::{Data, DeriveInput, Error, Expr, Field, Fields, Ident, Result, Type, parse_macro_input};

/// Derive macro that generates a `Default` implementation and a range check
/// for configuration structs with inline default values.
///
/// String fields accept string literals, which are converted with `.into()`.
/// Every other default is used as written and left to type inference.
///
/// Fields may also carry a `#[bound(...)]` attribute:
///
/// - `#[bound(min = expr)]` requires `field >= expr`
/// - `#[bound(positive)]` requires `field > Default::default()`
///
/// The derive always emits `pub fn bound_violations(&self) -> Vec<String>`,
/// which lists one message per violated bound (empty when the struct has no
/// bounds).
///
/// # Example
/// ```
/// use springdrift_macros::ConfigDefaults;
/// use serde::{Serialize, Deserialize};
///
/// #[derive(ConfigDefaults, Serialize, Deserialize)]
/// #[serde(default)]
/// pub struct ChainConfig {
///     #[default(20)]
///     #[bound(min = 2)]
///     pub particle_count: usize,
///
///     #[default(1.0 / 60.0)]
///     #[bound(positive)]
///     pub dt: f64,
///
///     #[default(None)]
///     pub seed: Option<u64>,
///
///     #[default("leapfrog")]
///     pub integrator: String,
/// }
///
/// let config = ChainConfig::default();
/// assert_eq!(config.particle_count, 20);
/// assert_eq!(config.seed, None);
/// assert_eq!(config.integrator, "leapfrog");
/// assert!(config.bound_violations().is_empty());
///
/// let broken = ChainConfig { particle_count: 1, dt: 0.0, ..config };
/// assert_eq!(broken.bound_violations().len(), 2);
/// ```
///
/// # Errors
///
/// The macro will produce a compile error if:
/// - Applied to anything other than a struct with named fields
/// - Any field is missing a `#[default(...)]` attribute
/// - A `default` or `bound` attribute is malformed
#[proc_macro_derive(ConfigDefaults, attributes(default, bound))]
pub fn config_defaults(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);

    match generate_impls(input) {
        Ok(tokens) => tokens.into(),
        Err(err) => err.to_compile_error().into(),
    }
}

/// A constraint declared through `#[bound(...)]`
enum Bound {
    Min(Expr),
    Positive,
}

fn generate_impls(input: DeriveInput) -> Result<proc_macro2::TokenStream> {
    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();

    let fields = match &input.data {
        Data::Struct(data) => match &data.fields {
            Fields::Named(fields) => &fields.named,
            Fields::Unnamed(_) => {
                return Err(Error::new_spanned(
                    &input,
                    "ConfigDefaults only supports structs with named fields",
                ));
            }
            Fields::Unit => {
                return Err(Error::new_spanned(
                    &input,
                    "ConfigDefaults cannot be derived for unit structs",
                ));
            }
        },
        Data::Enum(_) => {
            return Err(Error::new_spanned(
                &input,
                "ConfigDefaults can only be derived for structs, not enums",
            ));
        }
        Data::Union(_) => {
            return Err(Error::new_spanned(
                &input,
                "ConfigDefaults can only be derived for structs, not unions",
            ));
        }
    };

    let mut field_defaults = Vec::with_capacity(fields.len());
    let mut bound_checks = Vec::new();

    for field in fields {
        let field_name = field_ident(field)?;
        let field_type = &field.ty;
        let default_value = extract_default_value(field)?;

        field_defaults.push(if is_string_type(field_type) {
            quote! { #field_name: ::std::convert::Into::into(#default_value) }
        } else {
            quote! { #field_name: #default_value }
        });

        for bound in extract_bounds(field)? {
            bound_checks.push(bound_check(field_name, field_type, &bound));
        }
    }

    Ok(quote! {
        #[automatically_derived]
        impl #impl_generics Default for #name #ty_generics #where_clause {
            fn default() -> Self {
                Self {
                    #(#field_defaults),*
                }
            }
        }

        #[automatically_derived]
        impl #impl_generics #name #ty_generics #where_clause {
            /// Describe every field that falls outside its declared bound.
            #[allow(unused_mut)]
            pub fn bound_violations(&self) -> ::std::vec::Vec<::std::string::String> {
                let mut violations = ::std::vec::Vec::new();
                #(#bound_checks)*
                violations
            }
        }
    })
}

fn field_ident(field: &Field) -> Result<&Ident> {
    field
        .ident
        .as_ref()
        .ok_or_else(|| Error::new_spanned(field, "ConfigDefaults requires named fields"))
}

fn bound_check(field_name: &Ident, field_type: &Type, bound: &Bound) -> proc_macro2::TokenStream {
    let label = field_name.to_string();

    match bound {
        Bound::Min(min) => quote! {
            {
                let min: #field_type = #min;
                if !(self.#field_name >= min) {
                    violations.push(::std::format!(
                        "{} must be at least {}, got {}",
                        #label, min, self.#field_name
                    ));
                }
            }
        },
        Bound::Positive => quote! {
            {
                let zero: #field_type = ::std::default::Default::default();
                if !(self.#field_name > zero) {
                    violations.push(::std::format!(
                        "{} must be positive, got {}",
                        #label, self.#field_name
                    ));
                }
            }
        },
    }
}

/// Check if the type is String
fn is_string_type(ty: &Type) -> bool {
    if let Type::Path(type_path) = ty {
        if let Some(segment) = type_path.path.segments.last() {
            return segment.ident == "String";
        }
    }
    false
}

/// Extract the default value from a field's `#[default(...)]` attribute
fn extract_default_value(field: &Field) -> Result<proc_macro2::TokenStream> {
    let field_name = field
        .ident
        .as_ref()
        .map(|i| i.to_string())
        .unwrap_or_else(|| "unnamed field".to_string());

    for attr in &field.attrs {
        if attr.path().is_ident("default") {
            let tokens: proc_macro2::TokenStream = attr.parse_args().map_err(|e| {
                Error::new_spanned(
                    attr,
                    format!(
                        "Failed to parse default attribute for field '{}': {}",
                        field_name, e
                    ),
                )
            })?;

            if tokens.is_empty() {
                return Err(Error::new_spanned(
                    attr,
                    format!(
                        "Field '{}' has an empty #[default()] attribute. Please provide a default value.",
                        field_name
                    ),
                ));
            }

            return Ok(tokens);
        }
    }

    Err(Error::new_spanned(
        field,
        format!(
            "Field '{}' must have a #[default(...)] attribute specifying its default value",
            field_name
        ),
    ))
}

/// Collect every `#[bound(...)]` declared on a field
fn extract_bounds(field: &Field) -> Result<Vec<Bound>> {
    let mut bounds = Vec::new();

    for attr in field.attrs.iter().filter(|attr| attr.path().is_ident("bound")) {
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("min") {
                bounds.push(Bound::Min(meta.value()?.parse()?));
                Ok(())
            } else if meta.path.is_ident("positive") {
                bounds.push(Bound::Positive);
                Ok(())
            } else {
                Err(meta.error("unsupported bound, expected `min = ...` or `positive`"))
            }
        })?;
    }

    Ok(bounds)
}
