//! Message derive macro implementation (**parent-in-child** design).
//!
//! # Overview
//!
//! `#[derive(Message)]` generates:
//!
//! 1. `impl Message`: identifier, kind, name and `as_any`
//! 2. `impl Deref`: only for child messages, targeting the parent field
//!
//! # Root messages: `#[root_message(...)]`
//!
//! | Key | Example | Required | Description |
//! |-----|---------|----------|-------------|
//! | `kind` | `"command"` | **Yes** | `MessageKind` variant (`command` or `event`) |
//! | `name` | `"cmd"` | No | Message name (default: struct name) |
//!
//! # Child messages: `#[message(...)]`
//!
//! | Key | Example | Required | Description |
//! |-----|---------|----------|-------------|
//! | `name` | `"user.create"` | No | Message name (default: struct name) |
//!
//! # Field-level attributes `#[message(...)]`
//!
//! | Key | Description |
//! |-----|-------------|
//! | `id` | The `MessageId` field of a root message |
//! | `parent` | The embedded parent of a child message (type is auto-detected) |

use proc_macro2::TokenStream;
use quote::quote;
use syn::{Attribute, Data, DeriveInput, Fields, Ident, Type, spanned::Spanned};

// ============================================================================
// Attribute structures
// ============================================================================

/// Which kind of struct-level attribute was found.
enum MessageRole {
    /// `#[root_message(kind = "…", name = "…")]`
    Root { kind: String, name: Option<String> },
    /// `#[message(name = "…")]` or no attribute at all.
    Child { name: Option<String> },
}

/// Per-field `#[message(…)]` markers.
#[derive(Default)]
struct FieldAttrs {
    is_parent: bool,
    is_id: bool,
}

// ============================================================================
// Entry point
// ============================================================================

pub fn derive_message(input: &DeriveInput) -> syn::Result<TokenStream> {
    let role = parse_struct_attrs(&input.attrs)?;
    let name = &input.ident;

    if !input.generics.params.is_empty() {
        return Err(syn::Error::new(
            input.generics.span(),
            "Message cannot be derived for generic structs",
        ));
    }

    match &input.data {
        Data::Struct(data) => generate_struct_impl(name, &role, &data.fields),
        Data::Enum(_) => Err(syn::Error::new(
            input.span(),
            "Message does not support enums. Use one struct per message type.",
        )),
        Data::Union(_) => Err(syn::Error::new(
            input.span(),
            "Message cannot be derived for unions",
        )),
    }
}

// ============================================================================
// Attribute parsing
// ============================================================================

fn parse_struct_attrs(attrs: &[Attribute]) -> syn::Result<MessageRole> {
    for attr in attrs {
        if attr.path().is_ident("root_message") {
            let mut kind: Option<String> = None;
            let mut name: Option<String> = None;

            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("kind") {
                    kind = Some(meta.value()?.parse::<syn::LitStr>()?.value());
                } else if meta.path.is_ident("name") {
                    name = Some(meta.value()?.parse::<syn::LitStr>()?.value());
                } else {
                    return Err(meta.error("unknown #[root_message] key"));
                }
                Ok(())
            })?;

            let kind = kind.ok_or_else(|| {
                syn::Error::new(attr.span(), "#[root_message] requires `kind = \"…\"`")
            })?;

            return Ok(MessageRole::Root { kind, name });
        }
    }

    let mut name: Option<String> = None;
    for attr in attrs {
        if attr.path().is_ident("message") {
            attr.parse_nested_meta(|meta| {
                if meta.path.is_ident("name") {
                    name = Some(meta.value()?.parse::<syn::LitStr>()?.value());
                } else {
                    return Err(meta.error("unknown #[message] key"));
                }
                Ok(())
            })?;
        }
    }

    Ok(MessageRole::Child { name })
}

fn parse_field_attrs(attrs: &[Attribute]) -> syn::Result<FieldAttrs> {
    let mut result = FieldAttrs::default();

    for attr in attrs {
        if !attr.path().is_ident("message") {
            continue;
        }
        attr.parse_nested_meta(|meta| {
            if meta.path.is_ident("parent") {
                result.is_parent = true;
            } else if meta.path.is_ident("id") {
                result.is_id = true;
            } else {
                return Err(meta.error("unknown #[message] field marker"));
            }
            Ok(())
        })?;
    }

    Ok(result)
}

// ============================================================================
// Code generation
// ============================================================================

fn generate_struct_impl(
    name: &Ident,
    role: &MessageRole,
    fields: &Fields,
) -> syn::Result<TokenStream> {
    let mut parent_field: Option<(Ident, Type)> = None;
    let mut id_field: Option<Ident> = None;

    if let Fields::Named(named) = fields {
        for f in &named.named {
            let fa = parse_field_attrs(&f.attrs)?;
            let Some(ident) = f.ident.as_ref() else {
                continue;
            };
            if fa.is_parent {
                if parent_field.is_some() {
                    return Err(syn::Error::new(
                        f.span(),
                        "only one field may be marked #[message(parent)]",
                    ));
                }
                parent_field = Some((ident.clone(), f.ty.clone()));
            }
            if fa.is_id {
                id_field = Some(ident.clone());
            }
        }
    } else {
        return Err(syn::Error::new(
            name.span(),
            "Message can only be derived for structs with named fields",
        ));
    }

    match role {
        MessageRole::Root { kind, name: msg_name } => {
            if parent_field.is_some() {
                return Err(syn::Error::new(
                    name.span(),
                    "#[root_message] must not have a #[message(parent)] field",
                ));
            }
            let id = id_field.ok_or_else(|| {
                syn::Error::new(
                    name.span(),
                    "#[root_message] requires a field marked with #[message(id)]",
                )
            })?;
            generate_root_message(name, kind, msg_name.as_deref(), &id)
        }
        MessageRole::Child { name: msg_name } => {
            if id_field.is_some() {
                return Err(syn::Error::new(
                    name.span(),
                    "#[message(id)] is only valid on a #[root_message]; child messages inherit it",
                ));
            }
            let (pf_ident, pf_ty) = parent_field.ok_or_else(|| {
                syn::Error::new(
                    name.span(),
                    "Message requires either #[root_message(...)] or a field marked with #[message(parent)]",
                )
            })?;
            Ok(generate_child_message(
                name,
                msg_name.as_deref(),
                &pf_ident,
                &pf_ty,
            ))
        }
    }
}

fn message_name_lit(name: &Ident, override_name: Option<&str>) -> syn::LitStr {
    match override_name {
        Some(n) => syn::LitStr::new(n, name.span()),
        None => syn::LitStr::new(&name.to_string(), name.span()),
    }
}

// ============================================================================
// Root message generation
// ============================================================================

fn generate_root_message(
    name: &Ident,
    kind: &str,
    override_name: Option<&str>,
    id_field: &Ident,
) -> syn::Result<TokenStream> {
    let kind_variant = match kind.to_lowercase().as_str() {
        "command" => quote! { ::courier_core::MessageKind::Command },
        "event" => quote! { ::courier_core::MessageKind::Event },
        other => {
            return Err(syn::Error::new(
                name.span(),
                format!("unknown message kind `{other}`, expected \"command\" or \"event\""),
            ));
        }
    };
    let name_lit = message_name_lit(name, override_name);

    Ok(quote! {
        impl ::courier_core::Message for #name {
            fn message_id(&self) -> ::courier_core::MessageId {
                self.#id_field
            }

            fn kind(&self) -> ::courier_core::MessageKind {
                #kind_variant
            }

            fn message_name(&self) -> &'static str {
                #name_lit
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }
    })
}

// ============================================================================
// Child message generation
// ============================================================================

fn generate_child_message(
    name: &Ident,
    override_name: Option<&str>,
    parent_field_ident: &Ident,
    parent_ty: &Type,
) -> TokenStream {
    let name_lit = message_name_lit(name, override_name);

    // Children are immutable, so only `Deref` is generated.
    let deref_impl = quote! {
        impl ::std::ops::Deref for #name {
            type Target = #parent_ty;
            #[inline]
            fn deref(&self) -> &Self::Target {
                &self.#parent_field_ident
            }
        }
    };

    let message_impl = quote! {
        impl ::courier_core::Message for #name {
            fn message_id(&self) -> ::courier_core::MessageId {
                <#parent_ty as ::courier_core::Message>::message_id(&self.#parent_field_ident)
            }

            fn kind(&self) -> ::courier_core::MessageKind {
                <#parent_ty as ::courier_core::Message>::kind(&self.#parent_field_ident)
            }

            fn message_name(&self) -> &'static str {
                #name_lit
            }

            fn as_any(&self) -> &dyn ::std::any::Any {
                self
            }
        }
    };

    quote! {
        #deref_impl
        #message_impl
    }
}
