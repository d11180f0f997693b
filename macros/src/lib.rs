//! Derive macros for the todolist reducer architecture
//!
//! # Available Macros
//!
//! - `#[derive(Action)]` - Generates helpers for action enums (intents/events)
//!
//! # Example
//!
//! ```ignore
//! use todolist_macros::Action;
//!
//! #[derive(Action, Clone, Debug)]
//! enum TodoAction {
//!     #[intent(persist)]
//!     Remove { id: u64 },
//!
//!     #[intent]
//!     CancelEdit,
//!
//!     #[event]
//!     PersistFailed { error: String },
//! }
//!
//! // Generated methods:
//! assert!(TodoAction::Remove { id: 1 }.is_intent());
//! assert!(TodoAction::Remove { id: 1 }.persists());
//! assert_eq!(TodoAction::CancelEdit.name(), "CancelEdit");
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{parse_macro_input, Attribute, Data, DeriveInput, Fields, Ident};

/// Derive macro for Action enums
///
/// Generates helper methods for action enums:
/// - `is_intent()` - Returns true if this variant is a user intent
/// - `is_event()` - Returns true if this variant is an internal event
/// - `persists()` - Returns true if applying this intent must be followed by
///   a write to persistent storage
/// - `name()` - Returns the variant name, for logging
///
/// # Attributes
///
/// - `#[intent]` - Mark a variant as a user intent
/// - `#[intent(persist)]` - Mark a variant as an intent that mutates persisted state
/// - `#[event]` - Mark a variant as an internal event
///
/// # Errors
///
/// This macro produces a compile error if:
/// - Applied to a non-enum type
/// - A variant has both `#[intent]` and `#[event]` attributes
/// - `#[intent(...)]` carries an option other than `persist`
#[proc_macro_derive(Action, attributes(intent, event))]
pub fn derive_action(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand_action(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

/// Classification of a single variant
struct VariantKind<'a> {
    ident: &'a Ident,
    pattern: TokenStream2,
    intent: bool,
    event: bool,
    persist: bool,
}

fn expand_action(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let name = &input.ident;

    let Data::Enum(data_enum) = &input.data else {
        return Err(syn::Error::new_spanned(
            input,
            "#[derive(Action)] can only be used on enums",
        ));
    };

    let mut variants = Vec::with_capacity(data_enum.variants.len());

    for variant in &data_enum.variants {
        let ident = &variant.ident;
        let intent_attr = find_attribute(&variant.attrs, "intent");
        let event = find_attribute(&variant.attrs, "event").is_some();

        if intent_attr.is_some() && event {
            return Err(syn::Error::new_spanned(
                variant,
                "Variant cannot be both #[intent] and #[event]",
            ));
        }

        let persist = match intent_attr {
            Some(attr) => parse_intent_options(attr)?,
            None => false,
        };

        let pattern = match &variant.fields {
            Fields::Named(_) => quote! { Self::#ident { .. } },
            Fields::Unnamed(_) => quote! { Self::#ident(..) },
            Fields::Unit => quote! { Self::#ident },
        };

        variants.push(VariantKind {
            ident,
            pattern,
            intent: intent_attr.is_some(),
            event,
            persist,
        });
    }

    let is_intent_arms = flag_arms(&variants, |v| v.intent);
    let is_event_arms = flag_arms(&variants, |v| v.event);
    let persists_arms = flag_arms(&variants, |v| v.persist);

    let name_arms = variants.iter().map(|v| {
        let pattern = &v.pattern;
        let label = v.ident.to_string();
        quote! { #pattern => #label, }
    });

    // Uninhabited enums have no arms to match on
    let name_body = if variants.is_empty() {
        quote! { match *self {} }
    } else {
        quote! { match self { #(#name_arms)* } }
    };

    Ok(quote! {
        impl #name {
            /// Returns true if this action is a user intent
            #[must_use]
            #[allow(clippy::match_like_matches_macro, unreachable_patterns)]
            pub const fn is_intent(&self) -> bool {
                match self {
                    #(#is_intent_arms)*
                    _ => false,
                }
            }

            /// Returns true if this action is an internal event
            #[must_use]
            #[allow(clippy::match_like_matches_macro, unreachable_patterns)]
            pub const fn is_event(&self) -> bool {
                match self {
                    #(#is_event_arms)*
                    _ => false,
                }
            }

            /// Returns true if applying this action must be persisted
            #[must_use]
            #[allow(clippy::match_like_matches_macro, unreachable_patterns)]
            pub const fn persists(&self) -> bool {
                match self {
                    #(#persists_arms)*
                    _ => false,
                }
            }

            /// Returns the variant name
            #[must_use]
            pub const fn name(&self) -> &'static str {
                #name_body
            }
        }
    })
}

/// Build `pattern => true,` arms for every variant matching `predicate`
fn flag_arms<F>(variants: &[VariantKind<'_>], predicate: F) -> Vec<TokenStream2>
where
    F: Fn(&VariantKind<'_>) -> bool,
{
    variants
        .iter()
        .filter(|v| predicate(v))
        .map(|v| {
            let pattern = &v.pattern;
            quote! { #pattern => true, }
        })
        .collect()
}

/// Parse the options of an `#[intent]` attribute, returning whether `persist` was set
fn parse_intent_options(attr: &Attribute) -> syn::Result<bool> {
    // Bare `#[intent]`
    if matches!(attr.meta, syn::Meta::Path(_)) {
        return Ok(false);
    }

    let mut persist = false;
    attr.parse_nested_meta(|meta| {
        if meta.path.is_ident("persist") {
            persist = true;
            Ok(())
        } else {
            Err(meta.error("unsupported #[intent] option, expected `persist`"))
        }
    })?;
    Ok(persist)
}

/// Find an attribute by name
fn find_attribute<'a>(attrs: &'a [Attribute], name: &str) -> Option<&'a Attribute> {
    attrs.iter().find(|attr| attr.path().is_ident(name))
}
