use proc_macro::TokenStream;
use proc_macro2::TokenStream as TokenStream2;
use quote::quote;
use syn::{Data, DeriveInput, Field, Fields, Index, Member, Type, parse_macro_input};

/// Implements `class_state::ClassState` by pointing `update_slot` at a field.
///
/// The field marked `#[update_slot]` wins; otherwise the struct must have
/// exactly one field whose type is named `UpdateSlot`.
///
/// ```ignore
/// #[derive(ClassState)]
/// struct Counter {
///     count: Cell<i32>,
///     slot: UpdateSlot,
/// }
/// ```
#[proc_macro_derive(ClassState, attributes(update_slot))]
pub fn derive_class_state(input: TokenStream) -> TokenStream {
    let input = parse_macro_input!(input as DeriveInput);
    expand(&input)
        .unwrap_or_else(syn::Error::into_compile_error)
        .into()
}

fn expand(input: &DeriveInput) -> syn::Result<TokenStream2> {
    let Data::Struct(data) = &input.data else {
        return Err(syn::Error::new_spanned(
            &input.ident,
            "ClassState can only be derived for structs",
        ));
    };
    let member = slot_member(&input.ident, &data.fields)?;

    let name = &input.ident;
    let (impl_generics, ty_generics, where_clause) = input.generics.split_for_impl();
    Ok(quote! {
        impl #impl_generics ::class_state::ClassState for #name #ty_generics #where_clause {
            fn update_slot(&self) -> &::class_state::UpdateSlot {
                &self.#member
            }
        }
    })
}

fn slot_member(ident: &syn::Ident, fields: &Fields) -> syn::Result<Member> {
    let fields: Vec<(usize, &Field)> = fields.iter().enumerate().collect();

    let marked: Vec<_> = fields
        .iter()
        .filter(|(_, f)| f.attrs.iter().any(|a| a.path().is_ident("update_slot")))
        .collect();
    match marked.as_slice() {
        [(i, field)] => return Ok(member(*i, field)),
        [_, (_, second), ..] => {
            return Err(syn::Error::new_spanned(
                second,
                "only one field may be marked #[update_slot]",
            ));
        }
        [] => {}
    }

    let typed: Vec<_> = fields.iter().filter(|(_, f)| is_update_slot(&f.ty)).collect();
    match typed.as_slice() {
        [(i, field)] => Ok(member(*i, field)),
        [] => Err(syn::Error::new_spanned(
            ident,
            "no `UpdateSlot` field found; add one or mark it with #[update_slot]",
        )),
        [_, (_, second), ..] => Err(syn::Error::new_spanned(
            second,
            "several `UpdateSlot` fields; mark the one to use with #[update_slot]",
        )),
    }
}

fn member(index: usize, field: &Field) -> Member {
    match &field.ident {
        Some(ident) => Member::Named(ident.clone()),
        None => Member::Unnamed(Index::from(index)),
    }
}

fn is_update_slot(ty: &Type) -> bool {
    match ty {
        Type::Path(path) => path
            .path
            .segments
            .last()
            .is_some_and(|seg| seg.ident == "UpdateSlot"),
        _ => false,
    }
}
