use proc_macro::TokenStream;

mod object;

/// Derive `ObjectModel` for a struct with named fields.
///
/// Struct attributes: `#[shapedb(class_name = "...")]`.
/// Field attributes: `#[shapedb(primary_key)]`, `#[shapedb(indexed)]`,
/// `#[shapedb(rename = "...")]`, `#[shapedb(ignore)]`.
#[proc_macro_derive(Object, attributes(shapedb))]
pub fn derive_object(input: TokenStream) -> TokenStream {
    object::derive_object(input.into()).into()
}
