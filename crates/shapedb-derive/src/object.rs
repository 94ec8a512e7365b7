use darling::{FromDeriveInput, FromField, ast::Data, util::Ignored};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};
use syn::{DeriveInput, Error, Generics, Ident, Type, WherePredicate, parse_quote};

///
/// ObjectInput
///

#[derive(FromDeriveInput)]
#[darling(attributes(shapedb), supports(struct_named))]
struct ObjectInput {
    ident: Ident,
    generics: Generics,
    data: Data<Ignored, ObjectField>,

    #[darling(default)]
    class_name: Option<String>,
}

///
/// ObjectField
///

#[derive(FromField)]
#[darling(attributes(shapedb))]
struct ObjectField {
    ident: Option<Ident>,
    ty: Type,

    #[darling(default)]
    primary_key: bool,

    #[darling(default)]
    indexed: bool,

    #[darling(default)]
    rename: Option<String>,

    #[darling(default)]
    ignore: bool,
}

impl ObjectField {
    // property name: rename wins over the field ident
    fn property_name(&self) -> Result<String, Error> {
        if let Some(rename) = &self.rename {
            return Ok(rename.clone());
        }

        self.ident
            .as_ref()
            .map(ToString::to_string)
            .ok_or_else(|| Error::new_spanned(&self.ty, "Object fields must be named"))
    }

    fn attributes_expr(&self) -> TokenStream {
        let mut flags = Vec::new();
        if self.primary_key {
            flags.push(format_ident!("PRIMARY_KEY"));
        }
        if self.indexed {
            flags.push(format_ident!("INDEXED"));
        }

        quote! {
            ::shapedb::schema::types::PropertyAttributes::NONE
                #(.union(::shapedb::schema::types::PropertyAttributes::#flags))*
        }
    }

    fn validate(&self) -> Result<(), Error> {
        if self.ignore && (self.primary_key || self.indexed || self.rename.is_some()) {
            return Err(Error::new_spanned(
                &self.ty,
                "an ignored field cannot carry other shapedb attributes",
            ));
        }

        Ok(())
    }
}

// derive_object
pub fn derive_object(input: TokenStream) -> TokenStream {
    let input: DeriveInput = match syn::parse2(input) {
        Ok(input) => input,
        Err(err) => return err.to_compile_error(),
    };

    let object = match ObjectInput::from_derive_input(&input) {
        Ok(object) => object,
        Err(err) => return err.write_errors(),
    };

    match expand(&object) {
        Ok(tokens) => tokens,
        Err(err) => err.to_compile_error(),
    }
}

fn expand(object: &ObjectInput) -> Result<TokenStream, Error> {
    let ident = &object.ident;
    let class_name = object
        .class_name
        .clone()
        .unwrap_or_else(|| ident.to_string());

    let Data::Struct(fields) = &object.data else {
        return Err(Error::new_spanned(
            ident,
            "Object can only be derived for structs with named fields",
        ));
    };

    let mut properties = Vec::new();
    let mut bounds: Vec<WherePredicate> = Vec::new();
    for field in fields.iter() {
        field.validate()?;
        if field.ignore {
            continue;
        }

        let name = field.property_name()?;
        let ty = &field.ty;
        let attributes = field.attributes_expr();

        properties.push(quote! {
            ::shapedb::schema::model::reflect_property::<#ty>(#name, #attributes)?
        });
        bounds.push(parse_quote!(#ty: ::shapedb::schema::model::PropertyValue));
    }

    let generics = with_field_bounds(&object.generics, bounds);
    let (impl_generics, ty_generics, where_clause) = generics.split_for_impl();

    Ok(quote! {
        impl #impl_generics ::shapedb::schema::model::ObjectModel for #ident #ty_generics #where_clause {
            const CLASS_NAME: &'static str = #class_name;

            fn object_schema() -> ::std::result::Result<
                ::shapedb::schema::node::ObjectSchema,
                ::shapedb::schema::error::SchemaError,
            > {
                let properties: ::std::vec::Vec<::shapedb::schema::node::Property> =
                    ::std::vec![#(#properties),*];

                ::shapedb::schema::node::ObjectSchema::new(Self::CLASS_NAME, properties)
            }
        }
    })
}

// Generic structs need every reflected field type to be a PropertyValue;
// concrete field types are checked at the call site instead.
fn with_field_bounds(generics: &Generics, bounds: Vec<WherePredicate>) -> Generics {
    let mut generics = generics.clone();
    if !generics.params.is_empty() {
        generics.make_where_clause().predicates.extend(bounds);
    }

    generics
}

///
/// TESTS
///
