mod error_kind;

use error_kind::ErrorKindTarget;
use proc_macro::TokenStream;
use quote::ToTokens;
use syn::parse_macro_input;

/// Derives the [`ErrorKind`] trait from `symsolve-error` for the given struct.
///
/// This trait can be derived for unit structs and structs with named fields.
///
/// The information of the error can be customized using the `error` attribute by adding the
/// corresponding tags to it:
/// ```
/// use symsolve_attrs::ErrorKind;
///
/// #[derive(Debug, ErrorKind)]
/// #[error(message = "the system has no equations", labels = ["add an equation here"])]
/// pub struct Foo;
/// ```
///
/// The following tags are available:
///
/// | Tag         | Description                                                                  |
/// | ----------- | ---------------------------------------------------------------------------- |
/// | `message`   | The message displayed at the top of the error when it is displayed.          |
/// | `labels`    | The text of the labels that point to each span of the error, in order.      |
/// | `help`      | Optional help text for the error, describing what the user can do to fix it. |
///
/// `message` and `help` accept an expression that evaluates to a [`String`] or `&str`; `labels`
/// accepts anything that iterates over strings. The expressions are evaluated with `self` in
/// scope, so the fields of the struct can be used in them.
///
/// The generated code refers to the `ariadne` and `symsolve_error` crates, which must be
/// dependencies of the crate using the derive.
///
/// [`ErrorKind`]: https://docs.rs/symsolve-error
#[proc_macro_derive(ErrorKind, attributes(error))]
pub fn error_kind(item: TokenStream) -> TokenStream {
    let target = parse_macro_input!(item as ErrorKindTarget);
    target.into_token_stream().into()
}
