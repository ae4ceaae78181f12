//! Matching of lowered call expressions against the translation function name.

use crate::syntax::analyzer::types::{
    Argument,
    CallSite,
    Callee,
    ExtractedKey,
};

/// Returns the key of `call` when it is `function_name("literal", ...)`.
///
/// The match is purely structural: any identifier spelled `function_name`
/// counts regardless of what it is bound to, and member calls such as
/// `obj.t("key")` never match.
#[must_use]
pub fn match_call(call: &CallSite<'_>, function_name: &str) -> Option<ExtractedKey> {
    let Callee::Identifier(name) = call.callee else {
        return None;
    };
    if name != function_name {
        return None;
    }

    match call.args.first()? {
        Argument::StringLiteral { value, range } => Some(ExtractedKey::new(value.clone(), *range)),
        Argument::Other => None,
    }
}
