//! Extracts translation keys from a source file using Tree-sitter.

use std::string::ToString;

use tree_sitter::{
    Language,
    Node,
    Parser,
    Point,
};

use crate::syntax::analyzer::literal::decode_literal;
use crate::syntax::analyzer::matcher::match_call;
use crate::syntax::analyzer::types::{
    Argument,
    CallSite,
    Callee,
    ExtractedKey,
    ScanError,
};
use crate::types::ByteRange;

/// Extracts text content from a tree-sitter node
fn extract_node_text(node: Node<'_>, source_bytes: &[u8]) -> Option<String> {
    node.utf8_text(source_bytes).ok().map(ToString::to_string)
}

/// Extracts every `function_name("literal")` key in document order.
///
/// # Errors
/// Returns `ScanError` if:
/// - Language setup fails
/// - The parser gives up
/// - The source contains a syntax error anywhere (no partial result)
pub fn extract_keys(
    source: &str,
    language: &Language,
    function_name: &str,
) -> Result<Vec<ExtractedKey>, ScanError> {
    let mut parser = Parser::new();
    parser.set_language(language).map_err(|e| ScanError::LanguageSetup(e.to_string()))?;
    let tree = parser.parse(source, None).ok_or(ScanError::ParseFailed)?;

    let root_node = tree.root_node();
    if root_node.has_error() {
        let point = first_error_position(root_node).unwrap_or_else(|| root_node.start_position());
        return Err(ScanError::Syntax { line: point.row + 1, column: point.column + 1 });
    }

    let source_bytes = source.as_bytes();
    let mut keys = Vec::new();
    let mut cursor = root_node.walk();

    // 前順走査（ソースコードの出現順）
    loop {
        let node = cursor.node();
        if node.kind() == "call_expression" {
            let call = lower_call(node, source_bytes);
            if let Some(key) = match_call(&call, function_name) {
                keys.push(key);
            }
        }

        if cursor.goto_first_child() {
            continue;
        }
        loop {
            if cursor.goto_next_sibling() {
                break;
            }
            if !cursor.goto_parent() {
                return Ok(keys);
            }
        }
    }
}

/// Lowers a `call_expression` node into a [`CallSite`].
fn lower_call<'a>(node: Node<'_>, source_bytes: &'a [u8]) -> CallSite<'a> {
    let callee = node
        .child_by_field_name("function")
        .map_or(Callee::Other, |function| lower_callee(function, source_bytes));

    // タグ付きテンプレート (t`key`) は引数リストを持たない
    let args = node
        .child_by_field_name("arguments")
        .filter(|arguments| arguments.kind() == "arguments")
        .map(|arguments| {
            let mut cursor = arguments.walk();
            arguments
                .named_children(&mut cursor)
                .filter(|arg| arg.kind() != "comment")
                .map(|arg| lower_argument(arg, source_bytes))
                .collect()
        })
        .unwrap_or_default();

    CallSite { callee, args }
}

/// 呼び出し対象を分類する
fn lower_callee<'a>(node: Node<'_>, source_bytes: &'a [u8]) -> Callee<'a> {
    match node.kind() {
        "identifier" => node.utf8_text(source_bytes).map_or(Callee::Other, Callee::Identifier),
        "member_expression" => node
            .child_by_field_name("property")
            .and_then(|property| property.utf8_text(source_bytes).ok())
            .map_or(Callee::Other, |property| Callee::Member { property }),
        // (t)("key") は t("key") と同じ
        "parenthesized_expression" => {
            let mut cursor = node.walk();
            let mut inner = node.named_children(&mut cursor).filter(|child| child.kind() != "comment");
            match (inner.next(), inner.next()) {
                (Some(expression), None) => lower_callee(expression, source_bytes),
                _ => Callee::Other,
            }
        }
        _ => Callee::Other,
    }
}

/// 静的な文字列リテラルだけを値として取り出す
fn lower_argument(node: Node<'_>, source_bytes: &[u8]) -> Argument {
    let is_static = match node.kind() {
        "string" => true,
        "template_string" => !has_substitution(node),
        _ => false,
    };
    if !is_static {
        return Argument::Other;
    }

    extract_node_text(node, source_bytes).and_then(|raw| decode_literal(&raw)).map_or(
        Argument::Other,
        |value| Argument::StringLiteral {
            value,
            range: ByteRange::new(node.start_byte(), node.end_byte()),
        },
    )
}

/// `${...}` を含むテンプレートかどうか
fn has_substitution(template: Node<'_>) -> bool {
    let mut cursor = template.walk();
    template.named_children(&mut cursor).any(|child| child.kind() == "template_substitution")
}

/// Finds the start of the first `ERROR` or `MISSING` node.
fn first_error_position(node: Node<'_>) -> Option<Point> {
    if node.is_error() || node.is_missing() {
        return Some(node.start_position());
    }

    let mut cursor = node.walk();
    node.children(&mut cursor)
        .filter(|child| child.has_error())
        .find_map(first_error_position)
}
