//! Case conversion, identifier sanitization, and keyword escaping.
//!
//! Every function here is pure and total: given the same input it always
//! produces the same output, which is what lets [`crate::namemap`] and the
//! emitters stay deterministic without any additional bookkeeping.

/// The C++23 reserved-word set, including alternative operator tokens and
/// the newer `char8_t`/`consteval`/`co_await`-family keywords. Kept sorted
/// so membership tests can binary-search instead of hashing.
#[rustfmt::skip]
const CPP_KEYWORDS: &[&str] = &[
    "alignas", "alignof", "and", "and_eq", "asm", "auto",
    "bitand", "bitor", "bool", "break",
    "case", "catch", "char", "char16_t", "char32_t", "char8_t", "class",
    "co_await", "co_return", "co_yield", "compl",
    "concept", "const", "const_cast", "consteval", "constexpr", "constinit",
    "continue",
    "decltype", "default", "delete", "do", "double", "dynamic_cast",
    "else", "enum", "explicit", "export", "extern",
    "false", "float", "for", "friend",
    "goto",
    "if", "inline", "int",
    "long",
    "mutable",
    "namespace", "new", "noexcept", "not", "not_eq", "nullptr",
    "operator", "or", "or_eq",
    "private", "protected", "public",
    "register", "reinterpret_cast", "requires", "return",
    "short", "signed", "sizeof", "static", "static_assert", "static_cast",
    "struct", "switch",
    "template", "this", "thread_local", "throw", "true", "try", "typedef",
    "typeid", "typename",
    "union", "unsigned", "using",
    "virtual", "void", "volatile",
    "wchar_t", "while",
    "xor", "xor_eq",
];

fn is_keyword(text: &str) -> bool {
    CPP_KEYWORDS.binary_search(&text).is_ok()
}

/// Split on upper/lowercase word boundaries (classic camelCase → snake_case),
/// then lowercase everything. `documentUri` → `document_uri`, `URIKind` →
/// `uri_kind` is NOT attempted — only lower-to-upper and upper-to-lower
/// transitions insert an underscore, matching the schema's own camelCase
/// property-naming convention.
pub fn camel_to_snake(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(chars.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let prev_lower = i > 0 && chars[i - 1].is_lowercase();
            let next_lower = i + 1 < chars.len() && chars[i + 1].is_lowercase();
            if i > 0 && (prev_lower || next_lower) {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}

/// Sanitize a schema name into a valid C++ member/variable identifier.
/// Returns the sanitized text plus whether keyword-escaping fired, so
/// callers can surface a diagnostic.
pub fn sanitize_identifier(name: &str, fallback: &str) -> (String, bool) {
    let mut text: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    text = text.trim_matches('_').to_string();
    if text.is_empty() {
        text = fallback.to_string();
    }
    if text.starts_with(|c: char| c.is_ascii_digit()) {
        text = format!("_{text}");
    }

    let keyword_hit = is_keyword(&text);
    if keyword_hit {
        text.push('_');
    }
    (text, keyword_hit)
}

/// Sanitize a schema name into a valid C++ type identifier. Unlike
/// [`sanitize_identifier`], interior/leading underscores are preserved
/// (they are meaningful in PascalCase type names) rather than trimmed.
pub fn sanitize_type_identifier(name: &str, fallback: &str) -> String {
    let mut text: String = name
        .chars()
        .map(|c| if c.is_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    if text.is_empty() {
        text = fallback.to_string();
    }
    if text.starts_with(|c: char| c.is_ascii_digit()) {
        text = format!("T_{text}");
    }
    if text.starts_with('_') {
        text = format!("Lsp{text}");
    }
    if is_keyword(&text) {
        text.push('_');
    }
    text
}

/// Normalize arbitrary text (an enum value's schema name or literal string)
/// into an UpperCamelCase enum member identifier.
pub fn enum_member_upper_camel(text: &str, fallback: &str) -> String {
    let normalized: String = text
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
        .collect();
    let snake = camel_to_snake(&normalized);
    let parts: Vec<&str> = snake.split('_').filter(|p| !p.is_empty()).collect();

    let mut candidate = if parts.is_empty() {
        fallback.to_string()
    } else {
        parts
            .iter()
            .map(|part| upper_camel_word(part))
            .collect::<String>()
    };

    if candidate.starts_with(|c: char| c.is_ascii_digit()) {
        candidate = format!("V{candidate}");
    }
    if is_keyword(&candidate) {
        candidate.push('_');
    }
    candidate
}

fn upper_camel_word(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}
