//! Deterministic, collision-free renaming of every schema-defined name into
//! a target C++ identifier.

use std::collections::BTreeMap;

use crate::ident::sanitize_type_identifier;
use crate::model::SchemaModel;

/// A bijection from schema names (structures ∪ enums ∪ aliases ∪
/// synthesized-params names) to target C++ identifiers.
#[derive(Debug, Clone, Default)]
pub struct NameMap {
    forward: BTreeMap<String, String>,
}

impl NameMap {
    /// Build the map by iterating `names` in sorted order and resolving
    /// collisions with a `_2`, `_3`, ... suffix. Sorted iteration is what
    /// makes the assignment reproducible across runs regardless of the
    /// input JSON's definition order.
    pub fn build<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut sorted: Vec<String> = names.into_iter().map(Into::into).collect();
        sorted.sort();
        sorted.dedup();

        let mut forward = BTreeMap::new();
        let mut used = std::collections::HashSet::new();
        for original in sorted {
            let base = sanitize_type_identifier(&original, "Type");
            let mut candidate = base.clone();
            let mut suffix = 2;
            while used.contains(&candidate) {
                candidate = format!("{base}_{suffix}");
                suffix += 1;
            }
            used.insert(candidate.clone());
            forward.insert(original, candidate);
        }
        NameMap { forward }
    }

    /// Look up the target identifier for a schema name. Falls back to a
    /// fresh sanitization if the name was somehow not registered — this
    /// should not happen for a well-formed [`SchemaModel`], but keeps the
    /// renderer total rather than panicking on a parser/namemap mismatch.
    pub fn get(&self, schema_name: &str) -> String {
        self.forward
            .get(schema_name)
            .cloned()
            .unwrap_or_else(|| sanitize_type_identifier(schema_name, "Type"))
    }
}

/// For every request/notification without a `params` field, synthesize a
/// placeholder name. If the method's declared type name ends in `Request`
/// or `Notification`, that suffix is swapped for `Params`; otherwise the
/// method is UpperCamelCased and suffixed with `Params`.
pub fn derive_params_name(type_name: Option<&str>, method: &str) -> String {
    if let Some(type_name) = type_name {
        if let Some(stripped) = type_name.strip_suffix("Request") {
            return format!("{stripped}Params");
        }
        if let Some(stripped) = type_name.strip_suffix("Notification") {
            return format!("{stripped}Params");
        }
    }
    method_to_type_name(method, "Params")
}

fn method_to_type_name(method: &str, suffix: &str) -> String {
    let parts: Vec<&str> = method
        .split(|c: char| !c.is_ascii_alphanumeric())
        .filter(|p| !p.is_empty())
        .collect();
    let base = if parts.is_empty() {
        "Method".to_string()
    } else {
        parts
            .iter()
            .map(|part| {
                let mut chars = part.chars();
                match chars.next() {
                    Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                    None => String::new(),
                }
            })
            .collect::<String>()
    };
    format!("{base}{suffix}")
}

/// A synthesized params placeholder: its computed name and the method that
/// needed it. Order matches the owning request/notification list.
#[derive(Debug, Clone)]
pub struct SynthesizedParams {
    pub name: String,
    pub method: String,
}

/// Collect one [`SynthesizedParams`] for every request/notification whose
/// `params` is absent — requests first, then notifications, each in their
/// original schema order.
pub fn collect_synthesized_params(model: &SchemaModel) -> Vec<SynthesizedParams> {
    let mut out = Vec::new();
    for req in &model.requests {
        if req.params.is_none() {
            out.push(SynthesizedParams {
                name: derive_params_name(req.type_name.as_deref(), &req.method),
                method: req.method.clone(),
            });
        }
    }
    for notif in &model.notifications {
        if notif.params.is_none() {
            out.push(SynthesizedParams {
                name: derive_params_name(notif.type_name.as_deref(), &notif.method),
                method: notif.method.clone(),
            });
        }
    }
    out
}

/// Build the complete name map for a schema: every struct, enum, and alias
/// name, plus every synthesized-params name.
pub fn build_full_name_map(model: &SchemaModel, synthesized: &[SynthesizedParams]) -> NameMap {
    let names = model
        .structs
        .keys()
        .cloned()
        .chain(model.enums.keys().cloned())
        .chain(model.aliases.keys().cloned())
        .chain(synthesized.iter().map(|p| p.name.clone()));
    NameMap::build(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn collisions_get_numeric_suffixes() {
        // "Foo Bar" and "Foo-Bar" both sanitize to "Foo_Bar".
        let map = NameMap::build(["Foo Bar", "Foo-Bar"]);
        let mut values: Vec<String> = ["Foo Bar", "Foo-Bar"].iter().map(|n| map.get(n)).collect();
        values.sort();
        assert_eq!(values, vec!["Foo_Bar", "Foo_Bar_2"]);
    }

    #[test]
    fn sorted_iteration_is_deterministic() {
        let a = NameMap::build(["Zeta", "Alpha", "Alpha_"]);
        let b = NameMap::build(["Alpha", "Alpha_", "Zeta"]);
        assert_eq!(a.get("Zeta"), b.get("Zeta"));
        assert_eq!(a.get("Alpha"), b.get("Alpha"));
    }

    #[test]
    fn derive_params_name_strips_request_and_notification_suffix() {
        assert_eq!(derive_params_name(Some("ProgressRequest"), "$/progress"), "ProgressParams");
        assert_eq!(derive_params_name(Some("DidOpenNotification"), "textDocument/didOpen"), "DidOpenParams");
        assert_eq!(derive_params_name(None, "$/progress"), "ProgressParams");
        assert_eq!(derive_params_name(None, "textDocument/didOpen"), "TextDocumentDidOpenParams");
    }
}
