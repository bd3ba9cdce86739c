//! Render a single struct definition.

use std::collections::HashMap;

use crate::diagnostics::Diagnostics;
use crate::emit::doc::{build_doc_lines, suggests_true_default, write_doc};
use crate::emit::writer::CodeWriter;
use crate::flatten::{collect_struct_members, StructMember};
use crate::ident::{camel_to_snake, sanitize_identifier};
use crate::model::*;
use crate::namemap::NameMap;
use crate::render::Renderer;

struct MemberDef {
    cxx_type: String,
    base_name: String,
    comments: Vec<String>,
    default_value: Option<String>,
    /// Declared directly on the struct, as opposed to inherited or a
    /// `flatten<Parent>` member. Local declarations win the bare member
    /// name over whatever they collide with (spec scenario: an unsafe
    /// override keeps the child's local field unrenamed).
    is_own: bool,
}

fn is_optional_bool(prop: &PropertyDef) -> bool {
    prop.optional && matches!(&prop.type_expr, TypeExpr::Base(name) if name == "boolean")
}

fn make_member(
    renderer: &Renderer,
    names: &NameMap,
    owner_struct: &str,
    prop: &PropertyDef,
    declared_in: &str,
    inherited_from: Option<&str>,
    diagnostics: &mut Diagnostics,
) -> MemberDef {
    let owner_path = format!("{owner_struct}.{}", prop.name);
    let mut rendered = renderer.render_type(&prop.type_expr, &owner_path, Some(declared_in));
    let mut default_value = None;

    if is_optional_bool(prop) {
        rendered = "optional_bool".to_string();
        default_value = Some("{}".to_string());
        if let Some(doc) = &prop.doc.documentation {
            if suggests_true_default(doc) {
                diagnostics.suspicious_optional_bool_default(
                    owner_struct,
                    format!("{}.{}: optional bool defaults to false but docs suggest default true", owner_struct, prop.name),
                );
            }
        }
    } else if prop.optional {
        rendered = if let Some(inner) = rendered.strip_prefix("variant<").and_then(|s| s.strip_suffix('>')) {
            format!("optional_variant<{inner}>")
        } else {
            format!("optional<{rendered}>")
        };
        default_value = Some("{}".to_string());
    } else if let TypeExpr::StringLiteral(value) = &prop.type_expr {
        if let Some(owner_enum) = renderer.unique_owner_enum(value) {
            if let Some(member_name) = closed_enum_member_for_literal(renderer, owner_enum, value) {
                default_value = Some(format!("{}::{}", names.get(owner_enum), member_name));
            }
        }
    }

    let (member_name, keyword_hit) = sanitize_identifier(&camel_to_snake(&prop.name), "field");
    if keyword_hit {
        diagnostics.keyword_escape(
            owner_struct,
            format!("{owner_struct}.{}: renamed to `{member_name}` due to C++ keyword collision", prop.name),
        );
    }

    let mut comments = build_doc_lines(&prop.doc);
    if comments.is_empty() {
        comments.push(format!("Schema field: {}.", prop.name));
    }
    if let Some(parent) = inherited_from {
        let suffix = format!("(Inherited from [{parent}])");
        if let Some(last) = comments.last_mut() {
            *last = format!("{last} {suffix}");
        } else {
            comments.push(suffix);
        }
    }

    MemberDef {
        cxx_type: rendered,
        base_name: member_name,
        comments,
        default_value,
        is_own: inherited_from.is_none(),
    }
}

/// Recover the member identifier assigned to an enum value whose literal
/// text is `value`, using the same naming pass [`crate::emit::enum_emit`]
/// uses when it prints the enum's members.
fn closed_enum_member_for_literal(renderer: &Renderer, enum_name: &str, value: &str) -> Option<String> {
    let enum_def = renderer.model().enums.get(enum_name)?;
    let member_names = crate::emit::enum_emit::closed_string_member_names(enum_def);
    enum_def
        .values
        .iter()
        .zip(member_names)
        .find(|(ev, _)| ev.value.as_string() == value)
        .map(|(_, name)| name)
}

fn make_flatten_member(names: &NameMap, owner_struct: &str, parent_name: &str, diagnostics: &mut Diagnostics) -> MemberDef {
    let parent_cpp = names.get(parent_name);
    let (field_name, keyword_hit) = sanitize_identifier(&camel_to_snake(&parent_cpp), "base");
    if keyword_hit {
        diagnostics.keyword_escape(
            owner_struct,
            format!("{owner_struct}.{parent_name}: renamed flatten field to `{field_name}` due to C++ keyword collision"),
        );
    }
    MemberDef {
        cxx_type: format!("flatten<{parent_cpp}>"),
        base_name: field_name,
        comments: Vec::new(),
        default_value: None,
        is_own: false,
    }
}

/// Apply the final base-name collision pass, in member emission order.
///
/// A struct's own (locally declared) properties always win the bare member
/// name: when a local property shadows an inherited one without a safe
/// override, the inherited member is the one pushed to `_2`, regardless of
/// which one appears first in the emitted member list. Collisions that
/// don't involve a local property (e.g. two inherited members reaching the
/// same sanitized name) fall back to first-occurrence-keeps-it.
fn dedupe_member_names(struct_name: &str, members: &mut [MemberDef], diagnostics: &mut Diagnostics) {
    let mut own_claimed: HashMap<String, bool> = HashMap::new();
    for member in members.iter() {
        if member.is_own {
            own_claimed.entry(member.base_name.clone()).or_insert(false);
        }
    }

    let mut used: HashMap<String, usize> = own_claimed.keys().map(|name| (name.clone(), 1)).collect();

    for member in members.iter_mut() {
        let base = member.base_name.clone();
        if member.is_own {
            if let Some(claimed) = own_claimed.get_mut(&base) {
                if !*claimed {
                    *claimed = true;
                    continue; // keeps the bare name; `used[base]` stays reserved at 1
                }
            }
        }

        let count = used.entry(base.clone()).or_insert(0);
        if *count > 0 {
            let renamed = format!("{base}_{}", *count + 1);
            diagnostics.member_collision(
                struct_name,
                format!("{struct_name}.{base}: duplicate member name, renamed to `{renamed}`"),
            );
            member.base_name = renamed;
            *count += 1;
        } else {
            *count += 1;
        }
    }
}

pub fn emit_struct(model: &SchemaModel, renderer: &Renderer, names: &NameMap, struct_name: &str, diagnostics: &mut Diagnostics) -> String {
    let def = &model.structs[struct_name];
    let struct_cpp = names.get(struct_name);

    let mut members = Vec::new();
    for member in collect_struct_members(model, struct_name, diagnostics) {
        match member {
            StructMember::Inherited { flat, parent } => {
                members.push(make_member(renderer, names, struct_name, &flat.prop, &flat.declared_in, Some(&parent), diagnostics));
            }
            StructMember::Flatten { parent } => {
                members.push(make_flatten_member(names, struct_name, &parent, diagnostics));
            }
            StructMember::Own { prop } => {
                members.push(make_member(renderer, names, struct_name, &prop, struct_name, None, diagnostics));
            }
        }
    }
    dedupe_member_names(struct_name, &mut members, diagnostics);

    let mut w = CodeWriter::new();
    write_doc(&mut w, &build_doc_lines(&def.doc));
    w.block_open(&format!("struct {struct_cpp}"));

    if members.is_empty() {
        w.line("// empty");
    } else {
        let last = members.len() - 1;
        for (i, member) in members.iter().enumerate() {
            write_doc(&mut w, &member.comments);
            let mut decl = format!("{} {}", member.cxx_type, member.base_name);
            if let Some(default_value) = &member.default_value {
                decl.push_str(&format!(" = {default_value}"));
            }
            decl.push(';');
            w.line(&decl);
            if i != last {
                w.blank();
            }
        }
    }

    w.block_close_semi();
    w.finish().trim_end().to_string()
}
