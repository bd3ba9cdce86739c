//! Render a single enumeration definition.

use std::collections::HashMap;

use crate::emit::doc::{build_doc_lines, write_doc};
use crate::emit::writer::CodeWriter;
use crate::ident::{camel_to_snake, enum_member_upper_camel, sanitize_identifier};
use crate::model::*;
use crate::namemap::NameMap;

fn smallest_unsigned_type(max_value: i64) -> &'static str {
    if max_value <= 0xFF {
        "std::uint8_t"
    } else if max_value <= 0xFFFF {
        "std::uint16_t"
    } else if max_value <= 0xFFFF_FFFF {
        "std::uint32_t"
    } else {
        "std::uint64_t"
    }
}

fn smallest_signed_type(min_value: i64, max_value: i64) -> &'static str {
    if min_value >= -(1 << 7) && max_value <= (1 << 7) - 1 {
        "std::int8_t"
    } else if min_value >= -(1 << 15) && max_value <= (1 << 15) - 1 {
        "std::int16_t"
    } else if min_value >= -(1 << 31) && max_value <= (1 << 31) - 1 {
        "std::int32_t"
    } else {
        "std::int64_t"
    }
}

/// Assign the UpperCamelCase member name every value in a *closed* string
/// enum gets, deduping collisions with a numeric suffix. Shared between the
/// enum emitter (to print the members) and the struct emitter (to default
/// a unique-owner string-literal field to `Enum::Member`).
pub fn closed_string_member_names(enum_def: &EnumDef) -> Vec<String> {
    let mut used: HashMap<String, usize> = HashMap::new();
    enum_def
        .values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let base = enum_member_upper_camel(&value.value.as_string(), &format!("Value{}", index + 1));
            let count = used.entry(base.clone()).or_insert(0);
            let name = if *count == 0 { base.clone() } else { format!("{base}{}", *count + 1) };
            *count += 1;
            name
        })
        .collect()
}

fn integer_member_names(enum_def: &EnumDef) -> Vec<String> {
    let mut used: HashMap<String, usize> = HashMap::new();
    enum_def
        .values
        .iter()
        .enumerate()
        .map(|(index, value)| {
            let base = enum_member_upper_camel(&value.name, &format!("Value{}", index + 1));
            let count = used.entry(base.clone()).or_insert(0);
            let name = if *count == 0 { base.clone() } else { format!("{base}{}", *count + 1) };
            *count += 1;
            name
        })
        .collect()
}

fn emit_integer_enum(w: &mut CodeWriter, names: &NameMap, enum_def: &EnumDef) {
    let enum_cpp = names.get(&enum_def.name);
    let int_values: Vec<i64> = enum_def
        .values
        .iter()
        .filter_map(|v| match &v.value {
            EnumValueLiteral::Integer(i) => Some(*i),
            EnumValueLiteral::String(_) => None,
        })
        .collect();

    let underlying = if enum_def.supports_custom_values || int_values.is_empty() {
        // Open (or valueless) enums keep the declared base name rather than
        // narrowing to a fixed-width type, since a custom value at runtime
        // could exceed whatever width we'd infer from the declared members.
        match enum_def.base_type {
            EnumBaseType::Integer => "integer",
            EnumBaseType::Uinteger => "uinteger",
            EnumBaseType::String => unreachable!("integer emitter only handles integer/uinteger enums"),
        }
    } else {
        match enum_def.base_type {
            EnumBaseType::Integer => smallest_signed_type(*int_values.iter().min().unwrap(), *int_values.iter().max().unwrap()),
            EnumBaseType::Uinteger => smallest_unsigned_type(*int_values.iter().max().unwrap()),
            EnumBaseType::String => unreachable!(),
        }
    };

    w.block_open(&format!("enum class {enum_cpp} : {underlying}"));
    let member_names = integer_member_names(enum_def);
    let last = enum_def.values.len().saturating_sub(1);
    for (index, (value, member_name)) in enum_def.values.iter().zip(member_names.iter()).enumerate() {
        write_doc(w, &build_doc_lines(&value.doc));
        let comma = if index != last { "," } else { "" };
        w.line(&format!("{member_name} = {}{comma}", value.value.as_string()));
    }
    w.block_close_semi();
}

fn emit_closed_string_enum(w: &mut CodeWriter, names: &NameMap, enum_def: &EnumDef) {
    let enum_cpp = names.get(&enum_def.name);
    let underlying = smallest_unsigned_type(enum_def.values.len().saturating_sub(1) as i64);
    w.block_open(&format!("enum class {enum_cpp} : {underlying}"));
    let member_names = closed_string_member_names(enum_def);
    let last = enum_def.values.len().saturating_sub(1);
    for (index, (value, member_name)) in enum_def.values.iter().zip(member_names.iter()).enumerate() {
        write_doc(w, &build_doc_lines(&value.doc));
        let comma = if index != last { "," } else { "" };
        w.line(&format!("{member_name}{comma}"));
    }
    w.block_close_semi();
}

fn emit_open_string_enum(w: &mut CodeWriter, names: &NameMap, enum_def: &EnumDef) {
    let enum_cpp = names.get(&enum_def.name);
    w.block_open(&format!("struct {enum_cpp} : std::string"));
    w.line("using std::string::string;");
    w.line("using std::string::operator=;");
    if !enum_def.values.is_empty() {
        w.blank();
    }
    let last = enum_def.values.len().saturating_sub(1);
    for (index, value) in enum_def.values.iter().enumerate() {
        write_doc(w, &build_doc_lines(&value.doc));
        let (member_name, _) = sanitize_identifier(&camel_to_snake(&value.name), &format!("value_{index}"));
        let escaped = serde_json::to_string(&value.value.as_string()).expect("string serializes");
        w.line(&format!("constexpr inline static std::string_view {member_name} = {escaped};"));
        if index != last {
            w.blank();
        }
    }
    w.block_close_semi();
}

pub fn emit_enum(names: &NameMap, enum_def: &EnumDef) -> String {
    let mut w = CodeWriter::new();
    let mut comments = build_doc_lines(&enum_def.doc);
    comments.push(format!("supportsCustomValues: {}", enum_def.supports_custom_values));
    write_doc(&mut w, &comments);

    match enum_def.base_type {
        EnumBaseType::Integer | EnumBaseType::Uinteger => emit_integer_enum(&mut w, names, enum_def),
        EnumBaseType::String => {
            if enum_def.supports_custom_values {
                emit_open_string_enum(&mut w, names, enum_def);
            } else {
                emit_closed_string_enum(&mut w, names, enum_def);
            }
        }
    }

    w.finish().trim_end().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn int_enum(values: &[i64], base_type: EnumBaseType) -> EnumDef {
        EnumDef {
            name: "Severity".into(),
            base_type,
            values: values
                .iter()
                .enumerate()
                .map(|(i, v)| EnumValue {
                    name: format!("Member{i}"),
                    value: EnumValueLiteral::Integer(*v),
                    doc: DocInfo::default(),
                })
                .collect(),
            supports_custom_values: false,
            doc: DocInfo::default(),
        }
    }

    #[test]
    fn small_integer_enum_narrows_to_int8() {
        let def = int_enum(&[1, 2, 5], EnumBaseType::Integer);
        let names = NameMap::build(["Severity".to_string()]);
        let text = emit_enum(&names, &def);
        assert!(text.contains("enum class Severity : std::int8_t {"));
    }

    #[test]
    fn uinteger_enum_with_large_value_widens() {
        let def = int_enum(&[1, 2, 200], EnumBaseType::Uinteger);
        let names = NameMap::build(["Severity".to_string()]);
        let text = emit_enum(&names, &def);
        assert!(text.contains("std::uint8_t"));
    }

    #[test]
    fn integer_enum_with_large_value_widens_to_int16() {
        let def = int_enum(&[1, 2, 200], EnumBaseType::Integer);
        let names = NameMap::build(["Severity".to_string()]);
        let text = emit_enum(&names, &def);
        assert!(text.contains("std::int16_t"));
    }

    #[test]
    fn open_integer_enum_keeps_declared_base_type() {
        let mut def = int_enum(&[1, 2, 5], EnumBaseType::Integer);
        def.supports_custom_values = true;
        let names = NameMap::build(["Severity".to_string()]);
        let text = emit_enum(&names, &def);
        assert!(text.contains("enum class Severity : integer {"));
    }

    #[test]
    fn valueless_uinteger_enum_keeps_declared_base_type() {
        let def = int_enum(&[], EnumBaseType::Uinteger);
        let names = NameMap::build(["Severity".to_string()]);
        let text = emit_enum(&names, &def);
        assert!(text.contains("enum class Severity : uinteger {"));
    }

    #[test]
    fn closed_string_enum_is_enum_class() {
        let def = EnumDef {
            name: "Kind".into(),
            base_type: EnumBaseType::String,
            values: vec![
                EnumValue { name: "a".into(), value: EnumValueLiteral::String("a".into()), doc: DocInfo::default() },
                EnumValue { name: "b".into(), value: EnumValueLiteral::String("b".into()), doc: DocInfo::default() },
            ],
            supports_custom_values: false,
            doc: DocInfo::default(),
        };
        let names = NameMap::build(["Kind".to_string()]);
        let text = emit_enum(&names, &def);
        assert!(text.contains("enum class Kind : std::uint8_t {"));
        assert!(text.contains("A,"));
        assert!(text.contains("B"));
    }

    #[test]
    fn open_string_enum_is_a_string_wrapper() {
        let def = EnumDef {
            name: "TraceValue".into(),
            base_type: EnumBaseType::String,
            values: vec![EnumValue { name: "off".into(), value: EnumValueLiteral::String("off".into()), doc: DocInfo::default() }],
            supports_custom_values: true,
            doc: DocInfo::default(),
        };
        let names = NameMap::build(["TraceValue".to_string()]);
        let text = emit_enum(&names, &def);
        assert!(text.contains("struct TraceValue : std::string {"));
        assert!(text.contains(r#"static std::string_view off = "off";"#));
    }
}
