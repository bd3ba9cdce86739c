//! Assemble the final C++23 header from every emitted definition block.

pub mod alias_emit;
pub mod doc;
pub mod enum_emit;
pub mod struct_emit;
pub mod traits_emit;
pub mod writer;

use std::fs;
use std::path::Path;

use crate::diagnostics::Diagnostics;
use crate::error::GenError;
use crate::graph::{topo_sort, NodeKind};
use crate::model::{is_recursive_alias, SchemaModel};
use crate::namemap::{NameMap, SynthesizedParams};
use crate::render::Renderer;

/// The C++ support header every generated header includes. It is hand
/// written and lives outside this crate's scope; only its include path is
/// fixed here.
const SUPPORT_HEADER_INCLUDE: &str = "lsp/protocol_support.h";
const GENERATED_NAMESPACE: &str = "lsp::protocol";

/// Assemble the full header body (everything between the namespace braces)
/// and return it alongside the diagnostics collected while doing so.
pub fn assemble(model: &SchemaModel, diagnostics: &mut Diagnostics) -> String {
    let synthesized = crate::namemap::collect_synthesized_params(model);
    let names = crate::namemap::build_full_name_map(model, &synthesized);
    let renderer = Renderer::new(model, &names);

    let order = topo_sort(model, &renderer, diagnostics);

    let mut blocks: Vec<String> = Vec::with_capacity(order.len() + synthesized.len() + 1);
    for node in &order {
        let block = match node.kind {
            NodeKind::Struct => struct_emit::emit_struct(model, &renderer, &names, &node.name, diagnostics),
            NodeKind::Enum => enum_emit::emit_enum(&names, &model.enums[&node.name]),
            NodeKind::Alias => {
                if is_recursive_alias(&node.name) {
                    continue;
                }
                alias_emit::emit_alias(&renderer, &names, &model.aliases[&node.name])
            }
        };
        blocks.push(block);
    }

    blocks.extend(emit_extra_param_structs(&synthesized, &names));
    blocks.push(traits_emit::emit_method_traits(model, &renderer, &names, &synthesized));

    assemble_body(&blocks)
}

fn emit_extra_param_structs(synthesized: &[SynthesizedParams], names: &NameMap) -> Vec<String> {
    let mut sorted: Vec<&SynthesizedParams> = synthesized.iter().collect();
    sorted.sort_by(|a, b| a.name.cmp(&b.name));
    sorted
        .into_iter()
        .map(|params| format!("struct {} {{ }};", names.get(&params.name)))
        .collect()
}

fn assemble_body(blocks: &[String]) -> String {
    let mut lines: Vec<String> = vec!["#pragma once".to_string(), String::new()];
    lines.push(format!("#include \"{SUPPORT_HEADER_INCLUDE}\""));
    lines.push(String::new());
    lines.push("// Generated. Do not edit by hand.".to_string());
    lines.push(String::new());
    lines.push(format!("namespace {GENERATED_NAMESPACE} {{"));
    lines.push(String::new());

    for (index, block) in blocks.iter().enumerate() {
        if block.is_empty() {
            continue;
        }
        if index > 0 {
            lines.push(String::new());
        }
        lines.push(block.trim_end().to_string());
    }

    lines.push(String::new());
    lines.push(format!("}}  // namespace {GENERATED_NAMESPACE}"));
    lines.push(String::new());

    let content = lines.join("\n");
    format!("{}\n", content.trim_end())
}

/// Write a generated header to `path`, creating its parent directory if
/// necessary.
pub fn write_header_to(path: &Path, header: &str) -> Result<(), GenError> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent)?;
        }
    }
    fs::write(path, header)?;
    Ok(())
}
