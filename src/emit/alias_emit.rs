//! Render a single type alias definition.

use crate::emit::doc::{build_doc_lines, write_doc};
use crate::emit::writer::CodeWriter;
use crate::model::AliasDef;
use crate::namemap::NameMap;
use crate::render::Renderer;

/// `LSPAny`/`LSPArray`/`LSPObject` are filtered out by the caller before
/// this is reached; every other alias becomes a plain `using` declaration.
pub fn emit_alias(renderer: &Renderer, names: &NameMap, alias: &AliasDef) -> String {
    let alias_cpp = names.get(&alias.name);
    let rendered = renderer.render_type(&alias.type_expr, &format!("alias[{}]", alias.name), None);

    let mut w = CodeWriter::new();
    write_doc(&mut w, &build_doc_lines(&alias.doc));
    w.line(&format!("using {alias_cpp} = {rendered};"));
    w.finish().trim_end().to_string()
}
