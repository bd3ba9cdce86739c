//! Emit the request/notification X-macros and their trait-specialization
//! expansion machinery.

use crate::emit::writer::CodeWriter;
use crate::model::*;
use crate::namemap::NameMap;
use crate::namemap::SynthesizedParams;
use crate::render::Renderer;

enum TraitEntry {
    Notification { params: String, method: String },
    Request { params: String, result: String, method: String },
}

fn render_method_params(
    renderer: &Renderer,
    names: &NameMap,
    synthesized_by_method: &std::collections::HashMap<&str, &str>,
    method: &str,
    params: Option<&TypeExpr>,
) -> String {
    match params {
        Some(expr) => renderer.render_type(expr, &format!("method[{method}].params"), None),
        None => match synthesized_by_method.get(method) {
            Some(&synth_name) => names.get(synth_name),
            None => "LSPEmpty".to_string(),
        },
    }
}

fn build_request_entries(model: &SchemaModel, renderer: &Renderer, names: &NameMap, synthesized: &[SynthesizedParams]) -> Vec<TraitEntry> {
    let synthesized_by_method: std::collections::HashMap<&str, &str> =
        synthesized.iter().map(|s| (s.method.as_str(), s.name.as_str())).collect();

    let mut requests: Vec<&RequestDef> = model.requests.iter().collect();
    requests.sort_by(|a, b| a.method.cmp(&b.method));

    requests
        .into_iter()
        .map(|req| {
            let params = render_method_params(renderer, names, &synthesized_by_method, &req.method, req.params.as_ref());
            let result = match &req.result {
                Some(expr) => renderer.render_type(expr, &format!("method[{}].result", req.method), None),
                None => "null".to_string(),
            };
            TraitEntry::Request {
                params,
                result,
                method: serde_json::to_string(&req.method).expect("method serializes"),
            }
        })
        .collect()
}

fn build_notification_entries(model: &SchemaModel, renderer: &Renderer, names: &NameMap, synthesized: &[SynthesizedParams]) -> Vec<TraitEntry> {
    let synthesized_by_method: std::collections::HashMap<&str, &str> =
        synthesized.iter().map(|s| (s.method.as_str(), s.name.as_str())).collect();

    let mut notifications: Vec<&NotificationDef> = model.notifications.iter().collect();
    notifications.sort_by(|a, b| a.method.cmp(&b.method));

    notifications
        .into_iter()
        .map(|notif| {
            let params = render_method_params(renderer, names, &synthesized_by_method, &notif.method, notif.params.as_ref());
            TraitEntry::Notification {
                params,
                method: serde_json::to_string(&notif.method).expect("method serializes"),
            }
        })
        .collect()
}

fn emit_xmacro(w: &mut CodeWriter, macro_name: &str, entries: &[TraitEntry]) {
    w.line(&format!("#define {macro_name}(X) \\"));
    let last = entries.len().saturating_sub(1);
    for (index, entry) in entries.iter().enumerate() {
        let payload = match entry {
            TraitEntry::Notification { params, method } => format!("X(({params}), {method})"),
            TraitEntry::Request { params, result, method } => format!("X(({params}), ({result}), {method})"),
        };
        let suffix = if index != last { " \\" } else { "" };
        w.line(&format!("    {payload}{suffix}"));
    }
}

/// Emit both X-macros plus the `RequestTraits`/`NotificationTraits`
/// specialization-generating boilerplate that expands them.
pub fn emit_method_traits(model: &SchemaModel, renderer: &Renderer, names: &NameMap, synthesized: &[SynthesizedParams]) -> String {
    let requests = build_request_entries(model, renderer, names, synthesized);
    let notifications = build_notification_entries(model, renderer, names, synthesized);

    let mut w = CodeWriter::new();
    emit_xmacro(&mut w, "LSP_REQUEST_TRAITS_XMACRO", &requests);
    w.blank();
    emit_xmacro(&mut w, "LSP_NOTIFICATION_TRAITS_XMACRO", &notifications);

    w.blank();
    w.line("#define LSP_TRAITS_TYPE(...) __VA_ARGS__");
    w.blank();
    w.line("#define LSP_REQUEST_TRAITS_DECLARE(PARAMS, RESULT, METHOD) \\");
    w.line("template <> \\");
    w.line("struct RequestTraits<LSP_TRAITS_TYPE PARAMS> { \\");
    w.line("    using Result = LSP_TRAITS_TYPE RESULT; \\");
    w.line("    constexpr inline static std::string_view method = METHOD; \\");
    w.line("};");
    w.blank();
    w.line("LSP_REQUEST_TRAITS_XMACRO(LSP_REQUEST_TRAITS_DECLARE)");
    w.blank();
    w.line("#undef LSP_REQUEST_TRAITS_DECLARE");
    w.blank();
    w.line("#define LSP_NOTIFICATION_TRAITS_DECLARE(PARAMS, METHOD) \\");
    w.line("template <> \\");
    w.line("struct NotificationTraits<LSP_TRAITS_TYPE PARAMS> { \\");
    w.line("    constexpr inline static std::string_view method = METHOD; \\");
    w.line("};");
    w.blank();
    w.line("LSP_NOTIFICATION_TRAITS_XMACRO(LSP_NOTIFICATION_TRAITS_DECLARE)");
    w.blank();
    w.line("#undef LSP_NOTIFICATION_TRAITS_DECLARE");
    w.line("#undef LSP_TRAITS_TYPE");

    w.finish().trim_end().to_string()
}
