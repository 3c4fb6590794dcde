//! Serialization of unexpanded macro calls back into invocation syntax.
//!
//! Shared by the wiki-syntax renderer (which prints invocations inline)
//! and the XHTML renderer (which hides them in comments so a later pass
//! can reconstruct the call).

use doctree_model::{MacroCall, Parameters};

/// Renders parameters as `a="1" b="2"`, escaping quotes and backslashes
/// inside values.
#[must_use]
pub(crate) fn serialize_parameters(parameters: &Parameters) -> String {
    let mut out = String::new();
    for (key, value) in parameters.iter() {
        if !out.is_empty() {
            out.push(' ');
        }
        out.push_str(key);
        out.push_str("=\"");
        for c in value.chars() {
            if c == '"' || c == '\\' {
                out.push('\\');
            }
            out.push(c);
        }
        out.push('"');
    }
    out
}

/// Renders the full invocation: `{{name a="1"}}content{{/name}}`, or the
/// self-closing `{{name a="1"/}}` when the call carries no content.
#[must_use]
pub(crate) fn serialize_invocation(call: &MacroCall) -> String {
    let mut out = String::from("{{");
    out.push_str(&call.name);
    let parameters = serialize_parameters(&call.parameters);
    if !parameters.is_empty() {
        out.push(' ');
        out.push_str(&parameters);
    }
    match &call.content {
        Some(content) => {
            out.push_str("}}");
            out.push_str(content);
            out.push_str("{{/");
            out.push_str(&call.name);
            out.push_str("}}");
        }
        None => out.push_str("/}}"),
    }
    out
}

/// Payload of the hidden comment a macro becomes in XHTML output:
/// `startmacro:name|-|parameters|-|content`.
#[must_use]
pub(crate) fn comment_payload(call: &MacroCall) -> String {
    format!(
        "startmacro:{}|-|{}|-|{}",
        call.name,
        serialize_parameters(&call.parameters),
        call.content.as_deref().unwrap_or("")
    )
}

/// Escapes text for inclusion in an XML comment: backslashes are doubled
/// and a `-` following another `-` gets a backslash so `--` never appears.
#[must_use]
pub(crate) fn escape_comment(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut previous_dash = false;
    for c in text.chars() {
        match c {
            '\\' => {
                out.push_str("\\\\");
                previous_dash = false;
            }
            '-' if previous_dash => {
                out.push_str("\\-");
                previous_dash = false;
            }
            '-' => {
                out.push('-');
                previous_dash = true;
            }
            _ => {
                out.push(c);
                previous_dash = false;
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn self_closing_without_content() {
        let call = MacroCall::new("toc");
        assert_eq!(serialize_invocation(&call), "{{toc/}}");
    }

    #[test]
    fn content_and_parameters() {
        let call = MacroCall::new("code")
            .with_parameters(Parameters::new().with("language", "rust"))
            .with_content("fn main() {}");
        assert_eq!(
            serialize_invocation(&call),
            "{{code language=\"rust\"}}fn main() {}{{/code}}"
        );
    }

    #[test]
    fn parameter_values_escape_quotes() {
        let parameters = Parameters::new().with("title", "say \"hi\" \\ there");
        assert_eq!(
            serialize_parameters(&parameters),
            "title=\"say \\\"hi\\\" \\\\ there\""
        );
    }

    #[test]
    fn comment_escaping_breaks_double_dashes() {
        assert_eq!(escape_comment("a--b"), "a-\\-b");
        assert_eq!(escape_comment("a\\b"), "a\\\\b");
        assert_eq!(escape_comment("a-b-c"), "a-b-c");
    }
}
