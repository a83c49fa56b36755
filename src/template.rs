//! `{{key}}` placeholder substitution for input text.

use std::collections::HashMap;

/// Replace every `{{key}}` whose key is in `args`.
///
/// Keys are matched literally, so any text between the braces works. Keys
/// starting with `$` are skipped so `{{$tag}}` markers survive. Unknown
/// placeholders are left untouched. Keys are applied in sorted order.
pub fn fill_template(template: &str, args: &HashMap<String, String>) -> String {
    let mut pairs: Vec<(&String, &String)> = args.iter().collect();
    pairs.sort_by(|a, b| a.0.cmp(b.0));

    let mut out = template.to_string();
    for (key, value) in pairs {
        if key.starts_with('$') {
            log::warn!("template key {key:?} would shadow a tag marker; skipped");
            continue;
        }
        let placeholder = format!("{{{{{key}}}}}");
        if out.contains(&placeholder) {
            out = out.replace(&placeholder, value);
        } else {
            log::debug!("placeholder {placeholder} not found in template");
        }
    }
    out
}
