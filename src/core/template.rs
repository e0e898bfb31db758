/// Modal text templating — placeholder substitution with verbatim fallback.
///
/// Bodies may reference the builtins `{CASH}`, `{REPUTATION}`, `{YEAR}`,
/// `{ACTOR}` plus any key present in the instance's variable map. An
/// unresolved placeholder is left as literal text rather than silently
/// dropped; rendering never fails.

use std::collections::HashMap;

use crate::schema::effect::Value;
use crate::schema::state::GameState;

/// Substitute placeholders in `input`. `{{` and `}}` escape literal braces.
pub fn render(input: &str, state: &GameState, variables: &HashMap<String, Value>) -> String {
    let chars: Vec<char> = input.chars().collect();
    let len = chars.len();
    let mut out = String::with_capacity(len);
    let mut i = 0;

    while i < len {
        if chars[i] == '{' {
            if i + 1 < len && chars[i + 1] == '{' {
                out.push('{');
                i += 2;
                continue;
            }

            let start = i + 1;
            let mut end = start;
            while end < len && chars[end] != '}' && chars[end] != '{' {
                end += 1;
            }

            // No closing brace before end or a nested open: emit verbatim.
            if end >= len || chars[end] == '{' {
                out.push('{');
                i += 1;
                continue;
            }

            let name: String = chars[start..end].iter().collect();
            match resolve(&name, state, variables) {
                Some(text) => out.push_str(&text),
                None => {
                    out.push('{');
                    out.push_str(&name);
                    out.push('}');
                }
            }
            i = end + 1;
        } else if chars[i] == '}' && i + 1 < len && chars[i + 1] == '}' {
            out.push('}');
            i += 2;
        } else {
            out.push(chars[i]);
            i += 1;
        }
    }

    out
}

fn resolve(name: &str, state: &GameState, variables: &HashMap<String, Value>) -> Option<String> {
    match name {
        "CASH" => Some(state.cash.to_string()),
        "REPUTATION" => Some(Value::Float(state.reputation).display()),
        "YEAR" => Some(state.year.to_string()),
        "ACTOR" => variables.get("actor").map(Value::display),
        other => variables.get(other).map(Value::display),
    }
}
