//! Action parser — turns one model reply into a [`ParsedOutcome`].
//!
//! Grammar, checked in this order:
//!
//! ```text
//! Final Answer: <free text>          (terminal, last occurrence wins)
//! Thought: <free text>               (optional)
//! Action: <tool name>                (single token)
//! Action Input: <JSON object | bare scalar>
//! ```
//!
//! Each layer is a separate function so the fallbacks can be exercised on
//! their own. Argument parsing never fails: a malformed JSON object degrades
//! to a permissive `key: value` scan, and anything not object-shaped is
//! wrapped under the `input` key.

use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;
use thinkloop_core::tool::{Arguments, INPUT_KEY};

pub const FINAL_ANSWER_MARKER: &str = "Final Answer:";
pub const THOUGHT_MARKER: &str = "Thought:";
pub const ACTION_MARKER: &str = "Action:";
pub const ACTION_INPUT_MARKER: &str = "Action Input:";

/// Placeholder used when the reply carries no `Thought:`.
pub const NO_THOUGHT: &str = "No thought";

/// A structured request to invoke one tool.
#[derive(Debug, Clone, PartialEq)]
pub struct Action {
    pub thought: String,
    pub name: String,
    pub arguments: Arguments,
}

/// What one model reply means for the loop.
#[derive(Debug, Clone, PartialEq)]
pub enum ParsedOutcome {
    FinalAnswer { text: String },
    Action(Action),
}

/// Recoverable parse failures. The message is fed back to the model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    #[error(
        "no 'Action:' found in the response. Reply with 'Action: <tool name>' and 'Action Input: <JSON>', or with 'Final Answer: <answer>'"
    )]
    MissingAction,

    #[error("no 'Action Input:' found in the response. Give the tool parameters as 'Action Input: <JSON>'")]
    MissingActionInput,
}

/// Parse one model reply.
pub fn parse(text: &str) -> Result<ParsedOutcome, ParseError> {
    if let Some(answer) = final_answer(text) {
        return Ok(ParsedOutcome::FinalAnswer { text: answer });
    }

    let thought = thought(text);
    let name = action_name(text)?;
    let raw_input = action_input(text)?;

    Ok(ParsedOutcome::Action(Action {
        thought,
        name,
        arguments: parse_arguments(raw_input),
    }))
}

/// Text after the last `Final Answer:` marker, trimmed.
pub fn final_answer(text: &str) -> Option<String> {
    text.rfind(FINAL_ANSWER_MARKER)
        .map(|pos| text[pos + FINAL_ANSWER_MARKER.len()..].trim().to_string())
}

/// Text between `Thought:` and the next `Action:` (or end of text).
pub fn thought(text: &str) -> String {
    let Some(start) = text.find(THOUGHT_MARKER) else {
        return NO_THOUGHT.to_string();
    };
    let rest = &text[start + THOUGHT_MARKER.len()..];
    let end = rest.find(ACTION_MARKER).unwrap_or(rest.len());
    let thought = rest[..end].trim();

    if thought.is_empty() {
        NO_THOUGHT.to_string()
    } else {
        thought.to_string()
    }
}

/// First whitespace-delimited token after `Action:`.
pub fn action_name(text: &str) -> Result<String, ParseError> {
    static ACTION_RE: LazyLock<Regex> =
        LazyLock::new(|| Regex::new(r"Action:[ \t]*(\S+)").expect("valid action regex"));

    ACTION_RE
        .captures(text)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string())
        .ok_or(ParseError::MissingAction)
}

/// Raw text after `Action Input:` up to the end of that line, trimmed.
pub fn action_input(text: &str) -> Result<&str, ParseError> {
    let start = text
        .find(ACTION_INPUT_MARKER)
        .ok_or(ParseError::MissingActionInput)?;
    let rest = &text[start + ACTION_INPUT_MARKER.len()..];
    let line = rest.split('\n').next().unwrap_or_default();
    Ok(line.trim())
}

/// Turn raw action input into an argument map.
///
/// `{...}` is read as JSON first, then by [`scan_key_values`]. An empty
/// input yields no arguments; any other text becomes `{"input": text}`.
pub fn parse_arguments(raw: &str) -> Arguments {
    let raw = raw.trim();
    if raw.starts_with('{') {
        json_object(raw).unwrap_or_else(|| scan_key_values(raw))
    } else if raw.is_empty() {
        Arguments::new()
    } else {
        let mut args = Arguments::new();
        args.insert(INPUT_KEY.to_string(), Value::String(raw.to_string()));
        args
    }
}

/// Strict path: a well-formed JSON object.
pub fn json_object(raw: &str) -> Option<Arguments> {
    serde_json::from_str::<Arguments>(raw).ok()
}

/// Best-effort `key: value[, key: value...]` scan for malformed objects.
///
/// Quotes around keys and values are optional. Values containing a `.` are
/// tried as floats, others as integers; anything else stays a string. A
/// repeated key keeps its last value.
pub fn scan_key_values(raw: &str) -> Arguments {
    static PAIR_RE: LazyLock<Regex> = LazyLock::new(|| {
        Regex::new(r#"["']?(\w+)["']?\s*:\s*["']?([^,"'}]+)["']?"#).expect("valid pair regex")
    });

    let mut args = Arguments::new();
    for caps in PAIR_RE.captures_iter(raw) {
        let (Some(key), Some(value)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        args.insert(key.as_str().to_string(), coerce(value.as_str().trim()));
    }
    args
}

fn coerce(value: &str) -> Value {
    let number = if value.contains('.') {
        value
            .parse::<f64>()
            .ok()
            .and_then(serde_json::Number::from_f64)
    } else {
        value.parse::<i64>().ok().map(serde_json::Number::from)
    };
    number
        .map(Value::Number)
        .unwrap_or_else(|| Value::String(value.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn obj(value: Value) -> Arguments {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn well_formed_action() {
        let text = "Thought: I need to compute 15% of 200\nAction: calculator\nAction Input: {\"expression\": \"200 * 0.15\"}";
        let outcome = parse(text).unwrap();
        assert_eq!(
            outcome,
            ParsedOutcome::Action(Action {
                thought: "I need to compute 15% of 200".into(),
                name: "calculator".into(),
                arguments: obj(json!({"expression": "200 * 0.15"})),
            })
        );
    }

    #[test]
    fn markers_are_trimmed() {
        let text = "Thought:    spaced out   \nAction:   web_search   \nAction Input:   paris population   \n";
        let ParsedOutcome::Action(action) = parse(text).unwrap() else {
            panic!("expected action");
        };
        assert_eq!(action.thought, "spaced out");
        assert_eq!(action.name, "web_search");
        assert_eq!(action.arguments, obj(json!({"input": "paris population"})));
    }

    #[test]
    fn final_answer_takes_priority_over_action() {
        let text = "Thought: done\nAction: calculator\nAction Input: {}\nFinal Answer: 42";
        assert_eq!(
            parse(text).unwrap(),
            ParsedOutcome::FinalAnswer { text: "42".into() }
        );
    }

    #[test]
    fn last_final_answer_marker_wins() {
        let text = "Observation: the page said Final Answer: bogus\nThought: ok\nFinal Answer:  real answer \n";
        assert_eq!(final_answer(text).as_deref(), Some("real answer"));
    }

    #[test]
    fn final_answer_keeps_multiline_text() {
        let text = "Final Answer: line one\nline two";
        assert_eq!(final_answer(text).as_deref(), Some("line one\nline two"));
    }

    #[test]
    fn missing_thought_uses_placeholder() {
        assert_eq!(thought("Action: calculator\nAction Input: 1+1"), NO_THOUGHT);
        assert_eq!(thought("Thought:\nAction: x"), NO_THOUGHT);
    }

    #[test]
    fn thought_runs_to_end_without_action() {
        assert_eq!(thought("Thought: just musing"), "just musing");
    }

    #[test]
    fn missing_action_fails() {
        assert_eq!(
            parse("Thought: hmm, not sure what to do"),
            Err(ParseError::MissingAction)
        );
        assert_eq!(action_name("Action:   \nAction Input: {}"), Err(ParseError::MissingAction));
    }

    #[test]
    fn missing_action_input_fails() {
        assert_eq!(
            parse("Thought: x\nAction: calculator"),
            Err(ParseError::MissingActionInput)
        );
    }

    #[test]
    fn action_input_does_not_satisfy_action_marker() {
        assert_eq!(
            action_name("Action Input: {\"a\": 1}"),
            Err(ParseError::MissingAction)
        );
    }

    #[test]
    fn action_input_stops_at_newline() {
        let text = "Action: web_search\nAction Input: first line\nObservation: made up";
        assert_eq!(action_input(text).unwrap(), "first line");
    }

    #[test]
    fn json_path_is_preferred() {
        let args = parse_arguments(r#"{"amount": 100, "from_currency": "EUR", "to_currency": "USD"}"#);
        assert_eq!(
            args,
            obj(json!({"amount": 100, "from_currency": "EUR", "to_currency": "USD"}))
        );
    }

    #[test]
    fn malformed_json_falls_back_to_scan() {
        assert!(json_object("{amount: 100, from_currency: EUR}").is_none());
        let args = parse_arguments("{amount: 100, from_currency: EUR, to_currency: 'USD'}");
        assert_eq!(
            args,
            obj(json!({"amount": 100, "from_currency": "EUR", "to_currency": "USD"}))
        );
    }

    #[test]
    fn scan_coerces_numbers() {
        let args = scan_key_values("{rate: 1.5, count: 3, label: x1}");
        assert_eq!(args, obj(json!({"rate": 1.5, "count": 3, "label": "x1"})));
    }

    #[test]
    fn scan_keeps_expression_with_dot_as_string() {
        let args = scan_key_values(r#"{"expression": "200 * 0.15}"#);
        assert_eq!(args, obj(json!({"expression": "200 * 0.15"})));
    }

    #[test]
    fn scan_never_fails() {
        assert!(scan_key_values("{").is_empty());
        assert!(parse_arguments("{???}").is_empty());
    }

    #[test]
    fn bare_scalar_is_wrapped() {
        assert_eq!(parse_arguments("200 * 0.15"), obj(json!({"input": "200 * 0.15"})));
    }

    #[test]
    fn empty_input_means_no_arguments() {
        assert!(parse_arguments("").is_empty());
        let ParsedOutcome::Action(action) = parse("Action: get_current_time\nAction Input:").unwrap()
        else {
            panic!("expected action");
        };
        assert!(action.arguments.is_empty());
    }

    #[test]
    fn crlf_line_endings() {
        let text = "Thought: t\r\nAction: calculator\r\nAction Input: {\"expression\": \"1 + 1\"}\r\n";
        let ParsedOutcome::Action(action) = parse(text).unwrap() else {
            panic!("expected action");
        };
        assert_eq!(action.name, "calculator");
        assert_eq!(action.arguments, obj(json!({"expression": "1 + 1"})));
    }
}
