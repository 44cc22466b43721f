//! Text processing tool: statistics, case changes, reversal and splitting.

use async_trait::async_trait;
use tracing::debug;

use crate::error::ToolError;
use crate::schema::{FieldSpec, FieldType, ToolSchema};
use crate::tool::{Tool, ToolArgs, ToolOutput};

const OPERATIONS: &[&str] = &["count", "upper", "lower", "reverse", "split"];

/// Character, word and line counts of a text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextStats {
    pub characters: usize,
    pub words: usize,
    pub lines: usize,
}

impl TextStats {
    pub fn of(text: &str) -> Self {
        Self {
            characters: text.chars().count(),
            words: text.split_whitespace().count(),
            lines: line_count(text),
        }
    }
}

/// Characters that end a line. `\r\n` counts as one break.
const LINE_BREAKS: &[char] = &[
    '\n', '\r', '\x0b', '\x0c', '\x1c', '\x1d', '\x1e', '\u{85}', '\u{2028}', '\u{2029}',
];

/// Number of lines; a trailing break does not start a new line.
fn line_count(text: &str) -> usize {
    let mut count = 0;
    let mut open = false;
    let mut chars = text.chars().peekable();

    while let Some(c) = chars.next() {
        if LINE_BREAKS.contains(&c) {
            if c == '\r' {
                chars.next_if_eq(&'\n');
            }
            count += 1;
            open = false;
        } else {
            open = true;
        }
    }

    count + usize::from(open)
}

/// Apply `operation` to `text`.
///
/// `separator` is only used by `split` and must not be empty.
pub fn process(text: &str, operation: &str, separator: &str) -> Result<String, ToolError> {
    match operation {
        "count" => {
            let stats = TextStats::of(text);
            Ok(format!(
                "Text statistics:\nCharacters: {}\nWords: {}\nLines: {}",
                stats.characters, stats.words, stats.lines
            ))
        }
        "upper" => Ok(format!("Uppercase: {}", text.to_uppercase())),
        "lower" => Ok(format!("Lowercase: {}", text.to_lowercase())),
        "reverse" => Ok(format!("Reversed: {}", text.chars().rev().collect::<String>())),
        "split" => {
            if separator.is_empty() {
                return Err(ToolError::invalid("separator", "must not be empty"));
            }
            let parts: Vec<&str> = text.split(separator).collect();
            Ok(format!("Split result: {}", serde_json::to_string(&parts)?))
        }
        other => Err(ToolError::UnsupportedOperation(other.to_string())),
    }
}

/// Text processing tool.
///
/// # Parameters
///
/// - `text` (required): The text to process.
/// - `operation` (required): `count`, `upper`, `lower`, `reverse` or `split`.
/// - `separator` (optional): Separator for `split`. Defaults to a single space.
pub struct TextProcessor;

impl TextProcessor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TextProcessor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Tool for TextProcessor {
    fn name(&self) -> &str {
        "text_processor"
    }

    fn description(&self) -> &str {
        "Processes text: count characters/words/lines, convert to upper or lower case, \
         reverse the text, or split it on a separator."
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema::new(vec![
            FieldSpec::required("text", FieldType::String, "The text to process"),
            FieldSpec::required("operation", FieldType::String, "Operation to apply")
                .one_of(OPERATIONS),
            FieldSpec::optional("separator", FieldType::String, "Separator used by 'split'")
                .with_default(" "),
        ])
    }

    async fn execute(&self, args: ToolArgs) -> Result<ToolOutput, ToolError> {
        let text = args.get_string("text")?;
        let operation = args.get_string("operation")?;
        let separator = args.get_string_opt("separator").unwrap_or_else(|| " ".to_string());

        debug!("Text operation '{}' on {} chars", operation, text.chars().count());

        process(&text, &operation, &separator).map(ToolOutput::success)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count() {
        assert_eq!(
            process("Hello World", "count", " ").unwrap(),
            "Text statistics:\nCharacters: 11\nWords: 2\nLines: 1"
        );
    }

    #[test]
    fn test_count_edge_cases() {
        assert_eq!(TextStats::of(""), TextStats { characters: 0, words: 0, lines: 0 });
        assert_eq!(
            TextStats::of("one\ntwo  three\n"),
            TextStats { characters: 15, words: 3, lines: 2 }
        );
        assert_eq!(TextStats::of("a\rb").lines, 2);
        assert_eq!(TextStats::of("a\r\nb\r\n").lines, 2);
        assert_eq!(TextStats::of("a\u{2028}b\x0cc").lines, 3);
        assert_eq!(TextStats::of("\n\n").lines, 2);
        // Characters, not bytes.
        assert_eq!(TextStats::of("héllo wörld").characters, 11);
    }

    #[test]
    fn test_case_changes() {
        assert_eq!(process("Hello World", "upper", " ").unwrap(), "Uppercase: HELLO WORLD");
        assert_eq!(process("Hello World", "lower", " ").unwrap(), "Lowercase: hello world");
    }

    #[test]
    fn test_reverse() {
        assert_eq!(process("Hello World", "reverse", " ").unwrap(), "Reversed: dlroW olleH");
        assert_eq!(process("añb", "reverse", " ").unwrap(), "Reversed: bña");
    }

    #[test]
    fn test_split() {
        assert_eq!(
            process("a,b,,c", "split", ",").unwrap(),
            r#"Split result: ["a","b","","c"]"#
        );
        assert_eq!(
            process("Hello World", "split", " ").unwrap(),
            r#"Split result: ["Hello","World"]"#
        );
    }

    #[test]
    fn test_split_empty_separator() {
        assert!(matches!(
            process("abc", "split", ""),
            Err(ToolError::InvalidParameter { .. })
        ));
    }

    #[test]
    fn test_unknown_operation() {
        assert!(matches!(
            process("abc", "shuffle", " "),
            Err(ToolError::UnsupportedOperation(op)) if op == "shuffle"
        ));
    }
}
