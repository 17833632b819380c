//! Line reader for Rill source text.
//!
//! One instruction per line: an optional `ORDER:` prefix, an opcode word,
//! then `kind@value` argument tokens. The reader only establishes the
//! record shape; it never interprets opcodes, arities, or values.

use rill_common::{SourceArg, SourceInstruction};

use crate::error::SourceError;

/// Tracks the order assigned to lines without an explicit prefix.
pub(crate) struct OrderCounter {
    next: u32,
}

impl OrderCounter {
    pub(crate) fn new() -> Self {
        Self { next: 1 }
    }

    /// The order text for a line: the raw prefix when one is present
    /// (passed through for the engine to validate), the running counter
    /// otherwise. An explicit numeric prefix re-anchors the counter.
    fn assign(&mut self, prefix: Option<&str>) -> String {
        match prefix {
            Some(raw) => {
                if let Ok(value) = raw.parse::<u32>() {
                    self.next = value.saturating_add(1);
                }
                raw.to_string()
            }
            None => {
                let order = self.next.to_string();
                self.next = self.next.saturating_add(1);
                order
            }
        }
    }
}

/// Parse one line into an instruction record.
///
/// Returns `Ok(None)` for blank and comment-only lines.
pub(crate) fn parse_line(
    line: &str,
    line_num: usize,
    orders: &mut OrderCounter,
) -> Result<Option<SourceInstruction>, SourceError> {
    // Strip comment
    let line = match line.find('#') {
        Some(pos) => &line[..pos],
        None => line,
    };

    let mut words = line.split_whitespace().peekable();
    let Some(&first) = words.peek() else {
        return Ok(None);
    };

    // An order prefix is a first token ending in ':'.
    let prefix = first.strip_suffix(':');
    if prefix.is_some() {
        words.next();
    }

    let Some(opcode) = words.next() else {
        return Err(SourceError::MissingOpcode { line: line_num });
    };

    let mut args = Vec::new();
    for token in words {
        args.push(parse_arg(token, line_num)?);
    }

    let order = orders.assign(prefix);
    Ok(Some(SourceInstruction::new(order, opcode, args)))
}

/// Parse one argument token.
///
/// Frame-prefixed tokens (`GF@…`, `TF@…`, `LF@…`) are variable references
/// and keep the whole token as their value; any other token is
/// `kind@value`.
fn parse_arg(token: &str, line_num: usize) -> Result<SourceArg, SourceError> {
    if token.starts_with("GF@") || token.starts_with("TF@") || token.starts_with("LF@") {
        return Ok(SourceArg::new("var", token));
    }

    match token.split_once('@') {
        Some((kind, value)) if !kind.is_empty() => Ok(SourceArg::new(kind, value)),
        _ => Err(SourceError::MalformedArgument {
            line: line_num,
            token: token.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn one(line: &str) -> SourceInstruction {
        let mut orders = OrderCounter::new();
        parse_line(line, 1, &mut orders).unwrap().unwrap()
    }

    #[test]
    fn blank_and_comment_lines_yield_nothing() {
        let mut orders = OrderCounter::new();
        assert_eq!(parse_line("", 1, &mut orders).unwrap(), None);
        assert_eq!(parse_line("   \t ", 2, &mut orders).unwrap(), None);
        assert_eq!(parse_line("# a comment", 3, &mut orders).unwrap(), None);
    }

    #[test]
    fn bare_opcode() {
        let instr = one("CREATEFRAME");
        assert_eq!(instr.order, "1");
        assert_eq!(instr.opcode, "CREATEFRAME");
        assert!(instr.args.is_empty());
    }

    #[test]
    fn trailing_comment_stripped() {
        let instr = one("RETURN # back to the caller");
        assert_eq!(instr.opcode, "RETURN");
        assert!(instr.args.is_empty());
    }

    #[test]
    fn variable_argument_keeps_whole_token() {
        let instr = one("DEFVAR GF@x");
        assert_eq!(instr.args, vec![SourceArg::new("var", "GF@x")]);
    }

    #[test]
    fn literal_arguments_split_on_first_at() {
        let instr = one("MOVE GF@x string@a@b");
        assert_eq!(
            instr.args,
            vec![
                SourceArg::new("var", "GF@x"),
                SourceArg::new("string", "a@b"),
            ]
        );
    }

    #[test]
    fn label_and_type_arguments() {
        let instr = one("JUMPIFEQ label@loop int@1 int@2");
        assert_eq!(instr.args[0], SourceArg::new("label", "loop"));

        let instr = one("READ GF@x type@int");
        assert_eq!(instr.args[1], SourceArg::new("type", "int"));
    }

    #[test]
    fn explicit_order_prefix_passes_through() {
        let instr = one("17: BREAK");
        assert_eq!(instr.order, "17");
        assert_eq!(instr.opcode, "BREAK");
    }

    #[test]
    fn non_numeric_prefix_passes_through_for_engine_validation() {
        let instr = one("0: BREAK");
        assert_eq!(instr.order, "0");
        let instr = one("bogus: BREAK");
        assert_eq!(instr.order, "bogus");
    }

    #[test]
    fn prefix_without_opcode_is_an_error() {
        let mut orders = OrderCounter::new();
        assert_eq!(
            parse_line("5:", 4, &mut orders),
            Err(SourceError::MissingOpcode { line: 4 })
        );
    }

    #[test]
    fn token_without_kind_is_an_error() {
        let mut orders = OrderCounter::new();
        assert_eq!(
            parse_line("WRITE hello", 2, &mut orders),
            Err(SourceError::MalformedArgument {
                line: 2,
                token: "hello".to_string()
            })
        );
        assert_eq!(
            parse_line("WRITE @oops", 3, &mut orders),
            Err(SourceError::MalformedArgument {
                line: 3,
                token: "@oops".to_string()
            })
        );
    }

    #[test]
    fn auto_numbering_continues_after_explicit_prefix() {
        let mut orders = OrderCounter::new();
        let a = parse_line("WRITE string@a", 1, &mut orders).unwrap().unwrap();
        let b = parse_line("10: WRITE string@b", 2, &mut orders).unwrap().unwrap();
        let c = parse_line("WRITE string@c", 3, &mut orders).unwrap().unwrap();
        assert_eq!(a.order, "1");
        assert_eq!(b.order, "10");
        assert_eq!(c.order, "11");
    }
}
