//! The line assembler (spec §4.B), ground-truthed on
//! `examples/original_source/core/interpreter.py`'s `file()` method: physical
//! lines are joined into one logical line while an opening bracket
//! (`(`, `[`) outnumbers its matching close, so a call's argument list can
//! wrap across physical lines.

/// Accumulates physical lines into logical ones, tracking open-bracket
/// depth across line boundaries.
#[derive(Debug, Default)]
pub struct LineAssembler {
    buffer: String,
    depth: i32,
    start_line: u32,
    in_string: Option<char>,
}

/// One logical statement, ready for [`crate::tokenized::reduce`].
#[derive(Debug, Clone)]
pub struct LogicalLine {
    pub text: String,
    /// 1-based physical line number the logical line started on.
    pub line: u32,
    pub indent: u32,
}

impl LineAssembler {
    pub fn new() -> Self {
        LineAssembler { buffer: String::new(), depth: 0, start_line: 0, in_string: None }
    }

    /// Feed one physical line (no trailing newline). Returns a completed
    /// [`LogicalLine`] once bracket depth returns to zero, or `None` while
    /// still accumulating a continuation.
    pub fn push(&mut self, raw: &str, line_no: u32) -> Option<LogicalLine> {
        if self.buffer.is_empty() {
            self.start_line = line_no;
            self.buffer.push_str(raw.trim_end());
        } else {
            self.buffer.push(' ');
            self.buffer.push_str(raw.trim());
        }
        self.scan_brackets(raw);
        if self.depth > 0 || self.in_string.is_some() {
            return None;
        }
        if self.buffer.trim().is_empty() {
            self.buffer.clear();
            return None;
        }
        let indent = leading_indent(&self.buffer);
        let text = std::mem::take(&mut self.buffer);
        Some(LogicalLine { text, line: self.start_line, indent })
    }

    fn scan_brackets(&mut self, raw: &str) {
        let mut chars = raw.chars().peekable();
        while let Some(c) = chars.next() {
            match self.in_string {
                Some(q) if c == q => self.in_string = None,
                Some(_) => continue,
                None => match c {
                    '\'' | '"' => self.in_string = Some(c),
                    '(' | '[' => self.depth += 1,
                    ')' | ']' => self.depth -= 1,
                    '#' => break,
                    _ => {}
                },
            }
        }
    }

    pub fn is_pending(&self) -> bool {
        !self.buffer.is_empty()
    }
}

fn leading_indent(line: &str) -> u32 {
    line.chars().take_while(|c| *c == ' ' || *c == '\t').count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_physical_line_completes_immediately() {
        let mut asm = LineAssembler::new();
        let line = asm.push("x = 1", 1).unwrap();
        assert_eq!(line.text, "x = 1");
        assert_eq!(line.line, 1);
    }

    #[test]
    fn open_paren_holds_the_line_open_across_continuations() {
        let mut asm = LineAssembler::new();
        assert!(asm.push("f(a,", 1).is_none());
        assert!(asm.is_pending());
        let line = asm.push("b)", 2).unwrap();
        assert_eq!(line.text, "f(a, b)");
        assert_eq!(line.line, 1);
    }

    #[test]
    fn blank_lines_produce_nothing() {
        let mut asm = LineAssembler::new();
        assert!(asm.push("", 1).is_none());
        assert!(asm.push("   ", 2).is_none());
        assert!(!asm.is_pending());
    }

    #[test]
    fn indent_is_measured_on_the_joined_line() {
        let mut asm = LineAssembler::new();
        let line = asm.push("    x = 1", 1).unwrap();
        assert_eq!(line.indent, 4);
    }
}
