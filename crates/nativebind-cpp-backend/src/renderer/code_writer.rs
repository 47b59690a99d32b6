// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Line-based writer for generated C++ with brace-level indentation.

use std::fmt::Display;

const INDENT: &str = "    ";

/// Writer for generated C++ source.
/// Tracks indentation and emits it lazily at the start of each line.
#[derive(Debug)]
pub struct CodeWriter {
    out: String,
    indent: usize,
    at_line_start: bool,
}

impl CodeWriter {
    pub fn new() -> Self {
        Self {
            out: String::new(),
            indent: 0,
            at_line_start: true,
        }
    }

    /// Write a string, indenting each new non-empty line.
    pub fn write(&mut self, s: &str) {
        for c in s.chars() {
            if c == '\n' {
                self.out.push('\n');
                self.at_line_start = true;
            } else {
                if self.at_line_start {
                    for _ in 0..self.indent {
                        self.out.push_str(INDENT);
                    }
                }
                self.at_line_start = false;
                self.out.push(c);
            }
        }
    }

    /// Write a complete line.
    pub fn line(&mut self, s: &str) {
        self.write(s);
        self.newline();
    }

    /// Write verbatim text (e.g. an embedded prelude) line by line at the
    /// current indentation, making sure it ends with a newline.
    pub fn text(&mut self, text: &str) {
        self.write(text);
        if !self.at_line_start {
            self.newline();
        }
    }

    pub fn newline(&mut self) {
        self.write("\n");
    }

    /// Enables `write!(w, ...)` on the writer.
    pub fn write_fmt(&mut self, args: std::fmt::Arguments<'_>) {
        self.write(&args.to_string());
    }

    pub fn indent(&mut self) {
        self.indent += 1;
    }

    pub fn dedent(&mut self) {
        self.indent = self.indent.saturating_sub(1);
    }

    /// Write `header {`, the indented body, then `}` and a newline.
    pub fn block<F>(&mut self, header: &str, body: F)
    where
        F: FnOnce(&mut Self),
    {
        self.line(&format!("{} {{", header));
        self.indent();
        body(self);
        self.dedent();
        self.line("}");
    }

    /// Write items separated by a separator string.
    pub fn sep<I, T>(&mut self, separator: &str, items: I)
    where
        I: IntoIterator<Item = T>,
        T: Display,
    {
        self.sep_with(separator, items, |w, item| w.write(&item.to_string()));
    }

    /// Write items with a separator, using a custom render function for each item.
    pub fn sep_with<I, T, F>(&mut self, separator: &str, items: I, mut render: F)
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&mut Self, T),
    {
        let mut first = true;
        for item in items {
            if !first {
                self.write(separator);
            }
            first = false;
            render(self, item);
        }
    }

    /// Render items separated by blank lines.
    pub fn paragraphs<I, T, F>(&mut self, items: I, mut render: F)
    where
        I: IntoIterator<Item = T>,
        F: FnMut(&mut Self, T),
    {
        let mut first = true;
        for item in items {
            if !first {
                self.newline();
            }
            first = false;
            render(self, item);
        }
    }

    pub fn into_inner(self) -> String {
        self.out
    }
}

impl Default for CodeWriter {
    fn default() -> Self {
        Self::new()
    }
}

/// Render to a string.
pub fn render_to_string<F>(f: F) -> String
where
    F: FnOnce(&mut CodeWriter),
{
    let mut writer = CodeWriter::new();
    f(&mut writer);
    writer.into_inner()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_indents_body() {
        let out = render_to_string(|w| {
            w.block("void f()", |w| {
                w.line("g();");
                w.block("if (x)", |w| w.line("h();"));
            });
        });
        assert_eq!(out, "void f() {\n    g();\n    if (x) {\n        h();\n    }\n}\n");
    }

    #[test]
    fn test_blank_lines_are_not_indented() {
        let out = render_to_string(|w| {
            w.indent();
            w.text("a\n\nb");
        });
        assert_eq!(out, "    a\n\n    b\n");
    }

    #[test]
    fn test_sep() {
        let out = render_to_string(|w| {
            write!(w, "f(");
            w.sep(", ", ["a", "b", "c"]);
            w.write(")");
        });
        assert_eq!(out, "f(a, b, c)");
    }
}
