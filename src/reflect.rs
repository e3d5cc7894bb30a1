//! Retrieval of a callable's defining source text.

use thiserror::Error;

use crate::lexer::Lexer;
use crate::token::TokenKind;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("Source unavailable for '{name}': {reason}")]
pub struct SourceUnavailable {
    pub name: String,
    pub reason: String,
}

/// A function handle whose source text can be recovered.
pub trait Reflect {
    fn name(&self) -> &str;
    fn source(&self) -> Result<String, SourceUnavailable>;
}

/// Finds a top-level `def NAME(...)` in a larger source file and returns its
/// text verbatim, from the `def` line up to the last line of its body.
///
/// The body's extent comes from the token stream, so wrapped headers and
/// multi-line strings with unindented lines stay part of the definition.
#[derive(Debug, Clone, Copy)]
pub struct DefinitionLookup<'a> {
    source: &'a str,
    name: &'a str,
}

impl<'a> DefinitionLookup<'a> {
    pub fn new(source: &'a str, name: &'a str) -> Self {
        Self { source, name }
    }

    fn is_header(&self, line: &str) -> bool {
        line.strip_prefix("def ")
            .and_then(|rest| rest.trim_start().strip_prefix(self.name))
            .is_some_and(|rest| rest.trim_start().starts_with('('))
    }

    fn unavailable(&self, reason: impl Into<String>) -> SourceUnavailable {
        SourceUnavailable {
            name: self.name.to_string(),
            reason: reason.into(),
        }
    }

    /// Byte offset of the header line.
    fn header_offset(&self) -> Option<usize> {
        let mut offset = 0;
        for line in self.source.split_inclusive('\n') {
            if self.is_header(line) {
                return Some(offset);
            }
            offset += line.len();
        }
        None
    }

    /// Length of the definition starting at the beginning of `text`: up to
    /// the dedent back to column 0, the end of an inline body, or end of input.
    fn block_len(&self, text: &str) -> Result<usize, SourceUnavailable> {
        let mut lexer = Lexer::new(text);
        let mut depth = 0usize;
        let mut after_colon = false;
        loop {
            let token = lexer
                .next_token()
                .map_err(|err| self.unavailable(err.to_string()))?;
            match token.kind {
                TokenKind::Indent => depth += 1,
                TokenKind::Dedent => {
                    depth = depth.saturating_sub(1);
                    if depth == 0 {
                        return Ok(token.span.start);
                    }
                }
                TokenKind::Newline if depth == 0 && !after_colon => {
                    return Ok(token.span.end);
                }
                TokenKind::EOF => return Ok(text.len()),
                _ => {}
            }
            // blank lines produce their own newlines
            if token.kind != TokenKind::Newline {
                after_colon = token.kind == TokenKind::Colon;
            }
        }
    }
}

impl Reflect for DefinitionLookup<'_> {
    fn name(&self) -> &str {
        self.name
    }

    fn source(&self) -> Result<String, SourceUnavailable> {
        let offset = self
            .header_offset()
            .ok_or_else(|| self.unavailable("no top-level definition found"))?;
        let text = &self.source[offset..];
        let block = &text[..self.block_len(text)?];

        let mut lines = block.lines().collect::<Vec<_>>();
        while lines
            .last()
            .is_some_and(|line| line.trim().is_empty() || line.starts_with('#'))
        {
            lines.pop();
        }

        let mut text = lines.join("\n");
        text.push('\n');
        Ok(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use indoc::indoc;

    const SOURCE: &str = indoc! {"
        import something

        def f(a, b, c):
            return a + b * c - 1


        def g(a, b):
            x = a

            return x * b
        # trailing
        y = g(1, 2)
    "};

    #[test]
    fn extracts_named_definition() {
        let f = DefinitionLookup::new(SOURCE, "f");
        assert_eq!(
            f.source().expect("found"),
            "def f(a, b, c):\n    return a + b * c - 1\n"
        );
    }

    #[test]
    fn keeps_blank_lines_inside_body() {
        let g = DefinitionLookup::new(SOURCE, "g");
        assert_eq!(
            g.source().expect("found"),
            "def g(a, b):\n    x = a\n\n    return x * b\n"
        );
    }

    #[test]
    fn keeps_wrapped_headers() {
        let source = indoc! {"
            def f(a,
            b):
                return a + b
            z = f(1, 2)
        "};
        let f = DefinitionLookup::new(source, "f");
        assert_eq!(
            f.source().expect("found"),
            "def f(a,\nb):\n    return a + b\n"
        );
    }

    #[test]
    fn keeps_unindented_docstring_lines() {
        let source = "def g(x):\n    \"\"\"Doc\nmore doc\n    \"\"\"\n    return x\ny = 1\n";
        let g = DefinitionLookup::new(source, "g");
        assert_eq!(
            g.source().expect("found"),
            "def g(x):\n    \"\"\"Doc\nmore doc\n    \"\"\"\n    return x\n"
        );
    }

    #[test]
    fn blank_lines_after_the_header_do_not_end_the_block() {
        let source = "def f(x):\n\n    return x\n";
        let f = DefinitionLookup::new(source, "f");
        assert_eq!(f.source().expect("found"), source);
    }

    #[test]
    fn inline_bodies_end_at_their_line() {
        let source = "def h(x): return x\n\ndef k(y): return y\n";
        let h = DefinitionLookup::new(source, "h");
        assert_eq!(h.source().expect("found"), "def h(x): return x\n");
    }

    #[test]
    fn nested_blocks_stay_inside_the_definition() {
        let source = indoc! {"
            def outer(x):
                def inner(y):
                    return y
                return inner(x)
            top = 1
        "};
        let outer = DefinitionLookup::new(source, "outer");
        assert_eq!(
            outer.source().expect("found"),
            "def outer(x):\n    def inner(y):\n        return y\n    return inner(x)\n"
        );
    }

    #[test]
    fn malformed_definitions_are_unavailable() {
        let lookup = DefinitionLookup::new("def f(x):\n    return 'open\n", "f");
        let err = lookup.source().expect_err("expected failure");
        assert!(err.reason.contains("Unterminated string literal"));
    }

    #[test]
    fn does_not_match_name_prefixes() {
        let lookup = DefinitionLookup::new("def ff(x):\n    return x\n", "f");
        assert_eq!(
            lookup.source(),
            Err(SourceUnavailable {
                name: "f".to_string(),
                reason: "no top-level definition found".to_string(),
            })
        );
    }
}
