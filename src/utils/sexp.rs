// src/utils/sexp.rs

//! Minimal reader for recipe s-expressions.
//!
//! Supports lists, symbols, `:keywords`, double-quoted strings, integers,
//! quote shorthand (`'x` reads as `(quote x)`) and `;` line comments. Like
//! a lisp `read`, only the first form is consumed; trailing text is ignored.

use std::iter::Peekable;
use std::str::Chars;

use crate::models::Value;

/// Deepest list or quote nesting accepted before the input is rejected.
pub const MAX_DEPTH: usize = 256;

/// Read the first form from `input`. Returns `None` on any syntax error or
/// when the input holds no form at all, or nests deeper than [`MAX_DEPTH`].
pub fn read(input: &str) -> Option<Value> {
    Reader {
        chars: input.chars().peekable(),
        depth: 0,
    }
    .read_form()
}

struct Reader<'a> {
    chars: Peekable<Chars<'a>>,
    depth: usize,
}

impl Reader<'_> {
    fn skip_whitespace(&mut self) {
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() {
                self.chars.next();
            } else if c == ';' {
                while let Some(c) = self.chars.next() {
                    if c == '\n' {
                        break;
                    }
                }
            } else {
                break;
            }
        }
    }

    fn read_form(&mut self) -> Option<Value> {
        self.skip_whitespace();
        match *self.chars.peek()? {
            '(' => {
                self.chars.next();
                self.nested(Self::read_list)
            }
            ')' => None,
            '"' => {
                self.chars.next();
                self.read_string()
            }
            '\'' => {
                self.chars.next();
                let quoted = self.nested(Self::read_form)?;
                Some(Value::List(vec![Value::Symbol("quote".into()), quoted]))
            }
            _ => self.read_atom(),
        }
    }

    /// Run `read` one nesting level down, failing past [`MAX_DEPTH`].
    fn nested(&mut self, read: fn(&mut Self) -> Option<Value>) -> Option<Value> {
        if self.depth >= MAX_DEPTH {
            return None;
        }
        self.depth += 1;
        let value = read(self);
        self.depth -= 1;
        value
    }

    fn read_list(&mut self) -> Option<Value> {
        let mut items = Vec::new();
        loop {
            self.skip_whitespace();
            match self.chars.peek()? {
                ')' => {
                    self.chars.next();
                    return Some(Value::List(items));
                }
                _ => items.push(self.read_form()?),
            }
        }
    }

    fn read_string(&mut self) -> Option<Value> {
        let mut out = String::new();
        loop {
            match self.chars.next()? {
                '"' => return Some(Value::String(out)),
                '\\' => match self.chars.next()? {
                    'n' => out.push('\n'),
                    't' => out.push('\t'),
                    // Escaped newline is a line continuation
                    '\n' => {}
                    other => out.push(other),
                },
                c => out.push(c),
            }
        }
    }

    fn read_atom(&mut self) -> Option<Value> {
        let mut token = String::new();
        while let Some(&c) = self.chars.peek() {
            if c.is_whitespace() || matches!(c, '(' | ')' | '"' | ';' | '\'') {
                break;
            }
            if c == '\\' {
                self.chars.next();
                token.push(self.chars.next()?);
                continue;
            }
            token.push(c);
            self.chars.next();
        }

        if token.is_empty() {
            return None;
        }
        if let Some(name) = token.strip_prefix(':') {
            if name.is_empty() {
                return None;
            }
            return Some(Value::Keyword(name.to_string()));
        }
        if let Ok(n) = token.parse::<i64>() {
            return Some(Value::Integer(n));
        }
        Some(Value::Symbol(token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sym(s: &str) -> Value {
        Value::Symbol(s.into())
    }

    fn kw(s: &str) -> Value {
        Value::Keyword(s.into())
    }

    #[test]
    fn test_read_recipe() {
        let form = read(r#"(pkg :fetcher github :repo "a/b")"#).unwrap();
        assert_eq!(
            form,
            Value::List(vec![
                sym("pkg"),
                kw("fetcher"),
                sym("github"),
                kw("repo"),
                Value::String("a/b".into()),
            ])
        );
    }

    #[test]
    fn test_read_nested_and_multiline() {
        let input = "(foo :fetcher git\n     :url \"https://example.com/foo.git\"\n     :files (:defaults \"data\" (:exclude \"x.el\")))";
        let form = read(input).unwrap();
        let Value::List(items) = form else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 7);
        assert_eq!(
            items[6],
            Value::List(vec![
                kw("defaults"),
                Value::String("data".into()),
                Value::List(vec![kw("exclude"), Value::String("x.el".into())]),
            ])
        );
    }

    #[test]
    fn test_read_comments_and_quote() {
        let form = read("; header\n(a 'b 12) trailing garbage )").unwrap();
        assert_eq!(
            form,
            Value::List(vec![
                sym("a"),
                Value::List(vec![sym("quote"), sym("b")]),
                Value::Integer(12),
            ])
        );
    }

    #[test]
    fn test_read_string_escapes() {
        assert_eq!(
            read(r#""a \"q\" \\ b\n""#),
            Some(Value::String("a \"q\" \\ b\n".into()))
        );
    }

    #[test]
    fn test_read_failures() {
        assert_eq!(read(""), None);
        assert_eq!(read("   ; only a comment"), None);
        assert_eq!(read("(unclosed :fetcher git"), None);
        assert_eq!(read(")"), None);
        assert_eq!(read("\"unterminated"), None);
        assert_eq!(read("(a : b)"), None);
    }

    #[test]
    fn test_read_atoms() {
        assert_eq!(read("hello"), Some(sym("hello")));
        assert_eq!(read("-42"), Some(Value::Integer(-42)));
        assert_eq!(read(":files"), Some(kw("files")));
    }

    #[test]
    fn test_read_nesting_limit() {
        assert_eq!(read(&"(".repeat(100_000)), None);
        assert_eq!(read(&"'".repeat(100_000)), None);

        let deepest = format!("{}{}", "(".repeat(MAX_DEPTH), ")".repeat(MAX_DEPTH));
        assert!(read(&deepest).is_some());
        let too_deep = format!("{}{}", "(".repeat(MAX_DEPTH + 1), ")".repeat(MAX_DEPTH + 1));
        assert_eq!(read(&too_deep), None);
    }
}
