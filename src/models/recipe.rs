//! Recipe data structures.
//!
//! A recipe is the s-expression a submitter adds to the index, e.g.
//!
//! ```text
//! (magit :fetcher github :repo "magit/magit" :files ("lisp/*.el"))
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};

/// A value read from recipe text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Value {
    /// Bare symbol, e.g. `github`
    Symbol(String),
    /// Keyword without its leading colon, e.g. `fetcher` for `:fetcher`
    Keyword(String),
    /// Double-quoted string literal
    String(String),
    /// Integer literal
    Integer(i64),
    /// Parenthesized list
    List(Vec<Value>),
}

impl Value {
    pub fn as_symbol(&self) -> Option<&str> {
        match self {
            Value::Symbol(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_keyword(&self) -> Option<&str> {
        match self {
            Value::Keyword(k) => Some(k),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Whether the value is the empty list (`()` or `nil`).
    pub fn is_nil(&self) -> bool {
        match self {
            Value::List(items) => items.is_empty(),
            Value::Symbol(s) => s == "nil",
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Symbol(s) => write_atom(f, s),
            Value::Keyword(k) => {
                f.write_str(":")?;
                write_atom(f, k)
            }
            Value::String(s) => {
                f.write_str("\"")?;
                for c in s.chars() {
                    match c {
                        '"' => f.write_str("\\\"")?,
                        '\\' => f.write_str("\\\\")?,
                        _ => write!(f, "{c}")?,
                    }
                }
                f.write_str("\"")
            }
            Value::Integer(n) => write!(f, "{n}"),
            Value::List(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
        }
    }
}

/// Write a symbol or keyword name, escaping characters that would end it.
fn write_atom(f: &mut fmt::Formatter<'_>, name: &str) -> fmt::Result {
    for c in name.chars() {
        if c.is_whitespace() || matches!(c, '(' | ')' | '"' | ';' | '\'' | '\\') {
            f.write_str("\\")?;
        }
        write!(f, "{c}")?;
    }
    Ok(())
}

/// Source-control backend a recipe fetches from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Fetcher {
    Git,
    Github,
    Gitlab,
    Codeberg,
    Sourcehut,
}

impl Fetcher {
    /// Every supported backend.
    pub const ALL: [Fetcher; 5] = [
        Fetcher::Git,
        Fetcher::Github,
        Fetcher::Gitlab,
        Fetcher::Codeberg,
        Fetcher::Sourcehut,
    ];

    /// Older acceptance set that predates codeberg and sourcehut support.
    pub const LEGACY: [Fetcher; 3] = [Fetcher::Git, Fetcher::Github, Fetcher::Gitlab];

    pub fn as_str(&self) -> &'static str {
        match self {
            Fetcher::Git => "git",
            Fetcher::Github => "github",
            Fetcher::Gitlab => "gitlab",
            Fetcher::Codeberg => "codeberg",
            Fetcher::Sourcehut => "sourcehut",
        }
    }

    /// Look up a fetcher by the symbol used in recipes.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.as_str() == symbol)
    }

    /// Web host for fetchers whose repository page can be derived from `:repo`.
    pub fn web_host(&self) -> Option<&'static str> {
        match self {
            Fetcher::Github => Some("www.github.com"),
            Fetcher::Gitlab => Some("www.gitlab.com"),
            _ => None,
        }
    }
}

impl fmt::Display for Fetcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A validated package recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recipe {
    /// Package name taken from the head of the form
    pub package: String,

    /// Declared `:fetcher`
    pub fetcher: Fetcher,

    /// Remaining keyword/value pairs in source order, keywords without colon.
    /// Always contains `files`.
    pub fields: Vec<(String, Value)>,
}

impl Recipe {
    /// Value of a keyword field.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// `:repo` as a string, e.g. `"owner/name"`.
    pub fn repo(&self) -> Option<&str> {
        self.get("repo").and_then(Value::as_str)
    }

    /// Explicit `:url`, if any.
    pub fn url(&self) -> Option<&str> {
        self.get("url").and_then(Value::as_str)
    }

    pub fn files(&self) -> Option<&Value> {
        self.get("files")
    }

    /// Render the recipe back to s-expression text.
    pub fn to_sexp(&self) -> String {
        let mut out = format!(
            "({} :fetcher {}",
            Value::Symbol(self.package.clone()),
            self.fetcher
        );
        for (key, value) in &self.fields {
            out.push_str(&format!(" :{key} {value}"));
        }
        out.push(')');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_recipe() -> Recipe {
        Recipe {
            package: "pkg".into(),
            fetcher: Fetcher::Github,
            fields: vec![
                ("repo".into(), Value::String("a/b".into())),
                (
                    "files".into(),
                    Value::List(vec![Value::Keyword("defaults".into())]),
                ),
            ],
        }
    }

    #[test]
    fn test_accessors() {
        let recipe = sample_recipe();
        assert_eq!(recipe.repo(), Some("a/b"));
        assert_eq!(recipe.url(), None);
        assert_eq!(
            recipe.files(),
            Some(&Value::List(vec![Value::Keyword("defaults".into())]))
        );
    }

    #[test]
    fn test_to_sexp() {
        assert_eq!(
            sample_recipe().to_sexp(),
            r#"(pkg :fetcher github :repo "a/b" :files (:defaults))"#
        );
    }

    #[test]
    fn test_string_escaping() {
        let value = Value::String(r#"say "hi" \o/"#.into());
        assert_eq!(value.to_string(), r#""say \"hi\" \\o/""#);
    }

    #[test]
    fn test_symbol_escaping_round_trips() {
        let recipe = Recipe {
            package: "odd pkg(1)".into(),
            fields: vec![("files".into(), Value::Symbol("a;b".into()))],
            ..sample_recipe()
        };
        let text = recipe.to_sexp();
        assert_eq!(text, r"(odd\ pkg\(1\) :fetcher github :files a\;b)");

        let Some(Value::List(items)) = crate::utils::sexp::read(&text) else {
            panic!("expected list");
        };
        assert_eq!(items[0], Value::Symbol("odd pkg(1)".into()));
        assert_eq!(items[4], Value::Symbol("a;b".into()));
    }

    #[test]
    fn test_fetcher_lookup() {
        assert_eq!(Fetcher::from_symbol("sourcehut"), Some(Fetcher::Sourcehut));
        assert_eq!(Fetcher::from_symbol("hg"), None);
        assert_eq!(Fetcher::Gitlab.web_host(), Some("www.gitlab.com"));
        assert_eq!(Fetcher::Codeberg.web_host(), None);
        assert!(!Fetcher::LEGACY.contains(&Fetcher::Codeberg));
    }

    #[test]
    fn test_value_json_shape() {
        let json = serde_json::to_string(&Value::Keyword("defaults".into())).unwrap();
        assert_eq!(json, r#"{"type":"keyword","value":"defaults"}"#);
    }
}
