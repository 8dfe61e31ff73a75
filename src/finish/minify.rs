//! Script minification.
//!
//! A lexer-level minifier: comments go, whitespace runs collapse to the
//! minimum needed to keep tokens apart, and line breaks survive only where
//! dropping them could change automatic semicolon insertion. Strings,
//! template literals and regular expression literals are copied untouched.
//! License comments (`/*! ... */`) are kept in place.
//!
//! The lexer also rejects input that cannot be a valid script: unterminated
//! strings, comments, templates or regex literals, and unbalanced brackets.

use crate::error::{Result, ShipError, Stage};

/// Keywords after which a `/` starts a regular expression literal.
const REGEX_PREFIX_KEYWORDS: &[&str] = &[
    "return", "typeof", "instanceof", "in", "of", "new", "delete", "void", "throw", "case", "do",
    "else", "yield", "await",
];

/// Keywords whose parenthesized head may be followed by a statement
/// starting with a regex literal.
const CONDITION_KEYWORDS: &[&str] = &["if", "while", "for", "with"];

/// Keywords whose operand may not start on the next line.
const RESTRICTED_KEYWORDS: &[&str] = &["return", "break", "continue", "throw", "yield"];

/// Minify a script.
pub fn minify_script(source: &str) -> Result<String> {
    Minifier::new(source).run()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Word,
    Number,
    Literal,
    Regex,
    Punct(char),
    /// `++` or `--` applied to the preceding operand
    Postfix(char),
    /// `)` closing the head of an `if`, `while`, `for` or `with`
    ConditionEnd,
}

struct Minifier {
    chars: Vec<char>,
    pos: usize,
    line: usize,
    out: String,
    /// Last emitted token and its final character
    last: Option<(Token, char)>,
    last_word: String,
    pending_space: bool,
    pending_newline: bool,
    /// A license comment was written since the last token
    after_comment: bool,
    /// Open brackets with their line and whether they start a statement head
    brackets: Vec<(char, usize, bool)>,
}

impl Minifier {
    fn new(source: &str) -> Self {
        Self {
            chars: source.chars().collect(),
            pos: 0,
            line: 1,
            out: String::with_capacity(source.len()),
            last: None,
            last_word: String::new(),
            pending_space: false,
            pending_newline: false,
            after_comment: false,
            brackets: Vec::new(),
        }
    }

    fn peek(&self, offset: usize) -> Option<char> {
        self.chars.get(self.pos + offset).copied()
    }

    fn error(&self, line: usize, message: impl std::fmt::Display) -> ShipError {
        ShipError::transform(Stage::Minify, format!("line {}: {}", line, message))
    }

    fn run(mut self) -> Result<String> {
        while let Some(c) = self.peek(0) {
            match c {
                '\n' => {
                    self.line += 1;
                    self.pending_newline = true;
                    self.pos += 1;
                }
                '\r' | '\u{2028}' | '\u{2029}' => {
                    self.pending_newline = true;
                    self.pos += 1;
                }
                c if c.is_whitespace() || c == '\u{feff}' => {
                    self.pending_space = true;
                    self.pos += 1;
                }
                '/' if self.peek(1) == Some('/') => self.skip_line_comment(),
                '/' if self.peek(1) == Some('*') => self.block_comment()?,
                '/' if self.regex_allowed() => self.regex()?,
                '+' | '-' if self.peek(1) == Some(c) => self.increment(c),
                '\'' | '"' => self.string(c)?,
                '`' => self.template()?,
                c if c.is_ascii_digit() => self.number(),
                '.' if self.peek(1).is_some_and(|n| n.is_ascii_digit()) => self.number(),
                c if is_word_char(c) => self.word(),
                '(' | '[' | '{' => {
                    let head = c == '('
                        && self.last.is_some_and(|(t, _)| t == Token::Word)
                        && CONDITION_KEYWORDS.contains(&self.last_word.as_str());
                    self.brackets.push((c, self.line, head));
                    self.punct(c);
                }
                ')' | ']' | '}' => {
                    let expected = match c {
                        ')' => '(',
                        ']' => '[',
                        _ => '{',
                    };
                    match self.brackets.pop() {
                        Some((open, _, true)) if open == expected => {
                            self.pos += 1;
                            self.emit(")", Token::ConditionEnd);
                        }
                        Some((open, _, _)) if open == expected => self.punct(c),
                        Some((open, opened, _)) => {
                            return Err(self.error(
                                self.line,
                                format!("'{}' closes '{}' opened on line {}", c, open, opened),
                            ))
                        }
                        None => return Err(self.error(self.line, format!("unmatched '{}'", c))),
                    }
                }
                c => self.punct(c),
            }
        }

        if let Some((open, line, _)) = self.brackets.last() {
            return Err(self.error(*line, format!("'{}' is never closed", open)));
        }

        Ok(self.out)
    }

    /// Whether the last token ends an operand, so `/` divides and `++` is postfix.
    fn operand_ended(&self) -> bool {
        match self.last {
            None => false,
            Some((Token::Word, _)) => !REGEX_PREFIX_KEYWORDS.contains(&self.last_word.as_str()),
            Some((Token::Number | Token::Literal | Token::Regex | Token::Postfix(_), _)) => true,
            Some((Token::Punct(p), _)) => matches!(p, ')' | ']'),
            Some((Token::ConditionEnd, _)) => false,
        }
    }

    fn regex_allowed(&self) -> bool {
        !self.operand_ended()
    }

    /// Flush pending whitespace ahead of a token starting with `next`.
    fn separate(&mut self, next: char) {
        if std::mem::take(&mut self.after_comment) {
            if self.pending_newline {
                self.out.push('\n');
            }
            self.pending_space = false;
            self.pending_newline = false;
            return;
        }

        let Some((token, prev)) = self.last else {
            self.pending_space = false;
            self.pending_newline = false;
            return;
        };

        if self.pending_newline && !self.newline_removable(token, prev, next) {
            self.out.push('\n');
        } else if (self.pending_space || self.pending_newline)
            && (needs_space(prev, next) || (token == Token::Regex && is_word_char(next)))
        {
            self.out.push(' ');
        }

        self.pending_space = false;
        self.pending_newline = false;
    }

    fn newline_removable(&self, token: Token, prev: char, next: char) -> bool {
        if token == Token::Word && RESTRICTED_KEYWORDS.contains(&self.last_word.as_str()) {
            return false;
        }
        let opens_or_continues = matches!(
            prev,
            '{' | '(' | '[' | ';' | ',' | ':' | '=' | '?' | '&' | '|' | '!' | '~' | '*' | '%' | '<' | '>' | '^'
        );
        let continues_previous = matches!(next, ')' | ']' | '}' | ',' | ';' | '.' | '?' | ':' | '(' | '[');
        opens_or_continues || continues_previous
    }

    fn emit(&mut self, text: &str, token: Token) {
        let Some(first) = text.chars().next() else {
            return;
        };
        self.separate(first);
        self.out.push_str(text);
        let last_char = text.chars().last().unwrap_or(first);
        self.last = Some((token, last_char));
        if token == Token::Word {
            self.last_word = text.to_string();
        }
    }

    fn punct(&mut self, c: char) {
        self.pos += 1;
        let mut buf = [0u8; 4];
        self.emit(c.encode_utf8(&mut buf), Token::Punct(c));
    }

    /// `++` or `--`. A line break before it makes it a prefix operator.
    fn increment(&mut self, c: char) {
        let postfix = !self.pending_newline && self.operand_ended();
        self.pos += 2;
        let text: String = [c, c].iter().collect();
        self.emit(&text, if postfix { Token::Postfix(c) } else { Token::Punct(c) });
    }

    fn word(&mut self) {
        let start = self.pos;
        while self.peek(0).is_some_and(is_word_char) {
            // `\uXXXX` escapes are part of identifiers
            if self.peek(0) == Some('\\') {
                self.pos += 1;
            }
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos.min(self.chars.len())].iter().collect();
        self.emit(&text, Token::Word);
    }

    fn number(&mut self) {
        let start = self.pos;
        let hex = self.peek(0) == Some('0') && matches!(self.peek(1), Some('x' | 'X'));
        while let Some(c) = self.peek(0) {
            let exponent_sign = matches!(c, '+' | '-')
                && !hex
                && self.pos > start
                && matches!(self.chars[self.pos - 1], 'e' | 'E');
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || exponent_sign {
                self.pos += 1;
            } else {
                break;
            }
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        self.emit(&text, Token::Number);
    }

    fn string(&mut self, quote: char) -> Result<()> {
        let start = self.pos;
        let line = self.line;
        self.pos += 1;
        loop {
            match self.peek(0) {
                None => return Err(self.error(line, "unterminated string literal")),
                Some('\\') => {
                    match (self.peek(1), self.peek(2)) {
                        (Some('\r'), Some('\n')) => {
                            self.line += 1;
                            self.pos += 3;
                        }
                        (Some('\n'), _) => {
                            self.line += 1;
                            self.pos += 2;
                        }
                        _ => self.pos += 2,
                    }
                }
                Some('\n') | Some('\r') => {
                    return Err(self.error(line, "unterminated string literal"))
                }
                Some(c) => {
                    self.pos += 1;
                    if c == quote {
                        break;
                    }
                }
            }
        }
        let end = self.pos.min(self.chars.len());
        let text: String = self.chars[start..end].iter().collect();
        self.emit(&text, Token::Literal);
        Ok(())
    }

    fn template(&mut self) -> Result<()> {
        let start = self.pos;
        self.pos = self.scan_template(self.pos)?;
        let text: String = self.chars[start..self.pos].iter().collect();
        self.line += text.matches('\n').count();
        self.emit(&text, Token::Literal);
        Ok(())
    }

    /// Scan a template literal starting at the backtick at `pos`, returning the
    /// index just past its closing backtick.
    fn scan_template(&self, pos: usize) -> Result<usize> {
        let mut i = pos + 1;
        let mut depth = 0usize;
        loop {
            let Some(c) = self.chars.get(i).copied() else {
                return Err(self.error(self.line, "unterminated template literal"));
            };
            match c {
                '\\' => i += 2,
                '`' if depth == 0 => return Ok(i + 1),
                '`' => i = self.scan_template(i)?,
                '$' if depth == 0 && self.chars.get(i + 1) == Some(&'{') => {
                    depth = 1;
                    i += 2;
                }
                '{' if depth > 0 => {
                    depth += 1;
                    i += 1;
                }
                '}' if depth > 0 => {
                    depth -= 1;
                    i += 1;
                }
                '\'' | '"' if depth > 0 => {
                    i += 1;
                    while let Some(s) = self.chars.get(i).copied() {
                        i += if s == '\\' { 2 } else { 1 };
                        if s == c {
                            break;
                        }
                    }
                }
                _ => i += 1,
            }
        }
    }

    fn regex(&mut self) -> Result<()> {
        let start = self.pos;
        let line = self.line;
        let mut in_class = false;
        self.pos += 1;
        loop {
            match self.peek(0) {
                None | Some('\n') | Some('\r') => {
                    return Err(self.error(line, "unterminated regular expression literal"))
                }
                Some('\\') => self.pos += 2,
                Some('[') => {
                    in_class = true;
                    self.pos += 1;
                }
                Some(']') => {
                    in_class = false;
                    self.pos += 1;
                }
                Some('/') if !in_class => {
                    self.pos += 1;
                    break;
                }
                Some(_) => self.pos += 1,
            }
        }
        while self.peek(0).is_some_and(|c| c.is_ascii_alphabetic()) {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        self.emit(&text, Token::Regex);
        Ok(())
    }

    fn skip_line_comment(&mut self) {
        while let Some(c) = self.peek(0) {
            if matches!(c, '\n' | '\r' | '\u{2028}' | '\u{2029}') {
                break;
            }
            self.pos += 1;
        }
        self.pending_space = true;
    }

    fn block_comment(&mut self) -> Result<()> {
        let start = self.pos;
        let line = self.line;
        let license = self.peek(2) == Some('!');
        let newline_before = self.pending_newline;
        self.pos += 2;
        loop {
            match self.peek(0) {
                None => return Err(self.error(line, "unterminated block comment")),
                Some('*') if self.peek(1) == Some('/') => {
                    self.pos += 2;
                    break;
                }
                Some('\n') => {
                    self.line += 1;
                    self.pending_newline = true;
                    self.pos += 1;
                }
                Some(_) => self.pos += 1,
            }
        }

        if license {
            if newline_before && !self.out.is_empty() {
                self.out.push('\n');
            }
            self.out.extend(&self.chars[start..self.pos]);
            self.after_comment = true;
            self.pending_space = false;
            self.pending_newline = false;
        } else {
            self.pending_space = true;
        }
        Ok(())
    }
}

fn is_word_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$' || c == '\\' || (!c.is_ascii() && c.is_alphanumeric())
}

/// Whether two adjacent characters must stay separated by a space.
fn needs_space(prev: char, next: char) -> bool {
    (is_word_char(prev) && is_word_char(next))
        || (prev == next && matches!(prev, '+' | '-' | '/'))
        || (prev.is_ascii_digit() && next == '.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;

    #[test]
    fn test_strips_comments_and_whitespace() {
        let src = "/* header */\nvar a = 1; // one\nvar b   =   a + 2;\n";
        assert_eq!(minify_script(src).unwrap(), "var a=1;var b=a+2;");
    }

    #[test]
    fn test_keeps_space_between_words() {
        assert_eq!(minify_script("return  typeof x").unwrap(), "return typeof x");
    }

    #[test]
    fn test_keeps_plus_plus_apart() {
        assert_eq!(minify_script("a + +b; c - -d;").unwrap(), "a+ +b;c- -d;");
    }

    #[test]
    fn test_keeps_newline_after_return() {
        assert_eq!(minify_script("function f(){return\n1}").unwrap(), "function f(){return\n1}");
    }

    #[test]
    fn test_keeps_newline_where_asi_applies() {
        assert_eq!(minify_script("a = b\nc()").unwrap(), "a=b\nc()");
        assert_eq!(minify_script("i++\nj").unwrap(), "i++\nj");
    }

    #[test]
    fn test_drops_newline_inside_braces() {
        assert_eq!(minify_script("if (a) {\n  b();\n}\n").unwrap(), "if(a){b();}");
    }

    #[test]
    fn test_strings_untouched() {
        let src = "var s = 'a  //  b', t = \"/* c */\";";
        assert_eq!(minify_script(src).unwrap(), "var s='a  //  b',t=\"/* c */\";");
    }

    #[test]
    fn test_template_literal_untouched() {
        let src = "var s = `a  ${ b + `x ${c}` }  d`;";
        assert_eq!(minify_script(src).unwrap(), "var s=`a  ${ b + `x ${c}` }  d`;");
    }

    #[test]
    fn test_regex_literal_untouched() {
        let src = "var r = /[/ ]+/g; x = a / b;";
        assert_eq!(minify_script(src).unwrap(), "var r=/[/ ]+/g;x=a/b;");
    }

    #[test]
    fn test_regex_after_return() {
        assert_eq!(minify_script("return /a b/.test(s)").unwrap(), "return/a b/.test(s)");
    }

    #[test]
    fn test_division_after_postfix_increment() {
        assert_eq!(minify_script("var h = i++ / 2;").unwrap(), "var h=i++/2;");
        assert_eq!(minify_script("var h = a[i]-- / 2;").unwrap(), "var h=a[i]--/2;");
    }

    #[test]
    fn test_prefix_increment_after_line_break() {
        assert_eq!(minify_script("a\n++b").unwrap(), "a\n++b");
        assert_eq!(minify_script("x = - --y;").unwrap(), "x=- --y;");
    }

    #[test]
    fn test_regex_keeps_space_before_identifier() {
        assert_eq!(
            minify_script("var ok = /x/ instanceof RegExp;").unwrap(),
            "var ok=/x/ instanceof RegExp;"
        );
        assert_eq!(minify_script("var r = /x/g in o;").unwrap(), "var r=/x/g in o;");
    }

    #[test]
    fn test_regex_after_condition_head() {
        assert_eq!(minify_script("if (x) /a  b/.test(s);").unwrap(), "if(x)/a  b/.test(s);");
        assert_eq!(minify_script("while (f(a)) /c  d/.exec(s);").unwrap(), "while(f(a))/c  d/.exec(s);");
        assert_eq!(minify_script("y = (a) / 2;").unwrap(), "y=(a)/2;");
    }

    #[test]
    fn test_string_line_continuation() {
        assert_eq!(minify_script("var s = 'a\\\nb';").unwrap(), "var s='a\\\nb';");
        assert_eq!(minify_script("var s = 'a\\\r\nb';").unwrap(), "var s='a\\\r\nb';");
    }

    #[test]
    fn test_keeps_license_comments() {
        assert_eq!(minify_script("/*! keep me */\nvar a = 1;").unwrap(), "/*! keep me */\nvar a=1;");
        assert_eq!(
            minify_script("var a = 1;\n/*!\n * vendored\n */\nvar b = 2; /* drop */").unwrap(),
            "var a=1;\n/*!\n * vendored\n */\nvar b=2;"
        );
    }

    #[test]
    fn test_inline_license_comment_separates_tokens() {
        assert_eq!(minify_script("var /*! x */ a = 1;").unwrap(), "var/*! x */a=1;");
    }

    #[test]
    fn test_number_member_access() {
        assert_eq!(minify_script("1 .toString(); x = 1e-3;").unwrap(), "1 .toString();x=1e-3;");
    }

    #[test]
    fn test_output_is_smaller() {
        let src = "(function (root) {\n  'use strict';\n\n  root.value = 42;\n}(this));\n";
        let out = minify_script(src).unwrap();
        assert!(out.len() < src.len());
        assert_eq!(out, "(function(root){'use strict';root.value=42;}(this));");
    }

    #[test]
    fn test_unterminated_string() {
        let err = minify_script("var a = 'oops;\nvar b;").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Transform);
        assert!(err.to_string().contains("line 1"));
    }

    #[test]
    fn test_unterminated_comment() {
        let err = minify_script("var a;\n/* never closed").unwrap_err();
        assert!(err.to_string().contains("line 2"));
    }

    #[test]
    fn test_unbalanced_brackets() {
        assert!(minify_script("function f() { return (1; }").is_err());
        assert!(minify_script("f());").is_err());
        let err = minify_script("if (a) {\n").unwrap_err();
        assert!(err.to_string().contains("never closed"));
    }
}
