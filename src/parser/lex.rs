//! Lexical primitives shared by every production: whitespace/comment
//! skipping, literal and regex matching, quoted-string and brace-delimited
//! code-block scanning. Grounded in the primitive matcher set declared on
//! `examples/original_source/parser.h`'s `Parser` (`match`, `match_re`,
//! `match_quoted`, `match_code`, `skip_space`, `match_identifier`,
//! `match_number`).

use once_cell::sync::Lazy;
use regex::Regex;

use super::Parser;

static IDENTIFIER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*").unwrap());
static NUMBER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[0-9]+").unwrap());
static RULE_HEAD: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\S+)[ \t]*<-").unwrap());
static DIRECTIVE_NAME: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z][A-Za-z0-9_-]*").unwrap());

impl<'s> Parser<'s> {
    /// Skip runs of plain whitespace. Comments are not whitespace here —
    /// callers that want to harvest them call [`Parser::take_comments`]
    /// first, since a comment's attachment point depends on what follows it.
    pub fn skip_space(&mut self) {
        while let Some(c) = self.rest().chars().next() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    /// Consume zero or more `#`-prefixed line comments (each preceded by
    /// whitespace), returning their text with the leading `#` and
    /// surrounding space stripped.
    pub fn take_comments(&mut self) -> Vec<String> {
        let mut comments = Vec::new();
        loop {
            let sp = self.save_point();
            self.skip_space();
            if !self.match_char('#') {
                self.rollback(sp);
                break;
            }
            let end = self.rest().find('\n').unwrap_or(self.rest().len());
            let line = self.rest()[..end].trim().to_string();
            self.pos += end;
            comments.push(line);
        }
        comments
    }

    pub fn match_char(&mut self, c: char) -> bool {
        if self.rest().starts_with(c) {
            self.pos += c.len_utf8();
            true
        } else {
            false
        }
    }

    /// Skip whitespace, then match a literal token.
    pub fn token(&mut self, tok: &str) -> bool {
        let sp = self.save_point();
        self.skip_space();
        if self.rest().starts_with(tok) {
            self.pos += tok.len();
            true
        } else {
            self.rollback(sp);
            false
        }
    }

    pub fn peek_char(&self, c: char) -> bool {
        self.rest().starts_with(c)
    }

    /// Consume and return the current character, or `None` at EOF.
    pub fn advance_char(&mut self) -> Option<char> {
        let c = self.rest().chars().next()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    /// A `#` comment on the *same* line as the cursor (only horizontal
    /// whitespace between them) — an inline trailing remark, as opposed to
    /// one [`Parser::take_comments`] would harvest on its own line.
    pub fn take_inline_comment(&mut self) -> Option<String> {
        let sp = self.save_point();
        loop {
            match self.rest().chars().next() {
                Some('#') => break,
                Some(c) if c != '\n' && c.is_whitespace() => self.pos += c.len_utf8(),
                _ => {
                    self.rollback(sp);
                    return None;
                }
            }
        }
        self.match_char('#');
        let end = self.rest().find('\n').unwrap_or(self.rest().len());
        let line = self.rest()[..end].trim().to_string();
        self.pos += end;
        Some(line)
    }

    fn match_regex(&mut self, re: &Regex) -> Option<String> {
        let m = re.find(self.rest())?;
        let text = m.as_str().to_string();
        self.pos += m.end();
        Some(text)
    }

    pub fn match_identifier(&mut self) -> Option<String> {
        self.skip_space();
        self.match_regex(&IDENTIFIER)
    }

    pub fn match_number(&mut self) -> Option<u32> {
        self.skip_space();
        self.match_regex(&NUMBER)?.parse().ok()
    }

    /// `name <-`, used to recognize the start of a `Rule` without
    /// committing to one (the name is returned with the arrow already
    /// consumed).
    pub fn match_rule_head(&mut self) -> Option<String> {
        self.skip_space();
        let m = RULE_HEAD.captures(self.rest())?;
        let whole = m.get(0).unwrap();
        let name = m.get(1).unwrap().as_str().to_string();
        self.pos += whole.end();
        Some(name)
    }

    pub fn match_directive_name(&mut self) -> Option<String> {
        self.match_regex(&DIRECTIVE_NAME)
    }

    /// A `left ... right` span where `right` can be escaped with `\` inside
    /// the body. Returns the raw body text, escapes intact.
    pub fn match_quoted(&mut self, left: char, right: char) -> Option<String> {
        let sp = self.save_point();
        self.skip_space();
        if !self.match_char(left) {
            self.rollback(sp);
            return None;
        }
        let start = self.pos;
        loop {
            if self.is_eof() {
                self.rollback(sp);
                return None;
            }
            let c = self.rest().chars().next().unwrap();
            if c == '\\' {
                self.pos += c.len_utf8();
                if let Some(next) = self.rest().chars().next() {
                    self.pos += next.len_utf8();
                }
                continue;
            }
            if c == right {
                let body = self.source[start..self.pos].to_string();
                self.pos += c.len_utf8();
                return Some(body);
            }
            self.pos += c.len_utf8();
        }
    }

    /// A brace-delimited code block (`{ ... }`), tracking nested braces and
    /// skipping over string/char literals so an embedded `{`/`}` inside one
    /// doesn't unbalance the scan. Returns the body between the outermost
    /// braces, unindented.
    pub fn match_code(&mut self) -> Option<String> {
        let sp = self.save_point();
        self.skip_space();
        if !self.match_char('{') {
            self.rollback(sp);
            return None;
        }
        let start = self.pos;
        let mut depth = 1usize;
        while depth > 0 {
            if self.is_eof() {
                self.rollback(sp);
                return None;
            }
            let c = self.rest().chars().next().unwrap();
            match c {
                '{' => {
                    depth += 1;
                    self.pos += 1;
                }
                '}' => {
                    depth -= 1;
                    self.pos += 1;
                }
                '"' | '\'' => {
                    self.pos += 1;
                    while let Some(inner) = self.rest().chars().next() {
                        self.pos += inner.len_utf8();
                        if inner == '\\' {
                            if let Some(escaped) = self.rest().chars().next() {
                                self.pos += escaped.len_utf8();
                            }
                        } else if inner == c {
                            break;
                        }
                    }
                }
                other => self.pos += other.len_utf8(),
            }
        }
        Some(self.source[start..self.pos - 1].to_string())
    }
}
