//! Main lexer implementation for the Snowball language.
//!
//! This module provides the [`Lexer`] struct which transforms source text
//! into a stream of tokens, expanding string escapes and consuming the
//! `stringescapes` / `stringdef` directives along the way.

use sblc_util::{CompileError, Span};

use crate::cursor::Cursor;
use crate::escape::EscapeTable;
use crate::token::{keyword_from_ident, Token};

/// The Snowball lexer.
///
/// Tokens are produced on demand by [`Lexer::next_token`]; the
/// [`tokenize`] helper drains the whole input at once, which is how the
/// parser consumes it.
///
/// # Example
///
/// ```
/// use sblc_lex::{Lexer, Token};
///
/// let mut lexer = Lexer::new("define stem as ( delete )");
/// assert_eq!(lexer.next_token().unwrap().0, Token::Define);
/// ```
pub struct Lexer<'a> {
    /// Character cursor over the source.
    cursor: Cursor<'a>,

    /// Active escape delimiters and stringdef bindings.
    escapes: EscapeTable,

    /// Start byte position of the current token.
    token_start: usize,

    /// Start line of the current token.
    token_start_line: u32,

    /// Start column of the current token.
    token_start_column: u32,
}

impl<'a> Lexer<'a> {
    /// Creates a lexer over `source`.
    pub fn new(source: &'a str) -> Self {
        let mut cursor = Cursor::new(source);
        // A UTF-8 BOM at file start is not part of the program.
        if cursor.current_char() == '\u{feff}' {
            cursor.advance();
        }
        Self {
            cursor,
            escapes: EscapeTable::new(),
            token_start: 0,
            token_start_line: 1,
            token_start_column: 1,
        }
    }

    /// Returns the next token and its span.
    ///
    /// `stringescapes` and `stringdef` directives are handled internally
    /// and never surface; the caller simply sees the token that follows
    /// them.
    pub fn next_token(&mut self) -> Result<(Token, Span), CompileError> {
        loop {
            self.skip_whitespace_and_comments()?;

            self.token_start = self.cursor.position();
            self.token_start_line = self.cursor.line();
            self.token_start_column = self.cursor.column();

            if self.cursor.is_at_end() {
                return Ok((Token::Eof, self.span()));
            }

            let token = match self.cursor.current_char() {
                '(' => {
                    self.cursor.advance();
                    Token::LParen
                }
                ')' => {
                    self.cursor.advance();
                    Token::RParen
                }
                '[' => {
                    self.cursor.advance();
                    Token::LBracket
                }
                ']' => {
                    self.cursor.advance();
                    Token::RBracket
                }
                '$' => {
                    self.cursor.advance();
                    Token::Dollar
                }
                '=' => {
                    self.cursor.advance();
                    if self.cursor.eat('=') {
                        Token::EqEq
                    } else {
                        Token::Assign
                    }
                }
                '!' => {
                    self.cursor.advance();
                    if self.cursor.eat('=') {
                        Token::Ne
                    } else {
                        return Err(self.error("unexpected character '!'"));
                    }
                }
                '<' => {
                    self.cursor.advance();
                    if self.cursor.eat('-') {
                        Token::LeftArrow
                    } else if self.cursor.eat('=') {
                        Token::Le
                    } else if self.cursor.eat('+') {
                        Token::InsertArrow
                    } else {
                        Token::Lt
                    }
                }
                '>' => {
                    self.cursor.advance();
                    if self.cursor.eat('=') {
                        Token::Ge
                    } else {
                        Token::Gt
                    }
                }
                '+' => {
                    self.cursor.advance();
                    if self.cursor.eat('=') {
                        Token::PlusAssign
                    } else {
                        Token::Plus
                    }
                }
                '-' => {
                    self.cursor.advance();
                    if self.cursor.eat('>') {
                        Token::RightArrow
                    } else if self.cursor.eat('=') {
                        Token::MinusAssign
                    } else {
                        Token::Minus
                    }
                }
                '*' => {
                    self.cursor.advance();
                    if self.cursor.eat('=') {
                        Token::StarAssign
                    } else {
                        Token::Star
                    }
                }
                '/' => {
                    self.cursor.advance();
                    if self.cursor.eat('=') {
                        Token::SlashAssign
                    } else {
                        Token::Slash
                    }
                }
                '\'' => Token::Str(self.lex_string()?),
                c if c.is_ascii_digit() => self.lex_number()?,
                c if c.is_ascii_alphabetic() || c == '_' => {
                    match self.lex_identifier()? {
                        Some(token) => token,
                        // A directive was consumed; scan the next token.
                        None => continue,
                    }
                }
                c => return Err(self.error(format!("unexpected character '{}'", c))),
            };

            return Ok((token, self.span()));
        }
    }

    /// Lexes an identifier, keyword, or directive.
    ///
    /// Returns `None` when a `stringescapes` / `stringdef` directive was
    /// consumed in full.
    fn lex_identifier(&mut self) -> Result<Option<Token>, CompileError> {
        loop {
            let c = self.cursor.current_char();
            if !c.is_ascii_alphanumeric() && c != '_' {
                break;
            }
            self.cursor.advance();
        }
        let text = self.cursor.slice(self.token_start, self.cursor.position());

        match text {
            "stringescapes" => {
                self.lex_stringescapes()?;
                Ok(None)
            }
            "stringdef" => {
                self.lex_stringdef()?;
                Ok(None)
            }
            _ => Ok(Some(match keyword_from_ident(text) {
                Some(keyword) => keyword,
                None => Token::Ident(sblc_util::Symbol::intern(text)),
            })),
        }
    }

    /// Processes `stringescapes XY`.
    fn lex_stringescapes(&mut self) -> Result<(), CompileError> {
        self.skip_whitespace_and_comments()?;
        let open = self.cursor.current_char();
        if self.cursor.is_at_end() {
            return Err(self.error("stringescapes requires two characters"));
        }
        self.cursor.advance();
        // The two characters are usually adjacent but may be spaced out.
        if self.cursor.current_char().is_whitespace() {
            self.skip_whitespace_and_comments()?;
        }
        let close = self.cursor.current_char();
        if self.cursor.is_at_end() {
            return Err(self.error("stringescapes requires two characters"));
        }
        self.cursor.advance();
        if open == close {
            return Err(self.error("stringescapes characters must differ"));
        }
        self.escapes.declare(open, close);
        Ok(())
    }

    /// Processes `stringdef NAME [hex|decimal] '...'`.
    fn lex_stringdef(&mut self) -> Result<(), CompileError> {
        if !self.escapes.declared() {
            return Err(CompileError::escape(
                "stringdef before stringescapes",
                self.span(),
            ));
        }

        self.skip_whitespace_and_comments()?;
        let name_start = self.cursor.position();
        while !self.cursor.is_at_end() && !self.cursor.current_char().is_whitespace() {
            self.cursor.advance();
        }
        let name = self
            .cursor
            .slice(name_start, self.cursor.position())
            .to_owned();
        if name.is_empty() {
            return Err(self.error("stringdef requires a name"));
        }

        self.skip_whitespace_and_comments()?;
        let value = match self.cursor.current_char() {
            '\'' => self.lex_string()?,
            c if c.is_ascii_alphabetic() => {
                let word_start = self.cursor.position();
                while self.cursor.current_char().is_ascii_alphabetic() {
                    self.cursor.advance();
                }
                let word = self.cursor.slice(word_start, self.cursor.position());
                let radix = match word {
                    "hex" => 16,
                    "decimal" => 10,
                    other => {
                        return Err(self.error(format!(
                            "expected hex, decimal, or a string literal after stringdef, got '{}'",
                            other
                        )))
                    }
                };
                self.skip_whitespace_and_comments()?;
                if self.cursor.current_char() != '\'' {
                    return Err(self.error("expected a string literal after hex/decimal"));
                }
                let body = self.lex_raw_string()?;
                self.decode_code_points(&body, radix)?
            }
            _ => return Err(self.error("expected a string literal after stringdef")),
        };

        self.escapes.define(&name, value);
        Ok(())
    }

    /// Decodes whitespace-separated code point values in the given radix.
    fn decode_code_points(&self, body: &str, radix: u32) -> Result<String, CompileError> {
        let mut out = String::new();
        for word in body.split_whitespace() {
            let value = u32::from_str_radix(word, radix)
                .map_err(|_| self.error(format!("invalid code point '{}'", word)))?;
            let c = char::from_u32(value)
                .ok_or_else(|| self.error(format!("invalid code point '{}'", word)))?;
            out.push(c);
        }
        Ok(out)
    }

    /// Lexes a string literal, expanding escape references.
    ///
    /// The cursor sits on the opening quote.
    fn lex_string(&mut self) -> Result<String, CompileError> {
        self.cursor.advance(); // opening quote
        let mut value = String::new();
        loop {
            if self.cursor.is_at_end() {
                return Err(self.error("unterminated string"));
            }
            let c = self.cursor.current_char();
            if c == '\'' {
                self.cursor.advance();
                return Ok(value);
            }
            if c == self.escapes.open() {
                self.cursor.advance();
                let name_start = self.cursor.position();
                while !self.cursor.is_at_end()
                    && self.cursor.current_char() != self.escapes.close()
                {
                    self.cursor.advance();
                }
                if self.cursor.is_at_end() {
                    return Err(self.error("unterminated string escape"));
                }
                let name = self
                    .cursor
                    .slice(name_start, self.cursor.position())
                    .to_owned();
                self.cursor.advance(); // closing delimiter
                if name.is_empty() {
                    // An empty reference stands for the open delimiter itself.
                    value.push(self.escapes.open());
                } else {
                    match self.escapes.lookup(&name) {
                        Some(expansion) => value.push_str(expansion),
                        None => {
                            return Err(CompileError::escape(
                                format!("undefined string escape '{}'", name),
                                self.span(),
                            ))
                        }
                    }
                }
                continue;
            }
            value.push(c);
            self.cursor.advance();
        }
    }

    /// Lexes a string literal without escape expansion (stringdef bodies).
    fn lex_raw_string(&mut self) -> Result<String, CompileError> {
        self.cursor.advance(); // opening quote
        let start = self.cursor.position();
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\'' {
            self.cursor.advance();
        }
        if self.cursor.is_at_end() {
            return Err(self.error("unterminated string"));
        }
        let value = self.cursor.slice(start, self.cursor.position()).to_owned();
        self.cursor.advance(); // closing quote
        Ok(value)
    }

    /// Lexes a decimal integer literal.
    fn lex_number(&mut self) -> Result<Token, CompileError> {
        while self.cursor.current_char().is_ascii_digit() {
            self.cursor.advance();
        }
        let text = self.cursor.slice(self.token_start, self.cursor.position());
        let value: i32 = text
            .parse()
            .map_err(|_| self.error(format!("integer literal '{}' is too large", text)))?;
        Ok(Token::Int(value))
    }

    /// Skips whitespace, `// ...` comments, and `/* ... */` comments.
    fn skip_whitespace_and_comments(&mut self) -> Result<(), CompileError> {
        loop {
            let c = self.cursor.current_char();
            if c.is_whitespace() && !self.cursor.is_at_end() {
                self.cursor.advance();
                continue;
            }
            if c == '/' && self.cursor.peek_next() == '/' {
                while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
                    self.cursor.advance();
                }
                continue;
            }
            if c == '/' && self.cursor.peek_next() == '*' {
                self.token_start = self.cursor.position();
                self.token_start_line = self.cursor.line();
                self.token_start_column = self.cursor.column();
                self.cursor.advance();
                self.cursor.advance();
                // Block comments do not nest.
                loop {
                    if self.cursor.is_at_end() {
                        return Err(self.error("unterminated comment"));
                    }
                    if self.cursor.current_char() == '*' && self.cursor.peek_next() == '/' {
                        self.cursor.advance();
                        self.cursor.advance();
                        break;
                    }
                    self.cursor.advance();
                }
                continue;
            }
            return Ok(());
        }
    }

    /// Span from the current token's start to the cursor.
    fn span(&self) -> Span {
        Span::new(
            self.token_start,
            self.cursor.position(),
            self.token_start_line,
            self.token_start_column,
        )
    }

    /// Lexical error at the current token.
    fn error(&self, message: impl Into<String>) -> CompileError {
        CompileError::lex(message, self.span())
    }
}

/// Tokenizes a whole source file, ending with [`Token::Eof`].
///
/// # Example
///
/// ```
/// use sblc_lex::{tokenize, Token};
///
/// let tokens = tokenize("routines ( stem )").unwrap();
/// assert_eq!(tokens.first().unwrap().0, Token::Routines);
/// assert_eq!(tokens.last().unwrap().0, Token::Eof);
/// ```
pub fn tokenize(source: &str) -> Result<Vec<(Token, Span)>, CompileError> {
    let mut lexer = Lexer::new(source);
    let mut tokens = Vec::new();
    loop {
        let (token, span) = lexer.next_token()?;
        let done = token == Token::Eof;
        tokens.push((token, span));
        if done {
            return Ok(tokens);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sblc_util::Symbol;

    fn lex_all(source: &str) -> Vec<Token> {
        let mut tokens = tokenize(source).expect("lexing failed");
        assert_eq!(tokens.pop().map(|(t, _)| t), Some(Token::Eof));
        tokens.into_iter().map(|(t, _)| t).collect()
    }

    #[test]
    fn test_header_keywords() {
        let t = lex_all("routines externals integers booleans groupings strings");
        assert_eq!(
            t,
            vec![
                Token::Routines,
                Token::Externals,
                Token::Integers,
                Token::Booleans,
                Token::Groupings,
                Token::Strings,
            ]
        );
    }

    #[test]
    fn test_idents_and_keywords_mix() {
        let t = lex_all("define stem as stem1");
        assert_eq!(t[0], Token::Define);
        assert_eq!(t[1], Token::Ident(Symbol::intern("stem")));
        assert_eq!(t[2], Token::As);
        assert_eq!(t[3], Token::Ident(Symbol::intern("stem1")));
    }

    #[test]
    fn test_operators() {
        let t = lex_all("<- -> <+ <= >= == != < > = += -= *= /= + - * /");
        assert_eq!(
            t,
            vec![
                Token::LeftArrow,
                Token::RightArrow,
                Token::InsertArrow,
                Token::Le,
                Token::Ge,
                Token::EqEq,
                Token::Ne,
                Token::Lt,
                Token::Gt,
                Token::Assign,
                Token::PlusAssign,
                Token::MinusAssign,
                Token::StarAssign,
                Token::SlashAssign,
                Token::Plus,
                Token::Minus,
                Token::Star,
                Token::Slash,
            ]
        );
    }

    #[test]
    fn test_brackets_and_dollar() {
        let t = lex_all("( ) [ ] $x");
        assert_eq!(t[0], Token::LParen);
        assert_eq!(t[3], Token::RBracket);
        assert_eq!(t[4], Token::Dollar);
        assert_eq!(t[5], Token::Ident(Symbol::intern("x")));
    }

    #[test]
    fn test_string_literal_plain() {
        let t = lex_all("'abc'");
        assert_eq!(t, vec![Token::Str("abc".to_owned())]);
    }

    #[test]
    fn test_string_with_default_escape_delimiters() {
        // Without a stringescapes directive the defaults are { and }; an
        // empty reference stands for the literal open delimiter.
        let t = lex_all("'a{}b'");
        assert_eq!(t, vec![Token::Str("a{b".to_owned())]);
    }

    #[test]
    fn test_stringdef_hex_expansion() {
        let t = lex_all("stringescapes {} stringdef a\" hex 'E4' 'h{a\"}user'");
        assert_eq!(t, vec![Token::Str("h\u{e4}user".to_owned())]);
    }

    #[test]
    fn test_stringdef_decimal_expansion() {
        let t = lex_all("stringescapes {} stringdef umlaut decimal '228' '{umlaut}'");
        assert_eq!(t, vec![Token::Str("\u{e4}".to_owned())]);
    }

    #[test]
    fn test_stringdef_hex_multiple_values() {
        let t = lex_all("stringescapes {} stringdef duo hex 'E4 F6' '{duo}'");
        assert_eq!(t, vec![Token::Str("\u{e4}\u{f6}".to_owned())]);
    }

    #[test]
    fn test_stringdef_plain_value() {
        let t = lex_all("stringescapes {} stringdef dbl 'ss' '{dbl}'");
        assert_eq!(t, vec![Token::Str("ss".to_owned())]);
    }

    #[test]
    fn test_custom_escape_delimiters() {
        let t = lex_all("stringescapes <> stringdef o\" hex 'F6' 'k<o\">nig'");
        assert_eq!(t, vec![Token::Str("k\u{f6}nig".to_owned())]);
    }

    #[test]
    fn test_comments_are_skipped() {
        let t = lex_all("next // trailing\n/* block\ncomment */ hop 2");
        assert_eq!(t, vec![Token::Next, Token::Hop, Token::Int(2)]);
    }

    #[test]
    fn test_numbers() {
        let t = lex_all("loop 3 hop 42");
        assert_eq!(t[1], Token::Int(3));
        assert_eq!(t[3], Token::Int(42));
    }

    #[test]
    fn test_error_reports_line_and_column() {
        let err = tokenize("next\n  'abc").unwrap_err();
        let diag = err.diagnostic();
        assert_eq!(diag.line(), 2);
        assert_eq!(diag.column(), 3);
        assert!(diag.message.contains("unterminated string"));
    }

    #[test]
    fn test_undefined_escape_is_escape_error() {
        let err = tokenize("'{nope}'").unwrap_err();
        assert!(matches!(err, CompileError::Escape(_)));
        assert!(err.diagnostic().message.contains("nope"));
    }

    #[test]
    fn test_stringdef_before_stringescapes_rejected() {
        let err = tokenize("stringdef x hex 'E4'").unwrap_err();
        assert!(matches!(err, CompileError::Escape(_)));
        assert!(err
            .diagnostic()
            .message
            .contains("stringdef before stringescapes"));
    }
}
