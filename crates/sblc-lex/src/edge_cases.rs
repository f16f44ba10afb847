//! Edge case tests for sblc-lex

#[cfg(test)]
mod tests {
    use crate::{tokenize, Token};
    use sblc_util::{CompileError, Symbol};

    fn lex_all(source: &str) -> Vec<Token> {
        let mut tokens = tokenize(source).expect("lexing failed");
        assert_eq!(tokens.pop().map(|(t, _)| t), Some(Token::Eof));
        tokens.into_iter().map(|(t, _)| t).collect()
    }

    // ==================== EDGE CASES ====================

    #[test]
    fn test_edge_empty_source() {
        assert!(lex_all("").is_empty());
    }

    #[test]
    fn test_edge_only_comments() {
        assert!(lex_all("// nothing\n/* at all */").is_empty());
    }

    #[test]
    fn test_edge_bom_is_skipped() {
        let t = lex_all("\u{feff}next");
        assert_eq!(t, vec![Token::Next]);
    }

    #[test]
    fn test_edge_keywords_are_case_sensitive() {
        let t = lex_all("Next NEXT");
        assert_eq!(t[0], Token::Ident(Symbol::intern("Next")));
        assert_eq!(t[1], Token::Ident(Symbol::intern("NEXT")));
    }

    #[test]
    fn test_edge_underscore_identifiers() {
        let t = lex_all("_x a_b_1");
        assert_eq!(t[0], Token::Ident(Symbol::intern("_x")));
        assert_eq!(t[1], Token::Ident(Symbol::intern("a_b_1")));
    }

    #[test]
    fn test_edge_empty_string_literal() {
        let t = lex_all("''");
        assert_eq!(t, vec![Token::Str(String::new())]);
    }

    #[test]
    fn test_edge_adjacent_strings() {
        let t = lex_all("'a''b'");
        assert_eq!(
            t,
            vec![Token::Str("a".to_owned()), Token::Str("b".to_owned())]
        );
    }

    #[test]
    fn test_edge_unicode_in_string() {
        let t = lex_all("'\u{e4}\u{f6}\u{fc}'");
        assert_eq!(t, vec![Token::Str("\u{e4}\u{f6}\u{fc}".to_owned())]);
    }

    #[test]
    fn test_edge_unterminated_block_comment() {
        let err = tokenize("/* open").unwrap_err();
        assert!(matches!(err, CompileError::Lex(_)));
        assert!(err.diagnostic().message.contains("unterminated comment"));
    }

    #[test]
    fn test_edge_unterminated_escape_reference() {
        let err = tokenize("'{a").unwrap_err();
        assert!(err
            .diagnostic()
            .message
            .contains("unterminated string escape"));
    }

    #[test]
    fn test_edge_invalid_hex_in_stringdef() {
        let err = tokenize("stringescapes {} stringdef x hex 'GG'").unwrap_err();
        assert!(err.diagnostic().message.contains("invalid code point"));
    }

    #[test]
    fn test_edge_surrogate_code_point_rejected() {
        let err = tokenize("stringescapes {} stringdef x hex 'D800'").unwrap_err();
        assert!(err.diagnostic().message.contains("invalid code point"));
    }

    #[test]
    fn test_edge_stringescapes_same_char_rejected() {
        let err = tokenize("stringescapes {{").unwrap_err();
        assert!(err.diagnostic().message.contains("must differ"));
    }

    #[test]
    fn test_edge_int_overflow() {
        let err = tokenize("hop 99999999999").unwrap_err();
        assert!(err.diagnostic().message.contains("too large"));
    }

    #[test]
    fn test_edge_bare_bang_rejected() {
        let err = tokenize("!").unwrap_err();
        assert!(err.diagnostic().message.contains("'!'"));
    }

    #[test]
    fn test_edge_unknown_character() {
        let err = tokenize("§").unwrap_err();
        assert!(err.diagnostic().message.contains("unexpected character"));
    }

    #[test]
    fn test_edge_redefined_stringdef_uses_latest() {
        let t = lex_all("stringescapes {} stringdef s 'a' stringdef s 'b' '{s}'");
        assert_eq!(t, vec![Token::Str("b".to_owned())]);
    }

    #[test]
    fn test_edge_stringescapes_can_be_redeclared() {
        let t = lex_all("stringescapes {} stringescapes <> 'x<>y'");
        // After the second directive, < opens an escape; empty name means
        // the literal open delimiter.
        assert_eq!(t, vec![Token::Str("x<y".to_owned())]);
    }

    #[test]
    fn test_edge_spanned_directive_characters() {
        let t = lex_all("stringescapes { } '{}'");
        assert_eq!(t, vec![Token::Str("{".to_owned())]);
    }
}
