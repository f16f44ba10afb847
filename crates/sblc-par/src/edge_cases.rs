//! Edge case tests for sblc-par

#[cfg(test)]
mod tests {
    use crate::{CmdKind, Decl, Parser, Program};
    use sblc_lex::tokenize;
    use sblc_util::CompileError;

    fn parse_str(source: &str) -> Program {
        Parser::new(tokenize(source).unwrap())
            .parse()
            .expect("parse failed")
    }

    fn parse_err(source: &str) -> CompileError {
        Parser::new(tokenize(source).unwrap())
            .parse()
            .expect_err("parse unexpectedly succeeded")
    }

    // ==================== EDGE CASES ====================

    #[test]
    fn test_edge_empty_program() {
        let program = parse_str("");
        assert!(program.decls.is_empty());
    }

    #[test]
    fn test_edge_empty_name_list() {
        let program = parse_str("routines ( )");
        match &program.decls[0] {
            Decl::Names { names, .. } => assert!(names.is_empty()),
            other => panic!("unexpected decl {:?}", other),
        }
    }

    #[test]
    fn test_edge_unclosed_name_list() {
        let err = parse_err("routines ( a b");
        assert!(err.diagnostic().message.contains("')'"));
    }

    #[test]
    fn test_edge_unclosed_backwardmode() {
        let err = parse_err("backwardmode ( define r as next");
        assert!(err.diagnostic().message.contains("backwardmode"));
    }

    #[test]
    fn test_edge_keyword_as_name_rejected() {
        let err = parse_err("routines ( among )");
        assert!(err.diagnostic().message.contains("'among'"));
    }

    #[test]
    fn test_edge_deeply_nested_parens() {
        let program = parse_str("define r as ((((( next )))))");
        match &program.decls[0] {
            Decl::RoutineDef(def) => assert!(matches!(def.body.kind, CmdKind::Next)),
            other => panic!("unexpected decl {:?}", other),
        }
    }

    #[test]
    fn test_edge_among_without_keys_rejected() {
        let err = parse_err("define r as among ( )");
        assert!(err.diagnostic().message.contains("among"));
    }

    #[test]
    fn test_edge_among_action_without_keys_rejected() {
        let err = parse_err("define r as among ( (delete) )");
        assert!(err.diagnostic().message.contains("string"));
    }

    #[test]
    fn test_edge_setlimit_missing_for() {
        let err = parse_err("define r as setlimit next next");
        assert!(err.diagnostic().message.contains("for"));
    }

    #[test]
    fn test_edge_dollar_without_name() {
        let err = parse_err("define r as $ = 1");
        assert!(err.diagnostic().message.contains("'$'"));
    }

    #[test]
    fn test_edge_grouping_def_with_trailing_operator() {
        let err = parse_err("define v 'aeiou' +");
        assert!(err.diagnostic().message.contains("string or grouping name"));
    }

    #[test]
    fn test_edge_stray_token_at_top_level() {
        let err = parse_err("next");
        assert!(err.diagnostic().message.contains("declaration"));
    }

    #[test]
    fn test_edge_empty_among_default_key() {
        // An empty key is legal; it acts as the default arm.
        let program = parse_str("define r as among ( 'a' (next) '' (delete) )");
        match &program.decls[0] {
            Decl::RoutineDef(def) => match &def.body.kind {
                CmdKind::Among(among) => {
                    assert_eq!(among.arms.len(), 2);
                    assert_eq!(among.arms[1].keys[0].text, "");
                }
                other => panic!("expected among, got {:?}", other),
            },
            other => panic!("unexpected decl {:?}", other),
        }
    }

    #[test]
    fn test_edge_multiple_header_sections_same_kind() {
        // Two routines sections parse; the analyzer decides if that is
        // sensible.
        let program = parse_str("routines ( a ) routines ( b )");
        assert_eq!(program.decls.len(), 2);
    }
}
