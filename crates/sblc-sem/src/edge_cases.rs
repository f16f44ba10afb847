//! Edge case tests for sblc-sem

#[cfg(test)]
mod tests {
    use crate::analyze;
    use sblc_lex::tokenize;
    use sblc_par::Parser;
    use sblc_util::CompileError;

    fn analyze_err(source: &str) -> CompileError {
        let program = Parser::new(tokenize(source).unwrap()).parse().unwrap();
        analyze(&program).expect_err("analysis unexpectedly succeeded")
    }

    fn analyze_ok(source: &str) -> crate::Analysis {
        let program = Parser::new(tokenize(source).unwrap()).parse().unwrap();
        analyze(&program).expect("analysis failed")
    }

    // ==================== EDGE CASES ====================

    #[test]
    fn test_edge_ket_without_bra() {
        let err = analyze_err("externals ( stem ) define stem as ( ] delete )");
        assert!(err.diagnostic().message.contains("']'"));
    }

    #[test]
    fn test_edge_slice_without_marks() {
        let err = analyze_err("externals ( stem ) define stem as ( delete )");
        assert!(err.diagnostic().message.contains("delete"));
    }

    #[test]
    fn test_edge_slice_with_marks_in_only_one_branch() {
        // The or-branch without marks makes the delete illegal.
        let err = analyze_err(
            "externals ( stem ) define stem as ( (['a']) or ('b') delete )",
        );
        assert!(err.diagnostic().message.contains("delete"));
    }

    #[test]
    fn test_edge_slice_with_marks_in_both_branches() {
        analyze_ok("externals ( stem ) define stem as ( (['a']) or (['b']) delete )");
    }

    #[test]
    fn test_edge_substring_without_among() {
        let err = analyze_err("externals ( stem ) define stem as ( substring )");
        assert!(err.diagnostic().message.contains("substring"));
    }

    #[test]
    fn test_edge_two_substrings_one_among() {
        let err = analyze_err(
            "externals ( stem ) define stem as ( substring substring among ('a') )",
        );
        assert!(err.diagnostic().message.contains("substring"));
    }

    #[test]
    fn test_edge_integer_used_as_command() {
        let err = analyze_err("externals ( stem ) integers ( p1 ) define stem as ( p1 )");
        assert!(err.diagnostic().message.contains("cannot be used as a command"));
    }

    #[test]
    fn test_edge_setmark_on_boolean() {
        let err = analyze_err(
            "externals ( stem ) booleans ( b ) define stem as ( setmark b )",
        );
        assert!(err.diagnostic().message.contains("boolean"));
    }

    #[test]
    fn test_edge_set_on_integer() {
        let err = analyze_err(
            "externals ( stem ) integers ( p1 ) define stem as ( set p1 )",
        );
        assert!(err.diagnostic().message.contains("integer"));
    }

    #[test]
    fn test_edge_non_on_routine() {
        let err = analyze_err(
            "routines ( r ) externals ( stem ) define r as next define stem as ( non-r )",
        );
        assert!(err.diagnostic().message.contains("routine"));
    }

    #[test]
    fn test_edge_sizeof_requires_string() {
        let err = analyze_err(
            "externals ( stem ) integers ( p1 x ) define stem as ( $x = sizeof p1 )",
        );
        assert!(err.diagnostic().message.contains("string"));
    }

    #[test]
    fn test_edge_dollar_on_routine_name() {
        let err = analyze_err(
            "routines ( r ) externals ( stem ) define r as next define stem as ( $r = 1 )",
        );
        assert!(err.diagnostic().message.contains("routine"));
    }

    #[test]
    fn test_edge_reverse_in_backwardmode_rejected() {
        let err = analyze_err(
            "routines ( r ) externals ( stem ) \
             backwardmode ( define r as reverse 'a' ) \
             define stem as ( backwards r )",
        );
        assert!(err.diagnostic().message.contains("reverse"));
    }

    #[test]
    fn test_edge_among_duplicate_keys_across_arms() {
        let err = analyze_err(
            "externals ( stem ) define stem as ( among ( 'a' (next) 'a' ) )",
        );
        assert!(err.diagnostic().message.contains("twice"));
    }

    #[test]
    fn test_edge_among_guard_must_be_routine() {
        let err = analyze_err(
            "externals ( stem ) integers ( p1 ) \
             define stem as ( among ( 'a' p1 (next) ) )",
        );
        assert!(err.diagnostic().message.contains("integer"));
    }

    #[test]
    fn test_edge_backward_among_reverses_trie() {
        // Duplicate detection still fires for backward amongs; the table
        // order is unchanged (longest first).
        let analysis = analyze_ok(
            "externals ( stem ) \
             define stem as ( backwards ( [substring] among ( 'er' 'e' (delete) ) ) )",
        );
        let keys: Vec<&str> = analysis.amongs[0]
            .entries
            .iter()
            .map(|e| e.key.as_str())
            .collect();
        assert_eq!(keys, vec!["er", "e"]);
        assert!(analysis.amongs[0].used_backward);
        assert!(!analysis.amongs[0].used_forward);
    }

    #[test]
    fn test_edge_string_command_body_gets_fresh_marks() {
        // delete inside $s C needs its own [ ] pair, not the outer one.
        let err = analyze_err(
            "externals ( stem ) strings ( s ) \
             define stem as ( ['a'] $s ( delete ) )",
        );
        assert!(err.diagnostic().message.contains("delete"));
    }

    #[test]
    fn test_edge_grouping_in_expression_rejected() {
        let err = analyze_err(
            "externals ( stem ) groupings ( v ) integers ( x ) define v 'a' \
             define stem as ( $x = v )",
        );
        assert!(err.diagnostic().message.contains("grouping"));
    }
}
