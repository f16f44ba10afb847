//! Token definitions for the Snowball language.

use sblc_util::Symbol;

/// A lexical unit of a Snowball program.
///
/// Reserved words each get their own variant; `stringescapes` and
/// `stringdef` do not appear here because the lexer consumes those
/// directives itself.
#[derive(Clone, Debug, PartialEq)]
pub enum Token {
    // =========================================================================
    // HEADER KEYWORDS
    // =========================================================================
    /// "strings" - string variable declarations
    Strings,
    /// "integers" - integer slot declarations
    Integers,
    /// "booleans" - boolean slot declarations
    Booleans,
    /// "routines" - internal routine declarations
    Routines,
    /// "externals" - exported routine declarations
    Externals,
    /// "groupings" - character set declarations
    Groupings,
    /// "define" - routine or grouping definition
    Define,
    /// "as" - separates a routine name from its body
    As,
    /// "backwardmode" - wraps definitions that run right-to-left
    BackwardMode,
    /// "hex" - hexadecimal stringdef body marker (reserved)
    Hex,
    /// "decimal" - decimal stringdef body marker (reserved)
    Decimal,

    // =========================================================================
    // COMMAND KEYWORDS
    // =========================================================================
    /// "among" - longest-match multi-way dispatch
    Among,
    /// "substring" - the matching half of a split among
    Substring,
    /// "backwards" - run a command in backward direction
    Backwards,
    /// "reverse" - flip matching direction for a command
    Reverse,
    /// "and" - both commands from the same position
    And,
    /// "or" - first succeeding alternative
    Or,
    /// "not" - succeed iff the command fails
    Not,
    /// "test" - lookahead; cursor restored on success
    Test,
    /// "try" - optional command
    Try,
    /// "do" - run and discard outcome, cursor restored
    Do,
    /// "fail" - run, then fail unconditionally
    Fail,
    /// "goto" - scan until the command matches, stop before it
    Goto,
    /// "gopast" - scan until the command matches, stop past it
    Gopast,
    /// "repeat" - zero or more committed repetitions
    Repeat,
    /// "loop" - exactly N repetitions
    Loop,
    /// "atleast" - N repetitions, then repeat
    Atleast,
    /// "hop" - move the cursor by N characters
    Hop,
    /// "next" - move the cursor by one character
    Next,
    /// "setmark" - store the cursor in an integer slot
    SetMark,
    /// "tomark" - move the cursor to a stored position
    ToMark,
    /// "atmark" - test the cursor against a stored position
    AtMark,
    /// "tolimit" - move the cursor to the limit
    ToLimit,
    /// "atlimit" - test the cursor against the limit
    AtLimit,
    /// "setlimit" - narrow the limit for a nested command
    SetLimit,
    /// "for" - separates the two halves of setlimit
    For,
    /// "insert" - insert text, cursor moves past it
    Insert,
    /// "attach" - insert text, cursor stays on the entry side
    Attach,
    /// "delete" - delete the current slice
    Delete,
    /// "slice" - reserved
    Slice,
    /// "from" - reserved
    From,
    /// "to" - reserved
    To,
    /// "set" - set a boolean slot
    Set,
    /// "unset" - clear a boolean slot
    Unset,
    /// "non" - match a character outside a grouping
    Non,
    /// "true" - always succeed
    True,
    /// "false" - always fail
    False,

    // =========================================================================
    // EXPRESSION KEYWORDS
    // =========================================================================
    /// "maxint" - largest representable integer
    MaxInt,
    /// "minint" - smallest representable integer
    MinInt,
    /// "cursor" - current cursor position
    Cursor,
    /// "limit" - current forward limit
    Limit,
    /// "size" - length of the current string
    Size,
    /// "sizeof" - length of a string variable
    SizeOf,
    /// "len" - length of the current string (alias of size)
    Len,
    /// "lenof" - length of a string variable (alias of sizeof)
    LenOf,

    // =========================================================================
    // ATOMS
    // =========================================================================
    /// Identifier (routine, grouping, integer, boolean, or string name).
    Ident(Symbol),

    /// Integer literal.
    Int(i32),

    /// String literal, with escape references already expanded.
    Str(String),

    // =========================================================================
    // PUNCTUATION
    // =========================================================================
    /// "("
    LParen,
    /// ")"
    RParen,
    /// "[" - mark the left end of the slice
    LBracket,
    /// "]" - mark the right end of the slice
    RBracket,
    /// "$" - integer or string command prefix
    Dollar,
    /// "=" - assignment
    Assign,
    /// "+=" - add and assign
    PlusAssign,
    /// "-=" - subtract and assign
    MinusAssign,
    /// "*=" - multiply and assign
    StarAssign,
    /// "/=" - divide and assign
    SlashAssign,
    /// "==" - equality test
    EqEq,
    /// "!=" - inequality test
    Ne,
    /// "<" - less than
    Lt,
    /// ">" - greater than
    Gt,
    /// "<=" - less than or equal
    Le,
    /// ">=" - greater than or equal
    Ge,
    /// "+" - addition or grouping union
    Plus,
    /// "-" - subtraction, negation, or grouping difference
    Minus,
    /// "*" - multiplication
    Star,
    /// "/" - division
    Slash,
    /// "<-" - replace the current slice
    LeftArrow,
    /// "->" - copy the current slice to a string variable
    RightArrow,
    /// "<+" - insert (alias)
    InsertArrow,

    /// End of input.
    Eof,
}

/// Maps an identifier's text to its keyword token, if reserved.
///
/// # Example
///
/// ```
/// use sblc_lex::token::{keyword_from_ident, Token};
///
/// assert_eq!(keyword_from_ident("among"), Some(Token::Among));
/// assert_eq!(keyword_from_ident("stem"), None);
/// ```
pub fn keyword_from_ident(text: &str) -> Option<Token> {
    let token = match text {
        "strings" => Token::Strings,
        "integers" => Token::Integers,
        "booleans" => Token::Booleans,
        "routines" => Token::Routines,
        "externals" => Token::Externals,
        "groupings" => Token::Groupings,
        "define" => Token::Define,
        "as" => Token::As,
        "backwardmode" => Token::BackwardMode,
        "hex" => Token::Hex,
        "decimal" => Token::Decimal,
        "among" => Token::Among,
        "substring" => Token::Substring,
        "backwards" => Token::Backwards,
        "reverse" => Token::Reverse,
        "and" => Token::And,
        "or" => Token::Or,
        "not" => Token::Not,
        "test" => Token::Test,
        "try" => Token::Try,
        "do" => Token::Do,
        "fail" => Token::Fail,
        "goto" => Token::Goto,
        "gopast" => Token::Gopast,
        "repeat" => Token::Repeat,
        "loop" => Token::Loop,
        "atleast" => Token::Atleast,
        "hop" => Token::Hop,
        "next" => Token::Next,
        "setmark" => Token::SetMark,
        "tomark" => Token::ToMark,
        "atmark" => Token::AtMark,
        "tolimit" => Token::ToLimit,
        "atlimit" => Token::AtLimit,
        "setlimit" => Token::SetLimit,
        "for" => Token::For,
        "insert" => Token::Insert,
        "attach" => Token::Attach,
        "delete" => Token::Delete,
        "slice" => Token::Slice,
        "from" => Token::From,
        "to" => Token::To,
        "set" => Token::Set,
        "unset" => Token::Unset,
        "non" => Token::Non,
        "true" => Token::True,
        "false" => Token::False,
        "maxint" => Token::MaxInt,
        "minint" => Token::MinInt,
        "cursor" => Token::Cursor,
        "limit" => Token::Limit,
        "size" => Token::Size,
        "sizeof" => Token::SizeOf,
        "len" => Token::Len,
        "lenof" => Token::LenOf,
        _ => return None,
    };
    Some(token)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reserved_word_set_is_complete() {
        // The language's reserved words; stringescapes and stringdef are
        // lexer directives and never surface as tokens.
        for word in [
            "among", "repeat", "goto", "gopast", "next", "hop", "setmark", "tomark", "atmark",
            "backwards", "backwardmode", "do", "try", "test", "not", "or", "and", "fail", "loop",
            "atleast", "true", "false", "maxint", "minint", "cursor", "limit", "size", "sizeof",
            "insert", "attach", "delete", "slice", "from", "to", "define", "as", "integers",
            "booleans", "routines", "externals", "groupings", "strings", "substring", "hex",
            "decimal",
        ] {
            assert!(keyword_from_ident(word).is_some(), "{} not reserved", word);
        }
    }

    #[test]
    fn test_ordinary_names_are_not_keywords() {
        assert_eq!(keyword_from_ident("stem"), None);
        assert_eq!(keyword_from_ident("p1"), None);
        assert_eq!(keyword_from_ident("Among"), None); // case-sensitive
    }
}
