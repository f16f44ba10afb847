//! String-escape tables.
//!
//! `stringescapes XY` nominates the two characters that bracket escape
//! references inside string literals; `stringdef name ...` binds a name to
//! replacement text. Both directives are processed by the lexer, which
//! keeps one [`EscapeTable`] per compilation unit and consults it while
//! scanning every string literal.

use rustc_hash::FxHashMap;

/// The active escape delimiters and `stringdef` bindings.
///
/// Defaults to `{` and `}` with no bindings, matching programs that use
/// escapes without an explicit `stringescapes` directive.
pub struct EscapeTable {
    /// Opening escape delimiter.
    open: char,
    /// Closing escape delimiter.
    close: char,
    /// Whether an explicit `stringescapes` directive has been seen.
    declared: bool,
    /// Bindings established by `stringdef`.
    defs: FxHashMap<String, String>,
}

impl EscapeTable {
    /// Creates a table with the default `{` / `}` delimiters.
    pub fn new() -> Self {
        Self {
            open: '{',
            close: '}',
            declared: false,
            defs: FxHashMap::default(),
        }
    }

    /// The opening delimiter.
    #[inline]
    pub fn open(&self) -> char {
        self.open
    }

    /// The closing delimiter.
    #[inline]
    pub fn close(&self) -> char {
        self.close
    }

    /// True once `stringescapes` has been processed.
    ///
    /// `stringdef` is rejected before that point.
    #[inline]
    pub fn declared(&self) -> bool {
        self.declared
    }

    /// Installs delimiters from a `stringescapes XY` directive.
    pub fn declare(&mut self, open: char, close: char) {
        self.open = open;
        self.close = close;
        self.declared = true;
    }

    /// Binds `name` to `value`, from a `stringdef` directive.
    ///
    /// Rebinding a name silently replaces the old value, matching the
    /// directive's "most recent definition wins" behavior.
    pub fn define(&mut self, name: &str, value: String) {
        self.defs.insert(name.to_owned(), value);
    }

    /// Looks up a binding.
    pub fn lookup(&self, name: &str) -> Option<&str> {
        self.defs.get(name).map(String::as_str)
    }
}

impl Default for EscapeTable {
    fn default() -> Self {
        Self::new()
    }
}
