//! The symbol table.
//!
//! One table spans every header section: `routines`, `externals`,
//! `integers`, `booleans`, `strings`, and `groupings` all declare into
//! the same namespace, and a name may be declared exactly once.
//! Declaration order is preserved (the emitted execution-state
//! constructor initializes slots in that order).

use indexmap::IndexMap;
use sblc_par::{Decl, DeclKind, Program};
use sblc_util::{CompileError, Span, Symbol};

/// What a declared name refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymKind {
    /// A routine (internal or external).
    Routine,
    /// A named character set.
    Grouping,
    /// An integer slot.
    Integer,
    /// A boolean slot.
    Boolean,
    /// A string variable.
    StringVar,
}

impl SymKind {
    /// Human-readable kind for diagnostics, with its article.
    pub fn describe(self) -> &'static str {
        match self {
            SymKind::Routine => "a routine",
            SymKind::Grouping => "a grouping",
            SymKind::Integer => "an integer",
            SymKind::Boolean => "a boolean",
            SymKind::StringVar => "a string",
        }
    }
}

/// Everything known about a declared name.
#[derive(Clone, Copy, Debug)]
pub struct SymbolInfo {
    pub kind: SymKind,
    /// Where the name was declared.
    pub span: Span,
    /// True for routines declared in an `externals` section.
    pub external: bool,
}

/// The program-wide symbol table.
#[derive(Debug)]
pub struct SymbolTable {
    entries: IndexMap<Symbol, SymbolInfo>,
}

impl SymbolTable {
    /// Builds the table from every header section of `program`.
    ///
    /// Duplicate declarations are rejected, including a name declared in
    /// two different sections.
    pub fn build(program: &Program) -> Result<Self, CompileError> {
        let mut table = Self {
            entries: IndexMap::new(),
        };
        for decl in &program.decls {
            let Decl::Names { kind, names } = decl else {
                continue;
            };
            let (sym_kind, external) = match kind {
                DeclKind::Routines => (SymKind::Routine, false),
                DeclKind::Externals => (SymKind::Routine, true),
                DeclKind::Integers => (SymKind::Integer, false),
                DeclKind::Booleans => (SymKind::Boolean, false),
                DeclKind::Strings => (SymKind::StringVar, false),
                DeclKind::Groupings => (SymKind::Grouping, false),
            };
            for &(name, span) in names {
                table.insert(name, SymbolInfo {
                    kind: sym_kind,
                    span,
                    external,
                })?;
            }
        }
        Ok(table)
    }

    fn insert(&mut self, name: Symbol, info: SymbolInfo) -> Result<(), CompileError> {
        if self.entries.contains_key(&name) {
            return Err(CompileError::name(
                format!("duplicate declaration of '{}'", name),
                info.span,
            ));
        }
        self.entries.insert(name, info);
        Ok(())
    }

    /// Looks up a declared name.
    pub fn get(&self, name: Symbol) -> Option<&SymbolInfo> {
        self.entries.get(&name)
    }

    /// Looks up a name, failing with a NameError when undeclared.
    pub fn resolve(&self, name: Symbol, span: Span) -> Result<&SymbolInfo, CompileError> {
        self.get(name)
            .ok_or_else(|| CompileError::name(format!("undeclared name '{}'", name), span))
    }

    /// Looks up a name and requires a specific kind.
    pub fn resolve_kind(
        &self,
        name: Symbol,
        span: Span,
        kind: SymKind,
    ) -> Result<&SymbolInfo, CompileError> {
        let info = self.resolve(name, span)?;
        if info.kind != kind {
            return Err(CompileError::name(
                format!(
                    "'{}' is {}, but {} is required here",
                    name,
                    info.kind.describe(),
                    kind.describe()
                ),
                span,
            ));
        }
        Ok(info)
    }

    /// All declared names of a given kind, in declaration order.
    pub fn names_of_kind(&self, kind: SymKind) -> Vec<Symbol> {
        self.entries
            .iter()
            .filter(|(_, info)| info.kind == kind)
            .map(|(&name, _)| name)
            .collect()
    }

    /// Iterates over all entries in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &SymbolInfo)> {
        self.entries.iter().map(|(&name, info)| (name, info))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sblc_lex::tokenize;
    use sblc_par::Parser;

    fn build(source: &str) -> Result<SymbolTable, CompileError> {
        let program = Parser::new(tokenize(source).unwrap()).parse().unwrap();
        SymbolTable::build(&program)
    }

    #[test]
    fn test_sections_populate_kinds() {
        let table = build(
            "routines ( r1 ) externals ( stem ) integers ( p1 ) \
             booleans ( found ) strings ( tmp ) groupings ( v )",
        )
        .unwrap();
        let kind = |name: &str| table.get(Symbol::intern(name)).unwrap().kind;
        assert_eq!(kind("r1"), SymKind::Routine);
        assert_eq!(kind("stem"), SymKind::Routine);
        assert_eq!(kind("p1"), SymKind::Integer);
        assert_eq!(kind("found"), SymKind::Boolean);
        assert_eq!(kind("tmp"), SymKind::StringVar);
        assert_eq!(kind("v"), SymKind::Grouping);
    }

    #[test]
    fn test_externals_are_flagged() {
        let table = build("routines ( helper ) externals ( stem )").unwrap();
        assert!(table.get(Symbol::intern("stem")).unwrap().external);
        assert!(!table.get(Symbol::intern("helper")).unwrap().external);
    }

    #[test]
    fn test_duplicate_within_section_rejected() {
        let err = build("integers ( p1 p1 )").unwrap_err();
        assert!(err.diagnostic().message.contains("duplicate"));
    }

    #[test]
    fn test_duplicate_across_sections_rejected() {
        let err = build("routines ( x ) integers ( x )").unwrap_err();
        assert!(err.diagnostic().message.contains("duplicate"));
    }

    #[test]
    fn test_resolve_kind_mismatch() {
        let table = build("integers ( p1 )").unwrap();
        let err = table
            .resolve_kind(Symbol::intern("p1"), sblc_util::Span::DUMMY, SymKind::Routine)
            .unwrap_err();
        assert!(err.diagnostic().message.contains("integer"));
    }

    #[test]
    fn test_declaration_order_preserved() {
        let table = build("integers ( p2 p1 x )").unwrap();
        let names: Vec<&str> = table
            .names_of_kind(SymKind::Integer)
            .into_iter()
            .map(|s| s.as_str())
            .collect();
        assert_eq!(names, vec!["p2", "p1", "x"]);
    }
}
