//! Interned identifiers.
//!
//! Snowball programs reuse the same handful of names (routines, integer
//! slots, groupings) throughout; interning turns them into small copyable
//! handles that compare and hash in O(1). The interner is thread-local
//! because compilation is single-threaded by design.

use std::cell::RefCell;
use std::fmt;

use rustc_hash::FxHashMap;

/// An interned string.
///
/// Two symbols are equal iff the underlying strings are equal. Interned
/// text lives for the duration of the process.
///
/// # Examples
///
/// ```
/// use sblc_util::Symbol;
///
/// let a = Symbol::intern("stem");
/// let b = Symbol::intern("stem");
/// assert_eq!(a, b);
/// assert_eq!(a.as_str(), "stem");
/// ```
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Symbol(u32);

struct Interner {
    names: FxHashMap<&'static str, Symbol>,
    strings: Vec<&'static str>,
}

impl Interner {
    fn new() -> Self {
        Self {
            names: FxHashMap::default(),
            strings: Vec::new(),
        }
    }

    fn intern(&mut self, string: &str) -> Symbol {
        if let Some(&sym) = self.names.get(string) {
            return sym;
        }
        // Interned names live as long as the process; the handful of
        // identifiers in a Snowball program makes the leak bounded.
        let leaked: &'static str = Box::leak(string.to_owned().into_boxed_str());
        let sym = Symbol(self.strings.len() as u32);
        self.strings.push(leaked);
        self.names.insert(leaked, sym);
        sym
    }

    fn get(&self, sym: Symbol) -> &'static str {
        self.strings[sym.0 as usize]
    }
}

thread_local! {
    static INTERNER: RefCell<Interner> = RefCell::new(Interner::new());
}

impl Symbol {
    /// Interns a string, returning its symbol.
    pub fn intern(string: &str) -> Symbol {
        INTERNER.with(|i| i.borrow_mut().intern(string))
    }

    /// Returns the interned string.
    pub fn as_str(self) -> &'static str {
        INTERNER.with(|i| i.borrow().get(self))
    }
}

impl fmt::Debug for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Symbol({:?})", self.as_str())
    }
}

impl fmt::Display for Symbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
