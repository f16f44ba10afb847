//! Among compilation.
//!
//! The arms of an `among` are flattened to a key table and compiled
//! through a trie: inserting every key detects duplicates (two identical
//! keys can never both match, so they are rejected), and in backward
//! mode the keys go in reversed because matching proceeds right-to-left.
//!
//! Dispatch order is what the emitted table encodes: the longest key
//! first, declaration order breaking ties, with the empty key (the
//! default arm) naturally last. The emitted runtime walks the table in
//! order and takes the first key that matches at the cursor, which is
//! exactly the longest-match rule.

use rustc_hash::FxHashMap;
use sblc_par::{AmongCmd, Cmd, CmdKind, Decl, Program};
use sblc_util::{CompileError, Symbol};

use crate::modes::AmongUse;

/// A compiled among: its dispatch table plus the directions it runs in.
#[derive(Clone, Debug)]
pub struct AmongInfo {
    /// Entries in dispatch order (longest key first).
    pub entries: Vec<AmongEntry>,
    /// Number of arms (actions are referenced by 1-based arm number).
    pub arm_count: usize,
    /// Reached in forward direction.
    pub used_forward: bool,
    /// Reached in backward direction.
    pub used_backward: bool,
}

/// One key of a compiled among.
#[derive(Clone, Debug)]
pub struct AmongEntry {
    pub key: String,
    /// 0-based arm index; the emitted result value is `arm + 1`.
    pub arm: usize,
    /// Optional guard routine attempted after the key matches.
    pub routine: Option<Symbol>,
}

/// A character trie over among keys.
///
/// `insert` reports whether the key was new; revisiting a terminal node
/// means a duplicate key.
struct Trie {
    reverse: bool,
    root: TrieNode,
}

#[derive(Default)]
struct TrieNode {
    children: FxHashMap<char, TrieNode>,
    terminal: bool,
}

impl Trie {
    fn new(reverse: bool) -> Self {
        Self {
            reverse,
            root: TrieNode::default(),
        }
    }

    fn insert(&mut self, key: &str) -> bool {
        let mut node = &mut self.root;
        let chars: Vec<char> = if self.reverse {
            key.chars().rev().collect()
        } else {
            key.chars().collect()
        };
        for c in chars {
            node = node.children.entry(c).or_default();
        }
        if node.terminal {
            return false;
        }
        node.terminal = true;
        true
    }
}

/// Compiles every among in the program, in id order.
pub fn compile_amongs(
    program: &Program,
    among_uses: &[AmongUse],
) -> Result<Vec<AmongInfo>, CompileError> {
    let mut found: Vec<Option<AmongInfo>> = vec![None; program.among_count];
    for decl in &program.decls {
        let Decl::RoutineDef(def) = decl else {
            continue;
        };
        collect(&def.body, among_uses, &mut found)?;
    }
    Ok(found
        .into_iter()
        .map(|info| info.expect("all among ids are assigned by the parser"))
        .collect())
}

fn collect(
    cmd: &Cmd,
    among_uses: &[AmongUse],
    found: &mut Vec<Option<AmongInfo>>,
) -> Result<(), CompileError> {
    match &cmd.kind {
        CmdKind::Among(among) => {
            found[among.id] = Some(compile_one(among, among_uses[among.id])?);
            for arm in &among.arms {
                if let Some(action) = &arm.action {
                    collect(action, among_uses, found)?;
                }
            }
            Ok(())
        }
        CmdKind::Seq(parts) | CmdKind::Or(parts) | CmdKind::And(parts) => {
            for part in parts {
                collect(part, among_uses, found)?;
            }
            Ok(())
        }
        CmdKind::Not(inner)
        | CmdKind::Test(inner)
        | CmdKind::Try(inner)
        | CmdKind::Do(inner)
        | CmdKind::Fail(inner)
        | CmdKind::Repeat(inner)
        | CmdKind::Goto(inner)
        | CmdKind::Gopast(inner)
        | CmdKind::Backwards(inner)
        | CmdKind::Reverse(inner)
        | CmdKind::Loop(_, inner)
        | CmdKind::Atleast(_, inner)
        | CmdKind::StrCmd { body: inner, .. } => collect(inner, among_uses, found),
        CmdKind::SetLimit(bound, inner) => {
            collect(bound, among_uses, found)?;
            collect(inner, among_uses, found)
        }
        _ => Ok(()),
    }
}

fn compile_one(among: &AmongCmd, uses: AmongUse) -> Result<AmongInfo, CompileError> {
    // Duplicate detection goes through the trie; reversed keys when the
    // among runs backward (an unreached among defaults to forward).
    let mut trie = Trie::new(uses.backward && !uses.forward);
    let mut entries = Vec::new();
    for (arm_index, arm) in among.arms.iter().enumerate() {
        for key in &arm.keys {
            if !trie.insert(&key.text) {
                return Err(CompileError::name(
                    format!("among contains '{}' twice", key.text),
                    key.span,
                ));
            }
            entries.push(AmongEntry {
                key: key.text.clone(),
                arm: arm_index,
                routine: key.routine.map(|(sym, _)| sym),
            });
        }
    }

    // Longest key first; source order breaks ties. The sort is stable, so
    // equal-length keys keep their declaration order and the empty key
    // (length 0) lands at the very end.
    entries.sort_by_key(|entry| std::cmp::Reverse(entry.key.chars().count()));

    Ok(AmongInfo {
        entries,
        arm_count: among.arms.len(),
        used_forward: uses.forward || !uses.backward,
        used_backward: uses.backward,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use sblc_lex::tokenize;
    use sblc_par::Parser;

    fn compile_str(source: &str) -> Result<Vec<AmongInfo>, CompileError> {
        let program = Parser::new(tokenize(source).unwrap()).parse().unwrap();
        let uses = vec![AmongUse::default(); program.among_count];
        compile_amongs(&program, &uses)
    }

    #[test]
    fn test_longest_key_first() {
        let amongs =
            compile_str("define r as among ( 'e' 'ern' 'er' (delete) )").unwrap();
        let keys: Vec<&str> = amongs[0].entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["ern", "er", "e"]);
    }

    #[test]
    fn test_equal_length_keys_keep_source_order() {
        let amongs = compile_str("define r as among ( 'ab' (next) 'ba' 'cd' (delete) )").unwrap();
        let keys: Vec<&str> = amongs[0].entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["ab", "ba", "cd"]);
    }

    #[test]
    fn test_empty_key_sorts_last() {
        let amongs = compile_str("define r as among ( '' (next) 'a' (delete) )").unwrap();
        let keys: Vec<&str> = amongs[0].entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["a", ""]);
    }

    #[test]
    fn test_arm_indices_follow_declaration() {
        let amongs =
            compile_str("define r as among ( 'em' 'ern' (delete) 'e' (next) 's' )").unwrap();
        let among = &amongs[0];
        assert_eq!(among.arm_count, 3);
        let arm_of = |key: &str| {
            among
                .entries
                .iter()
                .find(|e| e.key == key)
                .map(|e| e.arm)
                .unwrap()
        };
        assert_eq!(arm_of("em"), 0);
        assert_eq!(arm_of("ern"), 0);
        assert_eq!(arm_of("e"), 1);
        assert_eq!(arm_of("s"), 2);
    }

    #[test]
    fn test_duplicate_key_rejected() {
        let err = compile_str("define r as among ( 'er' (next) 'er' (delete) )").unwrap_err();
        assert!(err.diagnostic().message.contains("'er' twice"));
    }

    #[test]
    fn test_key_guards_survive_compilation() {
        let amongs = compile_str("define r as among ( 'and' r1 (next) )").unwrap();
        assert_eq!(amongs[0].entries[0].routine.unwrap().as_str(), "r1");
    }

    #[test]
    fn test_multibyte_keys_measure_characters() {
        // '\u{e4}\u{f6}' is two characters but four bytes; it must not
        // outrank a three-character ASCII key.
        let amongs = compile_str("define r as among ( '\u{e4}\u{f6}' (next) 'abc' (delete) )")
            .unwrap();
        let keys: Vec<&str> = amongs[0].entries.iter().map(|e| e.key.as_str()).collect();
        assert_eq!(keys, vec!["abc", "\u{e4}\u{f6}"]);
    }
}
