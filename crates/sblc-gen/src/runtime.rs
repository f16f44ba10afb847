//! The emitted runtime support.
//!
//! Every generated module starts with this preamble: the execution-state
//! class with the primitive operations of the abstract machine. Each
//! primitive has a forward and a backward form (`eq_s` / `eq_s_b`, ...);
//! buffer edits go through `replace`, which keeps `cursor` and `limit`
//! consistent across length changes.
//!
//! Backtracking is snapshot-based: `snapshot()` captures
//! `(cursor, limit, limit_backward, bra, ket, chars)` and `restore()`
//! reinstates it, so a failing branch rolls back buffer edits along with
//! the cursor state.

/// Python source of the execution-state class.
pub const PRELUDE: &str = r#"class _Env(object):
    """Execution state for one stemming call."""

    def __init__(self, value):
        self.chars = list(value)
        self.cursor = 0
        self.limit = len(self.chars)
        self.limit_backward = 0
        self.bra = 0
        self.ket = 0

    def snapshot(self):
        return (self.cursor, self.limit, self.limit_backward, self.bra,
            self.ket, list(self.chars))

    def restore(self, state):
        self.cursor = state[0]
        self.limit = state[1]
        self.limit_backward = state[2]
        self.bra = state[3]
        self.ket = state[4]
        self.chars = list(state[5])

    def eq_s(self, s):
        n = len(s)
        if self.limit - self.cursor < n:
            return False
        if self.chars[self.cursor:self.cursor + n] != list(s):
            return False
        self.cursor += n
        return True

    def eq_s_b(self, s):
        n = len(s)
        if self.cursor - self.limit_backward < n:
            return False
        if self.chars[self.cursor - n:self.cursor] != list(s):
            return False
        self.cursor -= n
        return True

    def in_grouping(self, g):
        if self.cursor >= self.limit:
            return False
        if self.chars[self.cursor] not in g:
            return False
        self.cursor += 1
        return True

    def in_grouping_b(self, g):
        if self.cursor <= self.limit_backward:
            return False
        if self.chars[self.cursor - 1] not in g:
            return False
        self.cursor -= 1
        return True

    def out_grouping(self, g):
        if self.cursor >= self.limit:
            return False
        if self.chars[self.cursor] in g:
            return False
        self.cursor += 1
        return True

    def out_grouping_b(self, g):
        if self.cursor <= self.limit_backward:
            return False
        if self.chars[self.cursor - 1] in g:
            return False
        self.cursor -= 1
        return True

    def hop(self, n):
        if n < 0:
            return False
        c = self.cursor + n
        if c > self.limit:
            return False
        self.cursor = c
        return True

    def hop_b(self, n):
        if n < 0:
            return False
        c = self.cursor - n
        if c < self.limit_backward:
            return False
        self.cursor = c
        return True

    def to_mark(self, mark):
        if self.cursor > mark or mark > self.limit:
            return False
        self.cursor = mark
        return True

    def to_mark_b(self, mark):
        if self.cursor < mark or mark < self.limit_backward:
            return False
        self.cursor = mark
        return True

    def replace(self, start, end, s):
        adjustment = len(s) - (end - start)
        self.chars[start:end] = list(s)
        self.limit += adjustment
        if self.cursor >= end:
            self.cursor += adjustment
        elif self.cursor > start:
            self.cursor = start
        return adjustment

    def slice_from(self, s):
        self.ket += self.replace(self.bra, self.ket, s)

    def slice_to(self):
        return self.chars[self.bra:self.ket]

    def insert(self, s):
        c = self.cursor
        adjustment = self.replace(c, c, s)
        if c <= self.bra:
            self.bra += adjustment
        if c <= self.ket:
            self.ket += adjustment

    def insert_b(self, s):
        c = self.cursor
        self.insert(s)
        self.cursor = c

    def attach(self, s):
        c = self.cursor
        self.insert(s)
        self.cursor = c

    def attach_b(self, s):
        self.insert(s)

    def find_among(self, table):
        c = self.cursor
        for key, result, fn in table:
            n = len(key)
            if self.limit - c < n:
                continue
            if self.chars[c:c + n] != list(key):
                continue
            if fn is not None:
                self.cursor = c + n
                saved = self.snapshot()
                ok = fn(self)
                self.restore(saved)
                if not ok:
                    self.cursor = c
                    continue
            self.cursor = c + n
            return result
        self.cursor = c
        return 0

    def find_among_b(self, table):
        c = self.cursor
        for key, result, fn in table:
            n = len(key)
            if c - self.limit_backward < n:
                continue
            if self.chars[c - n:c] != list(key):
                continue
            if fn is not None:
                self.cursor = c - n
                saved = self.snapshot()
                ok = fn(self)
                self.restore(saved)
                if not ok:
                    self.cursor = c
                    continue
            self.cursor = c - n
            return result
        self.cursor = c
        return 0
"#;
