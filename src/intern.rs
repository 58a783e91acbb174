use ahash::RandomState;
use hashbrown::HashMap;
use std::hash::Hash;
use std::ops::Index;

/// A token represented as an interned integer.
///
/// A token represents the smallest possible unit of comparison during a
/// diff: for the line-diff engines this is a line's comparison key, for the
/// word-diff engine it's a word or character. All three
/// line-diff engines and the word-diff engine operate on interned tokens
/// instead of the key data directly, amortizing the cost of hashing and
/// equality across the many candidate comparisons an O(ND) or LCS search
/// performs.
#[derive(PartialEq, Eq, Hash, Clone, Copy, Debug)]
#[repr(transparent)]
pub struct Token(pub u32);

/// Two token sequences, `before` and `after`, interned against a shared
/// [`Interner`] so that identical keys on either side map to the same
/// `Token`.
#[derive(Default)]
pub struct InternedInput<T: Eq + Hash> {
    pub before: Vec<Token>,
    pub after: Vec<Token>,
    pub interner: Interner<T>,
}

impl<T: Eq + Hash + Clone> InternedInput<T> {
    /// Interns two already-tokenized sequences.
    pub fn new(before: impl Iterator<Item = T>, after: impl Iterator<Item = T>) -> Self {
        let (before_hint, _) = before.size_hint();
        let (after_hint, _) = after.size_hint();
        let mut interner = Interner::with_capacity(before_hint + after_hint);
        let before = before.map(|t| interner.intern(t)).collect();
        let after = after.map(|t| interner.intern(t)).collect();
        InternedInput {
            before,
            after,
            interner,
        }
    }
}

/// A hashtable-based interner (`ahash` for hashing, `hashbrown` for the
/// table), using the safe `hashbrown::HashMap` wrapper rather than a raw
/// table — the extra indirection is negligible next to the cost of the
/// diff algorithms themselves, and it keeps this module free of `unsafe`.
#[derive(Default)]
pub struct Interner<T: Hash + Eq> {
    tokens: Vec<T>,
    ids: HashMap<T, Token, RandomState>,
}

impl<T: Hash + Eq + Clone> Interner<T> {
    /// Creates an interner with capacity for roughly `hint` distinct
    /// values.
    pub fn with_capacity(hint: usize) -> Self {
        Interner {
            tokens: Vec::with_capacity(hint),
            ids: HashMap::with_capacity_and_hasher(hint, RandomState::new()),
        }
    }

    pub fn clear(&mut self) {
        self.tokens.clear();
        self.ids.clear();
    }

    /// Interns `value`, returning its token. Interning an equal value twice
    /// returns the same token.
    pub fn intern(&mut self, value: T) -> Token {
        if let Some(&token) = self.ids.get(&value) {
            return token;
        }
        let token = Token(self.tokens.len() as u32);
        self.tokens.push(value.clone());
        self.ids.insert(value, token);
        token
    }

    pub fn num_tokens(&self) -> u32 {
        self.tokens.len() as u32
    }
}

impl<T: Hash + Eq> Index<Token> for Interner<T> {
    type Output = T;
    fn index(&self, index: Token) -> &Self::Output {
        &self.tokens[index.0 as usize]
    }
}
