//! The glyph/alias symbol table.
//!
//! Every keyword-like symbol of MPL has exactly one unicode glyph and exactly one ascii
//! backslash alias, and both produce the same [TokenKind].

use crate::token::TokenKind;
use std::collections::HashMap;
use std::sync::LazyLock;
use thiserror::Error;

/// A symbol with both a unicode and an ascii spelling
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct Symbol {
    pub kind: TokenKind,
    pub glyph: char,
    /// the alias, without the leading backslash
    pub alias: &'static str,
}

const fn sym(kind: TokenKind, glyph: char, alias: &'static str) -> Symbol {
    Symbol { kind, glyph, alias }
}

/// Every symbol known to the scanner
pub const SYMBOLS: &[Symbol] = &[
    sym(TokenKind::Alpha, 'α', "alpha"),
    sym(TokenKind::Beta, 'β', "beta"),
    sym(TokenKind::Gamma, 'γ', "gamma"),
    sym(TokenKind::Delta, 'δ', "delta"),
    sym(TokenKind::Epsilon, 'ε', "epsilon"),
    sym(TokenKind::Zeta, 'ζ', "zeta"),
    sym(TokenKind::Eta, 'η', "eta"),
    sym(TokenKind::Theta, 'θ', "theta"),
    sym(TokenKind::Iota, 'ι', "iota"),
    sym(TokenKind::Kappa, 'κ', "kappa"),
    sym(TokenKind::LambdaVar, 'λ', "lambda"),
    sym(TokenKind::Mu, 'μ', "mu"),
    sym(TokenKind::Nu, 'ν', "nu"),
    sym(TokenKind::Xi, 'ξ', "xi"),
    sym(TokenKind::Pi, 'π', "pi"),
    sym(TokenKind::Rho, 'ρ', "rho"),
    sym(TokenKind::Sigma, 'σ', "sigma"),
    sym(TokenKind::Tau, 'τ', "tau"),
    sym(TokenKind::Upsilon, 'υ', "upsilon"),
    sym(TokenKind::Phi, 'φ', "phi"),
    sym(TokenKind::Chi, 'χ', "chi"),
    sym(TokenKind::Psi, 'ψ', "psi"),
    sym(TokenKind::Omega, 'ω', "omega"),
    // types
    sym(TokenKind::Nat, 'ℕ', "nat"),
    sym(TokenKind::Int, 'ℤ', "int"),
    sym(TokenKind::Rat, 'ℚ', "rat"),
    sym(TokenKind::Real, 'ℝ', "real"),
    sym(TokenKind::Complex, 'ℂ', "complex"),
    sym(TokenKind::Bool, '𝔹', "bool"),
    sym(TokenKind::EmptySet, '∅', "emptyset"),
    sym(TokenKind::Bottom, '⊥', "bot"),
    // operators
    sym(TokenKind::Times, '×', "times"),
    sym(TokenKind::Div, '÷', "div"),
    sym(TokenKind::Ast, '∗', "ast"),
    sym(TokenKind::Compose, '∘', "circ"),
    sym(TokenKind::Neq, '≠', "neq"),
    sym(TokenKind::Leq, '≤', "leq"),
    sym(TokenKind::Geq, '≥', "geq"),
    sym(TokenKind::Approx, '≈', "approx"),
    sym(TokenKind::Sim, '∼', "sim"),
    sym(TokenKind::And, '∧', "land"),
    sym(TokenKind::Or, '∨', "lor"),
    sym(TokenKind::Not, '¬', "neg"),
    sym(TokenKind::Implies, '⟹', "implies"),
    sym(TokenKind::LeftArrow, '←', "gets"),
    sym(TokenKind::Definition, '≜', "triangleq"),
    // effects
    sym(TokenKind::Raise, '↯', "raise"),
    sym(TokenKind::Handle, '↴', "handle"),
    sym(TokenKind::Parallel, '‖', "parallel"),
    sym(TokenKind::Alloc, '⊕', "alloc"),
    sym(TokenKind::Release, '⊖', "release"),
    sym(TokenKind::Trace, '✎', "trace"),
    sym(TokenKind::Delay, '⏲', "delay"),
    sym(TokenKind::Periodic, '⟳', "periodic"),
    sym(TokenKind::Receive, '↽', "recv"),
    sym(TokenKind::Send, '⇀', "send"),
    // delimiters
    sym(TokenKind::LAngle, '⟨', "langle"),
    sym(TokenKind::RAngle, '⟩', "rangle"),
    sym(TokenKind::LCeil, '⌈', "lceil"),
    sym(TokenKind::RCeil, '⌉', "rceil"),
    sym(TokenKind::LRaii, '〔', "lraii"),
    sym(TokenKind::RRaii, '〕', "rraii"),
    sym(TokenKind::LQuote, '⌜', "ulcorner"),
    sym(TokenKind::RQuote, '⌝', "urcorner"),
    sym(TokenKind::LUnquote, '⌞', "llcorner"),
    sym(TokenKind::RUnquote, '⌟', "lrcorner"),
    // structure
    sym(TokenKind::Forall, '∀', "forall"),
    sym(TokenKind::In, '∈', "in"),
    sym(TokenKind::Arrow, '→', "to"),
    sym(TokenKind::DoubleArrow, '⇒', "Rightarrow"),
    sym(TokenKind::Module, '𝓜', "module"),
    sym(TokenKind::Path, '🖫', "path"),
];

static ALIASES: LazyLock<AliasMap> = LazyLock::new(|| match AliasMap::new(SYMBOLS) {
    Ok(map) => map,
    Err(e) => panic!("the built-in symbol table is inconsistent: {e}"),
});

/// A violation of the one glyph, one alias, one kind rule
#[derive(Debug, Error, PartialEq, Eq)]
pub enum AliasConflict {
    #[error("glyph {0:?} is used by more than one symbol")]
    DuplicateGlyph(char),
    #[error("alias \\{0} is used by more than one symbol")]
    DuplicateAlias(&'static str),
    #[error("{0:?} has more than one symbol")]
    DuplicateKind(TokenKind),
}

/// Bidirectional lookup between glyphs, backslash aliases, and token kinds
#[derive(Debug)]
pub struct AliasMap {
    by_glyph: HashMap<char, Symbol>,
    by_alias: HashMap<&'static str, Symbol>,
    by_kind: HashMap<TokenKind, Symbol>,
}

impl AliasMap {
    /// Builds a map, checking that glyph, alias and kind are 1:1:1
    pub fn new(symbols: &[Symbol]) -> Result<Self, AliasConflict> {
        let mut map = Self {
            by_glyph: HashMap::with_capacity(symbols.len()),
            by_alias: HashMap::with_capacity(symbols.len()),
            by_kind: HashMap::with_capacity(symbols.len()),
        };
        for &symbol in symbols {
            if map.by_glyph.insert(symbol.glyph, symbol).is_some() {
                return Err(AliasConflict::DuplicateGlyph(symbol.glyph));
            }
            if map.by_alias.insert(symbol.alias, symbol).is_some() {
                return Err(AliasConflict::DuplicateAlias(symbol.alias));
            }
            if map.by_kind.insert(symbol.kind, symbol).is_some() {
                return Err(AliasConflict::DuplicateKind(symbol.kind));
            }
        }
        Ok(map)
    }

    /// The process-wide table, built on first use
    pub fn global() -> &'static AliasMap {
        &ALIASES
    }

    /// Looks up a glyph
    pub fn by_glyph(&self, glyph: char) -> Option<TokenKind> {
        self.by_glyph.get(&glyph).map(|symbol| symbol.kind)
    }

    /// Looks up a backslash alias, given without the backslash
    pub fn by_alias(&self, alias: &str) -> Option<TokenKind> {
        self.by_alias.get(alias).map(|symbol| symbol.kind)
    }

    /// Gets the symbol for a kind, if the kind has a glyph
    pub fn symbol(&self, kind: TokenKind) -> Option<&Symbol> {
        self.by_kind.get(&kind)
    }

    pub fn len(&self) -> usize {
        self.by_kind.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_kind.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.by_kind.values()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_table_is_consistent() {
        let map = AliasMap::new(SYMBOLS).expect("built-in table should be 1:1:1");
        assert_eq!(map.len(), SYMBOLS.len());
        assert_eq!(AliasMap::global().len(), SYMBOLS.len());
    }

    #[test]
    fn test_glyph_and_alias_agree() {
        let map = AliasMap::global();
        for symbol in map.iter() {
            assert_eq!(map.by_glyph(symbol.glyph), Some(symbol.kind));
            assert_eq!(map.by_alias(symbol.alias), Some(symbol.kind));
        }
        assert_eq!(map.by_glyph('ℕ'), map.by_alias("nat"));
        assert_eq!(map.by_alias("int"), Some(TokenKind::Int));
        assert_eq!(map.by_alias("in"), Some(TokenKind::In));
    }

    #[test]
    fn test_unknown_lookups() {
        let map = AliasMap::global();
        assert_eq!(map.by_alias("lambd"), None);
        assert_eq!(map.by_alias("Lambda"), None);
        assert_eq!(map.by_glyph('x'), None);
        assert_eq!(map.symbol(TokenKind::Identifier), None);
    }

    #[test]
    fn test_conflicts_are_rejected() {
        let duplicate_glyph = [
            sym(TokenKind::Alpha, 'α', "alpha"),
            sym(TokenKind::Beta, 'α', "beta"),
        ];
        assert_eq!(
            AliasMap::new(&duplicate_glyph).unwrap_err(),
            AliasConflict::DuplicateGlyph('α')
        );
        let duplicate_alias = [
            sym(TokenKind::Alpha, 'α', "alpha"),
            sym(TokenKind::Beta, 'β', "alpha"),
        ];
        assert_eq!(
            AliasMap::new(&duplicate_alias).unwrap_err(),
            AliasConflict::DuplicateAlias("alpha")
        );
        let duplicate_kind = [
            sym(TokenKind::Alpha, 'α', "alpha"),
            sym(TokenKind::Alpha, 'β', "beta"),
        ];
        assert_eq!(
            AliasMap::new(&duplicate_kind).unwrap_err(),
            AliasConflict::DuplicateKind(TokenKind::Alpha)
        );
    }
}
