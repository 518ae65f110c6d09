// Configuration modules for the scan core

pub mod lexicon;

pub use lexicon::{LexiconError, RiskLexicon};
