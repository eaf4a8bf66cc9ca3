// file: src/parser/mod.rs
// description: raw report preprocessing module exports
// reference: internal module structure

pub mod normalizer;

pub use normalizer::InputNormalizer;
