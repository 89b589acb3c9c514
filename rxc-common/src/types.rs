//! Common identifier types used across compiler phases

/// Basic block label identifier, unique within one function
pub type LabelId = u32;

/// SSA register identifier, unique within one function
pub type RegId = u32;

/// Resolved symbol identifier assigned by name resolution
pub type SymbolId = u32;
