//! Symbol registry: hash-keyed storage of type entries and conversion
//! operators, plus the pure type-system fact predicates the conversion
//! engine queries.

mod registry;

pub use registry::SymbolRegistry;
