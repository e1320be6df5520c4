// Adapters layer: concrete implementations of the domain ports (registry
// stores, delivery log sinks).

pub mod jsonl;
pub mod memory;
