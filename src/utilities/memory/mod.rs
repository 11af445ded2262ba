//! Memory management utilities.
//!
//! Trees and their scratch data live in bump arenas: a short-lived scratch arena that is reset
//! after each build or query, and a persistent arena owned by whoever owns the mesh.

pub mod arena;

pub use arena::Arena;
