//! Attack-set generation.
//!
//! Leaper attacks (pawn, knight, king) come from `const` lookup tables;
//! slider attacks (bishop, rook, queen) come from magic lookup tables built
//! once at startup from the reference ray fill in [`rays`].

pub mod leapers;
pub mod magics;
pub mod rays;
