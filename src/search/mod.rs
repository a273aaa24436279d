//! Two-phase course search: keyword narrowing, then exact vector ranking.

pub mod dedup;
pub mod keyword;
pub mod vector;
