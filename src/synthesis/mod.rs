pub mod dsl;
pub mod ops;
pub mod candidates;
pub mod shape;
pub mod survivors;
pub mod ranker;
