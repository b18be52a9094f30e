pub mod assembler;
pub mod normalize;
pub mod resolver;
pub mod sections;
pub mod selectors;

pub use assembler::{assemble, ProfileParts};
pub use resolver::{resolve, Candidate, Resolution, SelectorStrategy, Validator};
pub use selectors::SelectorTable;
