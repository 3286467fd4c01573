pub mod circuit;
pub mod encoding;
pub mod inputs;
