pub mod decorators;
pub mod signatures;
pub mod source;
