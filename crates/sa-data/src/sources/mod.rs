pub mod json_source;
pub mod memory_source;

pub use json_source::JsonFileSource;
pub use memory_source::MemorySource;
