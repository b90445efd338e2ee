pub mod completion;
pub mod crypto;
pub mod document;
pub mod id;
pub mod time;
