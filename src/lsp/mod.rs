pub mod backend;
pub mod document;
pub mod features;

pub use backend::AspNetBackend;
pub use document::DocumentSnapshot;
