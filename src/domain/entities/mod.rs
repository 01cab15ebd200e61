pub mod assignment;
pub mod document;
pub mod feature;
pub mod principal;
pub mod submission;

pub use assignment::*;
pub use document::*;
pub use feature::*;
pub use principal::*;
pub use submission::*;
