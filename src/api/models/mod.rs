pub mod blogs;
pub mod system;

pub use blogs::*;
pub use system::*;
