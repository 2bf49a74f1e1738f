pub mod compare;
pub mod compiler;
pub mod discovery;
pub mod executor;
pub mod process;
pub mod result;

pub use compare::*;
pub use compiler::*;
pub use discovery::*;
pub use executor::*;
pub use process::*;
pub use result::*;
