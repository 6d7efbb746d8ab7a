pub mod numeric;
pub mod shutdown;
pub mod types;

pub use numeric::*;
pub use shutdown::*;
pub use types::*;
