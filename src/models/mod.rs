pub mod advice;
pub mod record;
pub mod vineyard;
pub mod weather;

pub use advice::*;
pub use record::*;
pub use vineyard::*;
pub use weather::*;
