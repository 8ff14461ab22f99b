pub mod accrual;
pub mod stoch;

pub use accrual::*;
pub use stoch::*;
