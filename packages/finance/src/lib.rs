pub mod coin;
pub mod compound;
pub mod duration;
pub mod error;
pub mod fraction;
pub mod interest;
pub mod percent;
pub mod timestamp;
pub mod zero;
