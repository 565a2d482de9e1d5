pub mod explosion;
pub mod floor;
pub mod pointer;
