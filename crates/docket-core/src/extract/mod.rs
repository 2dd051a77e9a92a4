pub mod cases;
pub mod courts;
