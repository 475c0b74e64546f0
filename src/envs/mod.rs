pub mod simple_golf;
pub mod tiger;
