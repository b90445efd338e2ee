pub mod pool;
pub mod tx;
