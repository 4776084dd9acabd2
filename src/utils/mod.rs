pub mod crypto;
pub mod normalize;
pub mod time;
