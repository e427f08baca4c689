pub mod hash;
pub mod pow;
