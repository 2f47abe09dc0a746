pub mod identity;
pub mod info;
pub mod joke;
