pub mod jsend;
pub mod traffic;
pub mod vnstat;
