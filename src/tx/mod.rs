pub mod ata;
pub mod swap_builder;
pub mod wrapper;
