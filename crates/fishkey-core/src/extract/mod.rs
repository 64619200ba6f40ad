pub mod codes;
pub mod origin;
pub mod size;
pub mod species;
