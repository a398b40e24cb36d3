pub mod histogram;
pub mod website;
