pub mod google;
pub mod jwt;
