pub mod address;
pub mod jwt;
pub mod password;
