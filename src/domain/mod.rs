pub mod contract;
pub mod model;
pub mod networks;
pub mod validation;
