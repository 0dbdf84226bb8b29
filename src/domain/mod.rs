pub mod approval;
pub mod commitment;
pub mod divisions;
pub mod money;
pub mod ports;
pub mod risk;
