pub mod balance;
pub mod hints;
pub mod status;
