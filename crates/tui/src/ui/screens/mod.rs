pub mod form;
pub mod transactions;
