pub mod agenda;
pub mod health;
