pub mod health;
pub mod recover;
