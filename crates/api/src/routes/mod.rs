pub mod health;
pub mod todos;
