pub mod health;
pub mod pages;
pub mod sign_out;
pub mod theme;
