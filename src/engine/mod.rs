pub mod cases;
pub mod normalization;
pub mod suite;
pub mod verify;
