pub mod diagnose;
pub mod networks;
pub mod register;
