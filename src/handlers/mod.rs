pub mod applications;
pub mod home;
