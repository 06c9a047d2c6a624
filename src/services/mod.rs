pub mod analytics;
pub mod applications;
pub mod validation;
