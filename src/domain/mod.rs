// Domain layer - Core business logic

pub mod model;
pub mod rules;
