pub mod emoji;
pub mod fixed_budget;
pub mod handlers;
pub mod measured;
pub mod processor;
pub mod rules;
pub mod session;
