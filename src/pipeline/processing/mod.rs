pub mod classify;
pub mod deadline;
pub mod filters;
pub mod rank;
pub mod resolve;
pub mod score;
pub mod standardize;
pub mod validate;
