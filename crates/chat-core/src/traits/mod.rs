//! Traits at the boundary between the model layer and its collaborators

mod resolver;

pub use resolver::ModelResolver;
