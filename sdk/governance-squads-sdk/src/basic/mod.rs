pub mod debounce;
pub mod form;
pub mod registry;
pub mod resolver;
pub mod validation;
