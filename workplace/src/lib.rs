pub mod contractor;
pub mod developer;
pub mod employee;
pub mod manager;
pub mod pivot;

pub use common::subject_observer::{Observer, Subject};
