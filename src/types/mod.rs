pub mod form;
pub mod workout;
