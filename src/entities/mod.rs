//! Example domain: authors and their courses

pub mod macros;
pub mod author;
pub mod course;

pub use author::{Author, AuthorDto, AuthorForCreation, AuthorFullDto};
pub use course::{Course, CourseDto, CourseForCreation, CourseForUpdate};
