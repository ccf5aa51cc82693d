//! Authors: stored record, external models and creation payload

use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::course::{Course, CourseForCreation};
use crate::core::error::ValidationError;
use crate::core::validation::{Validate, Validator};
use crate::{impl_record, impl_shaped_fields};

/// Maximum length of names and main category
pub const AUTHOR_TEXT_MAX: usize = 50;

/// A stored author
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub date_of_death: Option<NaiveDate>,
    pub main_category: String,
}

impl_record!(Author, "Author", {
    "id" => id,
    "first_name" => first_name,
    "last_name" => last_name,
    "date_of_birth" => date_of_birth,
    "date_of_death" => date_of_death,
    "main_category" => main_category,
});

impl Author {
    pub fn new(
        first_name: impl Into<String>,
        last_name: impl Into<String>,
        date_of_birth: NaiveDate,
        main_category: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            first_name: first_name.into(),
            last_name: last_name.into(),
            date_of_birth,
            date_of_death: None,
            main_category: main_category.into(),
        }
    }

    pub fn with_date_of_death(mut self, date_of_death: NaiveDate) -> Self {
        self.date_of_death = Some(date_of_death);
        self
    }

    /// Age in whole years today, or at death
    pub fn current_age(&self) -> i64 {
        let until = self
            .date_of_death
            .unwrap_or_else(|| Utc::now().date_naive());
        age_on(self.date_of_birth, until)
    }
}

/// Whole years between a birth date and another date
pub fn age_on(date_of_birth: NaiveDate, on: NaiveDate) -> i64 {
    let mut age = i64::from(on.year() - date_of_birth.year());
    if (on.month(), on.day()) < (date_of_birth.month(), date_of_birth.day()) {
        age -= 1;
    }
    age
}

/// Friendly author representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorDto {
    pub id: Uuid,
    pub name: String,
    pub age: i64,
    pub main_category: String,
}

impl_shaped_fields!(AuthorDto, [
    "id" => id,
    "name" => name,
    "age" => age,
    "mainCategory" => main_category,
]);

impl From<&Author> for AuthorDto {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            name: format!("{} {}", author.first_name, author.last_name),
            age: author.current_age(),
            main_category: author.main_category.clone(),
        }
    }
}

/// Full author representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorFullDto {
    pub id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    pub main_category: String,
}

impl_shaped_fields!(AuthorFullDto, [
    "id" => id,
    "firstName" => first_name,
    "lastName" => last_name,
    "dateOfBirth" => date_of_birth,
    "mainCategory" => main_category,
]);

impl From<&Author> for AuthorFullDto {
    fn from(author: &Author) -> Self {
        Self {
            id: author.id,
            first_name: author.first_name.clone(),
            last_name: author.last_name.clone(),
            date_of_birth: author.date_of_birth,
            main_category: author.main_category.clone(),
        }
    }
}

/// Payload accepted when creating an author
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AuthorForCreation {
    pub first_name: String,
    pub last_name: String,
    pub date_of_birth: Option<NaiveDate>,
    pub main_category: String,
    pub courses: Vec<CourseForCreation>,
}

impl Validate for AuthorForCreation {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::new();
        v.text("firstName", &self.first_name, AUTHOR_TEXT_MAX)
            .text("lastName", &self.last_name, AUTHOR_TEXT_MAX)
            .present("dateOfBirth", self.date_of_birth.as_ref())
            .text("mainCategory", &self.main_category, AUTHOR_TEXT_MAX);
        for (index, course) in self.courses.iter().enumerate() {
            v.nested("courses", index, course);
        }
        v.finish()
    }
}

impl AuthorForCreation {
    /// Build the stored author and its courses
    ///
    /// Fails when no date of birth was given; [`Validate`] reports the same.
    pub fn into_records(self) -> Result<(Author, Vec<Course>), ValidationError> {
        self.validate()?;
        let Some(date_of_birth) = self.date_of_birth else {
            return Err(ValidationError::FieldErrors(Vec::new()));
        };

        let author = Author::new(
            self.first_name.trim(),
            self.last_name.trim(),
            date_of_birth,
            self.main_category.trim(),
        );
        let courses = self
            .courses
            .into_iter()
            .map(|c| c.into_record(author.id))
            .collect();
        Ok((author, courses))
    }
}
