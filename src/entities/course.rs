//! Courses: the sub-collection of an author

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::error::ValidationError;
use crate::core::validation::{Validate, Validator, validators};
use crate::{impl_record, impl_shaped_fields};

pub const COURSE_TITLE_MAX: usize = 100;
pub const COURSE_DESCRIPTION_MAX: usize = 1500;

/// A stored course
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub description: Option<String>,
}

impl_record!(Course, "Course", {
    "id" => id,
    "author_id" => author_id,
    "title" => title,
    "description" => description,
});

impl Course {
    pub fn new(author_id: Uuid, title: impl Into<String>, description: Option<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title: title.into(),
            description,
        }
    }
}

/// Course representation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseDto {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub description: Option<String>,
}

impl_shaped_fields!(CourseDto, [
    "id" => id,
    "authorId" => author_id,
    "title" => title,
    "description" => description,
]);

impl From<&Course> for CourseDto {
    fn from(course: &Course) -> Self {
        Self {
            id: course.id,
            author_id: course.author_id,
            title: course.title.clone(),
            description: course.description.clone(),
        }
    }
}

/// Payload accepted when creating a course
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CourseForCreation {
    pub title: String,
    pub description: Option<String>,
}

/// Title and description rules shared by creation and update
fn check_course(v: &mut Validator, title: &str, description: Option<&str>) {
    v.text("title", title, COURSE_TITLE_MAX);
    if let Some(description) = description {
        v.check(
            "description",
            description,
            validators::max_length(COURSE_DESCRIPTION_MAX),
        )
        .check(
            "description",
            description,
            validators::differs_from(
                title,
                "The provided description should be different from the title.",
            ),
        );
    }
}

impl Validate for CourseForCreation {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::new();
        check_course(&mut v, &self.title, self.description.as_deref());
        v.finish()
    }
}

impl CourseForCreation {
    pub fn into_record(self, author_id: Uuid) -> Course {
        Course::new(author_id, self.title.trim(), self.description)
    }
}

/// Payload accepted when replacing a course; the description is required
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CourseForUpdate {
    pub title: String,
    pub description: String,
}

impl Validate for CourseForUpdate {
    fn validate(&self) -> Result<(), ValidationError> {
        let mut v = Validator::new();
        v.check("description", &self.description, validators::required());
        let description = Some(self.description.as_str()).filter(|d| !d.trim().is_empty());
        check_course(&mut v, &self.title, description);
        v.finish()
    }
}

impl CourseForUpdate {
    /// Replace title and description, keeping id and author
    pub fn apply(self, course: Course) -> Course {
        Course {
            title: self.title.trim().to_string(),
            description: Some(self.description),
            ..course
        }
    }

    /// Build a course under a client-chosen id
    pub fn into_record_with_id(self, author_id: Uuid, id: Uuid) -> Course {
        Course {
            id,
            author_id,
            title: self.title.trim().to_string(),
            description: Some(self.description),
        }
    }
}
