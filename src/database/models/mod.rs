pub mod course;
pub mod curriculum;
pub mod enrollment;
pub mod user;

pub use course::{Course, CourseChanges, CourseFilter, CourseSummary, NewCourse};
pub use curriculum::{Assignment, Lesson, Module, NewAssignment, NewLesson, NewModule, NewNote, Note};
pub use enrollment::{Enrollment, Progress};
pub use user::{NewUser, User, UserView};
