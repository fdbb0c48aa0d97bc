pub(crate) mod attempts;
pub(crate) mod contents;
pub(crate) mod courses;
pub(crate) mod enrollments;
pub(crate) mod interviews;
pub(crate) mod materials;
pub(crate) mod modules;
pub(crate) mod progress;
pub(crate) mod quizzes;
pub(crate) mod topics;
pub(crate) mod users;
pub(crate) mod videos;
