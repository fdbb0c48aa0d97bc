pub(crate) mod admin;
pub(crate) mod auth;
pub(crate) mod catalog;
pub(crate) mod courses;
pub(crate) mod enrollments;
pub(crate) mod errors;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod interviews;
pub(crate) mod modules;
pub(crate) mod pagination;
pub(crate) mod progress;
pub(crate) mod quizzes;
pub(crate) mod router;
pub(crate) mod videos;
