use serde::Serialize;

use crate::core::time::format_primitive;
use crate::db::models::Enrollment;
use crate::db::types::{EnrollmentStatus, PaymentStatus};
use crate::repositories::enrollments::EnrolledCourseRow;

#[derive(Debug, Serialize)]
pub(crate) struct EnrollmentResponse {
    pub(crate) id: String,
    pub(crate) student_id: String,
    pub(crate) course_id: String,
    pub(crate) enrolled_at: String,
    pub(crate) payment_amount: f64,
    pub(crate) payment_status: PaymentStatus,
    pub(crate) progress_percentage: f64,
    pub(crate) overall_score: Option<f64>,
    pub(crate) status: EnrollmentStatus,
    pub(crate) completed_at: Option<String>,
    pub(crate) last_accessed_at: Option<String>,
}

impl EnrollmentResponse {
    pub(crate) fn from_db(enrollment: Enrollment) -> Self {
        Self {
            id: enrollment.id,
            student_id: enrollment.student_id,
            course_id: enrollment.course_id,
            enrolled_at: format_primitive(enrollment.enrolled_at),
            payment_amount: enrollment.payment_amount,
            payment_status: enrollment.payment_status,
            progress_percentage: enrollment.progress_percentage,
            overall_score: enrollment.overall_score,
            status: enrollment.status,
            completed_at: enrollment.completed_at.map(format_primitive),
            last_accessed_at: enrollment.last_accessed_at.map(format_primitive),
        }
    }
}

/// Student-facing listing: enrollment flattened with its course summary.
#[derive(Debug, Serialize)]
pub(crate) struct EnrolledCourseResponse {
    pub(crate) enrollment_id: String,
    pub(crate) course_id: String,
    pub(crate) course_title: String,
    pub(crate) course_thumbnail_url: Option<String>,
    pub(crate) instructor_name: String,
    pub(crate) enrolled_at: String,
    pub(crate) payment_amount: f64,
    pub(crate) payment_status: PaymentStatus,
    pub(crate) progress_percentage: f64,
    pub(crate) status: EnrollmentStatus,
}

impl EnrolledCourseResponse {
    pub(crate) fn from_row(row: EnrolledCourseRow) -> Self {
        Self {
            enrollment_id: row.id,
            course_id: row.course_id,
            course_title: row.course_title,
            course_thumbnail_url: row.course_thumbnail_url,
            instructor_name: format!(
                "{} {}",
                row.instructor_first_name, row.instructor_last_name
            ),
            enrolled_at: format_primitive(row.enrolled_at),
            payment_amount: row.payment_amount,
            payment_status: row.payment_status,
            progress_percentage: row.progress_percentage,
            status: row.status,
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentDashboardResponse {
    pub(crate) total_enrollments: usize,
    pub(crate) active_courses: usize,
    pub(crate) completed_courses: usize,
    pub(crate) average_progress: f64,
    pub(crate) courses: Vec<EnrolledCourseResponse>,
}
