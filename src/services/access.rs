use crate::db::types::UserRole;

/// Who is asking for a piece of course content.
#[derive(Debug, Clone, Copy)]
pub(crate) enum Viewer<'a> {
    Anonymous,
    User { id: &'a str, role: UserRole },
}

/// Content gate. Admins and the owning instructor see everything, including
/// drafts. Everyone else only sees published items, and paid items only with
/// a completed payment.
pub(crate) fn can_view_content(
    viewer: Viewer<'_>,
    instructor_id: &str,
    has_paid: bool,
    is_published: bool,
    is_free: bool,
) -> bool {
    match viewer {
        Viewer::User { role: UserRole::Admin, .. } => true,
        Viewer::User { id, role: UserRole::Instructor } if id == instructor_id => true,
        Viewer::User { .. } => is_published && (is_free || has_paid),
        Viewer::Anonymous => is_published && is_free,
    }
}

#[cfg(test)]
mod tests {
    use super::{can_view_content, Viewer};
    use crate::db::types::UserRole;

    const INSTRUCTOR: &str = "instructor-1";

    fn student() -> Viewer<'static> {
        Viewer::User { id: "student-1", role: UserRole::Student }
    }

    #[test]
    fn admin_sees_everything() {
        let admin = Viewer::User { id: "admin-1", role: UserRole::Admin };
        assert!(can_view_content(admin, INSTRUCTOR, false, false, false));
    }

    #[test]
    fn owning_instructor_sees_drafts() {
        let owner = Viewer::User { id: INSTRUCTOR, role: UserRole::Instructor };
        assert!(can_view_content(owner, INSTRUCTOR, false, false, false));
    }

    #[test]
    fn other_instructor_is_treated_like_a_student() {
        let other = Viewer::User { id: "instructor-2", role: UserRole::Instructor };
        assert!(!can_view_content(other, INSTRUCTOR, false, true, false));
        assert!(can_view_content(other, INSTRUCTOR, false, true, true));
    }

    #[test]
    fn paid_student_sees_published_paid_content() {
        assert!(can_view_content(student(), INSTRUCTOR, true, true, false));
    }

    #[test]
    fn unpaid_student_sees_only_free_published_content() {
        assert!(can_view_content(student(), INSTRUCTOR, false, true, true));
        assert!(!can_view_content(student(), INSTRUCTOR, false, true, false));
    }

    #[test]
    fn unpublished_content_is_hidden_even_with_payment() {
        assert!(!can_view_content(student(), INSTRUCTOR, true, false, false));
        assert!(!can_view_content(student(), INSTRUCTOR, true, false, true));
    }

    #[test]
    fn anonymous_viewer_sees_only_free_published_content() {
        assert!(can_view_content(Viewer::Anonymous, INSTRUCTOR, false, true, true));
        assert!(!can_view_content(Viewer::Anonymous, INSTRUCTOR, false, true, false));
        assert!(!can_view_content(Viewer::Anonymous, INSTRUCTOR, false, false, true));
    }
}
