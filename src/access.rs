//! Access-control decisions for courses and their nested resources.
//!
//! Every function here is a pure decision over snapshots: given the
//! principal and what the service layer already loaded about the target,
//! answer allow/deny. No queries, no clocks (callers pass `now`), no side
//! effects, so the whole authorization matrix is unit-testable.

use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::modules::users::model::UserRole;
use crate::utils::errors::AppError;

/// The authenticated actor, taken from the verified token claims.
#[derive(Debug, Clone, Copy)]
pub struct Principal {
    pub id: Uuid,
    pub role: UserRole,
}

impl Principal {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_student(&self) -> bool {
        self.role == UserRole::Student
    }
}

/// Snapshot of the owning course as it relates to one principal.
/// `enrolled` is resolved by the caller with a membership lookup.
#[derive(Debug, Clone, Copy)]
pub struct CourseContext {
    pub instructor_id: Uuid,
    pub published: bool,
    pub enrolled: bool,
}

impl CourseContext {
    fn owned_by(&self, p: &Principal) -> bool {
        self.instructor_id == p.id
    }
}

/// Why a request was denied. Each reason maps to the status code and
/// message the API surfaces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DenyReason {
    CourseNotPublished,
    ResourceNotPublished,
    NotEnrolled,
    NotCourseOwner,
    AlreadyEnrolled,
    InstructorCannotEnroll,
    DueDatePassed,
}

impl DenyReason {
    pub fn status(&self) -> StatusCode {
        match self {
            DenyReason::AlreadyEnrolled | DenyReason::DueDatePassed => StatusCode::BAD_REQUEST,
            _ => StatusCode::FORBIDDEN,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            DenyReason::CourseNotPublished => "This course is not published yet",
            DenyReason::ResourceNotPublished => "This resource is not published yet",
            DenyReason::NotEnrolled => "You are not enrolled in this course",
            DenyReason::NotCourseOwner => "You are not authorized to manage this course",
            DenyReason::AlreadyEnrolled => "You are already enrolled in this course",
            DenyReason::InstructorCannotEnroll => "Instructors cannot enroll in courses",
            DenyReason::DueDatePassed => "The due date for this assignment has passed",
        }
    }
}

impl From<DenyReason> for AppError {
    fn from(reason: DenyReason) -> Self {
        AppError::new(reason.status(), anyhow::anyhow!(reason.message()))
    }
}

/// A course itself is visible when published, or to its owner and admins.
pub fn can_read_course(p: &Principal, ctx: &CourseContext) -> Result<(), DenyReason> {
    if ctx.published || p.is_admin() || ctx.owned_by(p) {
        Ok(())
    } else {
        Err(DenyReason::CourseNotPublished)
    }
}

/// Nested content (lessons, assignments) requires membership: admin, owner
/// or enrolled. Students additionally only see published resources, no
/// matter their enrollment.
pub fn can_read_content(
    p: &Principal,
    ctx: &CourseContext,
    resource_published: bool,
) -> Result<(), DenyReason> {
    if p.is_student() && !resource_published {
        return Err(DenyReason::ResourceNotPublished);
    }
    if p.is_admin() || ctx.owned_by(p) || ctx.enrolled {
        Ok(())
    } else {
        Err(DenyReason::NotEnrolled)
    }
}

/// Gate for listing a course's content, before per-item publish filtering.
pub fn can_list_content(p: &Principal, ctx: &CourseContext) -> Result<(), DenyReason> {
    if p.is_admin() || ctx.owned_by(p) || ctx.enrolled {
        Ok(())
    } else {
        Err(DenyReason::NotEnrolled)
    }
}

/// Mutating a course or anything it owns (lessons, assignments, grades)
/// is restricted to the owning instructor and admins.
pub fn can_write_course(p: &Principal, ctx: &CourseContext) -> Result<(), DenyReason> {
    if p.is_admin() || ctx.owned_by(p) {
        Ok(())
    } else {
        Err(DenyReason::NotCourseOwner)
    }
}

pub fn can_grade(p: &Principal, ctx: &CourseContext) -> Result<(), DenyReason> {
    can_write_course(p, ctx)
}

/// Students and admins may enroll in published courses they are not
/// already part of.
pub fn can_enroll(p: &Principal, ctx: &CourseContext) -> Result<(), DenyReason> {
    if p.role == UserRole::Instructor {
        return Err(DenyReason::InstructorCannotEnroll);
    }
    if !ctx.published {
        return Err(DenyReason::CourseNotPublished);
    }
    if ctx.enrolled {
        return Err(DenyReason::AlreadyEnrolled);
    }
    Ok(())
}

/// Submitting requires a published assignment, an open due date and
/// course membership (enrolled, or an admin).
pub fn can_submit(
    p: &Principal,
    ctx: &CourseContext,
    assignment_published: bool,
    due_date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
) -> Result<(), DenyReason> {
    if !assignment_published {
        return Err(DenyReason::ResourceNotPublished);
    }
    if let Some(due) = due_date
        && now > due
    {
        return Err(DenyReason::DueDatePassed);
    }
    if ctx.enrolled || p.is_admin() {
        Ok(())
    } else {
        Err(DenyReason::NotEnrolled)
    }
}
