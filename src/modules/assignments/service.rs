use chrono::Utc;
use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::access::{self, Principal};
use crate::modules::assignments::model::{
    Assignment, CreateAssignmentDto, GradeSubmissionDto, Submission, SubmissionUpsert,
    SubmitAssignmentDto, UpdateAssignmentDto,
};
use crate::modules::courses::service::CourseService;
use crate::modules::lessons::service::LessonService;
use crate::utils::errors::AppError;

const ASSIGNMENT_COLUMNS: &str = "id, course_id, lesson_id, title, description, due_date, \
     total_points, is_published, created_at, updated_at";

const SUBMISSION_COLUMNS: &str = "id, assignment_id, student_id, content, attachments, \
     submission_date, grade, feedback, is_graded";

pub struct AssignmentService;

impl AssignmentService {
    #[instrument(skip(db))]
    pub async fn find_assignment(db: &PgPool, assignment_id: Uuid) -> Result<Assignment, AppError> {
        sqlx::query_as::<_, Assignment>(&format!(
            "SELECT {ASSIGNMENT_COLUMNS} FROM assignments WHERE id = $1"
        ))
        .bind(assignment_id)
        .fetch_one(db)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                AppError::not_found(anyhow::anyhow!("No assignment found with that ID"))
            }
            other => AppError::from(other),
        })
    }

    #[instrument(skip(db))]
    pub async fn list_by_course(
        db: &PgPool,
        course_id: Uuid,
        principal: &Principal,
    ) -> Result<Vec<Assignment>, AppError> {
        let course = CourseService::find_course(db, course_id).await?;
        let ctx = CourseService::context_for(db, &course, principal).await?;
        access::can_list_content(principal, &ctx)?;

        let assignments = sqlx::query_as::<_, Assignment>(&format!(
            r#"SELECT {ASSIGNMENT_COLUMNS} FROM assignments
               WHERE course_id = $1 AND (NOT $2 OR is_published)
               ORDER BY created_at"#
        ))
        .bind(course.id)
        .bind(principal.is_student())
        .fetch_all(db)
        .await?;

        Ok(assignments)
    }

    #[instrument(skip(db))]
    pub async fn list_by_lesson(
        db: &PgPool,
        lesson_id: Uuid,
        principal: &Principal,
    ) -> Result<Vec<Assignment>, AppError> {
        let lesson = LessonService::find_lesson(db, lesson_id).await?;
        let course = CourseService::find_course(db, lesson.course_id).await?;
        let ctx = CourseService::context_for(db, &course, principal).await?;
        access::can_list_content(principal, &ctx)?;

        let assignments = sqlx::query_as::<_, Assignment>(&format!(
            r#"SELECT {ASSIGNMENT_COLUMNS} FROM assignments
               WHERE lesson_id = $1 AND (NOT $2 OR is_published)
               ORDER BY created_at"#
        ))
        .bind(lesson.id)
        .bind(principal.is_student())
        .fetch_all(db)
        .await?;

        Ok(assignments)
    }

    #[instrument(skip(db))]
    pub async fn get_assignment(
        db: &PgPool,
        assignment_id: Uuid,
        principal: &Principal,
    ) -> Result<Assignment, AppError> {
        let assignment = Self::find_assignment(db, assignment_id).await?;
        let course = CourseService::find_course(db, assignment.course_id).await?;
        let ctx = CourseService::context_for(db, &course, principal).await?;
        access::can_read_content(principal, &ctx, assignment.is_published)?;

        Ok(assignment)
    }

    #[instrument(skip(db))]
    pub async fn create_assignment(
        db: &PgPool,
        course_id: Uuid,
        principal: &Principal,
        dto: CreateAssignmentDto,
    ) -> Result<Assignment, AppError> {
        let course = CourseService::find_course(db, course_id).await?;
        let ctx = CourseService::context_for(db, &course, principal).await?;
        access::can_write_course(principal, &ctx)?;

        if let Some(lesson_id) = dto.lesson_id {
            let lesson = LessonService::find_lesson(db, lesson_id).await?;
            if lesson.course_id != course.id {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "Lesson does not belong to this course"
                )));
            }
        }

        let assignment = sqlx::query_as::<_, Assignment>(&format!(
            r#"INSERT INTO assignments (course_id, lesson_id, title, description, due_date, total_points, is_published)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING {ASSIGNMENT_COLUMNS}"#
        ))
        .bind(course.id)
        .bind(dto.lesson_id)
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.due_date)
        .bind(dto.total_points.unwrap_or(100.0))
        .bind(dto.is_published.unwrap_or(false))
        .fetch_one(db)
        .await?;

        Ok(assignment)
    }

    #[instrument(skip(db))]
    pub async fn update_assignment(
        db: &PgPool,
        assignment_id: Uuid,
        principal: &Principal,
        dto: UpdateAssignmentDto,
    ) -> Result<Assignment, AppError> {
        let assignment = Self::find_assignment(db, assignment_id).await?;
        let course = CourseService::find_course(db, assignment.course_id).await?;
        let ctx = CourseService::context_for(db, &course, principal).await?;
        access::can_write_course(principal, &ctx)?;

        if let Some(lesson_id) = dto.lesson_id {
            let lesson = LessonService::find_lesson(db, lesson_id).await?;
            if lesson.course_id != course.id {
                return Err(AppError::bad_request(anyhow::anyhow!(
                    "Lesson does not belong to this course"
                )));
            }
        }

        let assignment = sqlx::query_as::<_, Assignment>(&format!(
            r#"UPDATE assignments SET
                 title = COALESCE($1, title),
                 description = COALESCE($2, description),
                 lesson_id = COALESCE($3, lesson_id),
                 due_date = COALESCE($4, due_date),
                 total_points = COALESCE($5, total_points),
                 is_published = COALESCE($6, is_published),
                 updated_at = NOW()
               WHERE id = $7
               RETURNING {ASSIGNMENT_COLUMNS}"#
        ))
        .bind(dto.title)
        .bind(dto.description)
        .bind(dto.lesson_id)
        .bind(dto.due_date)
        .bind(dto.total_points)
        .bind(dto.is_published)
        .bind(assignment.id)
        .fetch_one(db)
        .await?;

        Ok(assignment)
    }

    #[instrument(skip(db))]
    pub async fn delete_assignment(
        db: &PgPool,
        assignment_id: Uuid,
        principal: &Principal,
    ) -> Result<(), AppError> {
        let assignment = Self::find_assignment(db, assignment_id).await?;
        let course = CourseService::find_course(db, assignment.course_id).await?;
        let ctx = CourseService::context_for(db, &course, principal).await?;
        access::can_write_course(principal, &ctx)?;

        sqlx::query("DELETE FROM assignments WHERE id = $1")
            .bind(assignment.id)
            .execute(db)
            .await?;

        Ok(())
    }

    /// One conditional upsert keyed on `(assignment_id, student_id)`: the
    /// first call inserts, any later call overwrites the same row, resets
    /// the submission date and clears the previous grade so stale marks
    /// never show against new work. `xmax = 0` distinguishes the two
    /// outcomes, which only affects the user-facing message.
    #[instrument(skip(db))]
    pub async fn submit(
        db: &PgPool,
        assignment_id: Uuid,
        principal: &Principal,
        dto: SubmitAssignmentDto,
    ) -> Result<SubmissionUpsert, AppError> {
        let assignment = Self::find_assignment(db, assignment_id).await?;
        let course = CourseService::find_course(db, assignment.course_id).await?;
        let ctx = CourseService::context_for(db, &course, principal).await?;
        access::can_submit(
            principal,
            &ctx,
            assignment.is_published,
            assignment.due_date,
            Utc::now(),
        )?;

        let upsert = sqlx::query_as::<_, SubmissionUpsert>(&format!(
            r#"INSERT INTO submissions (assignment_id, student_id, content, attachments)
               VALUES ($1, $2, $3, $4)
               ON CONFLICT (assignment_id, student_id) DO UPDATE SET
                 content = EXCLUDED.content,
                 attachments = EXCLUDED.attachments,
                 submission_date = NOW(),
                 grade = NULL,
                 feedback = NULL,
                 is_graded = FALSE
               RETURNING {SUBMISSION_COLUMNS}, (xmax = 0) AS inserted"#
        ))
        .bind(assignment.id)
        .bind(principal.id)
        .bind(&dto.content)
        .bind(sqlx::types::Json(&dto.attachments))
        .fetch_one(db)
        .await?;

        Ok(upsert)
    }

    /// Grading overwrites: re-grading the same submission is idempotent in
    /// effect. Out-of-range grades leave the submission untouched.
    #[instrument(skip(db))]
    pub async fn grade(
        db: &PgPool,
        assignment_id: Uuid,
        submission_id: Uuid,
        principal: &Principal,
        dto: GradeSubmissionDto,
    ) -> Result<Submission, AppError> {
        let assignment = Self::find_assignment(db, assignment_id).await?;
        let course = CourseService::find_course(db, assignment.course_id).await?;
        let ctx = CourseService::context_for(db, &course, principal).await?;
        access::can_grade(principal, &ctx)?;

        if dto.grade < 0.0 || dto.grade > assignment.total_points {
            return Err(AppError::bad_request(anyhow::anyhow!(
                "Grade must be between 0 and {}",
                assignment.total_points
            )));
        }

        let submission = sqlx::query_as::<_, Submission>(&format!(
            r#"UPDATE submissions SET grade = $1, feedback = $2, is_graded = TRUE
               WHERE id = $3 AND assignment_id = $4
               RETURNING {SUBMISSION_COLUMNS}"#
        ))
        .bind(dto.grade)
        .bind(&dto.feedback)
        .bind(submission_id)
        .bind(assignment.id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| AppError::not_found(anyhow::anyhow!("No submission found with that ID")))?;

        Ok(submission)
    }
}
