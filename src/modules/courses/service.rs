use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::access::{self, CourseContext, Principal};
use crate::modules::courses::model::{
    Course, CourseDetail, CourseFilterParams, CourseLessonSummary, CourseLevel, CreateCourseDto,
    Enrollment, PaginatedCoursesResponse, UpdateCourseDto,
};
use crate::modules::users::model::UserSummary;
use crate::utils::errors::AppError;
use crate::utils::pagination::PaginationMeta;

const COURSE_COLUMNS: &str = "id, title, description, category, level, duration, price, \
     instructor_id, published, created_at, updated_at";

pub struct CourseService;

impl CourseService {
    /// Point lookup shared by the lesson and assignment services when they
    /// resolve a resource's owning course.
    #[instrument(skip(db))]
    pub async fn find_course(db: &PgPool, course_id: Uuid) -> Result<Course, AppError> {
        sqlx::query_as::<_, Course>(&format!(
            "SELECT {COURSE_COLUMNS} FROM courses WHERE id = $1"
        ))
        .bind(course_id)
        .fetch_one(db)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                AppError::not_found(anyhow::anyhow!("No course found with that ID"))
            }
            other => AppError::from(other),
        })
    }

    /// Assembles the snapshot the access evaluator decides over: the
    /// course's owner and publish flag plus a membership lookup for this
    /// principal.
    #[instrument(skip(db))]
    pub async fn context_for(
        db: &PgPool,
        course: &Course,
        principal: &Principal,
    ) -> Result<CourseContext, AppError> {
        let enrolled = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM enrollments WHERE course_id = $1 AND user_id = $2)",
        )
        .bind(course.id)
        .bind(principal.id)
        .fetch_one(db)
        .await?;

        Ok(CourseContext {
            instructor_id: course.instructor_id,
            published: course.published,
            enrolled,
        })
    }

    #[instrument(skip(db))]
    pub async fn list_courses(
        db: &PgPool,
        principal: &Principal,
        filters: CourseFilterParams,
    ) -> Result<PaginatedCoursesResponse, AppError> {
        let limit = filters.pagination.limit();
        let offset = filters.pagination.offset();

        // Students can never list unpublished courses, whatever they ask for.
        let published = if principal.is_student() {
            Some(true)
        } else {
            filters.published
        };

        let total = sqlx::query_scalar::<_, i64>(
            r#"SELECT COUNT(*) FROM courses
               WHERE ($1::course_category IS NULL OR category = $1)
                 AND ($2::course_level IS NULL OR level = $2)
                 AND ($3::boolean IS NULL OR published = $3)
                 AND ($4::uuid IS NULL OR instructor_id = $4)"#,
        )
        .bind(filters.category)
        .bind(filters.level)
        .bind(published)
        .bind(filters.instructor_id)
        .fetch_one(db)
        .await?;

        let courses = sqlx::query_as::<_, Course>(&format!(
            r#"SELECT {COURSE_COLUMNS} FROM courses
               WHERE ($1::course_category IS NULL OR category = $1)
                 AND ($2::course_level IS NULL OR level = $2)
                 AND ($3::boolean IS NULL OR published = $3)
                 AND ($4::uuid IS NULL OR instructor_id = $4)
               ORDER BY created_at DESC
               LIMIT $5 OFFSET $6"#
        ))
        .bind(filters.category)
        .bind(filters.level)
        .bind(published)
        .bind(filters.instructor_id)
        .bind(limit)
        .bind(offset)
        .fetch_all(db)
        .await?;

        Ok(PaginatedCoursesResponse {
            data: courses,
            meta: PaginationMeta {
                total,
                limit,
                offset,
                has_more: offset + limit < total,
            },
        })
    }

    /// Course detail with explicit read-time joins: instructor summary,
    /// ordered lesson summaries (published-only for students) and the
    /// enrollment count.
    #[instrument(skip(db))]
    pub async fn get_course(
        db: &PgPool,
        course_id: Uuid,
        principal: &Principal,
    ) -> Result<CourseDetail, AppError> {
        let course = Self::find_course(db, course_id).await?;
        let ctx = Self::context_for(db, &course, principal).await?;
        access::can_read_course(principal, &ctx)?;

        let instructor = sqlx::query_as::<_, UserSummary>(
            "SELECT id, first_name, last_name, email FROM users WHERE id = $1",
        )
        .bind(course.instructor_id)
        .fetch_one(db)
        .await?;

        let lessons = sqlx::query_as::<_, CourseLessonSummary>(
            r#"SELECT id, title, duration, position, is_published FROM lessons
               WHERE course_id = $1 AND (NOT $2 OR is_published)
               ORDER BY position"#,
        )
        .bind(course.id)
        .bind(principal.is_student())
        .fetch_all(db)
        .await?;

        let enrollment_count =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM enrollments WHERE course_id = $1")
                .bind(course.id)
                .fetch_one(db)
                .await?;

        Ok(CourseDetail {
            course,
            instructor,
            lessons,
            enrollment_count,
        })
    }

    /// The instructor is always the creating principal; the body cannot
    /// assign ownership elsewhere.
    #[instrument(skip(db))]
    pub async fn create_course(
        db: &PgPool,
        instructor_id: Uuid,
        dto: CreateCourseDto,
    ) -> Result<Course, AppError> {
        let course = sqlx::query_as::<_, Course>(&format!(
            r#"INSERT INTO courses (title, description, category, level, duration, price, instructor_id, published)
               VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
               RETURNING {COURSE_COLUMNS}"#
        ))
        .bind(&dto.title)
        .bind(&dto.description)
        .bind(dto.category)
        .bind(dto.level.unwrap_or(CourseLevel::Beginner))
        .bind(dto.duration)
        .bind(dto.price.unwrap_or(0.0))
        .bind(instructor_id)
        .bind(dto.published.unwrap_or(false))
        .fetch_one(db)
        .await?;

        Ok(course)
    }

    #[instrument(skip(db))]
    pub async fn update_course(
        db: &PgPool,
        course_id: Uuid,
        principal: &Principal,
        dto: UpdateCourseDto,
    ) -> Result<Course, AppError> {
        let course = Self::find_course(db, course_id).await?;
        let ctx = Self::context_for(db, &course, principal).await?;
        access::can_write_course(principal, &ctx)?;

        let course = sqlx::query_as::<_, Course>(&format!(
            r#"UPDATE courses SET
                 title = COALESCE($1, title),
                 description = COALESCE($2, description),
                 category = COALESCE($3, category),
                 level = COALESCE($4, level),
                 duration = COALESCE($5, duration),
                 price = COALESCE($6, price),
                 published = COALESCE($7, published),
                 updated_at = NOW()
               WHERE id = $8
               RETURNING {COURSE_COLUMNS}"#
        ))
        .bind(dto.title)
        .bind(dto.description)
        .bind(dto.category)
        .bind(dto.level)
        .bind(dto.duration)
        .bind(dto.price)
        .bind(dto.published)
        .bind(course.id)
        .fetch_one(db)
        .await?;

        Ok(course)
    }

    /// Deleting a course prunes everything that references it: the
    /// enrollments, lessons, assignments and submissions go with it via
    /// the schema's cascades.
    #[instrument(skip(db))]
    pub async fn delete_course(
        db: &PgPool,
        course_id: Uuid,
        principal: &Principal,
    ) -> Result<(), AppError> {
        let course = Self::find_course(db, course_id).await?;
        let ctx = Self::context_for(db, &course, principal).await?;
        access::can_write_course(principal, &ctx)?;

        sqlx::query("DELETE FROM courses WHERE id = $1")
            .bind(course.id)
            .execute(db)
            .await?;

        Ok(())
    }

    /// Enrollment records are only ever initialized here: date = now,
    /// progress = 0, not completed. The insert races safely against
    /// concurrent calls; losing the conflict surfaces as AlreadyEnrolled.
    #[instrument(skip(db))]
    pub async fn enroll(
        db: &PgPool,
        course_id: Uuid,
        principal: &Principal,
    ) -> Result<Enrollment, AppError> {
        let course = Self::find_course(db, course_id).await?;
        let ctx = Self::context_for(db, &course, principal).await?;
        access::can_enroll(principal, &ctx)?;

        let enrollment = sqlx::query_as::<_, Enrollment>(
            r#"INSERT INTO enrollments (course_id, user_id)
               VALUES ($1, $2)
               ON CONFLICT (course_id, user_id) DO NOTHING
               RETURNING course_id, user_id, enrollment_date, progress, completed"#,
        )
        .bind(course.id)
        .bind(principal.id)
        .fetch_optional(db)
        .await?
        .ok_or_else(|| {
            AppError::bad_request(anyhow::anyhow!("You are already enrolled in this course"))
        })?;

        Ok(enrollment)
    }
}
