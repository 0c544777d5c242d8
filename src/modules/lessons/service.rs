use sqlx::PgPool;
use tracing::instrument;
use uuid::Uuid;

use crate::access::{self, Principal};
use crate::modules::courses::service::CourseService;
use crate::modules::lessons::model::{CreateLessonDto, Lesson, UpdateLessonDto};
use crate::utils::errors::AppError;

const LESSON_COLUMNS: &str = "id, course_id, title, content, position, duration, video_url, \
     is_published, created_at, updated_at";

pub struct LessonService;

impl LessonService {
    #[instrument(skip(db))]
    pub async fn find_lesson(db: &PgPool, lesson_id: Uuid) -> Result<Lesson, AppError> {
        sqlx::query_as::<_, Lesson>(&format!(
            "SELECT {LESSON_COLUMNS} FROM lessons WHERE id = $1"
        ))
        .bind(lesson_id)
        .fetch_one(db)
        .await
        .map_err(|e| match e {
            sqlx::Error::RowNotFound => {
                AppError::not_found(anyhow::anyhow!("No lesson found with that ID"))
            }
            other => AppError::from(other),
        })
    }

    #[instrument(skip(db))]
    pub async fn list_lessons(
        db: &PgPool,
        course_id: Uuid,
        principal: &Principal,
    ) -> Result<Vec<Lesson>, AppError> {
        let course = CourseService::find_course(db, course_id).await?;
        let ctx = CourseService::context_for(db, &course, principal).await?;
        access::can_list_content(principal, &ctx)?;

        let lessons = sqlx::query_as::<_, Lesson>(&format!(
            r#"SELECT {LESSON_COLUMNS} FROM lessons
               WHERE course_id = $1 AND (NOT $2 OR is_published)
               ORDER BY position"#
        ))
        .bind(course.id)
        .bind(principal.is_student())
        .fetch_all(db)
        .await?;

        Ok(lessons)
    }

    #[instrument(skip(db))]
    pub async fn get_lesson(
        db: &PgPool,
        lesson_id: Uuid,
        principal: &Principal,
    ) -> Result<Lesson, AppError> {
        let lesson = Self::find_lesson(db, lesson_id).await?;
        let course = CourseService::find_course(db, lesson.course_id).await?;
        let ctx = CourseService::context_for(db, &course, principal).await?;
        access::can_read_content(principal, &ctx, lesson.is_published)?;

        Ok(lesson)
    }

    /// Inserts at the requested slot, shifting later lessons down by one,
    /// or appends when no slot is given. The course row is locked for the
    /// duration so concurrent inserts into the same course serialize and
    /// the sequence stays dense.
    #[instrument(skip(db))]
    pub async fn create_lesson(
        db: &PgPool,
        course_id: Uuid,
        principal: &Principal,
        dto: CreateLessonDto,
    ) -> Result<Lesson, AppError> {
        let course = CourseService::find_course(db, course_id).await?;
        let ctx = CourseService::context_for(db, &course, principal).await?;
        access::can_write_course(principal, &ctx)?;

        let mut tx = db.begin().await?;

        sqlx::query("SELECT id FROM courses WHERE id = $1 FOR UPDATE")
            .bind(course.id)
            .execute(&mut *tx)
            .await?;

        let count = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM lessons WHERE course_id = $1",
        )
        .bind(course.id)
        .fetch_one(&mut *tx)
        .await? as i32;

        let position = match dto.position {
            Some(position) => {
                if position < 1 || position > count + 1 {
                    return Err(AppError::bad_request(anyhow::anyhow!(
                        "Lesson position must be between 1 and {}",
                        count + 1
                    )));
                }
                sqlx::query(
                    "UPDATE lessons SET position = position + 1 WHERE course_id = $1 AND position >= $2",
                )
                .bind(course.id)
                .bind(position)
                .execute(&mut *tx)
                .await?;
                position
            }
            None => count + 1,
        };

        let lesson = sqlx::query_as::<_, Lesson>(&format!(
            r#"INSERT INTO lessons (course_id, title, content, position, duration, video_url, is_published)
               VALUES ($1, $2, $3, $4, $5, $6, $7)
               RETURNING {LESSON_COLUMNS}"#
        ))
        .bind(course.id)
        .bind(&dto.title)
        .bind(&dto.content)
        .bind(position)
        .bind(dto.duration.unwrap_or(0))
        .bind(&dto.video_url)
        .bind(dto.is_published.unwrap_or(false))
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        Ok(lesson)
    }

    #[instrument(skip(db))]
    pub async fn update_lesson(
        db: &PgPool,
        lesson_id: Uuid,
        principal: &Principal,
        dto: UpdateLessonDto,
    ) -> Result<Lesson, AppError> {
        let lesson = Self::find_lesson(db, lesson_id).await?;
        let course = CourseService::find_course(db, lesson.course_id).await?;
        let ctx = CourseService::context_for(db, &course, principal).await?;
        access::can_write_course(principal, &ctx)?;

        let lesson = sqlx::query_as::<_, Lesson>(&format!(
            r#"UPDATE lessons SET
                 title = COALESCE($1, title),
                 content = COALESCE($2, content),
                 duration = COALESCE($3, duration),
                 video_url = COALESCE($4, video_url),
                 is_published = COALESCE($5, is_published),
                 updated_at = NOW()
               WHERE id = $6
               RETURNING {LESSON_COLUMNS}"#
        ))
        .bind(dto.title)
        .bind(dto.content)
        .bind(dto.duration)
        .bind(dto.video_url)
        .bind(dto.is_published)
        .bind(lesson.id)
        .fetch_one(db)
        .await?;

        Ok(lesson)
    }

    /// Removes the lesson and closes the gap it leaves: every later lesson
    /// in the course moves up one slot inside the same transaction.
    #[instrument(skip(db))]
    pub async fn delete_lesson(
        db: &PgPool,
        lesson_id: Uuid,
        principal: &Principal,
    ) -> Result<(), AppError> {
        let lesson = Self::find_lesson(db, lesson_id).await?;
        let course = CourseService::find_course(db, lesson.course_id).await?;
        let ctx = CourseService::context_for(db, &course, principal).await?;
        access::can_write_course(principal, &ctx)?;

        let mut tx = db.begin().await?;

        sqlx::query("SELECT id FROM courses WHERE id = $1 FOR UPDATE")
            .bind(course.id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query_scalar::<_, i32>(
            "DELETE FROM lessons WHERE id = $1 RETURNING position",
        )
        .bind(lesson.id)
        .fetch_optional(&mut *tx)
        .await?;

        if let Some(position) = deleted {
            sqlx::query(
                "UPDATE lessons SET position = position - 1 WHERE course_id = $1 AND position > $2",
            )
            .bind(course.id)
            .bind(position)
            .execute(&mut *tx)
            .await?;
        }

        tx.commit().await?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::courses::model::{CourseCategory, CreateCourseDto};
    use crate::modules::users::model::UserRole;
    use axum::http::StatusCode;

    async fn create_test_user(pool: &PgPool, role: UserRole) -> Uuid {
        sqlx::query_scalar::<_, Uuid>(
            r#"INSERT INTO users (first_name, last_name, email, role)
               VALUES ('Test', 'User', $1, $2) RETURNING id"#,
        )
        .bind(format!("user-{}@test.com", Uuid::new_v4()))
        .bind(role)
        .fetch_one(pool)
        .await
        .unwrap()
    }

    async fn create_test_course(pool: &PgPool, instructor_id: Uuid, published: bool) -> Uuid {
        let dto = CreateCourseDto {
            title: "Test Course".to_string(),
            description: "A test course".to_string(),
            category: CourseCategory::Programming,
            level: None,
            duration: None,
            price: None,
            published: Some(published),
        };
        CourseService::create_course(pool, instructor_id, dto)
            .await
            .unwrap()
            .id
    }

    fn principal(id: Uuid, role: UserRole) -> Principal {
        Principal { id, role }
    }

    fn lesson_dto(title: &str, position: Option<i32>) -> CreateLessonDto {
        CreateLessonDto {
            title: title.to_string(),
            content: "Lesson content".to_string(),
            position,
            duration: None,
            video_url: None,
            is_published: Some(true),
        }
    }

    async fn positions(pool: &PgPool, course_id: Uuid) -> Vec<(String, i32)> {
        sqlx::query_as::<_, (String, i32)>(
            "SELECT title, position FROM lessons WHERE course_id = $1 ORDER BY position",
        )
        .bind(course_id)
        .fetch_all(pool)
        .await
        .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn create_without_position_appends(pool: PgPool) {
        let instructor_id = create_test_user(&pool, UserRole::Instructor).await;
        let course_id = create_test_course(&pool, instructor_id, true).await;
        let owner = principal(instructor_id, UserRole::Instructor);

        let first = LessonService::create_lesson(&pool, course_id, &owner, lesson_dto("One", None))
            .await
            .unwrap();
        let second = LessonService::create_lesson(&pool, course_id, &owner, lesson_dto("Two", None))
            .await
            .unwrap();

        assert_eq!(first.position, 1);
        assert_eq!(second.position, 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn create_at_position_shifts_later_lessons(pool: PgPool) {
        let instructor_id = create_test_user(&pool, UserRole::Instructor).await;
        let course_id = create_test_course(&pool, instructor_id, true).await;
        let owner = principal(instructor_id, UserRole::Instructor);

        for title in ["A", "B", "C"] {
            LessonService::create_lesson(&pool, course_id, &owner, lesson_dto(title, None))
                .await
                .unwrap();
        }

        let inserted =
            LessonService::create_lesson(&pool, course_id, &owner, lesson_dto("New", Some(2)))
                .await
                .unwrap();
        assert_eq!(inserted.position, 2);

        let order = positions(&pool, course_id).await;
        assert_eq!(
            order,
            vec![
                ("A".to_string(), 1),
                ("New".to_string(), 2),
                ("B".to_string(), 3),
                ("C".to_string(), 4),
            ]
        );
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn create_at_out_of_range_position_rejected(pool: PgPool) {
        let instructor_id = create_test_user(&pool, UserRole::Instructor).await;
        let course_id = create_test_course(&pool, instructor_id, true).await;
        let owner = principal(instructor_id, UserRole::Instructor);

        LessonService::create_lesson(&pool, course_id, &owner, lesson_dto("Only", None))
            .await
            .unwrap();

        for bad in [0, 3, -1] {
            let err = LessonService::create_lesson(
                &pool,
                course_id,
                &owner,
                lesson_dto("Bad", Some(bad)),
            )
            .await
            .unwrap_err();
            assert_eq!(err.status, StatusCode::BAD_REQUEST);
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn delete_closes_the_gap(pool: PgPool) {
        let instructor_id = create_test_user(&pool, UserRole::Instructor).await;
        let course_id = create_test_course(&pool, instructor_id, true).await;
        let owner = principal(instructor_id, UserRole::Instructor);

        let mut ids = Vec::new();
        for title in ["A", "B", "C"] {
            let lesson =
                LessonService::create_lesson(&pool, course_id, &owner, lesson_dto(title, None))
                    .await
                    .unwrap();
            ids.push(lesson.id);
        }

        LessonService::delete_lesson(&pool, ids[1], &owner).await.unwrap();

        let order = positions(&pool, course_id).await;
        assert_eq!(order, vec![("A".to_string(), 1), ("C".to_string(), 2)]);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn students_see_published_lessons_only(pool: PgPool) {
        let instructor_id = create_test_user(&pool, UserRole::Instructor).await;
        let student_id = create_test_user(&pool, UserRole::Student).await;
        let course_id = create_test_course(&pool, instructor_id, true).await;
        let owner = principal(instructor_id, UserRole::Instructor);
        let student = principal(student_id, UserRole::Student);

        LessonService::create_lesson(&pool, course_id, &owner, lesson_dto("Published", None))
            .await
            .unwrap();
        let mut draft = lesson_dto("Draft", None);
        draft.is_published = Some(false);
        let draft = LessonService::create_lesson(&pool, course_id, &owner, draft)
            .await
            .unwrap();

        CourseService::enroll(&pool, course_id, &student).await.unwrap();

        let visible = LessonService::list_lessons(&pool, course_id, &student).await.unwrap();
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].title, "Published");

        let err = LessonService::get_lesson(&pool, draft.id, &student)
            .await
            .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);

        let all = LessonService::list_lessons(&pool, course_id, &owner).await.unwrap();
        assert_eq!(all.len(), 2);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn unenrolled_student_cannot_list_lessons(pool: PgPool) {
        let instructor_id = create_test_user(&pool, UserRole::Instructor).await;
        let student_id = create_test_user(&pool, UserRole::Student).await;
        let course_id = create_test_course(&pool, instructor_id, true).await;
        let owner = principal(instructor_id, UserRole::Instructor);

        LessonService::create_lesson(&pool, course_id, &owner, lesson_dto("One", None))
            .await
            .unwrap();

        let err = LessonService::list_lessons(
            &pool,
            course_id,
            &principal(student_id, UserRole::Student),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);
    }

    #[sqlx::test(migrations = "./migrations")]
    async fn update_lesson_owner_only(pool: PgPool) {
        let instructor_id = create_test_user(&pool, UserRole::Instructor).await;
        let other_id = create_test_user(&pool, UserRole::Instructor).await;
        let course_id = create_test_course(&pool, instructor_id, true).await;
        let owner = principal(instructor_id, UserRole::Instructor);

        let lesson = LessonService::create_lesson(&pool, course_id, &owner, lesson_dto("One", None))
            .await
            .unwrap();

        let err = LessonService::update_lesson(
            &pool,
            lesson.id,
            &principal(other_id, UserRole::Instructor),
            UpdateLessonDto {
                title: Some("Hijacked".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
        assert_eq!(err.status, StatusCode::FORBIDDEN);

        let updated = LessonService::update_lesson(
            &pool,
            lesson.id,
            &owner,
            UpdateLessonDto {
                title: Some("Renamed".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.title, "Renamed");
        assert_eq!(updated.position, 1);
    }
}
