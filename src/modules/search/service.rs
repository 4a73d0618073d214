use anyhow::Context;
use sqlx::PgPool;
use tracing::instrument;

use coursehub_auth::{ResolvedIdentity, filter_for_listing};
use coursehub_core::AppError;
use coursehub_models::{CatalogSort, Course, SearchResult, SearchResultKind};

use crate::modules::courses::service::COURSE_COLUMNS;

pub const MAX_SEARCH_RESULTS: i64 = 8;

/// Escapes `%`, `_` and `\` so user input matches literally in
/// `LIKE ... ESCAPE '\'`.
pub fn escape_like(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub struct SearchService;

impl SearchService {
    /// Public courses whose title or description contains `query`,
    /// case-insensitively, each annotated with the caller's access.
    /// A blank query matches nothing.
    #[instrument(skip(db, identity))]
    pub async fn search(
        db: &PgPool,
        identity: &ResolvedIdentity,
        query: &str,
    ) -> Result<Vec<SearchResult>, AppError> {
        let query = query.trim();
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let pattern = format!("%{}%", escape_like(query));
        let courses = sqlx::query_as::<_, Course>(&format!(
            r#"SELECT {COURSE_COLUMNS} FROM courses
               WHERE privacy = 'public'
                 AND (title ILIKE $1 ESCAPE '\' OR description ILIKE $1 ESCAPE '\')
               ORDER BY created_at DESC
               LIMIT $2"#
        ))
        .bind(&pattern)
        .bind(MAX_SEARCH_RESULTS)
        .fetch_all(db)
        .await
        .context("Failed to search courses")
        .map_err(AppError::database)?;

        Ok(filter_for_listing(identity, courses, CatalogSort::Newest)
            .into_iter()
            .map(|listed| SearchResult {
                id: listed.course.id,
                title: listed.course.title,
                image: listed.course.image,
                has_access: listed.has_access,
                kind: SearchResultKind::Course,
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("rust"), "rust");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("snake_case"), "snake\\_case");
        assert_eq!(escape_like(r"C:\path"), r"C:\\path");
    }
}
