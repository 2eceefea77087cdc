//! SQLite-backed resource catalog implementation.

use std::path::Path;
use std::sync::{Mutex, MutexGuard};

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::{params, Connection, OptionalExtension, ToSql};

use super::{
    CatalogError, CatalogStore, Category, ContactType, DownloadRecord, HelpRequest,
    HelpRequestStatus, ListedResource, NewCategory, Resource, SearchRecord,
};
use crate::search::{escape_like, ResourceFilter, SortMode};

const RESOURCE_COLUMNS: &str = "r.id, r.title, r.description, r.size, r.type, r.category_id, \
     r.source, r.download_url, r.extract_code, r.file_count, r.view_count, r.download_count, \
     r.valid, r.expire_time, r.upload_time, c.label";

/// SQLite-backed resource catalog.
pub struct SqliteCatalog {
    conn: Mutex<Connection>,
}

impl SqliteCatalog {
    /// Open (or create) the catalog database at `path`.
    pub fn new(path: &Path) -> Result<Self, CatalogError> {
        let conn = Connection::open(path)?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    /// Create an in-memory SQLite catalog (useful for testing).
    pub fn in_memory() -> Result<Self, CatalogError> {
        let conn = Connection::open_in_memory()?;
        Self::initialize_schema(&conn)?;
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn initialize_schema(conn: &Connection) -> Result<(), CatalogError> {
        conn.execute_batch(
            r#"
            PRAGMA foreign_keys = ON;

            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                value TEXT NOT NULL UNIQUE,
                label TEXT NOT NULL,
                icon TEXT NOT NULL DEFAULT '',
                sort_order INTEGER NOT NULL DEFAULT 0,
                is_active INTEGER NOT NULL DEFAULT 1,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE TABLE IF NOT EXISTS resources (
                id TEXT PRIMARY KEY,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                size TEXT NOT NULL DEFAULT '',
                type TEXT NOT NULL DEFAULT '',
                category_id INTEGER NOT NULL,
                source TEXT NOT NULL DEFAULT '',
                download_url TEXT NOT NULL,
                extract_code TEXT,
                file_count INTEGER NOT NULL DEFAULT 1,
                view_count INTEGER NOT NULL DEFAULT 0,
                download_count INTEGER NOT NULL DEFAULT 0,
                valid INTEGER NOT NULL DEFAULT 1,
                expire_time TEXT,
                upload_time TEXT NOT NULL,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_resources_category ON resources(category_id);
            CREATE INDEX IF NOT EXISTS idx_resources_popularity ON resources(view_count DESC, download_count DESC);
            CREATE INDEX IF NOT EXISTS idx_resources_upload_time ON resources(upload_time);

            CREATE TABLE IF NOT EXISTS resource_tags (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                resource_id TEXT NOT NULL REFERENCES resources(id) ON DELETE CASCADE,
                tag_name TEXT NOT NULL,
                created_at TEXT NOT NULL,
                UNIQUE(resource_id, tag_name)
            );

            CREATE TABLE IF NOT EXISTS search_records (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                keyword TEXT NOT NULL,
                category TEXT NOT NULL DEFAULT '',
                sort_by TEXT NOT NULL DEFAULT '',
                user_id TEXT NOT NULL DEFAULT '',
                ip_address TEXT NOT NULL DEFAULT '',
                user_agent TEXT NOT NULL DEFAULT '',
                result_count INTEGER NOT NULL DEFAULT 0,
                search_time TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_search_records_keyword ON search_records(keyword);

            CREATE TABLE IF NOT EXISTS download_records (
                id TEXT PRIMARY KEY,
                resource_id TEXT NOT NULL,
                user_id TEXT NOT NULL DEFAULT '',
                user_agent TEXT NOT NULL DEFAULT '',
                ip_address TEXT NOT NULL DEFAULT '',
                download_time TEXT NOT NULL
            );

            CREATE INDEX IF NOT EXISTS idx_download_records_resource ON download_records(resource_id);

            CREATE TABLE IF NOT EXISTS help_requests (
                id TEXT PRIMARY KEY,
                resource_name TEXT NOT NULL,
                resource_type TEXT NOT NULL DEFAULT '',
                description TEXT NOT NULL DEFAULT '',
                contact TEXT NOT NULL,
                contact_type TEXT NOT NULL,
                status TEXT NOT NULL DEFAULT 'pending',
                admin_notes TEXT,
                completed_time TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            );
            "#,
        )?;

        Ok(())
    }

    fn conn(&self) -> Result<MutexGuard<'_, Connection>, CatalogError> {
        self.conn
            .lock()
            .map_err(|_| CatalogError::Internal("catalog connection lock poisoned".to_string()))
    }

    /// Insert a category. Fails if the `value` is already taken.
    pub fn insert_category(&self, category: &NewCategory) -> Result<Category, CatalogError> {
        let conn = self.conn()?;
        let now = db_time(&Utc::now());

        conn.execute(
            "INSERT INTO categories (value, label, icon, sort_order, is_active, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)",
            params![
                &category.value,
                &category.label,
                &category.icon,
                category.sort_order,
                category.is_active,
                &now,
                &now,
            ],
        )?;

        Ok(Category {
            id: conn.last_insert_rowid(),
            value: category.value.clone(),
            label: category.label.clone(),
            icon: category.icon.clone(),
            sort_order: category.sort_order,
            is_active: category.is_active,
        })
    }

    /// Insert a resource and its tags.
    pub fn insert_resource(&self, resource: &Resource) -> Result<(), CatalogError> {
        let mut conn = self.conn()?;
        let now = db_time(&Utc::now());
        let tx = conn.transaction()?;

        tx.execute(
            "INSERT INTO resources (id, title, description, size, type, category_id, source,
                download_url, extract_code, file_count, view_count, download_count, valid,
                expire_time, upload_time, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                &resource.id,
                &resource.title,
                &resource.description,
                &resource.size,
                &resource.resource_type,
                resource.category_id,
                &resource.source,
                &resource.download_url,
                &resource.extract_code,
                resource.file_count,
                resource.view_count as i64,
                resource.download_count as i64,
                resource.valid,
                resource.expire_time.as_ref().map(db_time),
                db_time(&resource.upload_time),
                &now,
                &now,
            ],
        )?;

        for tag in &resource.tags {
            tx.execute(
                "INSERT OR IGNORE INTO resource_tags (resource_id, tag_name, created_at) VALUES (?, ?, ?)",
                params![&resource.id, tag, &now],
            )?;
        }

        tx.commit()?;
        Ok(())
    }

    /// Download events recorded for a resource, oldest first.
    pub fn download_records(&self, resource_id: &str) -> Result<Vec<DownloadRecord>, CatalogError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, resource_id, user_id, user_agent, ip_address, download_time
             FROM download_records WHERE resource_id = ? ORDER BY download_time ASC, id ASC",
        )?;

        let rows = stmt.query_map(params![resource_id], |row| {
            let download_time: String = row.get(5)?;
            Ok(DownloadRecord {
                id: row.get(0)?,
                resource_id: row.get(1)?,
                user_id: row.get(2)?,
                user_agent: row.get(3)?,
                ip_address: row.get(4)?,
                download_time: parse_db_time(5, &download_time)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(CatalogError::from)
    }

    /// Logged searches, oldest first.
    pub fn search_records(&self) -> Result<Vec<SearchRecord>, CatalogError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT keyword, category, sort_by, user_id, ip_address, user_agent, result_count, search_time
             FROM search_records ORDER BY id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            let search_time: String = row.get(7)?;
            Ok(SearchRecord {
                keyword: row.get(0)?,
                category: row.get(1)?,
                sort_by: row.get(2)?,
                user_id: row.get(3)?,
                ip_address: row.get(4)?,
                user_agent: row.get(5)?,
                result_count: row.get::<_, i64>(6)? as u64,
                search_time: parse_db_time(7, &search_time)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(CatalogError::from)
    }

    /// Get a help request by id.
    pub fn get_help_request(&self, id: &str) -> Result<HelpRequest, CatalogError> {
        let conn = self.conn()?;
        conn.query_row(
            "SELECT id, resource_name, resource_type, description, contact, contact_type, status,
                    admin_notes, completed_time, created_at, updated_at
             FROM help_requests WHERE id = ?",
            params![id],
            Self::row_to_help_request,
        )
        .optional()?
        .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    fn build_where_clause(filter: &ResourceFilter) -> (String, Vec<Box<dyn ToSql>>) {
        let mut conditions = vec!["r.valid = 1".to_string()];
        let mut params: Vec<Box<dyn ToSql>> = Vec::new();

        for term in &filter.terms {
            let pattern = format!("%{}%", escape_like(term));
            conditions.push(
                "(r.title LIKE ? ESCAPE '\\' OR r.description LIKE ? ESCAPE '\\')".to_string(),
            );
            params.push(Box::new(pattern.clone()));
            params.push(Box::new(pattern));
        }

        if let Some(ref category) = filter.category {
            conditions.push("c.value = ?".to_string());
            params.push(Box::new(category.clone()));
        }

        (format!("WHERE {}", conditions.join(" AND ")), params)
    }

    fn order_clause(sort: SortMode) -> &'static str {
        match sort {
            SortMode::Relevance => "ORDER BY r.view_count DESC, r.download_count DESC, r.id ASC",
            SortMode::Time => "ORDER BY r.upload_time DESC, r.id ASC",
            SortMode::Size => "ORDER BY r.size DESC, r.id ASC",
        }
    }

    fn load_tags(conn: &Connection, resource_id: &str) -> Result<Vec<String>, CatalogError> {
        let mut stmt =
            conn.prepare("SELECT tag_name FROM resource_tags WHERE resource_id = ? ORDER BY id")?;
        let rows = stmt.query_map(params![resource_id], |row| row.get(0))?;
        rows.collect::<Result<Vec<String>, _>>()
            .map_err(CatalogError::from)
    }

    /// Map a row selected with `RESOURCE_COLUMNS` (tags loaded separately).
    fn row_to_listed_resource(row: &rusqlite::Row) -> rusqlite::Result<ListedResource> {
        let expire_time: Option<String> = row.get(13)?;
        let upload_time: String = row.get(14)?;
        let category_label: Option<String> = row.get(15)?;

        let resource = Resource {
            id: row.get(0)?,
            title: row.get(1)?,
            description: row.get(2)?,
            size: row.get(3)?,
            resource_type: row.get(4)?,
            category_id: row.get(5)?,
            source: row.get(6)?,
            download_url: row.get(7)?,
            extract_code: row.get(8)?,
            file_count: row.get(9)?,
            view_count: row.get::<_, i64>(10)? as u64,
            download_count: row.get::<_, i64>(11)? as u64,
            valid: row.get(12)?,
            expire_time: expire_time
                .as_deref()
                .map(|s| parse_db_time(13, s))
                .transpose()?,
            upload_time: parse_db_time(14, &upload_time)?,
            tags: Vec::new(),
        };

        Ok(ListedResource {
            resource,
            category_label: category_label.unwrap_or_default(),
        })
    }

    fn row_to_help_request(row: &rusqlite::Row) -> rusqlite::Result<HelpRequest> {
        let contact_type: String = row.get(5)?;
        let status: String = row.get(6)?;
        let completed_time: Option<String> = row.get(8)?;
        let created_at: String = row.get(9)?;
        let updated_at: String = row.get(10)?;

        Ok(HelpRequest {
            id: row.get(0)?,
            resource_name: row.get(1)?,
            resource_type: row.get(2)?,
            description: row.get(3)?,
            contact: row.get(4)?,
            contact_type: ContactType::parse(&contact_type)
                .ok_or_else(|| invalid_text(5, format!("unknown contact type {contact_type}")))?,
            status: HelpRequestStatus::parse(&status)
                .ok_or_else(|| invalid_text(6, format!("unknown status {status}")))?,
            admin_notes: row.get(7)?,
            completed_time: completed_time
                .as_deref()
                .map(|s| parse_db_time(8, s))
                .transpose()?,
            created_at: parse_db_time(9, &created_at)?,
            updated_at: parse_db_time(10, &updated_at)?,
        })
    }
}

impl CatalogStore for SqliteCatalog {
    fn count_resources(&self, filter: &ResourceFilter) -> Result<u64, CatalogError> {
        let conn = self.conn()?;
        let (where_clause, params) = Self::build_where_clause(filter);

        let sql = format!(
            "SELECT COUNT(*) FROM resources r LEFT JOIN categories c ON c.id = r.category_id {}",
            where_clause
        );
        let param_refs: Vec<&dyn ToSql> = params.iter().map(|p| p.as_ref()).collect();

        let count: i64 = conn.query_row(&sql, param_refs.as_slice(), |row| row.get(0))?;
        Ok(count as u64)
    }

    fn find_resources(
        &self,
        filter: &ResourceFilter,
        sort: SortMode,
        offset: u64,
        limit: u32,
    ) -> Result<Vec<ListedResource>, CatalogError> {
        let conn = self.conn()?;
        let (where_clause, params) = Self::build_where_clause(filter);

        let sql = format!(
            "SELECT {} FROM resources r LEFT JOIN categories c ON c.id = r.category_id {} {} LIMIT ? OFFSET ?",
            RESOURCE_COLUMNS,
            where_clause,
            Self::order_clause(sort)
        );

        let mut all_params = params;
        all_params.push(Box::new(limit as i64));
        all_params.push(Box::new(offset.min(i64::MAX as u64) as i64));
        let param_refs: Vec<&dyn ToSql> = all_params.iter().map(|p| p.as_ref()).collect();

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(param_refs.as_slice(), Self::row_to_listed_resource)?;

        let mut results = Vec::new();
        for row in rows {
            let mut listed = row?;
            listed.resource.tags = Self::load_tags(&conn, &listed.resource.id)?;
            results.push(listed);
        }

        Ok(results)
    }

    fn get_resource(&self, id: &str) -> Result<Resource, CatalogError> {
        let conn = self.conn()?;

        let sql = format!(
            "SELECT {} FROM resources r LEFT JOIN categories c ON c.id = r.category_id WHERE r.id = ?",
            RESOURCE_COLUMNS
        );

        let mut listed = conn
            .query_row(&sql, params![id], Self::row_to_listed_resource)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => CatalogError::NotFound(id.to_string()),
                _ => CatalogError::Database(e.to_string()),
            })?;

        listed.resource.tags = Self::load_tags(&conn, id)?;
        Ok(listed.resource)
    }

    fn active_categories(&self) -> Result<Vec<Category>, CatalogError> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, value, label, icon, sort_order, is_active
             FROM categories WHERE is_active = 1 ORDER BY sort_order ASC, id ASC",
        )?;

        let rows = stmt.query_map([], |row| {
            Ok(Category {
                id: row.get(0)?,
                value: row.get(1)?,
                label: row.get(2)?,
                icon: row.get(3)?,
                sort_order: row.get(4)?,
                is_active: row.get(5)?,
            })
        })?;

        rows.collect::<Result<Vec<_>, _>>().map_err(CatalogError::from)
    }

    fn count_valid_in_category(&self, category_id: i64) -> Result<u64, CatalogError> {
        let conn = self.conn()?;
        let count: i64 = conn.query_row(
            "SELECT COUNT(*) FROM resources WHERE category_id = ? AND valid = 1",
            params![category_id],
            |row| row.get(0),
        )?;
        Ok(count as u64)
    }

    fn keywords_with_prefix(&self, prefix: &str, limit: u32) -> Result<Vec<String>, CatalogError> {
        let conn = self.conn()?;
        let pattern = format!("{}%", escape_like(prefix));

        let mut stmt = conn.prepare(
            "SELECT keyword FROM search_records
             WHERE keyword LIKE ?1 ESCAPE '\\'
             GROUP BY keyword
             ORDER BY MAX(result_count) DESC, keyword ASC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![&pattern, limit as i64], |row| row.get(0))?;

        rows.collect::<Result<Vec<String>, _>>()
            .map_err(CatalogError::from)
    }

    fn titles_containing(&self, fragment: &str, limit: u32) -> Result<Vec<String>, CatalogError> {
        let conn = self.conn()?;
        let pattern = format!("%{}%", escape_like(fragment));

        let mut stmt = conn.prepare(
            "SELECT title FROM resources
             WHERE valid = 1 AND title LIKE ?1 ESCAPE '\\'
             GROUP BY title
             ORDER BY MAX(view_count) DESC, title ASC
             LIMIT ?2",
        )?;
        let rows = stmt.query_map(params![&pattern, limit as i64], |row| row.get(0))?;

        rows.collect::<Result<Vec<String>, _>>()
            .map_err(CatalogError::from)
    }

    fn record_download(&self, record: &DownloadRecord) -> Result<(), CatalogError> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        let rows_affected = tx.execute(
            "UPDATE resources SET download_count = download_count + 1, updated_at = ? WHERE id = ?",
            params![db_time(&record.download_time), &record.resource_id],
        )?;
        if rows_affected == 0 {
            return Err(CatalogError::NotFound(record.resource_id.clone()));
        }

        tx.execute(
            "INSERT INTO download_records (id, resource_id, user_id, user_agent, ip_address, download_time)
             VALUES (?, ?, ?, ?, ?, ?)",
            params![
                &record.id,
                &record.resource_id,
                &record.user_id,
                &record.user_agent,
                &record.ip_address,
                db_time(&record.download_time),
            ],
        )?;

        tx.commit()?;
        Ok(())
    }

    fn insert_search_record(&self, record: &SearchRecord) -> Result<(), CatalogError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO search_records (keyword, category, sort_by, user_id, ip_address, user_agent, result_count, search_time)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                &record.keyword,
                &record.category,
                &record.sort_by,
                &record.user_id,
                &record.ip_address,
                &record.user_agent,
                record.result_count.min(i64::MAX as u64) as i64,
                db_time(&record.search_time),
            ],
        )?;
        Ok(())
    }

    fn insert_help_request(&self, request: &HelpRequest) -> Result<(), CatalogError> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO help_requests (id, resource_name, resource_type, description, contact,
                contact_type, status, admin_notes, completed_time, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
            params![
                &request.id,
                &request.resource_name,
                &request.resource_type,
                &request.description,
                &request.contact,
                request.contact_type.as_str(),
                request.status.as_str(),
                &request.admin_notes,
                request.completed_time.as_ref().map(db_time),
                db_time(&request.created_at),
                db_time(&request.updated_at),
            ],
        )?;
        Ok(())
    }
}

/// Fixed-width UTC timestamps so that text ordering is chronological.
fn db_time(dt: &DateTime<Utc>) -> String {
    dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_db_time(column: usize, value: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(column, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn invalid_text(column: usize, message: String) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(
        column,
        rusqlite::types::Type::Text,
        message.into(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn create_test_catalog() -> SqliteCatalog {
        SqliteCatalog::in_memory().unwrap()
    }

    fn seed_category(catalog: &SqliteCatalog, value: &str, label: &str, order: i32) -> Category {
        catalog
            .insert_category(&NewCategory::new(value, label, order))
            .unwrap()
    }

    fn create_test_resource(id: &str, title: &str, category_id: i64) -> Resource {
        let mut resource = Resource::new(id, title, category_id, format!("https://pan.example.com/s/{id}"));
        resource.size = "1.2GB".to_string();
        resource.resource_type = "archive".to_string();
        resource.source = "Example Pan".to_string();
        resource
    }

    fn search_record(keyword: &str, result_count: u64) -> SearchRecord {
        SearchRecord {
            keyword: keyword.to_string(),
            category: String::new(),
            sort_by: "relevance".to_string(),
            user_id: String::new(),
            ip_address: "127.0.0.1".to_string(),
            user_agent: "test".to_string(),
            result_count,
            search_time: Utc::now(),
        }
    }

    #[test]
    fn test_insert_and_get_resource() {
        let catalog = create_test_catalog();
        let doc = seed_category(&catalog, "document", "Documents", 1);

        let mut resource = create_test_resource("r1", "Linux Guide", doc.id);
        resource.extract_code = Some("ab12".to_string());
        resource.tags = vec!["linux".to_string(), "ebook".to_string()];
        resource.expire_time = Some(Utc::now() + Duration::days(30));
        catalog.insert_resource(&resource).unwrap();

        let loaded = catalog.get_resource("r1").unwrap();
        assert_eq!(loaded.title, "Linux Guide");
        assert_eq!(loaded.extract_code.as_deref(), Some("ab12"));
        assert_eq!(loaded.tags, vec!["linux", "ebook"]);
        assert!(loaded.expire_time.is_some());
        assert_eq!(loaded.category_id, doc.id);
    }

    #[test]
    fn test_get_nonexistent() {
        let catalog = create_test_catalog();
        let result = catalog.get_resource("missing");
        assert!(matches!(result, Err(CatalogError::NotFound(_))));
    }

    #[test]
    fn test_search_requires_every_term() {
        let catalog = create_test_catalog();
        let cat = seed_category(&catalog, "document", "Documents", 1);

        let mut guide = create_test_resource("r1", "Linux Guide", cat.id);
        guide.description = "Covers the kernel in depth".to_string();
        catalog.insert_resource(&guide).unwrap();
        catalog
            .insert_resource(&create_test_resource("r2", "Linux Desktop", cat.id))
            .unwrap();

        let filter = ResourceFilter::from_request("Linux kernel", None);
        assert_eq!(catalog.count_resources(&filter).unwrap(), 1);

        let found = catalog
            .find_resources(&filter, SortMode::Relevance, 0, 10)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].resource.id, "r1");
        assert_eq!(found[0].category_label, "Documents");
    }

    #[test]
    fn test_search_is_case_insensitive_for_ascii() {
        let catalog = create_test_catalog();
        let cat = seed_category(&catalog, "document", "Documents", 1);
        catalog
            .insert_resource(&create_test_resource("r1", "Linux Guide", cat.id))
            .unwrap();

        let filter = ResourceFilter::from_request("linux", None);
        assert_eq!(catalog.count_resources(&filter).unwrap(), 1);
    }

    #[test]
    fn test_wildcards_are_literal() {
        let catalog = create_test_catalog();
        let cat = seed_category(&catalog, "software", "Software", 1);
        catalog
            .insert_resource(&create_test_resource("r1", "100% free tool", cat.id))
            .unwrap();
        catalog
            .insert_resource(&create_test_resource("r2", "1000 icons", cat.id))
            .unwrap();

        let filter = ResourceFilter::from_request("100%", None);
        let found = catalog
            .find_resources(&filter, SortMode::Relevance, 0, 10)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].resource.id, "r1");

        let underscore = ResourceFilter::from_request("_", None);
        assert_eq!(catalog.count_resources(&underscore).unwrap(), 0);
    }

    #[test]
    fn test_invalid_resources_excluded() {
        let catalog = create_test_catalog();
        let cat = seed_category(&catalog, "movie", "Movies", 1);

        let mut dead = create_test_resource("dead", "Old Movie", cat.id);
        dead.valid = false;
        catalog.insert_resource(&dead).unwrap();
        catalog
            .insert_resource(&create_test_resource("live", "New Movie", cat.id))
            .unwrap();

        let filter = ResourceFilter::valid_only();
        assert_eq!(catalog.count_resources(&filter).unwrap(), 1);
        assert_eq!(catalog.count_valid_in_category(cat.id).unwrap(), 1);

        // Still reachable by id
        assert!(!catalog.get_resource("dead").unwrap().valid);
    }

    #[test]
    fn test_expired_resources_still_listed() {
        let catalog = create_test_catalog();
        let cat = seed_category(&catalog, "movie", "Movies", 1);

        let mut expired = create_test_resource("r1", "Expired Link", cat.id);
        expired.expire_time = Some(Utc::now() - Duration::days(1));
        catalog.insert_resource(&expired).unwrap();

        assert_eq!(catalog.count_resources(&ResourceFilter::valid_only()).unwrap(), 1);
    }

    #[test]
    fn test_category_filter_uses_value() {
        let catalog = create_test_catalog();
        let movies = seed_category(&catalog, "movie", "Movies", 1);
        let docs = seed_category(&catalog, "document", "Documents", 2);

        catalog
            .insert_resource(&create_test_resource("m1", "Film", movies.id))
            .unwrap();
        catalog
            .insert_resource(&create_test_resource("d1", "Paper", docs.id))
            .unwrap();

        let filter = ResourceFilter::from_request("", Some("document"));
        let found = catalog
            .find_resources(&filter, SortMode::Relevance, 0, 10)
            .unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].resource.id, "d1");

        let all = ResourceFilter::from_request("", Some("all"));
        assert_eq!(catalog.count_resources(&all).unwrap(), 2);
    }

    #[test]
    fn test_relevance_order_with_id_tiebreak() {
        let catalog = create_test_catalog();
        let cat = seed_category(&catalog, "document", "Documents", 1);

        for (id, views, downloads) in [("b", 10, 1), ("a", 10, 1), ("c", 10, 9), ("d", 99, 0)] {
            let mut r = create_test_resource(id, "Same", cat.id);
            r.view_count = views;
            r.download_count = downloads;
            catalog.insert_resource(&r).unwrap();
        }

        let found = catalog
            .find_resources(&ResourceFilter::valid_only(), SortMode::Relevance, 0, 10)
            .unwrap();
        let ids: Vec<&str> = found.iter().map(|l| l.resource.id.as_str()).collect();
        assert_eq!(ids, vec!["d", "c", "a", "b"]);
    }

    #[test]
    fn test_time_order_newest_first() {
        let catalog = create_test_catalog();
        let cat = seed_category(&catalog, "document", "Documents", 1);
        let now = Utc::now();

        for (id, age_days) in [("old", 10), ("new", 0), ("mid", 5)] {
            let mut r = create_test_resource(id, "Doc", cat.id);
            r.upload_time = now - Duration::days(age_days);
            catalog.insert_resource(&r).unwrap();
        }

        let found = catalog
            .find_resources(&ResourceFilter::valid_only(), SortMode::Time, 0, 10)
            .unwrap();
        let ids: Vec<&str> = found.iter().map(|l| l.resource.id.as_str()).collect();
        assert_eq!(ids, vec!["new", "mid", "old"]);
    }

    #[test]
    fn test_size_order_is_lexicographic() {
        let catalog = create_test_catalog();
        let cat = seed_category(&catalog, "software", "Software", 1);

        for (id, size) in [("big", "10MB"), ("small", "2KB")] {
            let mut r = create_test_resource(id, "Tool", cat.id);
            r.size = size.to_string();
            catalog.insert_resource(&r).unwrap();
        }

        let found = catalog
            .find_resources(&ResourceFilter::valid_only(), SortMode::Size, 0, 10)
            .unwrap();
        assert_eq!(found[0].resource.id, "small");
    }

    #[test]
    fn test_offset_and_limit() {
        let catalog = create_test_catalog();
        let cat = seed_category(&catalog, "document", "Documents", 1);
        for i in 0..7 {
            catalog
                .insert_resource(&create_test_resource(&format!("r{i}"), "Doc", cat.id))
                .unwrap();
        }

        let filter = ResourceFilter::valid_only();
        let page = catalog
            .find_resources(&filter, SortMode::Relevance, 5, 5)
            .unwrap();
        assert_eq!(page.len(), 2);
        assert_eq!(page[0].resource.id, "r5");
    }

    #[test]
    fn test_active_categories_sorted() {
        let catalog = create_test_catalog();
        seed_category(&catalog, "tv", "TV", 3);
        seed_category(&catalog, "movie", "Movies", 1);
        let mut hidden = NewCategory::new("hidden", "Hidden", 0);
        hidden.is_active = false;
        catalog.insert_category(&hidden).unwrap();

        let categories = catalog.active_categories().unwrap();
        let values: Vec<&str> = categories.iter().map(|c| c.value.as_str()).collect();
        assert_eq!(values, vec!["movie", "tv"]);
    }

    #[test]
    fn test_duplicate_category_value_rejected() {
        let catalog = create_test_catalog();
        seed_category(&catalog, "movie", "Movies", 1);
        let result = catalog.insert_category(&NewCategory::new("movie", "Films", 2));
        assert!(matches!(result, Err(CatalogError::Database(_))));
    }

    fn download_record(id: &str, resource_id: &str) -> DownloadRecord {
        DownloadRecord {
            id: id.to_string(),
            resource_id: resource_id.to_string(),
            user_id: "user_001".to_string(),
            user_agent: "curl".to_string(),
            ip_address: "10.0.0.1".to_string(),
            download_time: Utc::now(),
        }
    }

    #[test]
    fn test_record_download_bumps_counter() {
        let catalog = create_test_catalog();
        let cat = seed_category(&catalog, "document", "Documents", 1);
        let mut r = create_test_resource("r1", "Doc", cat.id);
        r.download_count = 5;
        catalog.insert_resource(&r).unwrap();

        catalog.record_download(&download_record("dl_1", "r1")).unwrap();
        catalog.record_download(&download_record("dl_2", "r1")).unwrap();
        assert_eq!(catalog.get_resource("r1").unwrap().download_count, 7);

        let stored = catalog.download_records("r1").unwrap();
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[0].user_id, "user_001");
    }

    #[test]
    fn test_record_download_unknown_resource_writes_nothing() {
        let catalog = create_test_catalog();

        let missing = catalog.record_download(&download_record("dl_1", "nope"));
        assert!(matches!(missing, Err(CatalogError::NotFound(_))));
        assert!(catalog.download_records("nope").unwrap().is_empty());
    }

    #[test]
    fn test_record_download_rolls_back_counter_on_insert_failure() {
        let catalog = create_test_catalog();
        let cat = seed_category(&catalog, "document", "Documents", 1);
        catalog.insert_resource(&create_test_resource("r1", "Doc", cat.id)).unwrap();

        catalog.record_download(&download_record("dl_1", "r1")).unwrap();
        // Same id again violates the primary key after the counter update ran
        let duplicate = catalog.record_download(&download_record("dl_1", "r1"));
        assert!(matches!(duplicate, Err(CatalogError::Database(_))));

        assert_eq!(catalog.get_resource("r1").unwrap().download_count, 1);
        assert_eq!(catalog.download_records("r1").unwrap().len(), 1);
    }

    #[test]
    fn test_keywords_with_prefix_ranked_by_result_count() {
        let catalog = create_test_catalog();
        for (keyword, count) in [
            ("movie night", 3),
            ("movies 2024", 40),
            ("movie night", 12),
            ("music", 100),
            ("a movie", 500),
        ] {
            catalog.insert_search_record(&search_record(keyword, count)).unwrap();
        }

        let keywords = catalog.keywords_with_prefix("mov", 5).unwrap();
        assert_eq!(keywords, vec!["movies 2024", "movie night"]);
    }

    #[test]
    fn test_keywords_limit() {
        let catalog = create_test_catalog();
        for i in 0..8 {
            catalog
                .insert_search_record(&search_record(&format!("key{i}"), i))
                .unwrap();
        }
        assert_eq!(catalog.keywords_with_prefix("key", 5).unwrap().len(), 5);
    }

    #[test]
    fn test_titles_containing_valid_only_distinct() {
        let catalog = create_test_catalog();
        let cat = seed_category(&catalog, "movie", "Movies", 1);

        let mut popular = create_test_resource("r1", "Best Movies Ever", cat.id);
        popular.view_count = 100;
        catalog.insert_resource(&popular).unwrap();

        let mut duplicate = create_test_resource("r2", "Best Movies Ever", cat.id);
        duplicate.view_count = 1;
        catalog.insert_resource(&duplicate).unwrap();

        let mut other = create_test_resource("r3", "Moving Pictures", cat.id);
        other.view_count = 50;
        catalog.insert_resource(&other).unwrap();

        let mut dead = create_test_resource("r4", "Movie Archive", cat.id);
        dead.valid = false;
        dead.view_count = 1000;
        catalog.insert_resource(&dead).unwrap();

        let titles = catalog.titles_containing("Mov", 5).unwrap();
        assert_eq!(titles, vec!["Best Movies Ever", "Moving Pictures"]);
    }

    #[test]
    fn test_search_records_roundtrip() {
        let catalog = create_test_catalog();
        catalog.insert_search_record(&search_record("linux", 2)).unwrap();

        let records = catalog.search_records().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].keyword, "linux");
        assert_eq!(records[0].result_count, 2);
    }

    #[test]
    fn test_help_request_roundtrip() {
        let catalog = create_test_catalog();
        let now = Utc::now();
        let request = HelpRequest {
            id: "req_1".to_string(),
            resource_name: "Rare Documentary".to_string(),
            resource_type: "movie".to_string(),
            description: "1080p please".to_string(),
            contact: "someone@example.com".to_string(),
            contact_type: ContactType::Email,
            status: HelpRequestStatus::Pending,
            admin_notes: None,
            completed_time: None,
            created_at: now,
            updated_at: now,
        };
        catalog.insert_help_request(&request).unwrap();

        let loaded = catalog.get_help_request("req_1").unwrap();
        assert_eq!(loaded.resource_name, "Rare Documentary");
        assert_eq!(loaded.contact_type, ContactType::Email);
        assert_eq!(loaded.status, HelpRequestStatus::Pending);

        assert!(matches!(
            catalog.get_help_request("req_2"),
            Err(CatalogError::NotFound(_))
        ));
    }

    #[test]
    fn test_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.db");

        {
            let catalog = SqliteCatalog::new(&path).unwrap();
            let cat = seed_category(&catalog, "document", "Documents", 1);
            catalog
                .insert_resource(&create_test_resource("r1", "Doc", cat.id))
                .unwrap();
        }

        let reopened = SqliteCatalog::new(&path).unwrap();
        assert_eq!(reopened.get_resource("r1").unwrap().title, "Doc");
    }
}
