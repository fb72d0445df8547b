//! Database Connection Pool Module
//!
//! PostgreSQL connection pooling using deadpool-postgres, and the
//! [`CatalogStore`] implementation over it. Table layout lives in
//! `sql/schema.sql`.

use ::async_trait::async_trait;
use deadpool_postgres::{Config, ManagerConfig, Pool, PoolError, RecyclingMethod, Runtime};
use std::time::Duration;
use tembang_core::{
    Activity, ActivityAction, ActivityView, Album, AlbumId, AlbumInput, Collaboration,
    ConfigError, EntityIdType, EntityType, Playlist, PlaylistId, PlaylistSongId, PlaylistSummary,
    Song, SongId, SongInput, SongQuery, SongSummary, StorageError, TembangError, TembangResult,
    Timestamp, User, UserId,
};
use tembang_storage::{CatalogStore, LikeToggleOutcome, UserCredential};
use tokio_postgres::error::SqlState;
use tokio_postgres::{NoTls, Row};

// ============================================================================
// CONNECTION POOL CONFIGURATION
// ============================================================================

/// Database connection pool configuration.
#[derive(Debug, Clone)]
pub struct DbConfig {
    /// PostgreSQL host
    pub host: String,
    /// PostgreSQL port
    pub port: u16,
    /// Database name
    pub dbname: String,
    /// Database user
    pub user: String,
    /// Database password
    pub password: String,
    /// Maximum pool size
    pub max_size: usize,
    /// Wait timeout when acquiring a connection
    pub timeout: Duration,
}

impl Default for DbConfig {
    fn default() -> Self {
        Self {
            host: "localhost".to_string(),
            port: 5432,
            dbname: "tembang".to_string(),
            user: "postgres".to_string(),
            password: "".to_string(),
            max_size: 16,
            timeout: Duration::from_secs(30),
        }
    }
}

impl DbConfig {
    /// Create a new database configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: std::env::var("TEMBANG_DB_HOST").unwrap_or_else(|_| "localhost".to_string()),
            port: std::env::var("TEMBANG_DB_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(5432),
            dbname: std::env::var("TEMBANG_DB_NAME").unwrap_or_else(|_| "tembang".to_string()),
            user: std::env::var("TEMBANG_DB_USER").unwrap_or_else(|_| "postgres".to_string()),
            password: std::env::var("TEMBANG_DB_PASSWORD").unwrap_or_default(),
            max_size: std::env::var("TEMBANG_DB_POOL_SIZE")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(16),
            timeout: Duration::from_secs(
                std::env::var("TEMBANG_DB_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
        }
    }

    /// Create a connection pool from this configuration.
    pub fn create_pool(&self) -> Result<Pool, ConfigError> {
        let mut cfg = Config::new();
        cfg.host = Some(self.host.clone());
        cfg.port = Some(self.port);
        cfg.dbname = Some(self.dbname.clone());
        cfg.user = Some(self.user.clone());
        cfg.password = Some(self.password.clone());

        cfg.manager = Some(ManagerConfig {
            recycling_method: RecyclingMethod::Fast,
        });

        let mut pool_cfg = deadpool_postgres::PoolConfig::new(self.max_size);
        pool_cfg.timeouts.wait = Some(self.timeout);
        cfg.pool = Some(pool_cfg);

        cfg.create_pool(Some(Runtime::Tokio1), NoTls)
            .map_err(|e| ConfigError::InvalidValue {
                field: "TEMBANG_DB_*".to_string(),
                value: format!("{}:{}/{}", self.host, self.port, self.dbname),
                reason: format!("failed to create pool: {}", e),
            })
    }
}

// ============================================================================
// ERROR MAPPING
// ============================================================================

fn map_pool_error(err: PoolError) -> TembangError {
    tracing::error!("Connection pool error: {:?}", err);
    let storage = match err {
        PoolError::Timeout(_) => StorageError::PoolExhausted,
        PoolError::Closed => StorageError::Unavailable {
            reason: "connection pool is closed".to_string(),
        },
        other => StorageError::Unavailable {
            reason: other.to_string(),
        },
    };
    TembangError::Storage(storage)
}

/// Map a driver error onto the storage taxonomy. Unique and foreign key
/// violations become domain invariants through `From<StorageError>`.
fn map_pg_error(err: tokio_postgres::Error) -> TembangError {
    let Some(db_err) = err.as_db_error() else {
        tracing::error!("Database error: {:?}", err);
        return TembangError::Storage(StorageError::QueryFailed {
            reason: err.to_string(),
        });
    };

    let storage = match *db_err.code() {
        SqlState::UNIQUE_VIOLATION => StorageError::Constraint {
            constraint: db_err.constraint().unwrap_or("unique").to_string(),
            reason: db_err.message().to_string(),
        },
        SqlState::FOREIGN_KEY_VIOLATION => StorageError::ForeignKey {
            entity_type: referenced_entity(db_err.constraint().unwrap_or_default()),
            reason: db_err.message().to_string(),
        },
        _ => {
            tracing::error!(code = ?db_err.code(), "Database error: {}", db_err.message());
            StorageError::QueryFailed {
                reason: db_err.message().to_string(),
            }
        }
    };
    storage.into()
}

/// Guess the referenced table from a `<table>_<column>_fkey` constraint name.
fn referenced_entity(constraint: &str) -> EntityType {
    if constraint.contains("album_id") {
        EntityType::Album
    } else if constraint.contains("playlist_id") {
        EntityType::Playlist
    } else if constraint.contains("song_id") {
        EntityType::Song
    } else {
        EntityType::User
    }
}

// ============================================================================
// ROW MAPPING
// ============================================================================

fn album_from_row(row: &Row) -> Album {
    Album {
        id: AlbumId::from_string(row.get::<_, String>("id")),
        name: row.get("name"),
        year: row.get("year"),
        cover_url: row.get("cover_url"),
    }
}

fn song_from_row(row: &Row) -> Song {
    Song {
        id: SongId::from_string(row.get::<_, String>("id")),
        title: row.get("title"),
        year: row.get("year"),
        performer: row.get("performer"),
        genre: row.get("genre"),
        duration: row.get("duration"),
        album_id: row
            .get::<_, Option<String>>("album_id")
            .map(AlbumId::from_string),
    }
}

fn song_summary_from_row(row: &Row) -> SongSummary {
    SongSummary {
        id: SongId::from_string(row.get::<_, String>("id")),
        title: row.get("title"),
        performer: row.get("performer"),
    }
}

fn playlist_summary_from_row(row: &Row) -> PlaylistSummary {
    PlaylistSummary {
        id: PlaylistId::from_string(row.get::<_, String>("id")),
        name: row.get("name"),
        username: row.get("username"),
    }
}

fn user_from_row(row: &Row) -> User {
    User {
        id: UserId::from_string(row.get::<_, String>("id")),
        username: row.get("username"),
        fullname: row.get("fullname"),
    }
}

fn activity_from_row(row: &Row) -> TembangResult<ActivityView> {
    let action: String = row.get("action");
    let action = action.parse::<ActivityAction>().map_err(|reason| {
        TembangError::Storage(StorageError::QueryFailed { reason })
    })?;
    Ok(ActivityView {
        username: row.get("username"),
        title: row.get("title"),
        action,
        time: row.get::<_, Timestamp>("time"),
    })
}

/// Build a `%term%` ILIKE pattern, escaping wildcard characters.
fn contains_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

// ============================================================================
// DATABASE CLIENT
// ============================================================================

/// Catalog store backed by a PostgreSQL connection pool.
#[derive(Clone)]
pub struct DbClient {
    pool: Pool,
}

impl DbClient {
    /// Create a new database client with the given pool.
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    /// Create a new database client from configuration.
    pub fn from_config(config: &DbConfig) -> Result<Self, ConfigError> {
        Ok(Self::new(config.create_pool()?))
    }

    /// Get the current pool size for observability.
    pub fn pool_size(&self) -> usize {
        self.pool.status().size
    }

    async fn get_conn(&self) -> TembangResult<deadpool_postgres::Object> {
        self.pool.get().await.map_err(map_pool_error)
    }

    /// Run a statement and report whether it touched any row.
    async fn execute(
        &self,
        sql: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> TembangResult<bool> {
        let conn = self.get_conn().await?;
        let affected = conn.execute(sql, params).await.map_err(map_pg_error)?;
        Ok(affected > 0)
    }

    async fn query(
        &self,
        sql: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> TembangResult<Vec<Row>> {
        let conn = self.get_conn().await?;
        conn.query(sql, params).await.map_err(map_pg_error)
    }

    async fn query_opt(
        &self,
        sql: &str,
        params: &[&(dyn tokio_postgres::types::ToSql + Sync)],
    ) -> TembangResult<Option<Row>> {
        let conn = self.get_conn().await?;
        conn.query_opt(sql, params).await.map_err(map_pg_error)
    }
}

/// Flip the like row in one statement. The `removed` CTE deletes an
/// existing row; `inserted` only fires when nothing was removed, and the
/// UNIQUE(user_id, album_id) constraint turns a concurrent insert into a
/// no-op instead of a second row.
const LIKE_TOGGLE_SQL: &str = "\
WITH removed AS (
    DELETE FROM user_album_likes
    WHERE album_id = $1 AND user_id = $2
    RETURNING 1
), inserted AS (
    INSERT INTO user_album_likes (id, user_id, album_id)
    SELECT $3, $2, $1
    WHERE NOT EXISTS (SELECT 1 FROM removed)
    ON CONFLICT (user_id, album_id) DO NOTHING
    RETURNING 1
)
SELECT (SELECT count(*) FROM removed) AS removed,
       (SELECT count(*) FROM inserted) AS inserted";

#[async_trait]
impl CatalogStore for DbClient {
    // ========================================================================
    // ALBUM OPERATIONS
    // ========================================================================

    async fn album_insert(&self, album: &Album) -> TembangResult<()> {
        self.execute(
            "INSERT INTO albums (id, name, year, cover_url) VALUES ($1, $2, $3, $4)",
            &[&album.id.as_str(), &album.name, &album.year, &album.cover_url],
        )
        .await?;
        Ok(())
    }

    async fn album_list(&self) -> TembangResult<Vec<Album>> {
        let rows = self
            .query("SELECT id, name, year, cover_url FROM albums ORDER BY id", &[])
            .await?;
        Ok(rows.iter().map(album_from_row).collect())
    }

    async fn album_get(&self, id: &AlbumId) -> TembangResult<Option<Album>> {
        let row = self
            .query_opt(
                "SELECT id, name, year, cover_url FROM albums WHERE id = $1",
                &[&id.as_str()],
            )
            .await?;
        Ok(row.as_ref().map(album_from_row))
    }

    async fn album_update(&self, id: &AlbumId, input: &AlbumInput) -> TembangResult<bool> {
        self.execute(
            "UPDATE albums SET name = $1, year = $2 WHERE id = $3",
            &[&input.name, &input.year, &id.as_str()],
        )
        .await
    }

    async fn album_delete(&self, id: &AlbumId) -> TembangResult<bool> {
        self.execute("DELETE FROM albums WHERE id = $1", &[&id.as_str()])
            .await
    }

    async fn album_set_cover(&self, id: &AlbumId, cover_url: &str) -> TembangResult<bool> {
        self.execute(
            "UPDATE albums SET cover_url = $1 WHERE id = $2",
            &[&cover_url, &id.as_str()],
        )
        .await
    }

    // ========================================================================
    // SONG OPERATIONS
    // ========================================================================

    async fn song_insert(&self, song: &Song) -> TembangResult<()> {
        let album_id = song.album_id.as_ref().map(|a| a.as_str());
        self.execute(
            "INSERT INTO songs (id, title, year, performer, genre, duration, album_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7)",
            &[
                &song.id.as_str(),
                &song.title,
                &song.year,
                &song.performer,
                &song.genre,
                &song.duration,
                &album_id,
            ],
        )
        .await?;
        Ok(())
    }

    async fn song_list(&self, query: &SongQuery) -> TembangResult<Vec<SongSummary>> {
        let title = query.title.as_deref().map(contains_pattern);
        let performer = query.performer.as_deref().map(contains_pattern);
        let rows = self
            .query(
                "SELECT id, title, performer FROM songs \
                 WHERE ($1::text IS NULL OR title ILIKE $1) \
                   AND ($2::text IS NULL OR performer ILIKE $2) \
                 ORDER BY id",
                &[&title, &performer],
            )
            .await?;
        Ok(rows.iter().map(song_summary_from_row).collect())
    }

    async fn song_get(&self, id: &SongId) -> TembangResult<Option<Song>> {
        let row = self
            .query_opt(
                "SELECT id, title, year, performer, genre, duration, album_id \
                 FROM songs WHERE id = $1",
                &[&id.as_str()],
            )
            .await?;
        Ok(row.as_ref().map(song_from_row))
    }

    async fn song_update(&self, id: &SongId, input: &SongInput) -> TembangResult<Option<Song>> {
        let album_id = input.album_id.as_ref().map(|a| a.as_str());
        // The FROM clause reads the pre-update snapshot of the row.
        let row = self
            .query_opt(
                "UPDATE songs AS s \
                 SET title = $1, year = $2, performer = $3, genre = $4, duration = $5, album_id = $6 \
                 FROM songs AS old \
                 WHERE s.id = $7 AND old.id = s.id \
                 RETURNING old.id, old.title, old.year, old.performer, old.genre, old.duration, old.album_id",
                &[
                    &input.title,
                    &input.year,
                    &input.performer,
                    &input.genre,
                    &input.duration,
                    &album_id,
                    &id.as_str(),
                ],
            )
            .await?;
        Ok(row.as_ref().map(song_from_row))
    }

    async fn song_delete(&self, id: &SongId) -> TembangResult<Option<Song>> {
        let row = self
            .query_opt(
                "DELETE FROM songs WHERE id = $1 \
                 RETURNING id, title, year, performer, genre, duration, album_id",
                &[&id.as_str()],
            )
            .await?;
        Ok(row.as_ref().map(song_from_row))
    }

    async fn songs_by_album(&self, album_id: &AlbumId) -> TembangResult<Vec<SongSummary>> {
        let rows = self
            .query(
                "SELECT id, title, performer FROM songs WHERE album_id = $1 ORDER BY id",
                &[&album_id.as_str()],
            )
            .await?;
        Ok(rows.iter().map(song_summary_from_row).collect())
    }

    // ========================================================================
    // LIKE OPERATIONS
    // ========================================================================

    async fn like_toggle(
        &self,
        album_id: &AlbumId,
        user_id: &UserId,
    ) -> TembangResult<LikeToggleOutcome> {
        let like_id = tembang_core::LikeId::new();
        let conn = self.get_conn().await?;
        let row = conn
            .query_one(
                LIKE_TOGGLE_SQL,
                &[&album_id.as_str(), &user_id.as_str(), &like_id.as_str()],
            )
            .await
            .map_err(map_pg_error)?;

        let removed: i64 = row.get("removed");
        let inserted: i64 = row.get("inserted");
        Ok(LikeToggleOutcome {
            removed: u64::try_from(removed).unwrap_or_default(),
            inserted: u64::try_from(inserted).unwrap_or_default(),
        })
    }

    async fn likes_by_album(&self, album_id: &AlbumId) -> TembangResult<Vec<UserId>> {
        let rows = self
            .query(
                "SELECT user_id FROM user_album_likes WHERE album_id = $1",
                &[&album_id.as_str()],
            )
            .await?;
        Ok(rows
            .iter()
            .map(|r| UserId::from_string(r.get::<_, String>("user_id")))
            .collect())
    }

    // ========================================================================
    // PLAYLIST OPERATIONS
    // ========================================================================

    async fn playlist_insert(&self, playlist: &Playlist) -> TembangResult<()> {
        self.execute(
            "INSERT INTO playlists (id, name, owner) VALUES ($1, $2, $3)",
            &[&playlist.id.as_str(), &playlist.name, &playlist.owner.as_str()],
        )
        .await?;
        Ok(())
    }

    async fn playlist_get(&self, id: &PlaylistId) -> TembangResult<Option<Playlist>> {
        let row = self
            .query_opt(
                "SELECT id, name, owner FROM playlists WHERE id = $1",
                &[&id.as_str()],
            )
            .await?;
        Ok(row.map(|r| Playlist {
            id: PlaylistId::from_string(r.get::<_, String>("id")),
            name: r.get("name"),
            owner: UserId::from_string(r.get::<_, String>("owner")),
        }))
    }

    async fn playlist_summary(&self, id: &PlaylistId) -> TembangResult<Option<PlaylistSummary>> {
        let row = self
            .query_opt(
                "SELECT p.id, p.name, u.username FROM playlists p \
                 JOIN users u ON u.id = p.owner \
                 WHERE p.id = $1",
                &[&id.as_str()],
            )
            .await?;
        Ok(row.as_ref().map(playlist_summary_from_row))
    }

    async fn playlists_for_user(&self, user_id: &UserId) -> TembangResult<Vec<PlaylistSummary>> {
        let rows = self
            .query(
                "SELECT DISTINCT p.id, p.name, u.username FROM playlists p \
                 JOIN users u ON u.id = p.owner \
                 LEFT JOIN collaborations c ON c.playlist_id = p.id \
                 WHERE p.owner = $1 OR c.user_id = $1 \
                 ORDER BY p.id",
                &[&user_id.as_str()],
            )
            .await?;
        Ok(rows.iter().map(playlist_summary_from_row).collect())
    }

    async fn playlist_delete(&self, id: &PlaylistId) -> TembangResult<bool> {
        self.execute("DELETE FROM playlists WHERE id = $1", &[&id.as_str()])
            .await
    }

    async fn playlist_song_insert(
        &self,
        playlist_id: &PlaylistId,
        song_id: &SongId,
    ) -> TembangResult<PlaylistSongId> {
        let id = PlaylistSongId::new();
        self.execute(
            "INSERT INTO playlist_songs (id, playlist_id, song_id) VALUES ($1, $2, $3)",
            &[&id.as_str(), &playlist_id.as_str(), &song_id.as_str()],
        )
        .await?;
        Ok(id)
    }

    async fn playlist_songs(&self, playlist_id: &PlaylistId) -> TembangResult<Vec<SongSummary>> {
        let rows = self
            .query(
                "SELECT s.id, s.title, s.performer FROM playlist_songs ps \
                 JOIN songs s ON s.id = ps.song_id \
                 WHERE ps.playlist_id = $1 \
                 ORDER BY ps.id",
                &[&playlist_id.as_str()],
            )
            .await?;
        Ok(rows.iter().map(song_summary_from_row).collect())
    }

    async fn playlist_song_delete(
        &self,
        playlist_id: &PlaylistId,
        song_id: &SongId,
    ) -> TembangResult<bool> {
        self.execute(
            "DELETE FROM playlist_songs WHERE playlist_id = $1 AND song_id = $2",
            &[&playlist_id.as_str(), &song_id.as_str()],
        )
        .await
    }

    async fn activity_insert(&self, activity: &Activity) -> TembangResult<()> {
        self.execute(
            "INSERT INTO playlist_song_activities (id, playlist_id, song_id, user_id, action, time) \
             VALUES ($1, $2, $3, $4, $5, $6)",
            &[
                &activity.id.as_str(),
                &activity.playlist_id.as_str(),
                &activity.song_id.as_str(),
                &activity.user_id.as_str(),
                &activity.action.as_str(),
                &activity.time,
            ],
        )
        .await?;
        Ok(())
    }

    async fn activities(&self, playlist_id: &PlaylistId) -> TembangResult<Vec<ActivityView>> {
        let rows = self
            .query(
                "SELECT u.username, s.title, a.action, a.time \
                 FROM playlist_song_activities a \
                 JOIN users u ON u.id = a.user_id \
                 JOIN songs s ON s.id = a.song_id \
                 WHERE a.playlist_id = $1 \
                 ORDER BY a.time",
                &[&playlist_id.as_str()],
            )
            .await?;
        rows.iter().map(activity_from_row).collect()
    }

    // ========================================================================
    // COLLABORATION OPERATIONS
    // ========================================================================

    async fn collaboration_insert(&self, collaboration: &Collaboration) -> TembangResult<()> {
        self.execute(
            "INSERT INTO collaborations (id, playlist_id, user_id) VALUES ($1, $2, $3)",
            &[
                &collaboration.id.as_str(),
                &collaboration.playlist_id.as_str(),
                &collaboration.user_id.as_str(),
            ],
        )
        .await?;
        Ok(())
    }

    async fn collaboration_delete(
        &self,
        playlist_id: &PlaylistId,
        user_id: &UserId,
    ) -> TembangResult<bool> {
        self.execute(
            "DELETE FROM collaborations WHERE playlist_id = $1 AND user_id = $2",
            &[&playlist_id.as_str(), &user_id.as_str()],
        )
        .await
    }

    async fn collaboration_exists(
        &self,
        playlist_id: &PlaylistId,
        user_id: &UserId,
    ) -> TembangResult<bool> {
        let row = self
            .query_opt(
                "SELECT 1 FROM collaborations WHERE playlist_id = $1 AND user_id = $2",
                &[&playlist_id.as_str(), &user_id.as_str()],
            )
            .await?;
        Ok(row.is_some())
    }

    // ========================================================================
    // USER OPERATIONS
    // ========================================================================

    async fn user_insert(&self, user: &User, password_hash: &str) -> TembangResult<()> {
        self.execute(
            "INSERT INTO users (id, username, password, fullname) VALUES ($1, $2, $3, $4)",
            &[&user.id.as_str(), &user.username, &password_hash, &user.fullname],
        )
        .await?;
        Ok(())
    }

    async fn user_get(&self, id: &UserId) -> TembangResult<Option<User>> {
        let row = self
            .query_opt(
                "SELECT id, username, fullname FROM users WHERE id = $1",
                &[&id.as_str()],
            )
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn user_get_by_username(&self, username: &str) -> TembangResult<Option<User>> {
        let row = self
            .query_opt(
                "SELECT id, username, fullname FROM users WHERE username = $1",
                &[&username],
            )
            .await?;
        Ok(row.as_ref().map(user_from_row))
    }

    async fn user_credential(&self, username: &str) -> TembangResult<Option<UserCredential>> {
        let row = self
            .query_opt(
                "SELECT id, password FROM users WHERE username = $1",
                &[&username],
            )
            .await?;
        Ok(row.map(|row| UserCredential {
            user_id: UserId::from_string(row.get::<_, String>("id")),
            password_hash: row.get("password"),
        }))
    }

    // ========================================================================
    // REFRESH TOKENS
    // ========================================================================

    async fn refresh_token_insert(&self, token: &str) -> TembangResult<()> {
        self.execute("INSERT INTO authentications (token) VALUES ($1)", &[&token])
            .await?;
        Ok(())
    }

    async fn refresh_token_exists(&self, token: &str) -> TembangResult<bool> {
        let row = self
            .query_opt("SELECT 1 FROM authentications WHERE token = $1", &[&token])
            .await?;
        Ok(row.is_some())
    }

    async fn refresh_token_delete(&self, token: &str) -> TembangResult<bool> {
        self.execute("DELETE FROM authentications WHERE token = $1", &[&token])
            .await
    }

    // ========================================================================
    // HEALTH
    // ========================================================================

    async fn ping(&self) -> TembangResult<()> {
        let conn = self.get_conn().await?;
        conn.simple_query("SELECT 1").await.map_err(map_pg_error)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_db_config() {
        let config = DbConfig::default();
        assert_eq!(config.port, 5432);
        assert_eq!(config.dbname, "tembang");
        assert_eq!(config.max_size, 16);
    }

    #[test]
    fn test_contains_pattern_escapes_wildcards() {
        assert_eq!(contains_pattern("love"), "%love%");
        assert_eq!(contains_pattern("100%"), "%100\\%%");
        assert_eq!(contains_pattern("a_b"), "%a\\_b%");
    }

    #[test]
    fn test_referenced_entity_from_constraint() {
        assert_eq!(
            referenced_entity("user_album_likes_album_id_fkey"),
            EntityType::Album
        );
        assert_eq!(
            referenced_entity("collaborations_playlist_id_fkey"),
            EntityType::Playlist
        );
        assert_eq!(referenced_entity("playlists_owner_fkey"), EntityType::User);
    }

    #[test]
    fn test_toggle_statement_guards_double_insert() {
        assert!(LIKE_TOGGLE_SQL.contains("WHERE NOT EXISTS (SELECT 1 FROM removed)"));
        assert!(LIKE_TOGGLE_SQL.contains("ON CONFLICT (user_id, album_id) DO NOTHING"));
    }
}
