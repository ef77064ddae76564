//! SQLite-backed store for identities, conversations, messages,
//! notifications and sessions.
//!
//! Every status change is a compare-and-swap (`WHERE status = expected`), and the
//! booking invariants are enforced by partial unique indexes, so concurrent
//! callers cannot both win a slot no matter what they read beforehand.

use crate::error::{is_unique_violation, Error, Result};
use crate::models::{
    Conversation, Identity, Message, MessageStatus, Notification, ServiceDetails, Session,
    SessionStatus, Slot, TOMBSTONE_BODY,
};
use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteRow};
use sqlx::{Row, SqlitePool};
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info};
use uuid::Uuid;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS identities (
        id TEXT PRIMARY KEY,
        display_name TEXT NOT NULL,
        role TEXT NOT NULL
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS conversations (
        id TEXT PRIMARY KEY,
        participant_a TEXT NOT NULL,
        participant_b TEXT NOT NULL,
        last_message_id TEXT,
        last_activity_at TEXT NOT NULL,
        created_at TEXT NOT NULL,
        UNIQUE(participant_a, participant_b)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS messages (
        id TEXT PRIMARY KEY,
        conversation_id TEXT NOT NULL,
        sender_id TEXT NOT NULL,
        recipient_id TEXT NOT NULL,
        body TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'sent',
        deleted INTEGER NOT NULL DEFAULT 0,
        system INTEGER NOT NULL DEFAULT 0,
        created_at TEXT NOT NULL,
        FOREIGN KEY (conversation_id) REFERENCES conversations(id)
    )
    "#,
    "CREATE INDEX IF NOT EXISTS messages_by_conversation ON messages(conversation_id, created_at)",
    r#"
    CREATE TABLE IF NOT EXISTS message_hidden (
        message_id TEXT NOT NULL,
        identity_id TEXT NOT NULL,
        PRIMARY KEY (message_id, identity_id),
        FOREIGN KEY (message_id) REFERENCES messages(id)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS notifications (
        id TEXT PRIMARY KEY,
        owner_id TEXT NOT NULL,
        title TEXT NOT NULL,
        body TEXT NOT NULL,
        link TEXT,
        kind TEXT NOT NULL,
        read INTEGER NOT NULL DEFAULT 0,
        metadata TEXT NOT NULL DEFAULT '{}',
        created_at TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS notifications_by_owner ON notifications(owner_id, created_at)",
    r#"
    CREATE TABLE IF NOT EXISTS sessions (
        id TEXT PRIMARY KEY,
        mentor_id TEXT NOT NULL,
        mentee_id TEXT NOT NULL,
        slot_date TEXT NOT NULL,
        slot_time TEXT NOT NULL,
        service_title TEXT NOT NULL,
        duration_minutes INTEGER NOT NULL,
        price REAL NOT NULL,
        status TEXT NOT NULL DEFAULT 'pending',
        meeting_link TEXT,
        rating INTEGER,
        review TEXT,
        created_at TEXT NOT NULL,
        updated_at TEXT NOT NULL
    )
    "#,
    // At most one confirmed session per (mentor, slot)
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS sessions_one_confirmed
        ON sessions(mentor_id, slot_date, slot_time)
        WHERE status = 'confirmed'
    "#,
    // At most one live request per (mentor, mentee, slot)
    r#"
    CREATE UNIQUE INDEX IF NOT EXISTS sessions_one_active_request
        ON sessions(mentor_id, mentee_id, slot_date, slot_time)
        WHERE status IN ('pending', 'confirmed')
    "#,
];

const MESSAGE_COLUMNS: &str = r#"
    m.id, m.conversation_id, m.sender_id, m.recipient_id, m.body, m.status,
    m.deleted, m.system, m.created_at,
    (SELECT group_concat(h.identity_id, char(31)) FROM message_hidden h
        WHERE h.message_id = m.id) AS hidden_for
"#;

const SESSION_COLUMNS: &str = r#"
    id, mentor_id, mentee_id, slot_date, slot_time, service_title, duration_minutes,
    price, status, meeting_link, rating, review, created_at, updated_at
"#;

/// Persistent store shared by every component
#[derive(Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the database at `url` and ensure the schema exists
    pub async fn open(url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .journal_mode(SqliteJournalMode::Wal)
            .busy_timeout(Duration::from_secs(5))
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(8)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.init_db().await?;

        info!("[Store] Opened {}", url);
        Ok(store)
    }

    async fn init_db(&self) -> Result<()> {
        for statement in SCHEMA {
            sqlx::query(statement).execute(&self.pool).await?;
        }
        Ok(())
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    // ---------------------------------------------------------------
    // Identities
    // ---------------------------------------------------------------

    /// Insert or refresh an identity record
    pub async fn upsert_identity(&self, identity: &Identity) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO identities (id, display_name, role) VALUES (?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET display_name = excluded.display_name, role = excluded.role
            "#,
        )
        .bind(&identity.id)
        .bind(&identity.display_name)
        .bind(identity.role.as_str())
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_identity(&self, id: &str) -> Result<Option<Identity>> {
        let row: Option<(String, String, String)> =
            sqlx::query_as("SELECT id, display_name, role FROM identities WHERE id = ?")
                .bind(id)
                .fetch_optional(&self.pool)
                .await?;

        row.map(|(id, display_name, role)| -> Result<Identity> {
            Ok(Identity {
                id,
                display_name,
                role: role.parse()?,
            })
        })
        .transpose()
    }

    // ---------------------------------------------------------------
    // Conversations
    // ---------------------------------------------------------------

    /// Return the canonical conversation for a pair, creating it if needed
    pub async fn locate_or_create_conversation(&self, a: &str, b: &str) -> Result<Conversation> {
        let (first, second) = Conversation::canonical_pair(a, b);
        let now = timestamp(Utc::now());

        let inserted = sqlx::query(
            r#"
            INSERT INTO conversations (id, participant_a, participant_b, last_activity_at, created_at)
            VALUES (?, ?, ?, ?, ?)
            ON CONFLICT(participant_a, participant_b) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4().to_string())
        .bind(&first)
        .bind(&second)
        .bind(&now)
        .bind(&now)
        .execute(&self.pool)
        .await?
        .rows_affected();

        if inserted > 0 {
            debug!("[Store] Created conversation for {} / {}", first, second);
        }

        let row = sqlx::query(
            "SELECT * FROM conversations WHERE participant_a = ? AND participant_b = ?",
        )
        .bind(&first)
        .bind(&second)
        .fetch_one(&self.pool)
        .await?;
        conversation_from_row(&row)
    }

    pub async fn find_conversation(&self, id: &str) -> Result<Option<Conversation>> {
        let row = sqlx::query("SELECT * FROM conversations WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(conversation_from_row).transpose()
    }

    /// Conversations the identity takes part in, most recently active first
    pub async fn list_conversations(&self, identity_id: &str) -> Result<Vec<Conversation>> {
        let rows = sqlx::query(
            r#"
            SELECT * FROM conversations
            WHERE participant_a = ? OR participant_b = ?
            ORDER BY last_activity_at DESC
            "#,
        )
        .bind(identity_id)
        .bind(identity_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(conversation_from_row).collect()
    }

    /// Point the conversation at its newest message and refresh its activity time
    pub async fn touch_conversation(
        &self,
        id: &str,
        last_message_id: Option<&str>,
        at: DateTime<Utc>,
    ) -> Result<()> {
        sqlx::query(
            r#"
            UPDATE conversations
            SET last_message_id = COALESCE(?, last_message_id), last_activity_at = ?
            WHERE id = ?
            "#,
        )
        .bind(last_message_id)
        .bind(timestamp(at))
        .bind(id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    // ---------------------------------------------------------------
    // Messages
    // ---------------------------------------------------------------

    pub async fn insert_message(&self, message: &Message) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO messages
                (id, conversation_id, sender_id, recipient_id, body, status, deleted, system, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&message.id)
        .bind(&message.conversation_id)
        .bind(&message.sender_id)
        .bind(&message.recipient_id)
        .bind(&message.body)
        .bind(message.status.as_str())
        .bind(message.deleted)
        .bind(message.system)
        .bind(timestamp(message.created_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_message(&self, id: &str) -> Result<Option<Message>> {
        let sql = format!("SELECT {} FROM messages m WHERE m.id = ?", MESSAGE_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(message_from_row).transpose()
    }

    /// Move a message forward to `next`. Returns false when the stored status
    /// is already at or beyond `next`.
    pub async fn advance_message_status(&self, id: &str, next: MessageStatus) -> Result<bool> {
        let earlier = next.predecessors();
        if earlier.is_empty() {
            return Ok(false);
        }

        let placeholders = vec!["?"; earlier.len()].join(", ");
        let sql = format!(
            "UPDATE messages SET status = ? WHERE id = ? AND status IN ({})",
            placeholders
        );
        let mut query = sqlx::query(&sql).bind(next.as_str()).bind(id);
        for status in &earlier {
            query = query.bind(status.as_str());
        }

        let affected = query.execute(&self.pool).await?.rows_affected();
        Ok(affected > 0)
    }

    /// Irreversibly wipe the body. Only the sender's request can match.
    pub async fn tombstone_message(&self, id: &str, sender_id: &str) -> Result<bool> {
        let affected = sqlx::query(
            "UPDATE messages SET body = ?, deleted = 1 WHERE id = ? AND sender_id = ?",
        )
        .bind(TOMBSTONE_BODY)
        .bind(id)
        .bind(sender_id)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(affected > 0)
    }

    /// Hide a message from one identity's view
    pub async fn hide_message(&self, id: &str, identity_id: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO message_hidden (message_id, identity_id) VALUES (?, ?) ON CONFLICT DO NOTHING",
        )
        .bind(id)
        .bind(identity_id)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    /// Messages of a conversation as `viewer` sees them, oldest first
    pub async fn list_messages(&self, conversation_id: &str, viewer: &str) -> Result<Vec<Message>> {
        let sql = format!(
            r#"
            SELECT {} FROM messages m
            WHERE m.conversation_id = ?
              AND NOT EXISTS (
                SELECT 1 FROM message_hidden h WHERE h.message_id = m.id AND h.identity_id = ?
              )
            ORDER BY m.created_at ASC, m.rowid ASC
            "#,
            MESSAGE_COLUMNS
        );
        let rows = sqlx::query(&sql)
            .bind(conversation_id)
            .bind(viewer)
            .fetch_all(&self.pool)
            .await?;
        rows.iter().map(message_from_row).collect()
    }

    // ---------------------------------------------------------------
    // Notifications
    // ---------------------------------------------------------------

    pub async fn insert_notification(&self, notification: &Notification) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO notifications (id, owner_id, title, body, link, kind, read, metadata, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&notification.id)
        .bind(&notification.owner_id)
        .bind(&notification.title)
        .bind(&notification.body)
        .bind(&notification.link)
        .bind(&notification.kind)
        .bind(notification.read)
        .bind(serde_json::to_string(&notification.metadata)?)
        .bind(timestamp(notification.created_at))
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn find_notification(&self, id: &str) -> Result<Option<Notification>> {
        let row = sqlx::query("SELECT * FROM notifications WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(notification_from_row).transpose()
    }

    /// Newest first
    pub async fn list_notifications(&self, owner_id: &str) -> Result<Vec<Notification>> {
        let rows = sqlx::query(
            "SELECT * FROM notifications WHERE owner_id = ? ORDER BY created_at DESC, rowid DESC",
        )
        .bind(owner_id)
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(notification_from_row).collect()
    }

    pub async fn unread_notifications(&self, owner_id: &str) -> Result<i64> {
        let (count,): (i64,) =
            sqlx::query_as("SELECT COUNT(*) FROM notifications WHERE owner_id = ? AND read = 0")
                .bind(owner_id)
                .fetch_one(&self.pool)
                .await?;
        Ok(count)
    }

    pub async fn mark_notification_read(&self, id: &str, owner_id: &str) -> Result<bool> {
        let affected = sqlx::query("UPDATE notifications SET read = 1 WHERE id = ? AND owner_id = ?")
            .bind(id)
            .bind(owner_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected > 0)
    }

    pub async fn mark_all_notifications_read(&self, owner_id: &str) -> Result<u64> {
        let affected =
            sqlx::query("UPDATE notifications SET read = 1 WHERE owner_id = ? AND read = 0")
                .bind(owner_id)
                .execute(&self.pool)
                .await?
                .rows_affected();
        Ok(affected)
    }

    pub async fn clear_notifications(&self, owner_id: &str) -> Result<u64> {
        let affected = sqlx::query("DELETE FROM notifications WHERE owner_id = ?")
            .bind(owner_id)
            .execute(&self.pool)
            .await?
            .rows_affected();
        Ok(affected)
    }

    // ---------------------------------------------------------------
    // Sessions
    // ---------------------------------------------------------------

    /// Insert a new session. A live duplicate request surfaces as `Conflict`.
    pub async fn insert_session(&self, session: &Session) -> Result<()> {
        let result = sqlx::query(
            r#"
            INSERT INTO sessions
                (id, mentor_id, mentee_id, slot_date, slot_time, service_title, duration_minutes,
                 price, status, meeting_link, rating, review, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&session.id)
        .bind(&session.mentor_id)
        .bind(&session.mentee_id)
        .bind(&session.slot.date)
        .bind(&session.slot.time)
        .bind(&session.service.title)
        .bind(session.service.duration_minutes)
        .bind(session.service.price)
        .bind(session.status.as_str())
        .bind(&session.meeting_link)
        .bind(session.rating)
        .bind(&session.review)
        .bind(timestamp(session.created_at))
        .bind(timestamp(session.updated_at))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(e) if is_unique_violation(&e) => Err(Error::Conflict(
                "a request for this slot is already open".into(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn find_session(&self, id: &str) -> Result<Option<Session>> {
        let sql = format!("SELECT {} FROM sessions WHERE id = ?", SESSION_COLUMNS);
        let row = sqlx::query(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(session_from_row).transpose()
    }

    /// The mentee's pending or confirmed session for this (mentor, slot), if any
    pub async fn find_active_request(
        &self,
        mentor_id: &str,
        mentee_id: &str,
        slot: &Slot,
    ) -> Result<Option<Session>> {
        let sql = format!(
            r#"
            SELECT {} FROM sessions
            WHERE mentor_id = ? AND mentee_id = ? AND slot_date = ? AND slot_time = ?
              AND status IN ('pending', 'confirmed')
            LIMIT 1
            "#,
            SESSION_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(mentor_id)
            .bind(mentee_id)
            .bind(&slot.date)
            .bind(&slot.time)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(session_from_row).transpose()
    }

    /// The confirmed session holding this (mentor, slot), if any
    pub async fn find_confirmed(&self, mentor_id: &str, slot: &Slot) -> Result<Option<Session>> {
        let sql = format!(
            r#"
            SELECT {} FROM sessions
            WHERE mentor_id = ? AND slot_date = ? AND slot_time = ? AND status = 'confirmed'
            LIMIT 1
            "#,
            SESSION_COLUMNS
        );
        let row = sqlx::query(&sql)
            .bind(mentor_id)
            .bind(&slot.date)
            .bind(&slot.time)
            .fetch_optional(&self.pool)
            .await?;
        row.as_ref().map(session_from_row).transpose()
    }

    /// Compare-and-swap the session status from `from` to `to`.
    ///
    /// A transition to `confirmed` only applies while no sibling session holds the
    /// slot; the partial unique index backs this up for writers that interleave.
    /// Returns false when the row was not in `from` (or a sibling already won),
    /// `Conflict` when the index rejected the write.
    pub async fn transition_session(
        &self,
        id: &str,
        from: SessionStatus,
        to: SessionStatus,
        meeting_link: Option<&str>,
    ) -> Result<bool> {
        let now = timestamp(Utc::now());
        let result = sqlx::query(
            r#"
            UPDATE sessions
            SET status = ?1, meeting_link = COALESCE(?2, meeting_link), updated_at = ?3
            WHERE id = ?4 AND status = ?5
              AND (?1 <> 'confirmed' OR NOT EXISTS (
                SELECT 1 FROM sessions s
                WHERE s.mentor_id = sessions.mentor_id
                  AND s.slot_date = sessions.slot_date
                  AND s.slot_time = sessions.slot_time
                  AND s.status = 'confirmed'
                  AND s.id <> sessions.id
              ))
            "#,
        )
        .bind(to.as_str())
        .bind(meeting_link)
        .bind(&now)
        .bind(id)
        .bind(from.as_str())
        .execute(&self.pool)
        .await;

        match result {
            Ok(r) => Ok(r.rows_affected() > 0),
            Err(e) if is_unique_violation(&e) => Err(Error::Conflict(
                "slot is already confirmed for another session".into(),
            )),
            Err(e) => Err(e.into()),
        }
    }

    pub async fn list_sessions_as_mentor(&self, mentor_id: &str) -> Result<Vec<Session>> {
        self.list_sessions_where("mentor_id", mentor_id).await
    }

    pub async fn list_sessions_as_mentee(&self, mentee_id: &str) -> Result<Vec<Session>> {
        self.list_sessions_where("mentee_id", mentee_id).await
    }

    async fn list_sessions_where(&self, column: &'static str, value: &str) -> Result<Vec<Session>> {
        let sql = format!(
            "SELECT {} FROM sessions WHERE {} = ? ORDER BY slot_date, slot_time, created_at",
            SESSION_COLUMNS, column
        );
        let rows = sqlx::query(&sql).bind(value).fetch_all(&self.pool).await?;
        rows.iter().map(session_from_row).collect()
    }

    /// Record the mentee's rating once, on a completed session
    pub async fn record_review(
        &self,
        id: &str,
        mentee_id: &str,
        rating: i64,
        review: Option<&str>,
    ) -> Result<bool> {
        let affected = sqlx::query(
            r#"
            UPDATE sessions SET rating = ?, review = ?, updated_at = ?
            WHERE id = ? AND mentee_id = ? AND status = 'completed' AND rating IS NULL
            "#,
        )
        .bind(rating)
        .bind(review)
        .bind(timestamp(Utc::now()))
        .bind(id)
        .bind(mentee_id)
        .execute(&self.pool)
        .await?
        .rows_affected();
        Ok(affected > 0)
    }
}

/// Fixed-precision UTC text so lexical order matches time order
fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| Error::Persistence(format!("bad timestamp '{}': {}", raw, e)))
}

fn conversation_from_row(row: &SqliteRow) -> Result<Conversation> {
    Ok(Conversation {
        id: row.try_get("id")?,
        participants: [row.try_get("participant_a")?, row.try_get("participant_b")?],
        last_message_id: row.try_get("last_message_id")?,
        last_activity_at: parse_timestamp(row.try_get("last_activity_at")?)?,
        created_at: parse_timestamp(row.try_get("created_at")?)?,
    })
}

fn message_from_row(row: &SqliteRow) -> Result<Message> {
    let status: String = row.try_get("status")?;
    let hidden: Option<String> = row.try_get("hidden_for")?;
    Ok(Message {
        id: row.try_get("id")?,
        conversation_id: row.try_get("conversation_id")?,
        sender_id: row.try_get("sender_id")?,
        recipient_id: row.try_get("recipient_id")?,
        body: row.try_get("body")?,
        status: status
            .parse()
            .map_err(|_| Error::Persistence(format!("bad message status '{}'", status)))?,
        hidden_for: hidden
            .map(|h| h.split('\u{1f}').map(str::to_string).collect())
            .unwrap_or_default(),
        deleted: row.try_get("deleted")?,
        system: row.try_get("system")?,
        created_at: parse_timestamp(row.try_get("created_at")?)?,
    })
}

fn notification_from_row(row: &SqliteRow) -> Result<Notification> {
    let metadata: String = row.try_get("metadata")?;
    Ok(Notification {
        id: row.try_get("id")?,
        owner_id: row.try_get("owner_id")?,
        title: row.try_get("title")?,
        body: row.try_get("body")?,
        link: row.try_get("link")?,
        kind: row.try_get("kind")?,
        read: row.try_get("read")?,
        metadata: serde_json::from_str(&metadata)
            .map_err(|e| Error::Persistence(format!("bad notification metadata: {}", e)))?,
        created_at: parse_timestamp(row.try_get("created_at")?)?,
    })
}

fn session_from_row(row: &SqliteRow) -> Result<Session> {
    let status: String = row.try_get("status")?;
    Ok(Session {
        id: row.try_get("id")?,
        mentor_id: row.try_get("mentor_id")?,
        mentee_id: row.try_get("mentee_id")?,
        slot: Slot {
            date: row.try_get("slot_date")?,
            time: row.try_get("slot_time")?,
        },
        service: ServiceDetails {
            title: row.try_get("service_title")?,
            duration_minutes: row.try_get("duration_minutes")?,
            price: row.try_get("price")?,
        },
        status: status
            .parse()
            .map_err(|_| Error::Persistence(format!("bad session status '{}'", status)))?,
        meeting_link: row.try_get("meeting_link")?,
        rating: row.try_get("rating")?,
        review: row.try_get("review")?,
        created_at: parse_timestamp(row.try_get("created_at")?)?,
        updated_at: parse_timestamp(row.try_get("updated_at")?)?,
    })
}
