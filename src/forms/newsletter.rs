use rusqlite::{params, Connection, ErrorCode};

use crate::error::{StoreError, ValidationError};
use crate::forms::is_valid_email;
use crate::logging::{log, ts_epoch_ms, obj, v_str, Domain, Level};

/// Newsletter subscribers, one row per address, kept in insertion order.
pub struct SubscriberStore {
    conn: Connection,
}

impl SubscriberStore {
    pub fn open(path: &str) -> Result<Self, StoreError> {
        Ok(Self { conn: Connection::open(path)? })
    }

    pub fn in_memory() -> Result<Self, StoreError> {
        Ok(Self { conn: Connection::open_in_memory()? })
    }

    pub fn init(&mut self) -> Result<(), StoreError> {
        self.conn.execute_batch(
            "BEGIN;
            CREATE TABLE IF NOT EXISTS subscribers (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                email TEXT NOT NULL UNIQUE,
                subscribed_at INTEGER NOT NULL
            );
            COMMIT;",
        )?;
        Ok(())
    }

    /// Add `email` (trimmed). Malformed and already-present addresses are
    /// refused with a field error on `email`.
    pub fn subscribe(&mut self, email: &str) -> Result<(), StoreError> {
        let email = email.trim();
        if !is_valid_email(email) {
            return Err(ValidationError::single("email", "Please enter a valid email address").into());
        }

        let inserted = self.conn.execute(
            "INSERT INTO subscribers (email, subscribed_at) VALUES (?1, ?2)",
            params![email, ts_epoch_ms() as i64],
        );
        match inserted {
            Ok(_) => {
                log(Level::Info, Domain::Storage, "subscribed", obj(&[("email", v_str(email))]));
                Ok(())
            }
            Err(rusqlite::Error::SqliteFailure(e, _)) if e.code == ErrorCode::ConstraintViolation => {
                Err(ValidationError::single("email", "This email is already subscribed").into())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub fn contains(&self, email: &str) -> Result<bool, StoreError> {
        let n: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM subscribers WHERE email = ?1",
            params![email.trim()],
            |row| row.get(0),
        )?;
        Ok(n > 0)
    }

    pub fn list(&self) -> Result<Vec<String>, StoreError> {
        let mut stmt = self.conn.prepare("SELECT email FROM subscribers ORDER BY id")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut out = Vec::new();
        for row in rows {
            out.push(row?);
        }
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> SubscriberStore {
        let mut s = SubscriberStore::in_memory().unwrap();
        s.init().unwrap();
        s
    }

    #[test]
    fn test_subscribe_and_list_in_order() {
        let mut s = store();
        s.subscribe("b@club.org").unwrap();
        s.subscribe(" a@club.org ").unwrap();
        assert_eq!(s.list().unwrap(), vec!["b@club.org", "a@club.org"]);
        assert!(s.contains("a@club.org").unwrap());
        assert!(!s.contains("c@club.org").unwrap());
    }

    #[test]
    fn test_duplicate_is_validation_error() {
        let mut s = store();
        s.subscribe("a@club.org").unwrap();
        match s.subscribe("a@club.org") {
            Err(StoreError::Invalid(v)) => assert!(v.has_field("email")),
            other => panic!("expected duplicate rejection, got {:?}", other),
        }
        assert_eq!(s.list().unwrap().len(), 1);
    }

    #[test]
    fn test_invalid_email_never_stored() {
        let mut s = store();
        assert!(matches!(s.subscribe("not-an-email"), Err(StoreError::Invalid(_))));
        assert!(s.list().unwrap().is_empty());
    }

    #[test]
    fn test_init_is_repeatable() {
        let mut s = store();
        s.init().unwrap();
        s.subscribe("a@club.org").unwrap();
        s.init().unwrap();
        assert_eq!(s.list().unwrap().len(), 1);
    }
}
