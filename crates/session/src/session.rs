use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::SessionError;
use crate::store::SessionStore;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthProvider {
    Google,
    #[default]
    Email,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    #[serde(default)]
    pub provider: AuthProvider,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub signed_in_at: Option<DateTime<Utc>>,
}

impl User {
    /// A new email-provider user with a generated id.
    pub fn with_email(
        name: impl Into<String>,
        email: impl Into<String>,
    ) -> Result<Self, SessionError> {
        let email = email.into();
        if !email.contains('@') {
            return Err(SessionError::InvalidUser(format!("invalid email: {email}")));
        }
        let name = name.into();
        let name = if name.trim().is_empty() {
            email.split('@').next().unwrap_or_default().to_string()
        } else {
            name
        };
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            name,
            email,
            avatar: None,
            provider: AuthProvider::Email,
            signed_in_at: None,
        })
    }
}

/// The current login state. Empty until a user logs in or a stored session is restored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub user: Option<User>,
}

impl Session {
    pub fn init() -> Self {
        Self::default()
    }

    /// Never fails: unreadable storage yields an empty session, and undecodable
    /// contents are removed.
    pub fn restore(store: &dyn SessionStore) -> Self {
        let contents = match store.load() {
            Ok(Some(contents)) => contents,
            Ok(None) => return Self::init(),
            Err(e) => {
                tracing::warn!(error = %e, "failed to read stored session");
                return Self::init();
            }
        };

        match serde_json::from_str::<User>(&contents) {
            Ok(user) => {
                tracing::debug!(user_id = %user.id, "restored session");
                Self { user: Some(user) }
            }
            Err(e) => {
                tracing::warn!(error = %e, "discarding corrupt stored session");
                if let Err(e) = store.remove() {
                    tracing::warn!(error = %e, "failed to remove corrupt session");
                }
                Self::init()
            }
        }
    }

    pub fn login(
        &mut self,
        mut user: User,
        store: &dyn SessionStore,
    ) -> Result<(), SessionError> {
        user.signed_in_at.get_or_insert_with(Utc::now);
        store.save(&serde_json::to_string(&user)?)?;
        tracing::info!(user_id = %user.id, provider = ?user.provider, "logged in");
        self.user = Some(user);
        Ok(())
    }

    pub fn clear(&mut self, store: &dyn SessionStore) -> Result<(), SessionError> {
        store.remove()?;
        if let Some(user) = self.user.take() {
            tracing::info!(user_id = %user.id, "logged out");
        }
        Ok(())
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{FileSessionStore, MemorySessionStore};

    fn alex() -> User {
        User::with_email("Alex Johnson", "alex@example.com").unwrap()
    }

    #[test]
    fn init_is_empty() {
        let session = Session::init();
        assert!(session.user.is_none());
        assert!(!session.is_authenticated());
    }

    #[test]
    fn login_persists_and_restores() {
        let store = MemorySessionStore::new();
        let mut session = Session::init();
        session.login(alex(), &store).unwrap();
        assert!(session.is_authenticated());

        let restored = Session::restore(&store);
        assert_eq!(restored, session);
        assert!(restored.user.unwrap().signed_in_at.is_some());
    }

    #[test]
    fn clear_removes_stored_session() {
        let store = MemorySessionStore::new();
        let mut session = Session::init();
        session.login(alex(), &store).unwrap();

        session.clear(&store).unwrap();
        assert!(!session.is_authenticated());
        assert_eq!(store.load().unwrap(), None);
        assert_eq!(Session::restore(&store), Session::init());
    }

    #[test]
    fn corrupt_session_is_discarded() {
        let store = MemorySessionStore::with_contents("{not json");
        let session = Session::restore(&store);
        assert_eq!(session, Session::init());
        assert_eq!(store.load().unwrap(), None);
    }

    #[test]
    fn stored_user_from_older_clients_still_restores() {
        let store = MemorySessionStore::with_contents(
            r#"{"id":"1","name":"Alex Johnson","email":"alex@example.com","provider":"google"}"#,
        );
        let user = Session::restore(&store).user.unwrap();
        assert_eq!(user.provider, AuthProvider::Google);
        assert_eq!(user.avatar, None);
        assert_eq!(user.signed_in_at, None);
    }

    #[test]
    fn file_backed_session() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileSessionStore::new(dir.path().join("session.json"));

        let mut session = Session::restore(&store);
        assert!(!session.is_authenticated());
        session.login(alex(), &store).unwrap();

        let restored = Session::restore(&store);
        assert_eq!(restored.user.map(|u| u.email), Some("alex@example.com".to_string()));
    }

    #[test]
    fn email_is_validated() {
        let err = User::with_email("Alex", "not-an-email").unwrap_err();
        assert!(matches!(err, SessionError::InvalidUser(_)));

        let user = User::with_email("", "sam@example.com").unwrap();
        assert_eq!(user.name, "sam");
    }
}
