//! Session context and its on-disk store.
//!
//! The session is the bearer token, the serialized profile, and the role
//! discriminator. It is populated on login, cleared on logout or expiry, and
//! passed read-only to everything that needs auth headers.
//!
//! The store keeps the same three values the web client keeps in local
//! storage (`token`, `userInfo`, `userType`) as a JSON file:
//!
//! ```text
//! $CONFIG_DIR/techlearns/session.json
//! ```

use std::fmt;
use std::fs;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Route shown when no session exists.
pub const LOGIN_ROUTE: &str = "/login";

/// Account role. Each role authenticates against its own endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserType {
    #[default]
    #[serde(alias = "student")]
    User,
    Mentor,
    School,
}

impl UserType {
    /// Path segment of the role's auth endpoints (`/api/{segment}/login`).
    pub fn api_segment(self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Mentor => "mentors",
            Self::School => "schools",
        }
    }

    /// Landing route after login.
    pub fn dashboard_route(self) -> &'static str {
        match self {
            Self::User => "/dashboard",
            Self::Mentor => "/mentor/dashboard",
            Self::School => "/school/dashboard",
        }
    }
}

impl fmt::Display for UserType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::User => "user",
            Self::Mentor => "mentor",
            Self::School => "school",
        })
    }
}

impl std::str::FromStr for UserType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "user" | "student" => Ok(Self::User),
            "mentor" => Ok(Self::Mentor),
            "school" => Ok(Self::School),
            other => Err(Error::InvalidOperation(format!("unknown user type: {other}"))),
        }
    }
}

/// Profile returned by the login endpoints.
///
/// Only the fields the client reads are typed; everything else is kept so
/// the profile round-trips unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserInfo {
    #[serde(rename = "_id", alias = "id", default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// An authenticated session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub token: String,
    pub user_info: UserInfo,
    pub user_type: UserType,
}

impl Session {
    pub fn new(token: impl Into<String>, user_info: UserInfo, user_type: UserType) -> Self {
        Self {
            token: token.into(),
            user_info,
            user_type,
        }
    }

    /// Expiry read from the token's `exp` claim.
    ///
    /// Returns `None` for opaque tokens or tokens without an `exp`.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        let payload = self.token.split('.').nth(1)?;
        let bytes = URL_SAFE_NO_PAD.decode(payload.trim_end_matches('=')).ok()?;
        let claims: serde_json::Value = serde_json::from_slice(&bytes).ok()?;
        let exp = claims.get("exp")?.as_i64()?;
        Utc.timestamp_opt(exp, 0).single()
    }

    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at().is_some_and(|exp| exp <= now)
    }
}

/// Explicit auth context handed to operations that need a token.
#[derive(Debug, Clone, Default)]
pub struct SessionContext {
    session: Option<Session>,
}

impl SessionContext {
    /// Context with nobody logged in.
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn with_session(session: Session) -> Self {
        Self {
            session: Some(session),
        }
    }

    /// Populate the context after a successful login.
    pub fn establish(&mut self, session: Session) {
        tracing::debug!(
            "session established for {} ({})",
            session.user_info.email,
            session.user_type
        );
        self.session = Some(session);
    }

    /// Drop the session on logout.
    pub fn clear(&mut self) {
        self.session = None;
    }

    /// Clear the session if its token has expired. Returns whether it did.
    pub fn expire_if_needed(&mut self, now: DateTime<Utc>) -> bool {
        if self.session.as_ref().is_some_and(|s| s.is_expired(now)) {
            tracing::info!("session token expired, clearing");
            self.session = None;
            return true;
        }
        false
    }

    pub fn current(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn token(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.token.as_str())
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    /// Where the UI should land: the role dashboard, or login.
    pub fn redirect_target(&self) -> &'static str {
        self.session
            .as_ref()
            .map_or(LOGIN_ROUTE, |s| s.user_type.dashboard_route())
    }
}

/// File-backed session persistence.
#[derive(Debug, Clone)]
pub struct SessionStore {
    path: PathBuf,
}

impl SessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the platform config location, if one exists.
    pub fn default_location() -> Option<Self> {
        dirs::config_dir().map(|dir| Self::new(dir.join("techlearns").join("session.json")))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored session. A missing file means nobody is logged in.
    pub fn load(&self) -> Result<Option<Session>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&raw)
            .map(Some)
            .map_err(|e| Error::Session(format!("{}: {}", self.path.display(), e)))
    }

    /// Write the session. On unix the file is readable by the owner only.
    pub fn save(&self, session: &Session) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(session)?;

        let mut options = fs::OpenOptions::new();
        options.write(true).create(true).truncate(true);
        #[cfg(unix)]
        {
            use std::os::unix::fs::OpenOptionsExt;
            options.mode(0o600);
        }
        let mut file = options.open(&self.path)?;

        // `mode` only applies on create; tighten a file left by older versions.
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            file.set_permissions(fs::Permissions::from_mode(0o600))?;
        }
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    pub fn clear(&self) -> Result<()> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Build the context for this run, discarding an expired session.
    pub fn restore(&self, now: DateTime<Utc>) -> Result<SessionContext> {
        let mut context = match self.load()? {
            Some(session) => SessionContext::with_session(session),
            None => SessionContext::anonymous(),
        };
        if context.expire_if_needed(now) {
            self.clear()?;
        }
        Ok(context)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn token_with_exp(exp: i64) -> String {
        let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
        let claims = URL_SAFE_NO_PAD.encode(format!(r#"{{"id":"u1","exp":{exp}}}"#));
        format!("{header}.{claims}.signature")
    }

    fn session(token: String, user_type: UserType) -> Session {
        Session::new(
            token,
            UserInfo {
                id: Some("u1".into()),
                name: "Asha".into(),
                email: "asha@example.com".into(),
                extra: Default::default(),
            },
            user_type,
        )
    }

    #[test]
    fn test_storage_keys_match_web_client() {
        let json = serde_json::to_value(session("t".into(), UserType::Mentor)).unwrap();
        assert_eq!(json["token"], "t");
        assert_eq!(json["userType"], "mentor");
        assert_eq!(json["userInfo"]["_id"], "u1");
    }

    #[test]
    fn test_redirect_target_by_role() {
        let mut ctx = SessionContext::anonymous();
        assert_eq!(ctx.redirect_target(), LOGIN_ROUTE);
        assert_eq!(ctx.token(), None);

        ctx.establish(session("t".into(), UserType::School));
        assert_eq!(ctx.redirect_target(), "/school/dashboard");
        assert_eq!(ctx.token(), Some("t"));

        ctx.clear();
        assert!(!ctx.is_authenticated());
    }

    #[test]
    fn test_jwt_expiry() {
        let now = Utc.timestamp_opt(1_700_000_000, 0).unwrap();
        let expired = session(token_with_exp(1_600_000_000), UserType::User);
        let valid = session(token_with_exp(1_800_000_000), UserType::User);
        let opaque = session("not-a-jwt".into(), UserType::User);

        assert!(expired.is_expired(now));
        assert!(!valid.is_expired(now));
        assert!(!opaque.is_expired(now));

        let mut ctx = SessionContext::with_session(expired);
        assert!(ctx.expire_if_needed(now));
        assert!(ctx.current().is_none());
    }

    #[test]
    fn test_store_roundtrip_and_clear() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path().join("nested").join("session.json"));
        assert!(store.load().unwrap().is_none());

        let s = session("abc".into(), UserType::User);
        store.save(&s).unwrap();
        assert_eq!(store.load().unwrap(), Some(s));

        store.clear().unwrap();
        store.clear().unwrap();
        assert!(store.load().unwrap().is_none());
    }

    #[cfg(unix)]
    #[test]
    fn test_saved_session_is_owner_only() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let path = temp.path().join("session.json");
        fs::write(&path, "{}").unwrap();
        fs::set_permissions(&path, fs::Permissions::from_mode(0o644)).unwrap();

        let store = SessionStore::new(&path);
        store.save(&session("abc".into(), UserType::User)).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);

        store.clear().unwrap();
        store.save(&session("abc".into(), UserType::User)).unwrap();
        let mode = fs::metadata(&path).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn test_restore_discards_expired_session() {
        let temp = TempDir::new().unwrap();
        let store = SessionStore::new(temp.path().join("session.json"));
        store
            .save(&session(token_with_exp(1_000), UserType::User))
            .unwrap();

        let ctx = store.restore(Utc::now()).unwrap();
        assert!(!ctx.is_authenticated());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_corrupt_store_is_a_session_error() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("session.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(SessionStore::new(path).load(), Err(Error::Session(_))));
    }

    #[test]
    fn test_user_type_parsing() {
        assert_eq!("Student".parse::<UserType>().unwrap(), UserType::User);
        assert_eq!("school".parse::<UserType>().unwrap(), UserType::School);
        assert!("admin".parse::<UserType>().is_err());
        assert_eq!(UserType::Mentor.api_segment(), "mentors");
    }
}
