//! TechLearns notebook client core.
//!
//! Domain types and learner-facing state that do not touch the network:
//!
//! - **Language registry**: supported languages and their starter templates
//! - **Notebook**: the saved document and its wire payload
//! - **Editor**: live editor state plus the typing animation driver
//! - **Session**: the explicit auth context and its on-disk store
//! - **Validation**: login and signup form checks
//! - **Dashboards**: competitions and mock-test results
//! - **Status**: per-operation Idle/Pending/Succeeded/Failed banners

pub mod competition;
pub mod editor;
pub mod error;
pub mod language;
pub mod notebook;
pub mod session;
pub mod status;
pub mod typing;
pub mod validation;

pub use error::{Error, Result};
pub use language::{Language, LanguageOption};
pub use notebook::{Notebook, NotebookId, NotebookPayload};
pub use session::{Session, SessionContext, SessionStore, UserInfo, UserType};
