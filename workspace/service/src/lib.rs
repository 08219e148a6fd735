//! Account administration service: validation, binding reconciliation and
//! transactional persistence for set-top-box accounts.

pub mod account;
pub mod audit;
pub mod bindings;
pub mod error;
pub mod forms;
pub mod outcome;
pub mod repository;
pub mod search;


pub use account::AccountService;
pub use audit::{AuditLog, RecordingAuditLog, TracingAuditLog};
pub use error::AdminError;
pub use forms::{AccountForm, UpdateAccountForm};
pub use outcome::{FieldErrors, FormErrorCause, FormState, Outcome, Redirect, Route};
pub use repository::{AccountRepository, SeaOrmAccountRepository};
pub use search::AccountSearch;
