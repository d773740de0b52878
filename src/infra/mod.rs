//! Infrastructure: SQLite connection, schema, sessions and queries.

pub mod db;
pub mod mapping;
pub mod query;
pub mod session;

pub use db::{init_db, open, DbConfig, SchemaMode};
pub use mapping::Entity;
pub use query::{DepartmentQuery, EmployeeQuery};
pub use session::{Saved, Session, Set};
