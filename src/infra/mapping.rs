//! Table/row mapping for the company entities.

use crate::domain::{
    Department, Employee, NewDepartment, NewEmployee, NewEntity, NewPosition, Position, Reference,
};
use rusqlite::Row;

/// A table-backed entity the session knows how to read and stage.
pub trait Entity: Sized {
    type New: Into<NewEntity>;

    const TABLE: &'static str;
    /// Column order used by `from_row`; `id` must come first.
    const COLUMNS: &'static [&'static str];

    fn id(&self) -> i64;

    /// Build from `row`, reading `COLUMNS` starting at column `offset`.
    /// Navigation references come back unloaded.
    fn from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self>;

    /// Like `from_row`, but `None` when the id column is NULL (outer joins).
    fn from_optional_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Option<Self>> {
        match row.get::<_, Option<i64>>(offset)? {
            Some(_) => Self::from_row(row, offset).map(Some),
            None => Ok(None),
        }
    }

    /// `alias.col, alias.col, ...`
    fn select_list(alias: &str) -> String {
        Self::COLUMNS
            .iter()
            .map(|c| format!("{}.{}", alias, c))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl Entity for Department {
    type New = NewDepartment;

    const TABLE: &'static str = "departments";
    const COLUMNS: &'static [&'static str] = &["id", "name", "created_at"];

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Department {
            id: row.get(offset)?,
            name: row.get(offset + 1)?,
            created_at: row.get(offset + 2)?,
            positions: Reference::unloaded(),
        })
    }
}

impl Entity for Position {
    type New = NewPosition;

    const TABLE: &'static str = "positions";
    const COLUMNS: &'static [&'static str] = &["id", "title", "department_id", "created_at"];

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Position {
            id: row.get(offset)?,
            title: row.get(offset + 1)?,
            department_id: row.get(offset + 2)?,
            created_at: row.get(offset + 3)?,
            department: Reference::unloaded(),
            employees: Reference::unloaded(),
        })
    }
}

impl Entity for Employee {
    type New = NewEmployee;

    const TABLE: &'static str = "employees";
    const COLUMNS: &'static [&'static str] = &["id", "name", "email", "position_id", "created_at"];

    fn id(&self) -> i64 {
        self.id
    }

    fn from_row(row: &Row<'_>, offset: usize) -> rusqlite::Result<Self> {
        Ok(Employee {
            id: row.get(offset)?,
            name: row.get(offset + 1)?,
            email: row.get(offset + 2)?,
            position_id: row.get(offset + 3)?,
            created_at: row.get(offset + 4)?,
            position: Reference::unloaded(),
        })
    }
}
