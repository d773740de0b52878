//! Company entities: departments own positions, positions own employees.

use super::reference::Reference;
use std::fmt;
use std::marker::PhantomData;

#[derive(Debug, Clone, PartialEq)]
pub struct Department {
    pub id: i64,
    pub name: String,
    pub created_at: String,
    pub positions: Reference<Vec<Position>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Position {
    pub id: i64,
    pub title: String,
    pub department_id: i64,
    pub created_at: String,
    pub department: Reference<Department>,
    pub employees: Reference<Vec<Employee>>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub position_id: i64,
    pub created_at: String,
    pub position: Reference<Position>,
}

/// Handle to an entity staged in a session but not saved yet.
///
/// Only valid within the unit of work that produced it; `Session::save`
/// rejects handles from another session or from an earlier save.
pub struct Pending<E> {
    pub(crate) session: u64,
    pub(crate) batch: u64,
    pub(crate) slot: usize,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Pending<E> {
    pub(crate) fn new(session: u64, batch: u64, slot: usize) -> Self {
        Self {
            session,
            batch,
            slot,
            _entity: PhantomData,
        }
    }
}

impl<E> Clone for Pending<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Pending<E> {}

impl<E> fmt::Debug for Pending<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pending")
            .field("session", &self.session)
            .field("batch", &self.batch)
            .field("slot", &self.slot)
            .finish()
    }
}

/// Foreign key of a new row: an existing id or a parent staged in the same save.
#[derive(Debug)]
pub enum Key<E> {
    Id(i64),
    Pending(Pending<E>),
}

impl<E> Clone for Key<E> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<E> Copy for Key<E> {}

impl<E> From<i64> for Key<E> {
    fn from(id: i64) -> Self {
        Key::Id(id)
    }
}

impl<E> From<Pending<E>> for Key<E> {
    fn from(p: Pending<E>) -> Self {
        Key::Pending(p)
    }
}

#[derive(Debug, Clone)]
pub struct NewDepartment {
    pub name: String,
}

#[derive(Debug, Clone)]
pub struct NewPosition {
    pub title: String,
    pub department: Key<Department>,
}

#[derive(Debug, Clone)]
pub struct NewEmployee {
    pub name: String,
    pub email: String,
    pub position: Key<Position>,
}

/// Any staged insert, in the order it was added.
#[derive(Debug, Clone)]
pub enum NewEntity {
    Department(NewDepartment),
    Position(NewPosition),
    Employee(NewEmployee),
}

impl From<NewDepartment> for NewEntity {
    fn from(d: NewDepartment) -> Self {
        NewEntity::Department(d)
    }
}

impl From<NewPosition> for NewEntity {
    fn from(p: NewPosition) -> Self {
        NewEntity::Position(p)
    }
}

impl From<NewEmployee> for NewEntity {
    fn from(e: NewEmployee) -> Self {
        NewEntity::Employee(e)
    }
}

/// Child side of a one-to-many relation.
pub trait BelongsTo {
    type Parent;
    /// Column on the child's table holding the parent id.
    const FOREIGN_KEY: &'static str;

    fn parent_id(&self) -> i64;
    fn parent_ref(&mut self) -> &mut Reference<Self::Parent>;
}

/// Parent side of a one-to-many relation.
pub trait HasMany: Sized {
    type Child: BelongsTo<Parent = Self>;

    fn children_ref(&mut self) -> &mut Reference<Vec<Self::Child>>;
}

impl BelongsTo for Position {
    type Parent = Department;
    const FOREIGN_KEY: &'static str = "department_id";

    fn parent_id(&self) -> i64 {
        self.department_id
    }

    fn parent_ref(&mut self) -> &mut Reference<Department> {
        &mut self.department
    }
}

impl BelongsTo for Employee {
    type Parent = Position;
    const FOREIGN_KEY: &'static str = "position_id";

    fn parent_id(&self) -> i64 {
        self.position_id
    }

    fn parent_ref(&mut self) -> &mut Reference<Position> {
        &mut self.position
    }
}

impl HasMany for Department {
    type Child = Position;

    fn children_ref(&mut self) -> &mut Reference<Vec<Position>> {
        &mut self.positions
    }
}

impl HasMany for Position {
    type Child = Employee;

    fn children_ref(&mut self) -> &mut Reference<Vec<Employee>> {
        &mut self.employees
    }
}
