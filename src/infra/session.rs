//! Connection-scoped unit of work: typed sets, staged inserts, relation loading.

use super::mapping::Entity;
use super::query::{DepartmentQuery, EmployeeQuery};
use crate::domain::{BelongsTo, HasMany, Key, NewEntity, Pending};
use crate::error::AppError;
use chrono::Utc;
use rusqlite::{params, Connection, Params, Row};
use std::cell::{Cell, RefCell};
use std::marker::PhantomData;

/// One connection plus the inserts staged on it.
///
/// Reads go straight to storage; inserts wait in the session until `save`.
/// Dropping the session releases the connection and discards unsaved adds.
pub struct Session {
    conn: Option<Connection>,
    staged: RefCell<Vec<NewEntity>>,
    tag: u64,
    batch: Box<Cell<u64>>,
    fetches: Cell<u64>,
}

impl Session {
    pub(crate) fn new(conn: Connection) -> Self {
        let batch = Box::new(Cell::new(1));
        Self {
            conn: Some(conn),
            staged: RefCell::new(Vec::new()),
            tag: session_tag(&batch),
            batch,
            fetches: Cell::new(0),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.conn.is_none()
    }

    /// Release the connection. Later queries, loads and saves fail with `SessionClosed`.
    pub fn close(&mut self) -> Result<(), AppError> {
        self.staged.borrow_mut().clear();
        match self.conn.take() {
            Some(conn) => {
                log::debug!("Session closed after {} fetches", self.fetches.get());
                conn.close().map_err(|(_, e)| AppError::from(e))
            }
            None => Ok(()),
        }
    }

    /// Number of read round-trips issued so far.
    pub fn fetch_count(&self) -> u64 {
        self.fetches.get()
    }

    /// Number of adds waiting for `save`.
    pub fn pending_count(&self) -> usize {
        self.staged.borrow().len()
    }

    fn conn(&self) -> Result<&Connection, AppError> {
        self.conn.as_ref().ok_or(AppError::SessionClosed)
    }

    pub fn collection<E: Entity>(&self) -> Set<'_, E> {
        Set {
            session: self,
            _entity: PhantomData,
        }
    }

    /// Eager query over employees.
    pub fn employees(&self) -> EmployeeQuery<'_> {
        EmployeeQuery::new(self)
    }

    /// Eager query over departments.
    pub fn departments(&self) -> DepartmentQuery<'_> {
        DepartmentQuery::new(self)
    }

    /// Run one read statement. Each call is one trip to storage.
    pub(crate) fn fetch<T, P, F>(&self, sql: &str, params: P, map: F) -> Result<Vec<T>, AppError>
    where
        P: Params,
        F: FnMut(&Row<'_>) -> rusqlite::Result<T>,
    {
        let conn = self.conn()?;
        self.fetches.set(self.fetches.get() + 1);
        log::debug!("fetch #{}: {}", self.fetches.get(), sql);
        let mut stmt = conn.prepare(sql)?;
        let rows = stmt.query_map(params, map)?;
        let mut out = Vec::new();
        for r in rows {
            out.push(r?);
        }
        Ok(out)
    }

    pub(crate) fn find<E: Entity>(&self, id: i64) -> Result<Option<E>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} WHERE id = ?1",
            E::COLUMNS.join(", "),
            E::TABLE
        );
        Ok(self.fetch(&sql, [id], |r| E::from_row(r, 0))?.into_iter().next())
    }

    fn get<E: Entity>(&self, id: i64) -> Result<E, AppError> {
        self.find(id)?
            .ok_or_else(|| AppError::NotFound(format!("{} {}", E::TABLE, id)))
    }

    fn children_of<C>(&self, parent_id: i64) -> Result<Vec<C>, AppError>
    where
        C: Entity + BelongsTo,
    {
        let sql = format!(
            "SELECT {} FROM {} WHERE {} = ?1 ORDER BY id",
            C::COLUMNS.join(", "),
            C::TABLE,
            C::FOREIGN_KEY
        );
        self.fetch(&sql, [parent_id], |r| C::from_row(r, 0))
    }

    /// Explicit loading: fetch the parent now and overwrite the reference.
    pub fn load_parent<'a, C>(&self, child: &'a mut C) -> Result<&'a mut C::Parent, AppError>
    where
        C: BelongsTo,
        C::Parent: Entity,
    {
        let parent = self.get::<C::Parent>(child.parent_id())?;
        Ok(child.parent_ref().set(parent))
    }

    /// Explicit loading: fetch the children now and overwrite the collection.
    pub fn load_children<'a, P>(&self, parent: &'a mut P) -> Result<&'a mut Vec<P::Child>, AppError>
    where
        P: HasMany + Entity,
        P::Child: Entity,
    {
        let children = self.children_of::<P::Child>(parent.id())?;
        Ok(parent.children_ref().set(children))
    }

    /// Lazy loading: fetch the parent only if the reference is still unloaded.
    pub fn lazy_parent<'a, C>(&self, child: &'a mut C) -> Result<&'a mut C::Parent, AppError>
    where
        C: BelongsTo,
        C::Parent: Entity,
    {
        let parent_id = child.parent_id();
        child
            .parent_ref()
            .get_or_try_load(|| self.get::<C::Parent>(parent_id))
    }

    /// Lazy loading: fetch the children only if the collection is still unloaded.
    pub fn lazy_children<'a, P>(&self, parent: &'a mut P) -> Result<&'a mut Vec<P::Child>, AppError>
    where
        P: HasMany + Entity,
        P::Child: Entity,
    {
        let parent_id = parent.id();
        parent
            .children_ref()
            .get_or_try_load(|| self.children_of::<P::Child>(parent_id))
    }

    fn stage<E: Entity>(&self, new: E::New) -> Pending<E> {
        let mut staged = self.staged.borrow_mut();
        staged.push(new.into());
        Pending::new(self.tag, self.batch.get(), staged.len() - 1)
    }

    /// Write every staged add in one transaction, in add order.
    ///
    /// Staged adds are consumed whether or not the write succeeds; on failure
    /// nothing from the batch is left in storage.
    pub fn save(&self) -> Result<Saved, AppError> {
        let staged = self.staged.take();
        let batch = self.batch.get();
        self.batch.set(batch + 1);
        let unit = (self.tag, batch);
        let conn = self.conn()?;
        if staged.is_empty() {
            return Ok(Saved {
                unit,
                ids: Vec::new(),
            });
        }
        match write_batch(conn, &staged, unit) {
            Ok(ids) => {
                log::info!("Saved {} rows", ids.len());
                Ok(Saved { unit, ids })
            }
            Err(e) => {
                log::warn!("Save of {} rows rolled back: {}", staged.len(), e);
                Err(e)
            }
        }
    }
}

/// Identifies one session for the lifetime of its pending handles.
///
/// Live sessions never share the address of their batch counter; the open
/// time separates a dropped session from a later one reusing that memory.
fn session_tag(batch: &Cell<u64>) -> u64 {
    let addr = batch as *const Cell<u64> as usize as u64;
    let opened = Utc::now().timestamp_nanos_opt().unwrap_or_default() as u64;
    addr ^ opened.rotate_left(32)
}

/// `(session tag, batch number)` of one save.
type Unit = (u64, u64);

fn write_batch(conn: &Connection, staged: &[NewEntity], unit: Unit) -> Result<Vec<i64>, AppError> {
    let now = Utc::now().to_rfc3339();
    let tx = conn.unchecked_transaction()?;
    let mut ids = Vec::with_capacity(staged.len());
    for entity in staged {
        match entity {
            NewEntity::Department(d) => {
                tx.execute(
                    "INSERT INTO departments (name, created_at) VALUES (?1, ?2)",
                    params![d.name, &now],
                )?;
            }
            NewEntity::Position(p) => {
                let department_id = resolve(p.department, unit, &ids)?;
                tx.execute(
                    "INSERT INTO positions (title, department_id, created_at) VALUES (?1, ?2, ?3)",
                    params![p.title, department_id, &now],
                )?;
            }
            NewEntity::Employee(e) => {
                let position_id = resolve(e.position, unit, &ids)?;
                tx.execute(
                    "INSERT INTO employees (name, email, position_id, created_at)
                     VALUES (?1, ?2, ?3, ?4)",
                    params![e.name, e.email, position_id, &now],
                )?;
            }
        }
        ids.push(tx.last_insert_rowid());
    }
    tx.commit()?;
    Ok(ids)
}

fn resolve<E>(key: Key<E>, unit: Unit, ids: &[i64]) -> Result<i64, AppError> {
    match key {
        Key::Id(id) => Ok(id),
        Key::Pending(p) if (p.session, p.batch) == unit => ids
            .get(p.slot)
            .copied()
            .ok_or_else(|| AppError::Validation("pending key refers to a later add".into())),
        Key::Pending(_) => Err(AppError::Validation(
            "pending key belongs to another unit of work".into(),
        )),
    }
}

/// Ids assigned by one `save`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Saved {
    unit: Unit,
    ids: Vec<i64>,
}

impl Saved {
    /// Id assigned to a staged add, if it was part of this save.
    pub fn id<E>(&self, pending: Pending<E>) -> Option<i64> {
        if (pending.session, pending.batch) != self.unit {
            return None;
        }
        self.ids.get(pending.slot).copied()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Typed view over one table within a session.
pub struct Set<'s, E> {
    session: &'s Session,
    _entity: PhantomData<fn() -> E>,
}

impl<'s, E: Entity> Set<'s, E> {
    /// Stage an insert; the row is written by the next `Session::save`.
    pub fn add(&self, new: E::New) -> Pending<E> {
        self.session.stage::<E>(new)
    }

    pub fn add_range<I>(&self, news: I) -> Vec<Pending<E>>
    where
        I: IntoIterator<Item = E::New>,
    {
        news.into_iter().map(|n| self.add(n)).collect()
    }

    pub fn find(&self, id: i64) -> Result<Option<E>, AppError> {
        self.session.find(id)
    }

    /// Lowest id first.
    pub fn find_first(&self) -> Result<Option<E>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id LIMIT 1",
            E::COLUMNS.join(", "),
            E::TABLE
        );
        Ok(self
            .session
            .fetch(&sql, params![], |r| E::from_row(r, 0))?
            .into_iter()
            .next())
    }

    pub fn list(&self) -> Result<Vec<E>, AppError> {
        let sql = format!(
            "SELECT {} FROM {} ORDER BY id",
            E::COLUMNS.join(", "),
            E::TABLE
        );
        self.session.fetch(&sql, params![], |r| E::from_row(r, 0))
    }

    pub fn count(&self) -> Result<i64, AppError> {
        let sql = format!("SELECT COUNT(1) FROM {}", E::TABLE);
        Ok(self
            .session
            .fetch(&sql, params![], |r| r.get::<_, i64>(0))?
            .into_iter()
            .next()
            .unwrap_or(0))
    }

    pub fn exists(&self, id: i64) -> Result<bool, AppError> {
        Ok(self.find(id)?.is_some())
    }

    /// Every row matching `predicate`, in id order.
    pub fn filter<F>(&self, mut predicate: F) -> Result<Vec<E>, AppError>
    where
        F: FnMut(&E) -> bool,
    {
        Ok(self.list()?.into_iter().filter(|e| predicate(e)).collect())
    }
}

impl<'s, E: Entity + BelongsTo> Set<'s, E> {
    /// Rows owned by the given parent, in id order.
    pub fn by_parent(&self, parent_id: i64) -> Result<Vec<E>, AppError> {
        self.session.children_of(parent_id)
    }
}
