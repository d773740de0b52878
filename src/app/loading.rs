//! The three ways of reaching an employee's position and department.
//!
//! Eager declares the relations up front and gets everything from one JOIN.
//! Explicit fetches the employee alone, then asks for each relation by name.
//! Lazy fetches the employee alone and lets the first read of a relation
//! fetch and cache it.

use super::seed::seed_company;
use crate::domain::Employee;
use crate::error::AppError;
use crate::infra::{open, DbConfig, Session};
use std::io::Write;

/// What every strategy ends up printing for one employee.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmployeeCard {
    pub name: String,
    pub email: String,
    pub title: String,
    pub department: String,
}

impl EmployeeCard {
    fn write_to<W: Write>(&self, out: &mut W) -> Result<(), AppError> {
        writeln!(out, "Сотрудник: {}, Email: {}", self.name, self.email)?;
        writeln!(out, "Должность: {}", self.title)?;
        writeln!(out, "Отдел: {}", self.department)?;
        Ok(())
    }
}

fn first_employee(session: &Session) -> Result<Employee, AppError> {
    session
        .collection::<Employee>()
        .find_first()?
        .ok_or_else(|| AppError::NotFound("employees table is empty".into()))
}

/// All employees with position and department, one query.
pub fn eager_loading<W: Write>(
    session: &Session,
    out: &mut W,
) -> Result<Vec<EmployeeCard>, AppError> {
    let employees = session
        .employees()
        .include_position()
        .then_include_department()
        .list()?;

    let mut cards = Vec::with_capacity(employees.len());
    for employee in &employees {
        let position = employee
            .position
            .get()
            .ok_or_else(|| AppError::NotFound(format!("position of employee {}", employee.id)))?;
        let department = position
            .department
            .get()
            .ok_or_else(|| AppError::NotFound(format!("department of position {}", position.id)))?;
        let card = EmployeeCard {
            name: employee.name.clone(),
            email: employee.email.clone(),
            title: position.title.clone(),
            department: department.name.clone(),
        };
        card.write_to(out)?;
        writeln!(out)?;
        cards.push(card);
    }
    Ok(cards)
}

/// First employee, then one explicit fetch per relation.
pub fn explicit_loading<W: Write>(
    session: &Session,
    out: &mut W,
) -> Result<EmployeeCard, AppError> {
    let mut employee = first_employee(session)?;
    writeln!(out, "Сотрудник: {}, Email: {}", employee.name, employee.email)?;
    let (name, email) = (employee.name.clone(), employee.email.clone());

    let position = session.load_parent(&mut employee)?;
    writeln!(out, "Должность: {}", position.title)?;
    let title = position.title.clone();

    let department = session.load_parent(position)?;
    writeln!(out, "Отдел: {}", department.name)?;

    Ok(EmployeeCard {
        name,
        email,
        title,
        department: department.name.clone(),
    })
}

/// First employee; relations fetched on first read and reused afterwards.
pub fn lazy_loading<W: Write>(session: &Session, out: &mut W) -> Result<EmployeeCard, AppError> {
    let mut employee = first_employee(session)?;
    writeln!(out, "Сотрудник: {}, Email: {}", employee.name, employee.email)?;

    let title = session.lazy_parent(&mut employee)?.title.clone();
    writeln!(out, "Должность: {}", title)?;

    // Position is cached now; only the department is fetched here.
    let position = session.lazy_parent(&mut employee)?;
    let department = session.lazy_parent(position)?.name.clone();
    writeln!(out, "Отдел: {}", department)?;

    Ok(EmployeeCard {
        name: employee.name,
        email: employee.email,
        title,
        department,
    })
}

/// Seed a fresh company and run every strategy, each in its own session.
pub fn run_loading_demo<W: Write>(config: &DbConfig, out: &mut W) -> Result<(), AppError> {
    seed_company(config)?;

    writeln!(out, "Демонстрация различных способов загрузки связанных данных:")?;

    writeln!(out, "\n1. Eager Loading (жадная загрузка, один JOIN):")?;
    {
        let session = open(config)?;
        eager_loading(&session, out)?;
        log::debug!("eager loading used {} fetches", session.fetch_count());
    }

    writeln!(out, "\n2. Explicit Loading (явная загрузка):")?;
    {
        let session = open(config)?;
        explicit_loading(&session, out)?;
        log::debug!("explicit loading used {} fetches", session.fetch_count());
    }

    writeln!(out, "\n3. Lazy Loading (ленивая загрузка):")?;
    {
        let session = open(config)?;
        lazy_loading(&session, out)?;
        log::debug!("lazy loading used {} fetches", session.fetch_count());
    }

    Ok(())
}
