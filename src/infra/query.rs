//! Eager queries: related rows declared up front and fetched in one JOIN.

use super::mapping::Entity;
use super::session::Session;
use crate::domain::{Department, Employee, Position, Reference};
use crate::error::AppError;
use rusqlite::params;

/// Employees, optionally with their position and the position's department.
pub struct EmployeeQuery<'s> {
    session: &'s Session,
    position: bool,
    department: bool,
}

impl<'s> EmployeeQuery<'s> {
    pub(crate) fn new(session: &'s Session) -> Self {
        Self {
            session,
            position: false,
            department: false,
        }
    }

    pub fn include_position(mut self) -> Self {
        self.position = true;
        self
    }

    /// Position's department; implies `include_position`.
    pub fn then_include_department(mut self) -> Self {
        self.position = true;
        self.department = true;
        self
    }

    pub fn list(self) -> Result<Vec<Employee>, AppError> {
        self.run(None)
    }

    pub fn first(self) -> Result<Option<Employee>, AppError> {
        Ok(self.run(Some(1))?.into_iter().next())
    }

    fn sql(&self, limit: Option<u32>) -> String {
        let mut columns = vec![Employee::select_list("e")];
        let mut from = String::from("employees e");
        if self.position {
            columns.push(Position::select_list("p"));
            from.push_str(" JOIN positions p ON p.id = e.position_id");
        }
        if self.department {
            columns.push(Department::select_list("d"));
            from.push_str(" JOIN departments d ON d.id = p.department_id");
        }
        let mut sql = format!("SELECT {} FROM {} ORDER BY e.id", columns.join(", "), from);
        if let Some(n) = limit {
            sql.push_str(&format!(" LIMIT {}", n));
        }
        sql
    }

    fn run(self, limit: Option<u32>) -> Result<Vec<Employee>, AppError> {
        let sql = self.sql(limit);
        let (with_position, with_department) = (self.position, self.department);
        let position_at = Employee::COLUMNS.len();
        let department_at = position_at + Position::COLUMNS.len();
        self.session.fetch(&sql, params![], |row| {
            let mut employee = Employee::from_row(row, 0)?;
            if with_position {
                let mut position = Position::from_row(row, position_at)?;
                if with_department {
                    position.department.set(Department::from_row(row, department_at)?);
                }
                employee.position.set(position);
            }
            Ok(employee)
        })
    }
}

/// Departments, optionally with their positions and the positions' employees.
pub struct DepartmentQuery<'s> {
    session: &'s Session,
    positions: bool,
    employees: bool,
}

type DepartmentRow = (Department, Option<Position>, Option<Employee>);

impl<'s> DepartmentQuery<'s> {
    pub(crate) fn new(session: &'s Session) -> Self {
        Self {
            session,
            positions: false,
            employees: false,
        }
    }

    pub fn include_positions(mut self) -> Self {
        self.positions = true;
        self
    }

    /// Each position's employees; implies `include_positions`.
    pub fn then_include_employees(mut self) -> Self {
        self.positions = true;
        self.employees = true;
        self
    }

    pub fn list(self) -> Result<Vec<Department>, AppError> {
        let mut columns = vec![Department::select_list("d")];
        let mut from = String::from("departments d");
        let mut order = String::from("d.id");
        if self.positions {
            columns.push(Position::select_list("p"));
            from.push_str(" LEFT JOIN positions p ON p.department_id = d.id");
            order.push_str(", p.id");
        }
        if self.employees {
            columns.push(Employee::select_list("e"));
            from.push_str(" LEFT JOIN employees e ON e.position_id = p.id");
            order.push_str(", e.id");
        }
        let sql = format!(
            "SELECT {} FROM {} ORDER BY {}",
            columns.join(", "),
            from,
            order
        );

        let (with_positions, with_employees) = (self.positions, self.employees);
        let position_at = Department::COLUMNS.len();
        let employee_at = position_at + Position::COLUMNS.len();
        let rows: Vec<DepartmentRow> = self.session.fetch(&sql, params![], |row| {
            let department = Department::from_row(row, 0)?;
            let position = if with_positions {
                Position::from_optional_row(row, position_at)?
            } else {
                None
            };
            let employee = if with_employees {
                Employee::from_optional_row(row, employee_at)?
            } else {
                None
            };
            Ok((department, position, employee))
        })?;

        if !with_positions {
            return Ok(rows.into_iter().map(|(d, _, _)| d).collect());
        }
        Ok(assemble(rows, with_employees))
    }
}

/// Fold flat JOIN rows (sorted by department, position, employee) into a tree.
fn assemble(rows: Vec<DepartmentRow>, with_employees: bool) -> Vec<Department> {
    let mut tree: Vec<(Department, Vec<(Position, Vec<Employee>)>)> = Vec::new();
    for (department, position, employee) in rows {
        if tree.last().map(|(d, _)| d.id) != Some(department.id) {
            tree.push((department, Vec::new()));
        }
        let (Some((_, positions)), Some(position)) = (tree.last_mut(), position) else {
            continue;
        };
        if positions.last().map(|(p, _)| p.id) != Some(position.id) {
            positions.push((position, Vec::new()));
        }
        if let (Some((_, employees)), Some(employee)) = (positions.last_mut(), employee) {
            employees.push(employee);
        }
    }

    tree.into_iter()
        .map(|(mut department, positions)| {
            let positions = positions
                .into_iter()
                .map(|(mut position, employees)| {
                    if with_employees {
                        position.employees = Reference::loaded(employees);
                    }
                    position
                })
                .collect();
            department.positions = Reference::loaded(positions);
            department
        })
        .collect()
}
