//! Console rendering of company data.

use crate::domain::{Department, Employee, Position};
use crate::error::AppError;
use std::io::Write;

fn loaded<T>(items: Option<&Vec<T>>) -> &[T] {
    items.map(Vec::as_slice).unwrap_or(&[])
}

/// Departments, their positions and the positions' employees, indented.
pub fn write_company_tree<W: Write>(
    out: &mut W,
    departments: &[Department],
) -> Result<(), AppError> {
    if departments.is_empty() {
        writeln!(out, "Нет данных.")?;
        return Ok(());
    }
    for department in departments {
        writeln!(out, "Отдел: {} (ID: {})", department.name, department.id)?;
        let positions = loaded(department.positions.get());
        if positions.is_empty() {
            writeln!(out, "  (нет должностей)")?;
        }
        for position in positions {
            write_position(out, position)?;
        }
    }
    Ok(())
}

fn write_position<W: Write>(out: &mut W, position: &Position) -> Result<(), AppError> {
    writeln!(out, "  Должность: {} (ID: {})", position.title, position.id)?;
    let employees = loaded(position.employees.get());
    if employees.is_empty() {
        writeln!(out, "    (нет сотрудников)")?;
    }
    for employee in employees {
        write_employee_line(out, employee)?;
    }
    Ok(())
}

fn write_employee_line<W: Write>(out: &mut W, employee: &Employee) -> Result<(), AppError> {
    writeln!(
        out,
        "    Сотрудник: {}, Email: {} (ID: {})",
        employee.name, employee.email, employee.id
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Reference;

    fn department(id: i64, name: &str, positions: Vec<Position>) -> Department {
        Department {
            id,
            name: name.into(),
            created_at: String::new(),
            positions: Reference::loaded(positions),
        }
    }

    fn render(departments: &[Department]) -> String {
        let mut out = Vec::new();
        write_company_tree(&mut out, departments).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn empty_company_says_so() {
        assert_eq!(render(&[]), "Нет данных.\n");
    }

    #[test]
    fn nests_employees_under_positions() {
        let employee = Employee {
            id: 3,
            name: "Анна".into(),
            email: "anna@example.com".into(),
            position_id: 2,
            created_at: String::new(),
            position: Reference::unloaded(),
        };
        let position = Position {
            id: 2,
            title: "Дизайнер".into(),
            department_id: 1,
            created_at: String::new(),
            department: Reference::unloaded(),
            employees: Reference::loaded(vec![employee]),
        };
        let text = render(&[department(1, "Дизайн", vec![position])]);
        assert_eq!(
            text,
            "Отдел: Дизайн (ID: 1)\n  Должность: Дизайнер (ID: 2)\n    Сотрудник: Анна, Email: anna@example.com (ID: 3)\n"
        );
    }

    #[test]
    fn marks_empty_department() {
        let text = render(&[department(1, "Пусто", vec![])]);
        assert!(text.contains("(нет должностей)"));
    }
}
