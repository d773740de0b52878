//! Demo dataset: two departments, three positions, four employees.

use crate::domain::{
    Department, Employee, Key, NewDepartment, NewEmployee, NewPosition, Position,
};
use crate::error::AppError;
use crate::infra::{init_db, open, DbConfig, SchemaMode, Session};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompanyCounts {
    pub departments: i64,
    pub positions: i64,
    pub employees: i64,
}

pub fn company_counts(session: &Session) -> Result<CompanyCounts, AppError> {
    Ok(CompanyCounts {
        departments: session.collection::<Department>().count()?,
        positions: session.collection::<Position>().count()?,
        employees: session.collection::<Employee>().count()?,
    })
}

/// Drop and recreate the schema, then insert the demo company in one save.
pub fn seed_company(config: &DbConfig) -> Result<CompanyCounts, AppError> {
    init_db(config, SchemaMode::Recreate)?;

    let session = open(config)?;
    stage_demo_company(&session);
    let saved = session.save()?;
    let counts = company_counts(&session)?;
    log::info!(
        "Seeded {} rows: {} departments, {} positions, {} employees",
        saved.len(),
        counts.departments,
        counts.positions,
        counts.employees
    );
    Ok(counts)
}

fn stage_demo_company(session: &Session) {
    let departments = session.collection::<Department>();
    let dev = departments.add(NewDepartment {
        name: "Отдел разработки".into(),
    });
    let design = departments.add(NewDepartment {
        name: "Отдел дизайна".into(),
    });

    let positions = session.collection::<Position>();
    let csharp = positions.add(NewPosition {
        title: "Разработчик на C#".into(),
        department: dev.into(),
    });
    let java = positions.add(NewPosition {
        title: "Разработчик на Java".into(),
        department: dev.into(),
    });
    let ui_designer = positions.add(NewPosition {
        title: "Дизайнер интерфейсов".into(),
        department: design.into(),
    });

    let employee = |name: &str, email: &str, position: Key<Position>| NewEmployee {
        name: name.into(),
        email: email.into(),
        position,
    };
    session.collection::<Employee>().add_range([
        employee("Иван Иванов", "ivan@example.com", csharp.into()),
        employee("Петр Петров", "petr@example.com", csharp.into()),
        employee("Сидор Сидоров", "sidor@example.com", java.into()),
        employee("Анна Архипова", "anna@example.com", ui_designer.into()),
    ]);
}
