//! Employee use cases.

use crate::domain::{Employee, NewEmployee, Position};
use crate::error::AppError;
use crate::infra::Session;

#[derive(Debug, Clone)]
pub struct EmployeeCreateReq {
    pub name: String,
    pub email: Option<String>,
    pub position_id: i64,
}

pub fn employee_create(session: &Session, req: EmployeeCreateReq) -> Result<Employee, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    let email = req
        .email
        .as_deref()
        .map(str::trim)
        .unwrap_or_default()
        .to_string();
    if !session.collection::<Position>().exists(req.position_id)? {
        return Err(AppError::NotFound(format!("position {}", req.position_id)));
    }

    let employees = session.collection::<Employee>();
    let pending = employees.add(NewEmployee {
        name: name.to_string(),
        email,
        position: req.position_id.into(),
    });
    let saved = session.save()?;
    let id = saved
        .id(pending)
        .ok_or_else(|| AppError::Db("employee id was not assigned".into()))?;
    log::info!("Employee {} created on position {}", id, req.position_id);

    employees
        .find(id)?
        .ok_or_else(|| AppError::NotFound(format!("employee {}", id)))
}

pub fn employee_list_by_position(
    session: &Session,
    position_id: i64,
) -> Result<Vec<Employee>, AppError> {
    session.collection::<Employee>().by_parent(position_id)
}
