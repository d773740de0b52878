//! Department use cases.

use crate::domain::{Department, NewDepartment};
use crate::error::AppError;
use crate::infra::Session;

#[derive(Debug, Clone)]
pub struct DepartmentCreateReq {
    pub name: String,
}

pub fn department_create(
    session: &Session,
    req: DepartmentCreateReq,
) -> Result<Department, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }

    let departments = session.collection::<Department>();
    let pending = departments.add(NewDepartment {
        name: name.to_string(),
    });
    let saved = session.save()?;
    let id = saved
        .id(pending)
        .ok_or_else(|| AppError::Db("department id was not assigned".into()))?;
    log::info!("Department {} created: {}", id, name);

    departments
        .find(id)?
        .ok_or_else(|| AppError::NotFound(format!("department {}", id)))
}

pub fn department_list(session: &Session) -> Result<Vec<Department>, AppError> {
    session.collection::<Department>().list()
}

/// Every department with its positions and their employees, in one query.
pub fn department_tree(session: &Session) -> Result<Vec<Department>, AppError> {
    session.departments().then_include_employees().list()
}
