//! Position use cases.

use crate::domain::{Department, NewPosition, Position};
use crate::error::AppError;
use crate::infra::Session;

#[derive(Debug, Clone)]
pub struct PositionCreateReq {
    pub title: String,
    pub department_id: i64,
}

pub fn position_create(session: &Session, req: PositionCreateReq) -> Result<Position, AppError> {
    let title = req.title.trim();
    if title.is_empty() {
        return Err(AppError::Validation("title is required".into()));
    }
    if !session.collection::<Department>().exists(req.department_id)? {
        return Err(AppError::NotFound(format!("department {}", req.department_id)));
    }

    let positions = session.collection::<Position>();
    let pending = positions.add(NewPosition {
        title: title.to_string(),
        department: req.department_id.into(),
    });
    let saved = session.save()?;
    let id = saved
        .id(pending)
        .ok_or_else(|| AppError::Db("position id was not assigned".into()))?;
    log::info!(
        "Position {} created in department {}: {}",
        id,
        req.department_id,
        title
    );

    positions
        .find(id)?
        .ok_or_else(|| AppError::NotFound(format!("position {}", id)))
}

pub fn position_list_by_department(
    session: &Session,
    department_id: i64,
) -> Result<Vec<Position>, AppError> {
    session.collection::<Position>().by_parent(department_id)
}
