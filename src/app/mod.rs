//! Application use cases: CRUD, seeding, loading demos, rendering.

mod department;
mod employee;
mod loading;
mod position;
mod report;
mod seed;

pub use department::{department_create, department_list, department_tree, DepartmentCreateReq};
pub use employee::{employee_create, employee_list_by_position, EmployeeCreateReq};
pub use loading::{eager_loading, explicit_loading, lazy_loading, run_loading_demo, EmployeeCard};
pub use position::{position_create, position_list_by_department, PositionCreateReq};
pub use report::write_company_tree;
pub use seed::{company_counts, seed_company, CompanyCounts};
