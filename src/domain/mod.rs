//! Domain: company entities, navigation references, menu state machine.

pub mod company;
pub mod menu;
pub mod reference;

pub use company::{
    BelongsTo, Department, Employee, HasMany, Key, NewDepartment, NewEmployee, NewEntity,
    NewPosition, Pending, Position,
};
pub use menu::{MenuCommand, MenuMachine, MenuState};
pub use reference::Reference;
