//! Console menu commands and the running/exited state machine.

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MenuCommand {
    AddDepartment,
    AddPosition,
    AddEmployee,
    DisplayAll,
    Exit,
}

impl MenuCommand {
    pub fn as_key(&self) -> &'static str {
        match self {
            Self::AddDepartment => "1",
            Self::AddPosition => "2",
            Self::AddEmployee => "3",
            Self::DisplayAll => "4",
            Self::Exit => "5",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::AddDepartment => "Добавить отдел",
            Self::AddPosition => "Добавить должность",
            Self::AddEmployee => "Добавить сотрудника",
            Self::DisplayAll => "Показать все данные",
            Self::Exit => "Выход",
        }
    }

    /// Surrounding whitespace is ignored; anything else unknown is `None`.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "1" => Some(Self::AddDepartment),
            "2" => Some(Self::AddPosition),
            "3" => Some(Self::AddEmployee),
            "4" => Some(Self::DisplayAll),
            "5" => Some(Self::Exit),
            _ => None,
        }
    }

    pub fn all() -> &'static [Self] {
        &[
            Self::AddDepartment,
            Self::AddPosition,
            Self::AddEmployee,
            Self::DisplayAll,
            Self::Exit,
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuState {
    Running,
    Exited,
}

pub struct MenuMachine;

impl MenuMachine {
    /// Next state after reading one line (`None` = unrecognised input).
    pub fn next(state: MenuState, command: Option<MenuCommand>) -> MenuState {
        match (state, command) {
            (MenuState::Exited, _) => MenuState::Exited,
            (MenuState::Running, Some(MenuCommand::Exit)) => MenuState::Exited,
            (MenuState::Running, _) => MenuState::Running,
        }
    }
}
