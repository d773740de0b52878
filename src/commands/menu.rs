//! Interactive menu: one line in, one command out, a fresh session per command.

use crate::app::{
    department_create, department_tree, employee_create, position_create, write_company_tree,
    DepartmentCreateReq, EmployeeCreateReq, PositionCreateReq,
};
use crate::domain::{MenuCommand, MenuMachine, MenuState};
use crate::error::AppError;
use crate::infra::{open, DbConfig};
use std::io::{BufRead, Write};

pub const MENU_HEADER: &str = "=== Меню ===";

/// Parse an id typed at a prompt.
pub fn parse_id(s: &str) -> Result<i64, AppError> {
    let s = s.trim();
    s.parse::<i64>().map_err(|_| AppError::Parse(s.to_string()))
}

pub struct Menu<R, W> {
    config: DbConfig,
    input: R,
    output: W,
    state: MenuState,
    input_closed: bool,
}

impl<R: BufRead, W: Write> Menu<R, W> {
    pub fn new(config: DbConfig, input: R, output: W) -> Self {
        Self {
            config,
            input,
            output,
            state: MenuState::Running,
            input_closed: false,
        }
    }

    pub fn state(&self) -> MenuState {
        self.state
    }

    pub fn into_output(self) -> W {
        self.output
    }

    /// Loop until "5" or end of input.
    pub fn run(&mut self) -> Result<(), AppError> {
        while self.state == MenuState::Running {
            self.step()?;
        }
        writeln!(self.output, "До свидания!")?;
        self.output.flush()?;
        Ok(())
    }

    /// Show the menu, read one choice and carry it out.
    pub fn step(&mut self) -> Result<MenuState, AppError> {
        if self.state == MenuState::Exited {
            return Ok(self.state);
        }
        self.print_menu()?;
        let Some(line) = self.read_line()? else {
            log::info!("Input closed, leaving menu");
            self.state = MenuState::Exited;
            return Ok(self.state);
        };

        let command = MenuCommand::parse(&line);
        self.state = MenuMachine::next(self.state, command);
        match command {
            None => writeln!(self.output, "Неизвестная команда: {:?}", line.trim())?,
            Some(MenuCommand::Exit) => {}
            Some(command) => self.dispatch(command)?,
        }
        if self.input_closed {
            self.state = MenuState::Exited;
        }
        Ok(self.state)
    }

    fn print_menu(&mut self) -> Result<(), AppError> {
        writeln!(self.output)?;
        writeln!(self.output, "{}", MENU_HEADER)?;
        for command in MenuCommand::all() {
            writeln!(self.output, "{}. {}", command.as_key(), command.label())?;
        }
        write!(self.output, "Выберите действие: ")?;
        self.output.flush()?;
        Ok(())
    }

    /// Undecodable bytes become U+FFFD, so a garbled line is just bad input.
    fn read_line(&mut self) -> Result<Option<String>, AppError> {
        let mut buf = Vec::new();
        if self.input.read_until(b'\n', &mut buf)? == 0 {
            return Ok(None);
        }
        let line = String::from_utf8_lossy(&buf);
        Ok(Some(line.trim_end_matches(['\n', '\r']).to_string()))
    }

    fn prompt(&mut self, text: &str) -> Result<String, AppError> {
        write!(self.output, "{}", text)?;
        self.output.flush()?;
        match self.read_line()? {
            Some(line) => Ok(line),
            None => {
                self.input_closed = true;
                Ok(String::new())
            }
        }
    }

    /// Input and lookup errors are reported and the menu comes back;
    /// storage errors abort just this command. Console I/O errors end the loop.
    fn dispatch(&mut self, command: MenuCommand) -> Result<(), AppError> {
        let result = match command {
            MenuCommand::AddDepartment => self.add_department(),
            MenuCommand::AddPosition => self.add_position(),
            MenuCommand::AddEmployee => self.add_employee(),
            MenuCommand::DisplayAll => self.display_all(),
            MenuCommand::Exit => Ok(()),
        };
        match result {
            Ok(()) => Ok(()),
            Err(AppError::Io(e)) => Err(AppError::Io(e)),
            Err(e) if e.is_recoverable_input() => {
                log::warn!("{:?}: {} [{}]", command, e, e.code());
                writeln!(self.output, "Ошибка: {}", e)?;
                Ok(())
            }
            Err(e) => {
                log::error!("{:?} aborted: {} [{}]", command, e, e.code());
                writeln!(self.output, "Операция прервана: {}", e)?;
                Ok(())
            }
        }
    }

    fn add_department(&mut self) -> Result<(), AppError> {
        let name = self.prompt("Введите название отдела: ")?;
        let session = open(&self.config)?;
        let department = department_create(&session, DepartmentCreateReq { name })?;
        writeln!(self.output, "Отдел добавлен (ID: {}).", department.id)?;
        Ok(())
    }

    fn add_position(&mut self) -> Result<(), AppError> {
        let title = self.prompt("Введите название должности: ")?;
        let department_id = parse_id(&self.prompt("Введите ID отдела: ")?)?;
        let session = open(&self.config)?;
        let position = position_create(
            &session,
            PositionCreateReq {
                title,
                department_id,
            },
        )?;
        writeln!(self.output, "Должность добавлена (ID: {}).", position.id)?;
        Ok(())
    }

    fn add_employee(&mut self) -> Result<(), AppError> {
        let name = self.prompt("Введите имя сотрудника: ")?;
        let email = self.prompt("Введите Email сотрудника: ")?;
        let position_id = parse_id(&self.prompt("Введите ID должности: ")?)?;
        let session = open(&self.config)?;
        let employee = employee_create(
            &session,
            EmployeeCreateReq {
                name,
                email: Some(email),
                position_id,
            },
        )?;
        writeln!(self.output, "Сотрудник добавлен (ID: {}).", employee.id)?;
        Ok(())
    }

    fn display_all(&mut self) -> Result<(), AppError> {
        let session = open(&self.config)?;
        let departments = department_tree(&session)?;
        write_company_tree(&mut self.output, &departments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_id_accepts_padded_numbers() {
        assert_eq!(parse_id(" 42\n").unwrap(), 42);
    }

    #[test]
    fn parse_id_rejects_text() {
        let err = parse_id("abc").unwrap_err();
        assert_eq!(err.code(), "PARSE_ERROR");
    }
}
