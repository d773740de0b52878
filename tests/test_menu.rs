//! Interactive menu tests driven through in-memory stdin/stdout.

mod common;

use app_lib::app::company_counts;
use app_lib::commands::menu::MENU_HEADER;
use app_lib::commands::Menu;
use app_lib::domain::MenuState;
use app_lib::infra::{open, DbConfig};
use common::{seeded_db, test_db};
use std::io::Cursor;

// ──────────────────────── Helper ────────────────────────

fn run_menu(config: &DbConfig, input: &str) -> String {
    run_menu_bytes(config, input.as_bytes())
}

fn run_menu_bytes(config: &DbConfig, input: &[u8]) -> String {
    let mut menu = Menu::new(config.clone(), Cursor::new(input.to_vec()), Vec::new());
    menu.run().unwrap();
    assert_eq!(menu.state(), MenuState::Exited);
    String::from_utf8(menu.into_output()).unwrap()
}

fn menus_shown(output: &str) -> usize {
    output.matches(MENU_HEADER).count()
}

// ══════════════════════════════════════════════════════════
//  state machine
// ══════════════════════════════════════════════════════════

#[test]
fn exit_right_away_shows_one_menu() {
    let db = test_db();
    let out = run_menu(&db.config, "5\n");
    assert_eq!(menus_shown(&out), 1);
    assert!(out.ends_with("До свидания!\n"));
}

#[test]
fn unknown_choice_reprompts() {
    let db = test_db();
    let out = run_menu(&db.config, "9\nhello\n5\n");
    assert_eq!(menus_shown(&out), 3);
    assert_eq!(out.matches("Неизвестная команда").count(), 2);
}

#[test]
fn undecodable_choice_reprompts() {
    let db = test_db();
    let out = run_menu_bytes(&db.config, &[0xff, 0xfe, b'\n', b'5', b'\n']);
    assert_eq!(menus_shown(&out), 2);
    assert_eq!(out.matches("Неизвестная команда").count(), 1);
    assert!(out.ends_with("До свидания!\n"));
}

#[test]
fn end_of_input_exits() {
    let db = test_db();
    let out = run_menu(&db.config, "4\n");
    assert_eq!(menus_shown(&out), 2);
}

#[test]
fn step_after_exit_does_nothing() {
    let db = test_db();
    let mut menu = Menu::new(db.config.clone(), Cursor::new(b"5\n1\n".to_vec()), Vec::new());
    assert_eq!(menu.step().unwrap(), MenuState::Exited);
    assert_eq!(menu.step().unwrap(), MenuState::Exited);
    let out = String::from_utf8(menu.into_output()).unwrap();
    assert_eq!(menus_shown(&out), 1);
}

// ══════════════════════════════════════════════════════════
//  commands
// ══════════════════════════════════════════════════════════

#[test]
fn add_department_position_employee() {
    let db = test_db();
    let out = run_menu(
        &db.config,
        "1\nМаркетинг\n2\nSMM\n1\n3\nЕлена\nelena@example.com\n1\n5\n",
    );
    assert!(out.contains("Отдел добавлен (ID: 1)."));
    assert!(out.contains("Должность добавлена (ID: 1)."));
    assert!(out.contains("Сотрудник добавлен (ID: 1)."));

    let session = open(&db.config).unwrap();
    let counts = company_counts(&session).unwrap();
    assert_eq!((counts.departments, counts.positions, counts.employees), (1, 1, 1));
}

#[test]
fn non_numeric_id_does_not_crash() {
    let db = seeded_db();
    let out = run_menu(&db.config, "2\nАналитик\nabc\n5\n");
    assert!(out.contains("Ошибка: Invalid number: \"abc\""));
    assert_eq!(menus_shown(&out), 2);

    let session = open(&db.config).unwrap();
    assert_eq!(company_counts(&session).unwrap().positions, 3);
}

#[test]
fn undecodable_id_is_a_parse_error() {
    let db = seeded_db();
    let mut input = "2\nАналитик\n".as_bytes().to_vec();
    input.extend_from_slice(&[0xd0, b'\n']);
    input.extend_from_slice(b"5\n");
    let out = run_menu_bytes(&db.config, &input);
    assert!(out.contains("Ошибка: Invalid number"));
    assert_eq!(menus_shown(&out), 2);

    let session = open(&db.config).unwrap();
    assert_eq!(company_counts(&session).unwrap().positions, 3);
}

#[test]
fn undecodable_name_keeps_the_loop_going() {
    let db = test_db();
    let out = run_menu_bytes(&db.config, &[b'1', b'\n', 0xd0, b'\n', b'5', b'\n']);
    assert!(out.contains("Отдел добавлен (ID: 1)."));
    assert_eq!(menus_shown(&out), 2);
}

#[test]
fn unknown_parent_id_is_reported() {
    let db = seeded_db();
    let out = run_menu(&db.config, "2\nАналитик\n42\n3\nКто-то\n\n99\n5\n");
    assert!(out.contains("Ошибка: Not found: department 42"));
    assert!(out.contains("Ошибка: Not found: position 99"));

    let session = open(&db.config).unwrap();
    let counts = company_counts(&session).unwrap();
    assert_eq!((counts.positions, counts.employees), (3, 4));
}

#[test]
fn empty_department_name_is_reported() {
    let db = test_db();
    let out = run_menu(&db.config, "1\n   \n5\n");
    assert!(out.contains("Ошибка: Validation failed: name is required"));
    assert_eq!(menus_shown(&out), 2);
}

#[test]
fn display_all_prints_tree() {
    let db = seeded_db();
    let out = run_menu(&db.config, "4\n5\n");
    assert!(out.contains("Отдел: Отдел разработки (ID: 1)"));
    assert!(out.contains("    Сотрудник: Анна Архипова, Email: anna@example.com (ID: 4)"));
}

#[test]
fn display_all_on_empty_database() {
    let db = test_db();
    let out = run_menu(&db.config, "4\n5\n");
    assert!(out.contains("Нет данных."));
}

#[test]
fn storage_failure_aborts_command_only() {
    let dir = tempfile::TempDir::new().unwrap();
    // Schema never created: every command hits a storage error.
    let config = DbConfig::new(dir.path().join("bare.db"));
    let out = run_menu(&config, "4\n1\nОтдел\n5\n");
    assert_eq!(out.matches("Операция прервана").count(), 2);
    assert_eq!(menus_shown(&out), 3);
}
