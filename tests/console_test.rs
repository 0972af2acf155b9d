//! Tests for the console input helper

use std::io::Cursor;
use trion::{Console, ConsoleError, ConsoleMessages};

fn scripted(input: &str) -> Console<Cursor<Vec<u8>>, Vec<u8>> {
    Console::new(Cursor::new(input.as_bytes().to_vec()), Vec::new())
}

fn shown(console: &Console<Cursor<Vec<u8>>, Vec<u8>>) -> String {
    String::from_utf8(console.output().clone()).unwrap()
}

#[test]
fn test_int_read_reprompts_on_malformed_token() {
    let mut console = scripted("abc\n42\n");

    assert_eq!(console.read_int_prompt("Zahl: ").unwrap(), 42);

    let messages = ConsoleMessages::default();
    assert_eq!(shown(&console), format!("Zahl: {}\n", messages.invalid_int));
}

#[test]
fn test_each_type_uses_its_own_message() {
    let messages = ConsoleMessages {
        invalid_int: "int?".to_string(),
        invalid_long: "long?".to_string(),
        invalid_float: "float?".to_string(),
        invalid_double: "double?".to_string(),
        invalid_bool: "bool?".to_string(),
    };
    let mut console = scripted("x 1\nx 2\nx 3.5\nx 4.25\nx TRUE\n").with_messages(messages);

    assert_eq!(console.read_int().unwrap(), 1);
    assert_eq!(console.read_long().unwrap(), 2);
    assert_eq!(console.read_float().unwrap(), 3.5);
    assert_eq!(console.read_double().unwrap(), 4.25);
    assert!(console.read_bool().unwrap());

    assert_eq!(shown(&console), "int?\nlong?\nfloat?\ndouble?\nbool?\n");
}

#[test]
fn test_out_of_range_int_is_rejected() {
    let mut console = scripted("3000000000\n-7\n");
    assert_eq!(console.read_int().unwrap(), -7);

    let mut console = scripted("3000000000\n");
    assert_eq!(console.read_long().unwrap(), 3_000_000_000);
}

#[test]
fn test_read_char_takes_first_character_of_token() {
    let mut console = scripted("  yes please\nrest\n");
    assert_eq!(console.read_char_prompt("> ").unwrap(), 'y');
    assert_eq!(console.read_line().unwrap(), "rest");
    assert_eq!(shown(&console), "> ");
}

#[test]
fn test_read_line_returns_whole_lines() {
    let mut console = scripted("first line\n\nthird\n");
    assert_eq!(console.read_line().unwrap(), "first line");
    assert_eq!(console.read_line().unwrap(), "");
    assert_eq!(console.read_line_prompt("? ").unwrap(), "third");
}

#[test]
fn test_exhausted_input_reports_eof() {
    let mut console = scripted("nope\n");
    assert!(matches!(console.read_int(), Err(ConsoleError::Eof)));
    assert!(matches!(console.read_line(), Err(ConsoleError::Eof)));
}

#[test]
fn test_reads_after_close_fail() {
    let mut console = scripted("1\n2\n");
    assert_eq!(console.read_int().unwrap(), 1);

    assert!(console.close());
    assert!(console.is_closed());
    assert!(!console.close());

    assert!(matches!(console.read_int(), Err(ConsoleError::Closed)));
    assert!(matches!(console.read_line(), Err(ConsoleError::Closed)));
    assert!(matches!(console.read_bool_prompt("again? "), Err(ConsoleError::Closed)));

    // Output stays usable and the failed prompt was never written
    console.write("done").unwrap();
    assert_eq!(shown(&console), "done");
}

#[test]
fn test_writes_are_unformatted() {
    let mut console = scripted("");
    console.write(7).unwrap();
    console.write(' ').unwrap();
    console.write_line(2.5).unwrap();
    console.write_line(true).unwrap();
    console.new_line().unwrap();
    console.write_line("text").unwrap();

    assert_eq!(shown(&console), "7 2.5\ntrue\n\ntext\n");
}
