mod add;
mod set;

use nom::branch::alt;
use nom::bytes::complete::{tag_no_case, take_till};
use nom::character::complete::{char, multispace0, multispace1};
use nom::combinator::{all_consuming, map, map_res, value};
use nom::sequence::{delimited, preceded, terminated};
use nom::{IResult, InputTakeAtPosition};
use crate::common::CommandError;
use crate::form::Field;
use crate::transaction::TransactionType;
use crate::util::MonthKey;

pub(crate) use add::AddCommand;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Command {
    /// ADD type amount [ON date] [CATEGORY 'text'] [DESC 'text']
    Add(AddCommand),
    /// SET field value
    Set(Field, String),
    Submit,
    Cancel,
    /// Show the form
    Form,
    /// EDIT id
    Edit(String),
    /// DELETE id
    Delete(String),
    Clear,
    /// MONTH yyyy-mm
    Month(MonthKey),
    Show,
    /// EXPORT file_path
    Export(String),
    Help,
    Quit,
}

pub(crate) fn parse(input: &str) -> Result<Command, CommandError> {
    let result = all_consuming(delimited(multispace0, command, multispace0))(input);
    match result {
        Ok((_, command)) => Ok(command),
        Err(_) => Err(CommandError::new(input)),
    }
}

fn command(input: &str) -> IResult<&str, Command> {
    alt((
        add::add,
        set::set,
        map(preceded(keyword("edit"), id), Command::Edit),
        map(preceded(keyword("delete"), id), Command::Delete),
        map(preceded(keyword("month"), month_key), Command::Month),
        map(preceded(keyword("export"), text), Command::Export),
        value(Command::Submit, tag_no_case("submit")),
        value(Command::Cancel, tag_no_case("cancel")),
        value(Command::Form, tag_no_case("form")),
        value(Command::Clear, tag_no_case("clear")),
        value(Command::Show, alt((tag_no_case("show"), tag_no_case("list")))),
        value(Command::Help, alt((tag_no_case("help"), tag_no_case("?")))),
        value(Command::Quit, alt((tag_no_case("quit"), tag_no_case("exit")))),
    ))(input)
}

/// A keyword followed by at least one space.
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag_no_case(word), multispace1)
}

pub(crate) fn non_space(input: &str) -> IResult<&str, &str> {
    input.split_at_position1_complete(char::is_whitespace, nom::error::ErrorKind::Space)
}

/// Text in single or double quotes, which may be empty, or a single unquoted word.
pub(crate) fn text(input: &str) -> IResult<&str, String> {
    let single = delimited(char('\''), take_till(|c| c == '\''), char('\''));
    let double = delimited(char('"'), take_till(|c| c == '"'), char('"'));
    map(alt((single, double, non_space)), str::to_string)(input)
}

fn id(input: &str) -> IResult<&str, String> {
    map(non_space, str::to_string)(input)
}

fn month_key(input: &str) -> IResult<&str, MonthKey> {
    map_res(non_space, str::parse::<MonthKey>)(input)
}

pub(crate) fn transaction_type(input: &str) -> IResult<&str, TransactionType> {
    alt((
        value(TransactionType::Income, tag_no_case("income")),
        value(TransactionType::Expense, tag_no_case("expense")),
    ))(input)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        assert_eq!(parse("submit"), Ok(Command::Submit));
        assert_eq!(parse("  CANCEL "), Ok(Command::Cancel));
        assert_eq!(parse("form"), Ok(Command::Form));
        assert_eq!(parse("clear"), Ok(Command::Clear));
        assert_eq!(parse("show"), Ok(Command::Show));
        assert_eq!(parse("list"), Ok(Command::Show));
        assert_eq!(parse("help"), Ok(Command::Help));
        assert_eq!(parse("exit"), Ok(Command::Quit));
    }

    #[test]
    fn test_id_commands() {
        assert_eq!(parse("edit 3fa85f64"), Ok(Command::Edit("3fa85f64".into())));
        assert_eq!(parse("DELETE lx9k2abc"), Ok(Command::Delete("lx9k2abc".into())));
        assert!(parse("delete").is_err());
        assert!(parse("edit a b").is_err());
    }

    #[test]
    fn test_month() {
        assert_eq!(parse("month 2024-03"), Ok(Command::Month(MonthKey::new(2024, 3).unwrap())));
        assert!(parse("month 2024-13").is_err());
        assert!(parse("month march").is_err());
    }

    #[test]
    fn test_export() {
        assert_eq!(parse("export './finance/export.csv'"), Ok(Command::Export("./finance/export.csv".into())));
        assert_eq!(parse("export \"my file.csv\""), Ok(Command::Export("my file.csv".into())));
        assert_eq!(parse("export out.csv"), Ok(Command::Export("out.csv".into())));
    }

    #[test]
    fn test_unknown() {
        assert_eq!(parse("submitx"), Err(CommandError::new("submitx")));
        assert!(parse("").is_err());
        assert!(parse("select * from db").is_err());
    }

    #[test]
    fn test_text() {
        assert_eq!(text("'' rest"), Ok((" rest", "".to_string())));
        assert_eq!(text("'a b' rest"), Ok((" rest", "a b".to_string())));
        assert_eq!(text("word rest"), Ok((" rest", "word".to_string())));
    }
}
