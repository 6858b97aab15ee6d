use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::{multispace0, multispace1};
use nom::combinator::value;
use nom::IResult;
use crate::form::Field;
use crate::parser::{text, Command};

/// Parse `SET field value`. An empty value (`SET category ''`) clears the field.
pub(crate) fn set(input: &str) -> IResult<&str, Command> {
    let (input, _) = tag_no_case("SET")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, field) = field(input)?;
    let (input, _) = multispace1(input)?;
    let (input, value) = text(input)?;
    let (input, _) = multispace0(input)?;
    Ok((input, Command::Set(field, value)))
}

fn field(input: &str) -> IResult<&str, Field> {
    // Longer names first so `desc` doesn't shadow `description`
    alt((
        value(Field::Type, tag_no_case("type")),
        value(Field::Amount, tag_no_case("amount")),
        value(Field::Description, tag_no_case("description")),
        value(Field::Description, tag_no_case("desc")),
        value(Field::Category, tag_no_case("category")),
        value(Field::Category, tag_no_case("cat")),
        value(Field::Date, tag_no_case("date")),
    ))(input)
}
