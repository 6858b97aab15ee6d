use nom::branch::alt;
use nom::bytes::complete::tag_no_case;
use nom::character::complete::{multispace0, multispace1};
use nom::combinator::map;
use nom::multi::many0;
use nom::sequence::preceded;
use nom::IResult;
use crate::parser::{non_space, text, transaction_type, Command};
use crate::transaction::TransactionType;

/// One-line form submission. Amount and date are kept as typed and validated on submit, like
/// any other form input.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct AddCommand {
    pub(crate) kind: TransactionType,
    pub(crate) amount: String,
    pub(crate) date: Option<String>,
    pub(crate) category: Option<String>,
    pub(crate) description: Option<String>,
}

enum AddOption {
    Date(String),
    Category(String),
    Description(String),
}

/// Parse `ADD type amount [ON date] [CATEGORY 'text'] [DESC 'text']`, options in any order.
pub(crate) fn add(input: &str) -> IResult<&str, Command> {
    let (input, _) = tag_no_case("ADD")(input)?;
    let (input, _) = multispace1(input)?;
    let (input, kind) = transaction_type(input)?;
    let (input, _) = multispace1(input)?;
    let (input, amount) = non_space(input)?;
    let (input, options) = many0(preceded(multispace1, add_option))(input)?;
    let (input, _) = multispace0(input)?;

    let mut command = AddCommand {
        kind,
        amount: amount.to_string(),
        date: None,
        category: None,
        description: None,
    };
    for option in options {
        match option {
            AddOption::Date(date) => command.date = Some(date),
            AddOption::Category(category) => command.category = Some(category),
            AddOption::Description(description) => command.description = Some(description),
        }
    }

    Ok((input, Command::Add(command)))
}

fn add_option(input: &str) -> IResult<&str, AddOption> {
    alt((
        map(preceded(option_keyword(&["on"]), non_space), |d: &str| AddOption::Date(d.to_string())),
        map(preceded(option_keyword(&["category", "cat"]), text), AddOption::Category),
        map(preceded(option_keyword(&["description", "desc"]), text), AddOption::Description),
    ))(input)
}

/// Any of `words` followed by at least one space.
fn option_keyword<'a>(words: &'static [&'static str]) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    move |input: &'a str| {
        for word in words {
            let result: IResult<&str, &str> = tag_no_case(*word)(input);
            if let Ok((rest, matched)) = result {
                if let Ok((rest, _)) = multispace1::<&str, nom::error::Error<&str>>(rest) {
                    return Ok((rest, matched));
                }
            }
        }
        Err(nom::Err::Error(nom::error::Error::new(input, nom::error::ErrorKind::Tag)))
    }
}
