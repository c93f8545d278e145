//! Line command parser.

use std::str::FromStr;

use deskkit::table::SortDirection;
use thiserror::Error;

pub const HELP: &str = "\
page N | next | prev | first | last     move between pages
size N                                  rows per page
sort COL [asc|desc|none]                sort, or cycle when no direction is given
filter COL VALUE...                     edit a filter (commits after a pause)
clear COL                               remove a filter
flush                                   commit filter edits now
hide COL | show COL                     column visibility
move COL INDEX | width COL PX           column order and width
select ROWID|all | unselect             row selection
viewport WIDTH                          resize the simulated viewport
actions | pick VALUE                    row actions menu
quick [STATUS]                          quick status filter
reset | confirm | cancel                reset the column layout
reload | status | help | quit";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Page(usize),
    Next,
    Prev,
    First,
    Last,
    Size(usize),
    /// `None` direction clears the sort.
    Sort {
        column: String,
        direction: Option<SortDirection>,
    },
    ToggleSort(String),
    Filter {
        column: String,
        value: String,
    },
    Clear(String),
    Flush,
    Hide(String),
    Show(String),
    Move {
        column: String,
        index: usize,
    },
    Width {
        column: String,
        width: u16,
    },
    Select(String),
    SelectAll,
    Unselect,
    Viewport(u32),
    Actions,
    Pick(String),
    Quick(Option<String>),
    Reset,
    Confirm,
    Cancel,
    Reload,
    Status,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}', try 'help'")]
    Unknown(String),
    #[error("{command}: missing {argument}")]
    MissingArgument {
        command: String,
        argument: &'static str,
    },
    #[error("{command}: '{value}' is not a valid number")]
    InvalidNumber { command: String, value: String },
    #[error("sort: direction must be asc, desc or none, not '{0}'")]
    InvalidDirection(String),
}

/// Parse one input line. Blank lines and `#` comments yield `None`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let line = line.trim();
    if line.is_empty() || line.starts_with('#') {
        return Ok(None);
    }
    let mut words = line.split_whitespace();
    let Some(name) = words.next() else {
        return Ok(None);
    };
    let mut args = Args {
        command: name,
        words,
    };

    let command = match name {
        "page" => Command::Page(args.number("page number")?),
        "next" => Command::Next,
        "prev" => Command::Prev,
        "first" => Command::First,
        "last" => Command::Last,
        "size" => Command::Size(args.number("page size")?),
        "sort" => {
            let column = args.word("column")?;
            match args.optional() {
                None => Command::ToggleSort(column),
                Some("asc") => Command::Sort {
                    column,
                    direction: Some(SortDirection::Asc),
                },
                Some("desc") => Command::Sort {
                    column,
                    direction: Some(SortDirection::Desc),
                },
                Some("none") => Command::Sort {
                    column,
                    direction: None,
                },
                Some(other) => return Err(CommandError::InvalidDirection(other.to_string())),
            }
        }
        "filter" => Command::Filter {
            column: args.word("column")?,
            value: args.rest("value")?,
        },
        "clear" => Command::Clear(args.word("column")?),
        "flush" => Command::Flush,
        "hide" => Command::Hide(args.word("column")?),
        "show" => Command::Show(args.word("column")?),
        "move" => Command::Move {
            column: args.word("column")?,
            index: args.number("index")?,
        },
        "width" => Command::Width {
            column: args.word("column")?,
            width: args.number("width")?,
        },
        "select" => match args.word("row id")?.as_str() {
            "all" => Command::SelectAll,
            row => Command::Select(row.to_string()),
        },
        "unselect" => Command::Unselect,
        "viewport" => Command::Viewport(args.number("width")?),
        "actions" => Command::Actions,
        "pick" => Command::Pick(args.word("item")?),
        "quick" => Command::Quick(args.optional().map(str::to_string)),
        "reset" => Command::Reset,
        "confirm" => Command::Confirm,
        "cancel" => Command::Cancel,
        "reload" => Command::Reload,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        other => return Err(CommandError::Unknown(other.to_string())),
    };
    Ok(Some(command))
}

struct Args<'a, I> {
    command: &'a str,
    words: I,
}

impl<'a, I: Iterator<Item = &'a str>> Args<'a, I> {
    fn optional(&mut self) -> Option<&'a str> {
        self.words.next()
    }

    fn word(&mut self, argument: &'static str) -> Result<String, CommandError> {
        self.optional()
            .map(str::to_string)
            .ok_or_else(|| CommandError::MissingArgument {
                command: self.command.to_string(),
                argument,
            })
    }

    fn number<T: FromStr>(&mut self, argument: &'static str) -> Result<T, CommandError> {
        let word = self.word(argument)?;
        word.parse().map_err(|_| CommandError::InvalidNumber {
            command: self.command.to_string(),
            value: word,
        })
    }

    /// Remaining words joined by single spaces.
    fn rest(&mut self, argument: &'static str) -> Result<String, CommandError> {
        let rest: Vec<&str> = self.words.by_ref().collect();
        if rest.is_empty() {
            return Err(CommandError::MissingArgument {
                command: self.command.to_string(),
                argument,
            });
        }
        Ok(rest.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_and_comment_lines() {
        assert_eq!(parse("   "), Ok(None));
        assert_eq!(parse("# warm up"), Ok(None));
    }

    #[test]
    fn test_sort_forms() {
        assert_eq!(
            parse("sort name"),
            Ok(Some(Command::ToggleSort("name".into())))
        );
        assert_eq!(
            parse("sort balance desc"),
            Ok(Some(Command::Sort {
                column: "balance".into(),
                direction: Some(SortDirection::Desc),
            }))
        );
        assert_eq!(
            parse("sort balance none"),
            Ok(Some(Command::Sort {
                column: "balance".into(),
                direction: None,
            }))
        );
        assert_eq!(
            parse("sort name up"),
            Err(CommandError::InvalidDirection("up".into()))
        );
    }

    #[test]
    fn test_filter_keeps_the_whole_value() {
        assert_eq!(
            parse("filter city  leeds,  york "),
            Ok(Some(Command::Filter {
                column: "city".into(),
                value: "leeds, york".into(),
            }))
        );
        assert_eq!(
            parse("filter city"),
            Err(CommandError::MissingArgument {
                command: "filter".into(),
                argument: "value",
            })
        );
    }

    #[test]
    fn test_numbers_are_validated() {
        assert_eq!(parse("page 3"), Ok(Some(Command::Page(3))));
        assert_eq!(
            parse("width name wide"),
            Err(CommandError::InvalidNumber {
                command: "width".into(),
                value: "wide".into(),
            })
        );
        assert!(parse("width name 70000").is_err());
    }

    #[test]
    fn test_select_all_and_unknown() {
        assert_eq!(parse("select all"), Ok(Some(Command::SelectAll)));
        assert_eq!(parse("select 17"), Ok(Some(Command::Select("17".into()))));
        assert_eq!(parse("quick"), Ok(Some(Command::Quick(None))));
        assert_eq!(parse("dance"), Err(CommandError::Unknown("dance".into())));
    }
}
