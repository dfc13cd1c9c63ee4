use derive_more::Display;
use snafu::{OptionExt, Snafu};

/// One parsed line of shell input. Words after the first argument are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Command {
    #[display("create {_0}")]
    Create(String),
    #[display("cat {_0}")]
    Cat(String),
    #[display("rm {_0}")]
    Rm(String),
    #[display("mkdir {_0}")]
    Mkdir(String),
    #[display("rmdir {_0}")]
    Rmdir(String),
    #[display("cd {_0}")]
    Cd(String),
    #[display("ls")]
    Ls,
    #[display("du")]
    Du,
    #[display("pwd")]
    Pwd,
    #[display("find {_0}")]
    Find(String),
    #[display("exit")]
    Exit,
    #[display("{_0}")]
    Unknown(String),
}

impl TryFrom<&str> for Command {
    type Error = CommandError;

    fn try_from(line: &str) -> Result<Self, Self::Error> {
        let mut words = line.split_whitespace();
        let verb = words.next().unwrap_or_default();
        let mut argument = || {
            words
                .next()
                .map(str::to_string)
                .context(MissingArgumentSnafu { verb })
        };

        Ok(match verb {
            "create" => Command::Create(argument()?),
            "cat" => Command::Cat(argument()?),
            "rm" => Command::Rm(argument()?),
            "mkdir" => Command::Mkdir(argument()?),
            "rmdir" => Command::Rmdir(argument()?),
            "cd" => Command::Cd(argument()?),
            "find" => Command::Find(argument()?),
            "ls" => Command::Ls,
            "du" => Command::Du,
            "pwd" => Command::Pwd,
            "exit" => Command::Exit,
            other => Command::Unknown(other.to_string()),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Snafu)]
pub enum CommandError {
    #[snafu(display("Invalid command"))]
    MissingArgument { verb: String },
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    #[case("create notes", Command::Create("notes".into()))]
    #[case("cat notes extra words", Command::Cat("notes".into()))]
    #[case("rm notes", Command::Rm("notes".into()))]
    #[case("mkdir docs", Command::Mkdir("docs".into()))]
    #[case("rmdir docs", Command::Rmdir("docs".into()))]
    #[case("cd ../a/b", Command::Cd("../a/b".into()))]
    #[case("find x", Command::Find("x".into()))]
    #[case("ls", Command::Ls)]
    #[case("ls ignored", Command::Ls)]
    #[case("du", Command::Du)]
    #[case("pwd", Command::Pwd)]
    #[case("exit", Command::Exit)]
    #[case("  mkdir   spaced  ", Command::Mkdir("spaced".into()))]
    #[case("LS", Command::Unknown("LS".into()))]
    #[case("", Command::Unknown("".into()))]
    fn parses_commands(#[case] line: &str, #[case] expected: Command) {
        assert_eq!(Command::try_from(line).unwrap(), expected);
    }

    #[rstest]
    #[case("create")]
    #[case("cat")]
    #[case("rm ")]
    #[case("mkdir")]
    #[case("rmdir")]
    #[case("cd")]
    #[case("find")]
    fn missing_argument_is_invalid(#[case] line: &str) {
        let result = Command::try_from(line);
        assert!(matches!(result, Err(CommandError::MissingArgument { .. })));
        assert_eq!(result.unwrap_err().to_string(), "Invalid command");
    }

    #[test]
    fn display_round_trips_the_verb() {
        assert_eq!(Command::Cd("/".into()).to_string(), "cd /");
        assert_eq!(Command::Du.to_string(), "du");
    }
}
