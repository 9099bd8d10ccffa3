/// Transport command scripts
///
/// A script is a list of commands separated by `;` or newlines, e.g.
/// `select Arm.L; seek 40; key; play; wait 500`. Lines starting with `#` are
/// comments.
use nom::{
    branch::alt,
    bytes::complete::{tag, take_till, take_while, take_while1},
    character::complete::{i64 as parse_i64, space0, space1, u64 as parse_u64},
    combinator::{map, map_res, not, peek, value},
    sequence::{preceded, terminated},
    IResult,
};
use std::time::Duration;

use crate::error::{Result, RigError};
use crate::projection::ViewMode;
use crate::rig::Joint;

#[derive(Debug, Clone, PartialEq)]
pub enum TransportCommand {
    Play,
    Pause,
    Toggle,
    Seek(i64),
    SeekStart,
    SeekEnd,
    StepForward,
    StepBackward,
    AddKeyframe,
    SelectBone(Joint),
    SelectModel(String),
    Deselect,
    /// Let wall-clock time pass
    Wait(Duration),
    View(ViewMode),
}

fn is_name_char(c: char) -> bool {
    c.is_alphanumeric() || c == '.' || c == '_' || c == '-'
}

/// A whole word: `play` must not match the start of `player`
fn keyword<'a>(word: &'static str) -> impl FnMut(&'a str) -> IResult<&'a str, &'a str> {
    terminated(tag(word), not(peek(take_while1(is_name_char))))
}

fn name(input: &str) -> IResult<&str, &str> {
    take_while1(is_name_char)(input)
}

fn argument<'a, O>(
    word: &'static str,
    parser: impl FnMut(&'a str) -> IResult<&'a str, O>,
) -> impl FnMut(&'a str) -> IResult<&'a str, O> {
    preceded(terminated(keyword(word), space1), parser)
}

fn select(input: &str) -> IResult<&str, TransportCommand> {
    alt((
        map(
            argument("select", preceded(terminated(keyword("model"), space1), name)),
            |model: &str| TransportCommand::SelectModel(model.to_string()),
        ),
        map(
            argument("select", map_res(name, Joint::from_name)),
            TransportCommand::SelectBone,
        ),
    ))(input)
}

fn command(input: &str) -> IResult<&str, TransportCommand> {
    alt((
        value(TransportCommand::Play, keyword("play")),
        value(TransportCommand::Pause, keyword("pause")),
        value(TransportCommand::Toggle, keyword("toggle")),
        map(argument("seek", parse_i64), TransportCommand::Seek),
        value(TransportCommand::SeekStart, keyword("start")),
        value(TransportCommand::SeekEnd, keyword("end")),
        value(TransportCommand::StepForward, keyword("step")),
        value(TransportCommand::StepBackward, keyword("back")),
        value(TransportCommand::AddKeyframe, keyword("key")),
        select,
        value(TransportCommand::Deselect, keyword("deselect")),
        map(argument("wait", parse_u64), |ms| {
            TransportCommand::Wait(Duration::from_millis(ms))
        }),
        map(
            argument("view", map_res(name, |view: &str| view.parse::<ViewMode>())),
            TransportCommand::View,
        ),
    ))(input)
}

/// Skip whitespace, separators and comments
fn separators(mut input: &str) -> &str {
    loop {
        let trimmed = input.trim_start_matches(|c: char| c.is_whitespace() || c == ';');
        match trimmed.strip_prefix('#') {
            Some(comment) => {
                let (rest, _) = take_till::<_, _, nom::error::Error<&str>>(|c| c == '\n')(comment)
                    .unwrap_or(("", comment));
                input = rest;
            }
            None => return trimmed,
        }
    }
}

fn first_word(input: &str) -> &str {
    let end = input
        .find(|c: char| c.is_whitespace() || c == ';')
        .unwrap_or(input.len());
    &input[..end]
}

/// Parse a full script into commands
pub fn parse_script(script: &str) -> Result<Vec<TransportCommand>> {
    let error = |rest: &str, message: String| RigError::Command {
        position: script.len() - rest.len(),
        message,
    };

    let mut commands = Vec::new();
    let mut rest = separators(script);

    while !rest.is_empty() {
        let (next, parsed) = command(rest)
            .map_err(|_| error(rest, format!("unrecognized command `{}`", first_word(rest))))?;

        let (next, _) = space0::<_, nom::error::Error<&str>>(next).unwrap_or((next, ""));
        let (after, _) = take_while::<_, _, nom::error::Error<&str>>(|c| c == '\r')(next)
            .unwrap_or((next, ""));
        if !(after.is_empty() || after.starts_with(';') || after.starts_with('\n')) {
            return Err(error(after, format!("unexpected `{}`", first_word(after))));
        }

        commands.push(parsed);
        rest = separators(after);
    }

    Ok(commands)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_commands() {
        let commands = parse_script("play; pause;toggle\nstart\nend; step; back; key").unwrap();
        assert_eq!(
            commands,
            vec![
                TransportCommand::Play,
                TransportCommand::Pause,
                TransportCommand::Toggle,
                TransportCommand::SeekStart,
                TransportCommand::SeekEnd,
                TransportCommand::StepForward,
                TransportCommand::StepBackward,
                TransportCommand::AddKeyframe,
            ]
        );
    }

    #[test]
    fn test_arguments() {
        let commands =
            parse_script("seek -5; seek 500; wait 250; view top; select Arm.L; select model Robot_2")
                .unwrap();
        assert_eq!(
            commands,
            vec![
                TransportCommand::Seek(-5),
                TransportCommand::Seek(500),
                TransportCommand::Wait(Duration::from_millis(250)),
                TransportCommand::View(ViewMode::Top),
                TransportCommand::SelectBone(Joint::ArmL),
                TransportCommand::SelectModel("Robot_2".to_string()),
            ]
        );
    }

    #[test]
    fn test_deselect_is_not_select() {
        assert_eq!(
            parse_script("deselect").unwrap(),
            vec![TransportCommand::Deselect]
        );
    }

    #[test]
    fn test_comments_and_blank_lines() {
        let script = "# warm up\n\nplay\n  # halfway\nwait 1000\r\n;;\n";
        assert_eq!(
            parse_script(script).unwrap(),
            vec![
                TransportCommand::Play,
                TransportCommand::Wait(Duration::from_secs(1)),
            ]
        );
        assert!(parse_script("").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_command_reports_position() {
        match parse_script("play; rewind 3") {
            Err(RigError::Command { position, message }) => {
                assert_eq!(position, 6);
                assert!(message.contains("rewind"));
            }
            other => panic!("expected command error, got {other:?}"),
        }
    }

    #[test]
    fn test_keywords_need_word_boundary() {
        assert!(parse_script("player").is_err());
        assert!(parse_script("seek ten").is_err());
        assert!(parse_script("select tail").is_err());
    }

    #[test]
    fn test_trailing_garbage() {
        match parse_script("seek 4 2") {
            Err(RigError::Command { position, .. }) => assert_eq!(position, 7),
            other => panic!("expected command error, got {other:?}"),
        }
    }
}
