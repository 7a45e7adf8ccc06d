//! Command script tokens.
//!
//! A token is `kind[:steps][@speed][=amount]`, for example `forward:3`,
//! `turn-left:2@1.5` or `body-left=10`. Kinds accept the same names and
//! aliases as [`CommandKind`]'s `FromStr`.

use std::fmt;
use std::str::FromStr;

use legion_gait::{CommandKind, MotionCommand};

use crate::error::SimError;

/// Parse one script token.
pub fn parse_token(token: &str) -> Result<MotionCommand, SimError> {
    let (rest, amount) = match token.split_once('=') {
        Some((rest, amount)) => (rest, Some(parse_number::<f32>(token, "amount", amount)?)),
        None => (token, None),
    };
    let (rest, speed) = match rest.split_once('@') {
        Some((rest, speed)) => (rest, Some(parse_number::<f32>(token, "speed", speed)?)),
        None => (rest, None),
    };
    let (name, steps) = match rest.split_once(':') {
        Some((name, steps)) => (name, Some(parse_number::<u32>(token, "steps", steps)?)),
        None => (rest, None),
    };
    if name.trim().is_empty() {
        return Err(SimError::script(token, "missing command name"));
    }

    let kind = CommandKind::from_str(name)?;
    if amount.is_some() && !kind.takes_amount() {
        return Err(SimError::script(token, format!("{kind} does not take an amount")));
    }
    Ok(MotionCommand {
        kind,
        steps,
        speed_multiple: speed,
        amount,
    })
}

/// Parse every token, stopping at the first bad one.
pub fn parse_script<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<MotionCommand>, SimError> {
    tokens.iter().map(|t| parse_token(t.as_ref())).collect()
}

fn parse_number<T>(token: &str, what: &str, text: &str) -> Result<T, SimError>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    text.trim()
        .parse()
        .map_err(|e| SimError::script(token, format!("{what} '{text}' is not a number ({e})")))
}
