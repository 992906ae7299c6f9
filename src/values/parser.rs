use anyhow::{anyhow, bail, ensure, Context, Result};
use tera::Value;

use crate::{
    values::{Type, Values},
    warn,
};

use super::token::{Token, Tokens};

macro_rules! berr {
    ($($arg:tt)+) => {
        bail!("{}", $($arg)*)
    }
}

macro_rules! aerr {
    ($($arg:tt)+) => {
        anyhow!("{}", $($arg)*)
    }
}

pub fn try_value_from(tokens: &mut Tokens<'_>) -> Result<Value> {
    match tokens.tokens() {
        &[Token::String(s), ..] => {
            tokens.step();
            Ok(Value::String(s.to_string()))
        }
        &[Token::Bool(b), ..] => {
            tokens.step();
            Ok(Value::Bool(b))
        }
        _ => berr!(tokens.error_current_span(format!(
            "Found unexpected token {:?} while trying to parse value",
            tokens.try_first()
        ))),
    }
}

pub fn try_type_from(tokens: &mut Tokens<'_>) -> Result<Type> {
    match tokens.tokens() {
        [Token::KwAny, ..] => {
            tokens.step();
            Ok(Type::Any)
        }
        [Token::KwString, ..] => {
            tokens.step();
            Ok(Type::String)
        }
        [Token::KwBool, ..] => {
            tokens.step();
            Ok(Type::Bool)
        }
        _ => berr!(tokens.error_current_span(format!(
            "Found unexpected token {:?} while trying to parse data type",
            tokens.try_first()
        ))),
    }
}

pub fn parse_config(tokens: &mut Tokens<'_>) -> Result<Values> {
    let mut values = Values::default();

    while !tokens.is_empty() {
        match tokens.tokens() {
            [Token::Ident(_), Token::Eq | Token::Colon, ..] => {
                let loc = tokens.current_location();
                let ident = tokens.get_ident().context("Expected an identifier")?;
                tokens.step();

                // Optional data type
                let typ = if let [Token::Colon, ..] = tokens.tokens() {
                    try_type_from(tokens.skiping(1))?
                } else {
                    Type::Any
                };

                ensure!(
                    matches!(tokens.tokens(), [Token::Eq, ..]),
                    aerr!(tokens.error_current_span(format!("Expected '=' after `{ident}`")))
                );

                let value = try_value_from(tokens.skiping(1))?;

                if values.value_map.insert(ident.to_string(), value).is_some() {
                    warn!(tokens.error_at(
                        loc,
                        format!("Ident `{ident}` is already defined, overriding")
                    ));
                }
                values.type_map.insert(ident.to_string(), typ);

                if let [Token::Comma | Token::Semicolon, ..] = tokens.tokens() {
                    tokens.step();
                }
            }
            &[token, ..] => {
                berr!(tokens.error_current_span(format!("Found unexpected token {token:?}")))
            }
            [] => unreachable!("Loop stops once every token is consumed"),
        }
    }

    Ok(values)
}
