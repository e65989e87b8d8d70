//! Interactive entry of one customer.
//!
//! Fields are asked in the form's order, from credit score down to gender and
//! country, each with its default in parentheses. A blank answer keeps the
//! default; an invalid answer prints the reason and asks again.

use std::io::{BufRead, Write};
use std::ops::RangeInclusive;

use anyhow::{Context, Result, bail};
use churn_model::input::{
    AGE_RANGE, BALANCE_RANGE, CREDIT_SCORE_RANGE, ESTIMATED_SALARY_RANGE, NUM_OF_PRODUCTS_RANGE,
    TENURE_RANGE,
};
use churn_model::{Geography, RawInput};

/// Ask for every field of a [`RawInput`].
///
/// `genders` are the labels the fitted encoder knows; answers are matched
/// case-insensitively and stored with the encoder's spelling.
///
/// # Errors
///
/// Fails if the input ends before every field was answered or if the
/// streams cannot be read or written.
pub fn prompt_raw_input<R: BufRead, W: Write>(
    input: &mut R,
    output: &mut W,
    genders: &[String],
) -> Result<RawInput> {
    let defaults = RawInput::default();
    let mut prompter = Prompter { input, output };

    let credit_score = prompter.ask(
        &format!("Credit Score {}", range_hint(&CREDIT_SCORE_RANGE)),
        &defaults.credit_score.to_string(),
        |s| parse_int(s, &CREDIT_SCORE_RANGE),
    )?;
    let age = prompter.ask(
        &format!("Age {}", range_hint(&AGE_RANGE)),
        &defaults.age.to_string(),
        |s| parse_int(s, &AGE_RANGE),
    )?;
    let tenure = prompter.ask(
        &format!("Tenure {}", range_hint(&TENURE_RANGE)),
        &defaults.tenure.to_string(),
        |s| parse_int(s, &TENURE_RANGE),
    )?;
    let balance = prompter.ask(
        &format!("Balance {}", range_hint(&BALANCE_RANGE)),
        &defaults.balance.to_string(),
        |s| parse_float(s, &BALANCE_RANGE),
    )?;
    let num_of_products = prompter.ask(
        &format!("Number of Products {}", range_hint(&NUM_OF_PRODUCTS_RANGE)),
        &defaults.num_of_products.to_string(),
        |s| parse_int(s, &NUM_OF_PRODUCTS_RANGE),
    )?;
    let has_cr_card = prompter.ask(
        "Has Credit Card [Yes/No]",
        defaults.has_cr_card.as_str(),
        |s| RawInput::parse_has_cr_card(s).map_err(|e| e.to_string()),
    )?;
    let is_active_member = prompter.ask(
        "Is Active Member [Yes/No]",
        defaults.is_active_member.as_str(),
        |s| RawInput::parse_is_active_member(s).map_err(|e| e.to_string()),
    )?;
    let estimated_salary = prompter.ask(
        &format!("Estimated Salary {}", range_hint(&ESTIMATED_SALARY_RANGE)),
        &defaults.estimated_salary.to_string(),
        |s| parse_float(s, &ESTIMATED_SALARY_RANGE),
    )?;
    let gender = prompter.ask(
        &format!("Gender {}", choice_hint(genders.iter().map(String::as_str))),
        &defaults.gender,
        |s| parse_gender(s, genders),
    )?;
    let geography = prompter.ask(
        &format!("Geography {}", choice_hint(Geography::ALL.iter().map(Geography::as_str))),
        defaults.geography.as_str(),
        |s| s.parse::<Geography>().map_err(|e| e.to_string()),
    )?;

    Ok(RawInput {
        credit_score,
        age,
        tenure,
        balance,
        num_of_products,
        has_cr_card,
        is_active_member,
        estimated_salary,
        gender,
        geography,
    })
}

struct Prompter<'a, R, W> {
    input: &'a mut R,
    output: &'a mut W,
}

impl<R: BufRead, W: Write> Prompter<'_, R, W> {
    fn ask<T>(
        &mut self,
        label: &str,
        default: &str,
        parse: impl Fn(&str) -> std::result::Result<T, String>,
    ) -> Result<T> {
        loop {
            write!(self.output, "{label} ({default}): ").context("write prompt")?;
            self.output.flush().context("flush prompt")?;
            let mut line = String::new();
            let read = self.input.read_line(&mut line).context("read answer")?;
            if read == 0 {
                bail!("input ended before the form was complete");
            }
            let answer = match line.trim() {
                "" => default,
                other => other,
            };
            match parse(answer) {
                Ok(value) => return Ok(value),
                Err(reason) => writeln!(self.output, "  {reason}").context("write prompt")?,
            }
        }
    }
}

fn range_hint<T: std::fmt::Display>(range: &RangeInclusive<T>) -> String {
    format!("[{}-{}]", range.start(), range.end())
}

fn choice_hint<'a>(choices: impl Iterator<Item = &'a str>) -> String {
    format!("[{}]", choices.collect::<Vec<_>>().join("/"))
}

fn parse_int(value: &str, range: &RangeInclusive<u32>) -> std::result::Result<u32, String> {
    let parsed: u32 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a whole number"))?;
    if range.contains(&parsed) {
        Ok(parsed)
    } else {
        Err(format!(
            "{parsed} is outside {}..={}",
            range.start(),
            range.end()
        ))
    }
}

fn parse_float(value: &str, range: &RangeInclusive<f64>) -> std::result::Result<f64, String> {
    let parsed: f64 = value
        .parse()
        .map_err(|_| format!("'{value}' is not a number"))?;
    if parsed.is_finite() && range.contains(&parsed) {
        Ok(parsed)
    } else {
        Err(format!(
            "{parsed} is outside {}..={}",
            range.start(),
            range.end()
        ))
    }
}

fn parse_gender(value: &str, genders: &[String]) -> std::result::Result<String, String> {
    genders
        .iter()
        .find(|known| known.eq_ignore_ascii_case(value))
        .cloned()
        .ok_or_else(|| {
            format!(
                "'{value}' is not a known gender (expected one of: {})",
                genders.join(", ")
            )
        })
}
