//! Prompt text sent to the advisory service.

use std::fmt::Write;

use crate::models::FinancialInput;

const PERSONA: &str = "You are a tax advisor for Indian salaried employees.";

fn label(field: &str) -> &'static str {
    match field {
        "gross_salary" => "Gross Salary",
        "basic_salary" => "Basic Salary",
        "hra_received" => "HRA Received",
        "rent_paid" => "Rent Paid",
        "deduction_80c" => "Deduction 80C",
        "deduction_80d" => "Deduction 80D",
        "standard_deduction" => "Standard Deduction",
        "professional_tax" => "Professional Tax",
        "tds" => "TDS",
        _ => "Other",
    }
}

fn user_data_block(input: &FinancialInput) -> String {
    let mut block = String::from("User Data:\n");
    for (field, amount) in input.amounts() {
        // Writing into a String cannot fail.
        let _ = writeln!(block, "{}: {}", label(field), amount);
    }
    let _ = writeln!(block, "Selected Regime: {}", input.selected_regime);
    block
}

/// Asks for exactly one clarifying question and no advice yet.
pub fn followup_prompt(input: &FinancialInput) -> String {
    format!(
        "{PERSONA} Based on the following user data, ask ONE smart, relevant follow-up \
         question to help optimize their tax savings. Do NOT give advice yet, just ask a \
         question.\n\n{}",
        user_data_block(input)
    )
}

/// Asks for personalised suggestions given the user's reply to the follow-up.
pub fn suggestion_prompt(
    input: &FinancialInput,
    user_answer: &str,
) -> String {
    format!(
        "{PERSONA} Based on the following user data and their answer to your follow-up \
         question, provide actionable, personalized investment and tax-saving suggestions. \
         Format your response as a clear, readable list.\n\n{}\nUser's Answer: {}\n",
        user_data_block(input),
        user_answer.trim()
    )
}
