use clap::Args;
use serde_json::Value;

use nnn_lease_core::expenses::{self, ExpenseAllocationInput};

use crate::input;

/// Arguments for expense allocation
#[derive(Args)]
pub struct ExpensesArgs {
    /// Path to JSON or YAML expense allocation input
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_expenses(args: ExpensesArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let alloc_input: ExpenseAllocationInput =
        input::read_record(args.input.as_deref(), "expense allocation")?;
    let result = expenses::allocate_expenses(&alloc_input)?;
    Ok(serde_json::to_value(result)?)
}
