pub mod allocation;

pub use allocation::{
    allocate_expenses, ExpenseAllocationInput, ExpenseItem, ExpenseLine, ExpenseSummary,
};
