pub mod escalation;
pub mod schedule;

pub use schedule::{generate_rent_schedule, RentPeriod, RentSchedule};
