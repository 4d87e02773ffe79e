mod sink;
mod source;

pub use sink::{HolidaySink, InMemoryHolidaySink};
pub use source::HolidaySource;
