use chrono::{DateTime, Local};

/// Represents an entity responsible for providing the current time across application. Lets
/// tests pin the time of a tracker tick.
pub trait Clock: Sync + Send + 'static {
    fn now(&self) -> DateTime<Local>;
}

pub struct DefaultClock;

impl Clock for DefaultClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
