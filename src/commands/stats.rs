use crate::error::Result;
use crate::model::Stats;
use crate::store::Tracker;

pub fn run(tracker: &Tracker) -> Result<Stats> {
    Ok(Stats::from_tasks(&tracker.read_all()?))
}
