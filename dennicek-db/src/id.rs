use dennicek_common::{
    model::{DennicekSnowflakeGenerator, Id},
    snowflake::{ProcessId, SnowflakeTimestampError, WorkerId},
};
use std::sync::{Mutex, PoisonError};
use time::UtcDateTime;
use tracing::trace;

#[derive(Debug)]
pub(crate) struct IdGenerator(Mutex<DennicekSnowflakeGenerator>);

impl IdGenerator {
    pub fn new(worker_id: WorkerId, process_id: ProcessId) -> Self {
        Self(Mutex::new(DennicekSnowflakeGenerator::new(
            worker_id, process_id,
        )))
    }

    pub fn next<Marker>(&self) -> Result<Id<Marker>, SnowflakeTimestampError> {
        // The generator is left consistent even if a holder panicked.
        let snowflake = self
            .0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .generate()?;

        trace!(
            %snowflake,
            generated_at = %UtcDateTime::from(snowflake.timestamp()),
            worker_id = snowflake.worker_id().get(),
            process_id = snowflake.process_id().get(),
            "Generated id"
        );
        Ok(snowflake.into())
    }
}

#[cfg(test)]
mod tests {
    use crate::id::IdGenerator;
    use dennicek_common::{
        model::{DennicekSnowflake, Id},
        snowflake::{ProcessId, WorkerId},
    };
    use time::{Duration, UtcDateTime};

    struct Marker;

    #[test]
    fn ids_carry_origin_and_time() {
        let ids = IdGenerator::new(WorkerId::new_unchecked(7), ProcessId::new_unchecked(2));

        let before = UtcDateTime::now();
        let first: Id<Marker> = ids.next().unwrap();
        let second: Id<Marker> = ids.next().unwrap();

        let first = DennicekSnowflake::from(u64::from(first));
        let second = DennicekSnowflake::from(u64::from(second));
        assert!(first < second);
        assert_eq!(first.worker_id().get(), 7);
        assert_eq!(first.process_id().get(), 2);
        assert_eq!(second.increment().get(), first.increment().get() + 1);

        let generated_at = UtcDateTime::from(first.timestamp());
        assert!(generated_at >= before - Duration::milliseconds(1));
        assert!(generated_at <= UtcDateTime::now());
    }
}
