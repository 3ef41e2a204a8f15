pub mod post;
pub mod recording;
pub mod text;

use crate::{
    model::text::{EmptyTextError, NonEmptyText},
    snowflake::{Epoch, Snowflake, SnowflakeGenerator},
};
use serde::{Deserialize, Serialize};
use std::{fmt::Display, marker::PhantomData};
use thiserror::Error;
use time::{UtcDateTime, macros::utc_datetime};

/// Data read back from storage did not satisfy the model's invariants.
#[derive(Clone, Eq, PartialEq, Debug, Hash, Error)]
pub enum ModelValidationError {
    #[error(transparent)]
    EmptyText(#[from] EmptyTextError),
    #[error("Stored audio payload was empty")]
    EmptyAudio,
}

/// Input from a client was incomplete.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Hash, Error)]
pub enum ValidationError {
    #[error("Required field `{0}` is missing or empty")]
    MissingField(&'static str),
}

pub(crate) fn required(
    field: &'static str,
    value: String,
) -> Result<NonEmptyText, ValidationError> {
    NonEmptyText::new(value).map_err(|_| ValidationError::MissingField(field))
}

#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash)]
pub struct DennicekEpoch;
impl Epoch for DennicekEpoch {
    const EPOCH_TIME: UtcDateTime = utc_datetime!(2025-01-01 00:00);
}

pub type DennicekSnowflake = Snowflake<DennicekEpoch>;
pub type DennicekSnowflakeGenerator = SnowflakeGenerator<DennicekEpoch>;

#[derive(
    Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Debug, Default, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Id<Marker>(DennicekSnowflake, #[serde(skip)] PhantomData<Marker>);

impl<Marker> Id<Marker> {
    #[must_use]
    pub fn new(snowflake: DennicekSnowflake) -> Self {
        Self(snowflake, PhantomData)
    }

    #[must_use]
    pub fn snowflake(self) -> DennicekSnowflake {
        self.0
    }
}

impl<Marker> Display for Id<Marker> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl<Marker> From<DennicekSnowflake> for Id<Marker> {
    fn from(value: DennicekSnowflake) -> Self {
        Self::new(value)
    }
}

impl<Marker> From<u64> for Id<Marker> {
    fn from(value: u64) -> Self {
        Id::new(DennicekSnowflake::new(value))
    }
}

impl<Marker> From<Id<Marker>> for u64 {
    fn from(value: Id<Marker>) -> Self {
        value.snowflake().get()
    }
}
