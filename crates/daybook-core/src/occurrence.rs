use chrono::NaiveDate;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;
use uuid::Uuid;

use crate::models::Task;

const VIRTUAL_SEPARATOR: &str = "-repeat-";

/// Identity of an entry in a materialized task list.
///
/// Stored tasks are `Base`; occurrences produced by recurrence expansion are
/// `Virtual` and point back at the stored task they were derived from. Any
/// mutation must go through [`OccurrenceId::real_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum OccurrenceId {
    Base(Uuid),
    Virtual { base: Uuid, index: u32 },
}

impl OccurrenceId {
    #[inline]
    pub fn real_id(&self) -> Uuid {
        match self {
            OccurrenceId::Base(id) => *id,
            OccurrenceId::Virtual { base, .. } => *base,
        }
    }

    #[inline]
    pub fn is_virtual(&self) -> bool {
        matches!(self, OccurrenceId::Virtual { .. })
    }
}

impl From<Uuid> for OccurrenceId {
    fn from(id: Uuid) -> Self {
        OccurrenceId::Base(id)
    }
}

impl fmt::Display for OccurrenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OccurrenceId::Base(id) => write!(f, "{}", id),
            OccurrenceId::Virtual { base, index } => {
                write!(f, "{}{}{}", base, VIRTUAL_SEPARATOR, index)
            }
        }
    }
}

#[derive(Error, Debug, PartialEq)]
#[error("Invalid occurrence id: {0}")]
pub struct ParseOccurrenceIdError(String);

impl FromStr for OccurrenceId {
    type Err = ParseOccurrenceIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ParseOccurrenceIdError(s.to_string());
        match s.rsplit_once(VIRTUAL_SEPARATOR) {
            Some((base, index)) => Ok(OccurrenceId::Virtual {
                base: base.parse().map_err(|_| invalid())?,
                index: index.parse().map_err(|_| invalid())?,
            }),
            None => s.parse().map(OccurrenceId::Base).map_err(|_| invalid()),
        }
    }
}

/// One entry of a materialized list: a stored task or a virtual occurrence of one.
///
/// For virtual entries `task` is a copy of the base task with shifted dates and
/// `parent_task_id` set; `task.id` stays the base id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Occurrence {
    pub id: OccurrenceId,
    pub task: Task,
}

impl Occurrence {
    pub fn base(task: Task) -> Self {
        Self {
            id: OccurrenceId::Base(task.id),
            task,
        }
    }

    pub(crate) fn virtual_of(base: &Task, index: u32, start: NaiveDate, end: NaiveDate) -> Self {
        let mut task = base.clone();
        task.start_date = start;
        task.end_date = end;
        task.parent_task_id = Some(base.id);
        Self {
            id: OccurrenceId::Virtual {
                base: base.id,
                index,
            },
            task,
        }
    }

    #[inline]
    pub fn real_id(&self) -> Uuid {
        self.id.real_id()
    }

    #[inline]
    pub fn is_virtual(&self) -> bool {
        self.id.is_virtual()
    }

    #[inline]
    pub fn start_date(&self) -> NaiveDate {
        self.task.start_date
    }

    #[inline]
    pub fn end_date(&self) -> NaiveDate {
        self.task.end_date
    }
}
