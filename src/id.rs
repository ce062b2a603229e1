//! Opaque identifiers for tasks, calendar events and reminders

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Declares a newtype identifier backed by a random v4 UUID
macro_rules! synthetise_id_type {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name {
            content: Uuid,
        }

        impl $name {
            /// Generate a random identifier.
            pub fn random() -> Self {
                Self { content: Uuid::new_v4() }
            }

            pub fn as_uuid(&self) -> &Uuid {
                &self.content
            }
        }

        impl From<Uuid> for $name {
            fn from(content: Uuid) -> Self {
                Self { content }
            }
        }

        impl FromStr for $name {
            type Err = uuid::Error;
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                let content = Uuid::parse_str(s)?;
                Ok(Self { content })
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut Formatter<'_>) -> Result<(), std::fmt::Error> {
                write!(f, "{}", self.content)
            }
        }
    }
}

synthetise_id_type!(
    /// Identifies a [`Task`](crate::Task). Assigned by the task store at creation, never changes afterwards.
    TaskId
);
synthetise_id_type!(
    /// Identifies a [`CalendarEvent`](crate::CalendarEvent)
    EventId
);
synthetise_id_type!(
    /// Identifies a [`Reminder`](crate::Reminder)
    ReminderId
);
