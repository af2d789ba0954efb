pub mod classifier;
pub mod domain;
pub mod error;
pub mod events;
pub mod filter;
pub mod goals;
pub mod interactions;
pub mod messages;
pub mod ports;
pub mod ranker;

pub use classifier::{classify, detect_relationship, Classification, Classifier, MatchMode};
pub use domain::{
    CommunicationGoal, Contact, EventType, FamilyEvent, GoalFrequency, GoalMethod, Group,
    Interaction, InteractionType, RawContact, Relationship, User,
};
pub use error::{CoreError, CoreResult};
pub use filter::{filter_contacts, FilterPolicy};
pub use interactions::InteractionLog;
pub use messages::{suggest_message, MessageRequest, Tone};
pub use ports::{DatabaseService, MessageSuggestionService, PortError, PortResult};
pub use ranker::{rank_and_group, GroupedView, RankedContact, UrgencyTier};
