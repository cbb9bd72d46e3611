//! Obsidiana Core - Cycle, Moon, and Journal Engine
//!
//! This crate provides the calculators, the local store, and the feature
//! services behind the Obsidiana wellness companion: menstrual cycle and
//! lunar phase arithmetic, the dream journal, the counselor, the women's
//! circle, the glossary, and the lunar agenda.

pub mod agenda;
pub mod assistant;
pub mod community;
pub mod completion;
pub mod config;
pub mod cycle;
pub mod error;
pub mod glossary;
pub mod id;
pub mod journal;
pub mod markdown;
pub mod moon;
pub mod notes;
pub mod profile;
pub mod store;

// Macros are automatically available at crate root due to #[macro_export]

pub use agenda::{Agenda, AgendaEvent, EventKind};
pub use assistant::{
    ChatMessage, ChatRole, ChatSession, Counselor, CounselorReply, MiracleQuestion, ReplySource,
};
pub use community::{Comment, CommunityFeed, CommunityPost, ReactionOutcome};
pub use completion::{CompletionProvider, HttpCompletionClient, ScriptedProvider};
pub use config::ObsidianaConfig;
pub use cycle::{CycleParameters, CyclePhase, CycleResult, PhaseDetails};
pub use error::{CoreError, Result};
pub use glossary::GlossaryTerm;
pub use id::{CommentId, DreamId, EventId, Id, IdType, PostId};
pub use journal::{DreamEntry, DreamJournal};
pub use markdown::{Block, HeadingLevel, Inline};
pub use moon::{MoonPhase, MoonResult};
pub use notes::{CalendarNotes, DayRecord, NotesManager, PainLevel};
pub use profile::{ProfileManager, UserProfile};
pub use store::{JsonFileStore, MemoryStore, Store, StoreBackend, StoreKey};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::{
        Agenda, AgendaEvent, CalendarNotes, Comment, CommunityFeed, CommunityPost,
        CompletionProvider, CoreError, Counselor, CounselorReply, CycleParameters, CyclePhase,
        CycleResult, DayRecord, DreamEntry, DreamId, DreamJournal, EventId, EventKind,
        HttpCompletionClient, Id, IdType, JsonFileStore, MemoryStore, MoonPhase, MoonResult,
        NotesManager, ObsidianaConfig, PainLevel, PostId, ProfileManager, ReactionOutcome,
        Result, ScriptedProvider, Store, StoreBackend, StoreKey, UserProfile,
    };
    pub use crate::cycle::compute_cycle;
    pub use crate::moon::compute_moon_phase;
}
