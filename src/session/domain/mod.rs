//! Domain types for the chat session core.
//!
//! Pure types with no infrastructure dependencies: pending attachments,
//! the conversation log, message segmentation, and the session state.

mod attachment;
mod attachment_store;
mod conversation;
mod ids;
mod message;
mod segment;
mod state;

pub use attachment::{Attachment, PreviewData};
pub use attachment_store::{AttachmentStore, MAX_ATTACHMENTS};
pub use conversation::ConversationLog;
pub use ids::{AttachmentId, SessionId};
pub use message::{Message, Sender};
pub use segment::{Segment, render_raw, segment};
pub use state::SessionState;
